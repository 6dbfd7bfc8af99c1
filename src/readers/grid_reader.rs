use crate::error::{FetchError, Result};
use crate::models::{GridCube, GridCubeBuilder, YearMonth};
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, GRID_FIELD_WIDTH, GRID_HEADER_LINES, GRID_LAT_MARKER, GRID_LON_START,
    GRID_LON_STEP, GRID_MISSING_VALUE, GRID_VALUE_SCALE,
};
use crate::utils::layout::month_from_file_name;
use chrono::NaiveTime;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Decoder for TEMIS monthly L3 ASCII grids (gzip, fixed-width 4-character columns).
pub struct GridReader {
    header_lines: usize,
}

impl GridReader {
    pub fn new() -> Self {
        Self {
            header_lines: GRID_HEADER_LINES,
        }
    }

    pub fn with_header_lines(header_lines: usize) -> Self {
        Self { header_lines }
    }

    /// Decode a gzip grid whose month is encoded in its file name (`no2_YYYYMM.asc.gz`)
    pub fn decode_file(&self, path: &Path) -> Result<GridCube> {
        let month = month_from_file_name(path).ok_or_else(|| {
            FetchError::InvalidFormat(format!(
                "Cannot infer month from file name: {}",
                path.display()
            ))
        })?;
        self.decode(path, month)
    }

    pub fn decode(&self, path: &Path, month: YearMonth) -> Result<GridCube> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, GzDecoder::new(file));
        self.decode_reader(reader, month)
    }

    /// Decode already-decompressed grid text
    pub fn decode_reader<R: BufRead>(&self, reader: R, month: YearMonth) -> Result<GridCube> {
        let time = month
            .first_day()
            .ok_or_else(|| FetchError::InvalidRequest(format!("Invalid month: {}", month)))?
            .and_time(NaiveTime::MIN);

        let mut builder = GridCubeBuilder::new();
        let mut latitude: Option<f64> = None;
        let mut column = 0usize;

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_number = index + 1;

            if index < self.header_lines {
                continue;
            }

            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            if let Some(lat) = parse_latitude(line, line_number)? {
                latitude = Some(lat);
                column = 0;
                continue;
            }

            let lat = latitude.ok_or_else(|| {
                FetchError::InvalidFormat(format!(
                    "Line {}: data row before any '{}' band",
                    line_number, GRID_LAT_MARKER
                ))
            })?;

            if !line.is_ascii() {
                return Err(FetchError::InvalidFormat(format!(
                    "Line {}: non-ASCII characters in grid row",
                    line_number
                )));
            }

            for field in fixed_width_fields(line, GRID_FIELD_WIDTH) {
                let value = parse_field(field, line_number)?;
                let longitude = GRID_LON_START + column as f64 * GRID_LON_STEP;
                builder.push(lat, longitude, value);
                column += 1;
            }
        }

        debug!("Decoded {} grid cells for {}", builder.len(), month);
        Ok(builder.build(time))
    }
}

impl Default for GridReader {
    fn default() -> Self {
        Self::new()
    }
}

/// `Some(lat)` for a band header line such as `  lat=  -89.9375`
fn parse_latitude(line: &str, line_number: usize) -> Result<Option<f64>> {
    let Some(pos) = line.find(GRID_LAT_MARKER) else {
        return Ok(None);
    };

    let rest = line[pos + GRID_LAT_MARKER.len()..].trim();
    let token = rest.split_whitespace().next().unwrap_or("");
    token.parse::<f64>().map(Some).map_err(|_| {
        FetchError::InvalidFormat(format!(
            "Line {}: invalid latitude '{}'",
            line_number, token
        ))
    })
}

/// Consecutive `width`-byte slices of an ASCII line; the last one may be shorter
fn fixed_width_fields(line: &str, width: usize) -> impl Iterator<Item = &str> {
    let bytes = line.len();
    (0..bytes)
        .step_by(width)
        .map(move |start| &line[start..(start + width).min(bytes)])
}

fn parse_field(field: &str, line_number: usize) -> Result<Option<f64>> {
    let trimmed = field.trim();
    if trimmed == GRID_MISSING_VALUE {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(|v| Some(v * GRID_VALUE_SCALE))
        .map_err(|_| {
            FetchError::InvalidFormat(format!(
                "Line {}: invalid grid value '{}'",
                line_number, field
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    const SYNTHETIC: &str = "\
TEMIS monthly mean tropospheric NO2
units: 1e13 molec/cm2
grid: 0.125 x 0.125
-----
  lat=  -89.9375
0100-9990050
";

    fn may_2021() -> YearMonth {
        YearMonth { year: 2021, month: 5 }
    }

    #[test]
    fn test_decode_synthetic_grid() {
        let cube = GridReader::new()
            .decode_reader(Cursor::new(SYNTHETIC), may_2021())
            .unwrap();

        assert_eq!(cube.shape(), (1, 1, 3));
        assert_eq!(cube.latitudes, vec![-89.9375]);
        assert_eq!(cube.longitudes, vec![-179.9375, -179.8125, -179.6875]);
        assert_eq!(cube.value_at(-89.9375, -179.9375), Some(100.0 * 1e13));
        assert_eq!(cube.value_at(-89.9375, -179.8125), None);
        assert_eq!(cube.value_at(-89.9375, -179.6875), Some(50.0 * 1e13));
        assert_eq!(cube.time.format("%Y-%m-%dT%H:%M:%S").to_string(), "2021-05-01T00:00:00");
    }

    #[test]
    fn test_longitude_continues_across_rows_and_resets_per_band() {
        let text = "h1\nh2\nh3\nh4\n lat= 10.0625\n00010002\n0003\n lat= 10.1875\n0004\n";
        let cube = GridReader::new()
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap();

        assert_eq!(cube.shape(), (1, 2, 3));
        assert_eq!(cube.value_at(10.0625, -179.6875), Some(3.0 * 1e13));
        assert_eq!(cube.value_at(10.1875, -179.9375), Some(4.0 * 1e13));
        assert_eq!(cube.value_at(10.1875, -179.8125), None);
    }

    #[test]
    fn test_duplicate_band_keeps_first_values() {
        let text = "h1\nh2\nh3\nh4\n lat= 5.0\n0001\n lat= 5.0\n0009\n";
        let cube = GridReader::new()
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap();

        assert_eq!(cube.shape(), (1, 1, 1));
        assert_eq!(cube.value_at(5.0, -179.9375), Some(1e13));
    }

    #[test]
    fn test_data_before_latitude_is_an_error() {
        let text = "h1\nh2\nh3\nh4\n0001\n";
        let err = GridReader::new()
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidFormat(_)));
    }

    #[test]
    fn test_bad_field_reports_line() {
        let text = "h1\nh2\nh3\nh4\n lat= 5.0\n00x1\n";
        let err = GridReader::new()
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap_err();
        assert!(err.to_string().contains("Line 6"));
    }

    #[test]
    fn test_non_ascii_row_is_rejected() {
        let text = "h1\nh2\nh3\nh4\n lat= 5.0\n000\u{e9}01000200\n";
        let err = GridReader::new()
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidFormat(_)));
        assert!(err.to_string().contains("Line 6"));
    }

    #[test]
    fn test_custom_header_length() {
        let text = "only header\n lat= 5.0\n00010002\n";
        let cube = GridReader::with_header_lines(1)
            .decode_reader(Cursor::new(text), may_2021())
            .unwrap();

        assert_eq!(cube.shape(), (1, 1, 2));
        assert_eq!(cube.value_at(5.0, -179.8125), Some(2.0 * 1e13));
    }

    #[test]
    fn test_decode_gzip_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("no2_202105.asc.gz");

        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(SYNTHETIC.as_bytes())?;
        encoder.finish()?;

        let cube = GridReader::new().decode_file(&path)?;
        assert_eq!(cube.shape(), (1, 1, 3));
        assert_eq!(cube.missing_count(), 1);
        Ok(())
    }

    #[test]
    fn test_fixed_width_fields() {
        let fields: Vec<&str> = fixed_width_fields("0100-999005", 4).collect();
        assert_eq!(fields, vec!["0100", "-999", "005"]);
    }
}
