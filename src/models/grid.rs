use chrono::NaiveDateTime;
use ndarray::Array3;
use std::collections::HashMap;

const COORD_TOLERANCE: f64 = 1e-9;

/// Dense (time, latitude, longitude) cube decoded from an L3 grid.
/// Missing cells hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCube {
    pub time: NaiveDateTime,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub values: Array3<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    pub time: NaiveDateTime,
    pub shape: (usize, usize, usize),
    pub valid_cells: usize,
    pub missing_cells: usize,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub lat_range: Option<(f64, f64)>,
    pub lon_range: Option<(f64, f64)>,
}

impl GridCube {
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    pub fn latitude_index(&self, latitude: f64) -> Option<usize> {
        self.latitudes
            .iter()
            .position(|lat| (lat - latitude).abs() < COORD_TOLERANCE)
    }

    pub fn longitude_index(&self, longitude: f64) -> Option<usize> {
        self.longitudes
            .iter()
            .position(|lon| (lon - longitude).abs() < COORD_TOLERANCE)
    }

    /// Value at an exact grid coordinate, `None` when missing or off-grid
    pub fn value_at(&self, latitude: f64, longitude: f64) -> Option<f64> {
        let i = self.latitude_index(latitude)?;
        let j = self.longitude_index(longitude)?;
        self.values[[0, i, j]]
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn summarize(&self) -> GridSummary {
        let mut min_value: Option<f64> = None;
        let mut max_value: Option<f64> = None;
        let mut valid_cells = 0;

        for value in self.values.iter().flatten() {
            valid_cells += 1;
            min_value = Some(min_value.map_or(*value, |m| m.min(*value)));
            max_value = Some(max_value.map_or(*value, |m| m.max(*value)));
        }

        GridSummary {
            time: self.time,
            shape: self.shape(),
            valid_cells,
            missing_cells: self.values.len() - valid_cells,
            min_value,
            max_value,
            lat_range: min_max(&self.latitudes),
            lon_range: min_max(&self.longitudes),
        }
    }
}

impl GridSummary {
    pub fn summary(&self) -> String {
        let (t, n_lat, n_lon) = self.shape;
        let mut lines = vec![
            format!("Time: {}", self.time.format("%Y-%m-%d")),
            format!("Shape (time, lat, lon): ({}, {}, {})", t, n_lat, n_lon),
            format!(
                "Cells: {} valid, {} missing",
                self.valid_cells, self.missing_cells
            ),
        ];

        if let Some((lo, hi)) = self.lat_range {
            lines.push(format!("Latitude: {:.4} to {:.4}", lo, hi));
        }
        if let Some((lo, hi)) = self.lon_range {
            lines.push(format!("Longitude: {:.4} to {:.4}", lo, hi));
        }
        match (self.min_value, self.max_value) {
            (Some(lo), Some(hi)) => lines.push(format!("Value range: {:.3e} to {:.3e}", lo, hi)),
            _ => lines.push("Value range: no valid cells".to_string()),
        }

        lines.join("\n")
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, v| match acc {
        None => Some((*v, *v)),
        Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
    })
}

/// Collects (latitude, longitude, value) triples and lays them out densely.
/// Axis order follows first appearance; a repeated coordinate keeps its first value.
#[derive(Debug, Default)]
pub struct GridCubeBuilder {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    lat_index: HashMap<u64, usize>,
    lon_index: HashMap<u64, usize>,
    // rows[i][j] is None until the cell is first assigned
    rows: Vec<Vec<Option<Option<f64>>>>,
    assigned: usize,
}

impl GridCubeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, latitude: f64, longitude: f64, value: Option<f64>) {
        let i = axis_slot(&mut self.latitudes, &mut self.lat_index, latitude);
        let j = axis_slot(&mut self.longitudes, &mut self.lon_index, longitude);
        if i == self.rows.len() {
            self.rows.push(Vec::new());
        }

        let row = &mut self.rows[i];
        if row.len() <= j {
            row.resize(j + 1, None);
        }
        if row[j].is_none() {
            row[j] = Some(value);
            self.assigned += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.assigned
    }

    pub fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    pub fn build(self, time: NaiveDateTime) -> GridCube {
        let mut values = Array3::from_elem((1, self.latitudes.len(), self.longitudes.len()), None);
        for (i, row) in self.rows.into_iter().enumerate() {
            for (j, cell) in row.into_iter().enumerate() {
                if let Some(value) = cell {
                    values[[0, i, j]] = value;
                }
            }
        }

        GridCube {
            time,
            latitudes: self.latitudes,
            longitudes: self.longitudes,
            values,
        }
    }
}

fn axis_slot(axis: &mut Vec<f64>, index: &mut HashMap<u64, usize>, coord: f64) -> usize {
    // -0.0 and 0.0 share a slot
    let key = if coord == 0.0 { 0.0f64.to_bits() } else { coord.to_bits() };
    *index.entry(key).or_insert_with(|| {
        axis.push(coord);
        axis.len() - 1
    })
}
