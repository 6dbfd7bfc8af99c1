use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{FetchError, Result};
use crate::models::period::{plan_periods, PeriodUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mission {
    Sentinel5P,
}

impl Mission {
    /// Directory segment and command-line spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Mission::Sentinel5P => "sentinel-5p",
        }
    }

    pub fn platform_name(&self) -> &'static str {
        match self {
            Mission::Sentinel5P => "Sentinel-5 Precursor",
        }
    }

    pub fn instrument_name(&self) -> &'static str {
        match self {
            Mission::Sentinel5P => "TROPOspheric Monitoring Instrument",
        }
    }
}

impl FromStr for Mission {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sentinel-5p" => Ok(Mission::Sentinel5P),
            _ => Err(FetchError::UnsupportedMission(s.to_string())),
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingLevel {
    L2,
    L3,
}

impl ProcessingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingLevel::L2 => "L2",
            ProcessingLevel::L3 => "L3",
        }
    }

    /// Parameters that can be retrieved at this level
    pub fn supported_parameters(&self) -> &'static [Parameter] {
        match self {
            ProcessingLevel::L2 => &[
                Parameter::NO2,
                Parameter::O3,
                Parameter::CO,
                Parameter::SO2,
                Parameter::HCHO,
            ],
            ProcessingLevel::L3 => &[Parameter::NO2],
        }
    }

    pub fn supports(&self, parameter: Parameter) -> bool {
        self.supported_parameters().contains(&parameter)
    }
}

impl FromStr for ProcessingLevel {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "L2" => Ok(ProcessingLevel::L2),
            "L3" => Ok(ProcessingLevel::L3),
            _ => Err(FetchError::InvalidRequest(format!(
                "Unknown processing level '{}'. Expected L2 or L3",
                s
            ))),
        }
    }
}

impl fmt::Display for ProcessingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chemical species measured by TROPOMI
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    NO2,
    CO,
    O3,
    SO2,
    CH4,
    HCHO,
}

impl Parameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::NO2 => "NO2",
            Parameter::CO => "CO",
            Parameter::O3 => "O3",
            Parameter::SO2 => "SO2",
            Parameter::CH4 => "CH4",
            Parameter::HCHO => "HCHO",
        }
    }

    pub fn to_lowercase(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl FromStr for Parameter {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NO2" => Ok(Parameter::NO2),
            "CO" => Ok(Parameter::CO),
            "O3" => Ok(Parameter::O3),
            "SO2" => Ok(Parameter::SO2),
            "CH4" => Ok(Parameter::CH4),
            "HCHO" => Ok(Parameter::HCHO),
            _ => Err(FetchError::UnsupportedParameter(s.to_string())),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reject level/parameter pairs outside the whitelist
pub fn validate_combination(level: ProcessingLevel, parameter: Parameter) -> Result<()> {
    if level.supports(parameter) {
        Ok(())
    } else {
        Err(FetchError::UnsupportedCombination {
            level: level.to_string(),
            parameter: parameter.to_string(),
        })
    }
}

/// Hub identifiers supplied up front for manual mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSelection {
    pub file_id: String,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    Manual(ManualSelection),
    Query,
}

impl InputType {
    pub fn name(&self) -> &'static str {
        match self {
            InputType::Manual(_) => "manual",
            InputType::Query => "query",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct BoundingBox {
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon_min: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon_max: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat_min: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat_max: f64,
}

impl BoundingBox {
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self> {
        let bbox = Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        };
        bbox.check()?;
        Ok(bbox)
    }

    /// Range limits plus min <= max on both axes
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.lon_min > self.lon_max || self.lat_min > self.lat_max {
            return Err(FetchError::InvalidRequest(format!(
                "Bounding box minimum exceeds maximum: lon [{}, {}], lat [{}, {}]",
                self.lon_min, self.lon_max, self.lat_min, self.lat_max
            )));
        }

        Ok(())
    }

    /// Closed ring of (lon, lat) corners, first point repeated at the end
    pub fn polygon_ring(&self) -> [(f64, f64); 5] {
        [
            (self.lon_min, self.lat_min),
            (self.lon_min, self.lat_max),
            (self.lon_max, self.lat_max),
            (self.lon_max, self.lat_min),
            (self.lon_min, self.lat_min),
        ]
    }

    pub fn to_wkt(&self) -> String {
        let points: Vec<String> = self
            .polygon_ring()
            .iter()
            .map(|(lon, lat)| format!("{} {}", lon, lat))
            .collect();
        format!("POLYGON(({}))", points.join(","))
    }
}

/// A validated retrieval request. Fields are only readable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    mission: Mission,
    level: ProcessingLevel,
    parameter: Parameter,
    start_date: NaiveDate,
    end_date: NaiveDate,
    bbox: BoundingBox,
    input_type: InputType,
}

impl DownloadRequest {
    pub fn new(
        mission: Mission,
        level: ProcessingLevel,
        parameter: Parameter,
        start_date: NaiveDate,
        end_date: NaiveDate,
        bbox: BoundingBox,
        input_type: InputType,
    ) -> Result<Self> {
        validate_combination(level, parameter)?;
        bbox.check()?;

        if start_date > end_date {
            return Err(FetchError::InvalidRequest(format!(
                "Start date {} is after end date {}",
                start_date, end_date
            )));
        }

        Ok(Self {
            mission,
            level,
            parameter,
            start_date,
            end_date,
            bbox,
            input_type,
        })
    }

    /// Build a request from command-line style strings
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        mission: &str,
        level: &str,
        parameter: &str,
        start_date: &str,
        end_date: &str,
        bbox: BoundingBox,
        input_type: InputType,
    ) -> Result<Self> {
        let mission = mission.parse::<Mission>()?;
        let level = level.parse::<ProcessingLevel>()?;
        let parameter = parameter.parse::<Parameter>()?;
        let start_date = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d")?;
        let end_date = NaiveDate::parse_from_str(end_date.trim(), "%Y-%m-%d")?;

        Self::new(
            mission, level, parameter, start_date, end_date, bbox, input_type,
        )
    }

    pub fn mission(&self) -> Mission {
        self.mission
    }

    pub fn level(&self) -> ProcessingLevel {
        self.level
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn input_type(&self) -> &InputType {
        &self.input_type
    }

    pub fn periods(&self) -> Vec<PeriodUnit> {
        plan_periods(self.level, self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn europe() -> BoundingBox {
        BoundingBox::new(-10.0, 30.0, 35.0, 60.0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_level_parameter_whitelist() {
        assert!(validate_combination(ProcessingLevel::L3, Parameter::NO2).is_ok());
        assert!(validate_combination(ProcessingLevel::L2, Parameter::SO2).is_ok());
        assert!(validate_combination(ProcessingLevel::L2, Parameter::HCHO).is_ok());
        assert!(validate_combination(ProcessingLevel::L3, Parameter::CO).is_err());
        assert!(validate_combination(ProcessingLevel::L2, Parameter::CH4).is_err());
    }

    #[test]
    fn test_request_rejects_unsupported_combination() {
        let err = DownloadRequest::new(
            Mission::Sentinel5P,
            ProcessingLevel::L3,
            Parameter::CO,
            date(2021, 1, 1),
            date(2021, 1, 31),
            europe(),
            InputType::Query,
        )
        .unwrap_err();

        assert!(matches!(err, FetchError::UnsupportedCombination { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_request_rejects_reversed_dates() {
        let result = DownloadRequest::new(
            Mission::Sentinel5P,
            ProcessingLevel::L2,
            Parameter::NO2,
            date(2021, 2, 1),
            date(2021, 1, 1),
            europe(),
            InputType::Query,
        );
        assert!(matches!(result, Err(FetchError::InvalidRequest(_))));
    }

    #[test]
    fn test_parse_request_from_strings() {
        let request = DownloadRequest::parse(
            "Sentinel-5P",
            "l2",
            "so2",
            "2021-03-01",
            "2021-03-02",
            europe(),
            InputType::Query,
        )
        .unwrap();

        assert_eq!(request.mission(), Mission::Sentinel5P);
        assert_eq!(request.level(), ProcessingLevel::L2);
        assert_eq!(request.parameter(), Parameter::SO2);
        assert_eq!(request.periods().len(), 2);
    }

    #[test]
    fn test_unknown_mission() {
        let err = "landsat-8".parse::<Mission>().unwrap_err();
        assert_eq!(err.to_string(), "Data from landsat-8 cannot be retrieved");
    }

    #[test]
    fn test_bad_date_string() {
        let result = DownloadRequest::parse(
            "sentinel-5p",
            "L2",
            "NO2",
            "2021/03/01",
            "2021-03-02",
            europe(),
            InputType::Query,
        );
        assert!(matches!(result, Err(FetchError::DateParse(_))));
    }

    #[test]
    fn test_bbox_validation() {
        assert!(BoundingBox::new(-190.0, 0.0, 0.0, 10.0).is_err());
        assert!(BoundingBox::new(0.0, 10.0, -95.0, 10.0).is_err());
        assert!(BoundingBox::new(10.0, 0.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_request_rejects_reversed_bbox_literal() {
        let reversed = BoundingBox {
            lon_min: 30.0,
            lon_max: -10.0,
            lat_min: 35.0,
            lat_max: 60.0,
        };
        let result = DownloadRequest::new(
            Mission::Sentinel5P,
            ProcessingLevel::L2,
            Parameter::NO2,
            date(2021, 1, 1),
            date(2021, 1, 2),
            reversed,
            InputType::Query,
        );
        assert!(matches!(result, Err(FetchError::InvalidRequest(_))));
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let ring = europe().polygon_ring();
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[1], (-10.0, 60.0));
        assert_eq!(ring[2], (30.0, 60.0));
        assert_eq!(ring[3], (30.0, 35.0));
        assert_eq!(
            europe().to_wkt(),
            "POLYGON((-10 35,-10 60,30 60,30 35,-10 35))"
        );
    }
}
