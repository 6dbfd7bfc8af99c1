use serde::Serialize;
use std::fmt;

use crate::error::{FetchError, Result};
use crate::models::request::Parameter;

/// Ten-character S5P hub product type, e.g. `L2__NO2___`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProductType(&'static str);

impl ProductType {
    pub fn resolve(parameter: Parameter) -> Self {
        match parameter {
            Parameter::NO2 => ProductType("L2__NO2___"),
            Parameter::CO => ProductType("L2__CO____"),
            Parameter::O3 => ProductType("L2__O3____"),
            Parameter::SO2 => ProductType("L2__SO2___"),
            Parameter::CH4 => ProductType("L2__CH4___"),
            Parameter::HCHO => ProductType("L2__HCHO__"),
        }
    }

    /// Resolve a raw species code; anything outside the table is an error
    pub fn resolve_code(parameter: &str) -> Result<Self> {
        parameter
            .parse::<Parameter>()
            .map(Self::resolve)
            .map_err(|_| FetchError::UnsupportedParameter(parameter.to_string()))
    }

    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
