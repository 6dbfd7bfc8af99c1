use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Data from {0} cannot be retrieved")]
    UnsupportedMission(String),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("Parameter {parameter} is not available at processing level {level}")]
    UnsupportedCombination { level: String, parameter: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Selection {index} is out of range ({available} products listed)")]
    InvalidSelection { index: usize, available: usize },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Hub response error: {0}")]
    Hub(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl FetchError {
    /// Configuration errors are terminal and raised before any remote call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FetchError::Config(_)
                | FetchError::Validation(_)
                | FetchError::UnsupportedMission(_)
                | FetchError::UnsupportedParameter(_)
                | FetchError::UnsupportedCombination { .. }
                | FetchError::InvalidRequest(_)
        )
    }
}
