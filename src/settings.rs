use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_HUB_URL, DEFAULT_L3_BASE_URL, DEFAULT_OUTPUT_ROOT, DEFAULT_QUERY_LIMIT,
    GUEST_PASSWORD, GUEST_USERNAME,
};

const ENV_PREFIX: &str = "S5P";
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Remote endpoints, credentials and local defaults.
///
/// Layered from built-in defaults, then an optional config file (TOML, YAML
/// or JSON by extension), then `S5P_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub hub_url: String,
    pub username: String,
    pub password: String,
    pub l3_base_url: String,
    pub output_root: PathBuf,
    pub query_limit: usize,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("hub_url", DEFAULT_HUB_URL)?
            .set_default("username", GUEST_USERNAME)?
            .set_default("password", GUEST_PASSWORD)?
            .set_default("l3_base_url", DEFAULT_L3_BASE_URL)?
            .set_default("output_root", DEFAULT_OUTPUT_ROOT)?
            .set_default("query_limit", DEFAULT_QUERY_LIMIT as u64)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.to_string(),
            username: GUEST_USERNAME.to_string(),
            password: GUEST_PASSWORD.to_string(),
            l3_base_url: DEFAULT_L3_BASE_URL.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            query_limit: DEFAULT_QUERY_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_overrides_defaults() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "output_root = \"/tmp/s5p\"")?;
        writeln!(file, "query_limit = 3")?;

        let settings = Settings::load(Some(file.path()))?;
        assert_eq!(settings.output_root, PathBuf::from("/tmp/s5p"));
        assert_eq!(settings.query_limit, 3);
        assert_eq!(settings.username, GUEST_USERNAME);
        assert_eq!(settings.timeout(), Duration::from_secs(600));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/s5p.toml")));
        assert!(result.is_err());
    }
}
