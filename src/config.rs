use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Configuration for a scraping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Attach to an already-running WebDriver server instead of launching
    /// a driver binary. The `WEBDRIVER_URL` environment variable
    /// overrides this when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// Directory holding the platform-specific chromedriver binaries.
    #[serde(default = "default_driver_dir")]
    pub driver_dir: PathBuf,

    /// Port the launched driver listens on.
    #[serde(default = "default_driver_port")]
    pub driver_port: u16,

    /// Run the browser without rendering a window.
    #[serde(default)]
    pub headless: bool,

    /// Wall-clock window for retrying transient element waits, in seconds.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScraperConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            webdriver_url: None,
            driver_dir: default_driver_dir(),
            driver_port: default_driver_port(),
            headless: false,
            max_wait_secs: default_max_wait_secs(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

fn default_driver_dir() -> PathBuf {
    PathBuf::from("webdrivers/chromedrivers")
}

fn default_driver_port() -> u16 {
    9515
}

fn default_max_wait_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_applies_defaults() {
        let config: ScraperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.webdriver_url, None);
        assert_eq!(config.driver_port, 9515);
        assert!(!config.headless);
        assert_eq!(config.max_wait(), Duration::from_secs(10));
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config: ScraperConfig = serde_json::from_str(
            r#"{
                "webdriver_url": "http://localhost:4444",
                "headless": true,
                "max_wait_secs": 3
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.webdriver_url.as_deref(),
            Some("http://localhost:4444")
        );
        assert!(config.headless);
        assert_eq!(config.max_wait(), Duration::from_secs(3));
    }
}
