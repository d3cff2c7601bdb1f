#![allow(async_fn_in_trait)]

// Re-export modules
pub mod adapters;
pub mod config;
pub mod error;
pub mod extract;
pub mod retry;
pub mod session;
pub mod table;

// Re-export commonly used types for convenience
pub use error::Error;
pub use table::ResultTable;

use adapters::{Adapter, Bucheon, Seoul};
use config::ScraperConfig;
use session::Session;

/// Municipalities with a supported disclosure-page adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Municipality {
    Bucheon,
    Seoul,
}

impl Municipality {
    pub fn name(&self) -> &'static str {
        match self {
            Municipality::Bucheon => "bucheon",
            Municipality::Seoul => "seoul",
        }
    }
}

/// Builder for one scraping run against a single municipality
pub struct Scrape {
    municipality: Municipality,
    config: ScraperConfig,
    headless: Option<bool>,
}

impl Scrape {
    /// Create a new Scrape builder for the given municipality
    pub fn new(municipality: Municipality) -> Self {
        Self {
            municipality,
            config: ScraperConfig::new(),
            headless: None,
        }
    }

    /// Set the full configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Run the browser without rendering a window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    /// Attach to a running WebDriver server instead of launching one
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = Some(url.into());
        self
    }

    /// Creates a browser session, runs the municipality's adapter, and
    /// closes the session on success and failure paths alike.
    pub async fn run(self) -> Result<ResultTable, Error> {
        let headless = self.headless.unwrap_or(self.config.headless);
        let session = Session::create(&self.config, headless).await?;

        let outcome = match self.municipality {
            Municipality::Bucheon => Bucheon.extract(&session, &self.config).await,
            Municipality::Seoul => Seoul.extract(&session, &self.config).await,
        };

        if let Err(e) = session.close().await {
            ::log::warn!("failed to close webdriver session: {e}");
        }

        outcome
    }
}
