use std::time::Duration;

use fantoccini::error::CmdError;
use thiserror::Error;

/// Failure taxonomy for a scraping run.
#[derive(Debug, Error)]
pub enum Error {
    /// The browser-automation driver could not be started or reached.
    /// Fatal for the run.
    #[error("failed to launch webdriver: {0}")]
    DriverLaunch(String),

    /// An element lookup found no matching node. Often a load-timing
    /// race, so this is retried when it occurs inside the retry window.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A WebDriver command failed for reasons other than a missing
    /// element (lost session, protocol fault).
    #[error("webdriver command failed: {0}")]
    WebDriver(#[source] CmdError),

    /// A page navigation did not complete within the allowed time.
    #[error("navigation to {0} timed out")]
    NavigationTimeout(String),

    /// The rendered markup no longer matches the adapter's plan: the
    /// container, an entry sub-field, or a detail row is missing.
    #[error("unexpected page structure: {0}")]
    ParseStructure(String),

    /// Two records in the same batch carried different column sets.
    /// Indicates an adapter bug, never a source-site change.
    #[error("record schema mismatch: expected columns {expected:?}, got {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A transient failure persisted past the retry window.
    #[error("retries exhausted after {window:?}: {source}")]
    RetryExhausted {
        window: Duration,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Failures expected to resolve on their own (timing/load races), as
    /// opposed to structural failures indicating a real mismatch.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::ElementNotFound(_) | Error::WebDriver(_))
    }
}

impl From<CmdError> for Error {
    fn from(e: CmdError) -> Self {
        // "no such element" arrives as a standard WebDriver error, not a
        // dedicated variant.
        if e.is_no_such_element() {
            Error::ElementNotFound(e.to_string())
        } else {
            Error::WebDriver(e)
        }
    }
}
