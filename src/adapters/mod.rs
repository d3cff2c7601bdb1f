pub mod bucheon;
pub mod seoul;

pub use bucheon::Bucheon;
pub use seoul::Seoul;

use std::time::Duration;

use fantoccini::Locator;
use tokio::time::timeout;

use crate::config::ScraperConfig;
use crate::error::Error;
use crate::extract::{self, ExtractionPlan};
use crate::retry;
use crate::session::Session;
use crate::table::ResultTable;

/// Upper bound on a single page navigation, so a hung load cannot block
/// a run indefinitely.
const NAV_TIMEOUT: Duration = Duration::from_secs(45);

/// Source-specific scraping unit for one municipality's disclosure page.
///
/// Adapters declare data (URL, extraction plan) and at most one
/// content-trigger step; the shared `extract` flow does the rest.
pub trait Adapter {
    fn name(&self) -> &'static str;

    /// Fixed disclosure-page URL for this municipality.
    fn home_url(&self) -> &'static str;

    /// Markup shape to extract, consumed by [`extract::run`].
    fn plan(&self) -> &'static ExtractionPlan;

    /// Adapter-specific step that triggers content population after
    /// navigation (in-page script, tab click). Default: nothing.
    async fn prepare(&self, _session: &Session, _config: &ScraperConfig) -> Result<(), Error> {
        Ok(())
    }

    /// Navigates to the source page, triggers content load, waits for the
    /// plan's container to render, and parses the snapshot into a table.
    ///
    /// The wait polls for the container through the retry wrapper; these
    /// pages populate their lists asynchronously, and a fixed sleep only
    /// masks the race.
    async fn extract(
        &self,
        session: &Session,
        config: &ScraperConfig,
    ) -> Result<ResultTable, Error> {
        let client = session.client();

        ::log::info!("{}: navigating to {}", self.name(), self.home_url());
        timeout(NAV_TIMEOUT, client.goto(self.home_url()))
            .await
            .map_err(|_| Error::NavigationTimeout(self.home_url().to_string()))??;

        self.prepare(session, config).await?;

        let container = self.plan().container;
        retry::with_retry(config.max_wait(), move || async move {
            client
                .find(Locator::Css(container))
                .await
                .map(|_| ())
                .map_err(Error::from)
        })
        .await?;

        let html = client.source().await?;
        let table = extract::run(self.plan(), &html)?;
        ::log::info!("{}: extracted {} rows", self.name(), table.len());
        Ok(table)
    }
}
