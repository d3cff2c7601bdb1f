use fantoccini::Locator;

use crate::adapters::Adapter;
use crate::config::ScraperConfig;
use crate::error::Error;
use crate::extract::{ExtractionPlan, FieldSource, FieldSpec};
use crate::retry;
use crate::session::Session;

/// Tab button that reveals the patient route table.
const LIST_TAB_XPATH: &str = "//div[@class='move-tab']/ul/li/button[@data-url='#move-cont2']";

// Each patient row is followed by a detail row holding the route text,
// which is why `routes` reads from the next row instead of the entry.
static PLAN: ExtractionPlan = ExtractionPlan {
    container: "div#move-cont2",
    entry: "table#DataTables_Table_0 tbody tr#patient",
    fields: &[
        FieldSpec {
            name: "no",
            source: FieldSource::Within("td:nth-of-type(1) p"),
        },
        FieldSpec {
            name: "patient_id",
            source: FieldSource::Within("td:nth-of-type(2)"),
        },
        FieldSpec {
            name: "infection_route",
            source: FieldSource::Within("td:nth-of-type(3)"),
        },
        FieldSpec {
            name: "confirmation_date",
            source: FieldSource::Within("td:nth-of-type(4)"),
        },
        FieldSpec {
            name: "residence",
            source: FieldSource::Within("td:nth-of-type(5)"),
        },
        FieldSpec {
            name: "containment_facility",
            source: FieldSource::Within("td:nth-of-type(6)"),
        },
        FieldSpec {
            name: "routes",
            source: FieldSource::NextRow("td.tdl"),
        },
    ],
};

/// Patient-movement disclosures of Seoul city.
#[derive(Debug, Default)]
pub struct Seoul;

impl Adapter for Seoul {
    fn name(&self) -> &'static str {
        "seoul"
    }

    fn home_url(&self) -> &'static str {
        "https://www.seoul.go.kr/coronaV/coronaStatus.do"
    }

    fn plan(&self) -> &'static ExtractionPlan {
        &PLAN
    }

    /// The route table lives behind a tab; wait for the button to become
    /// available, then click it to reveal the list.
    async fn prepare(&self, session: &Session, config: &ScraperConfig) -> Result<(), Error> {
        let client = session.client();
        let button = retry::with_retry(config.max_wait(), move || async move {
            client
                .find(Locator::XPath(LIST_TAB_XPATH))
                .await
                .map_err(Error::from)
        })
        .await?;
        button.click().await?;
        Ok(())
    }
}
