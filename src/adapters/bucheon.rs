use crate::adapters::Adapter;
use crate::config::ScraperConfig;
use crate::error::Error;
use crate::extract::{ExtractionPlan, FieldSource, FieldSpec};
use crate::session::Session;

/// In-page search call that makes the site populate the disclosure list.
const SEARCH_SCRIPT: &str = "fn_search('148', '27434', '10000', '1', '');";

static PLAN: ExtractionPlan = ExtractionPlan {
    container: "div#qna_list27434",
    entry: "dl",
    fields: &[
        FieldSpec {
            name: "summary",
            source: FieldSource::Within("dt button span strong"),
        },
        FieldSpec {
            name: "confirmation_date",
            source: FieldSource::Within("dt button span em"),
        },
        FieldSpec {
            name: "routes",
            source: FieldSource::Within("dd"),
        },
    ],
};

/// Patient-movement disclosures of Bucheon city.
#[derive(Debug, Default)]
pub struct Bucheon;

impl Adapter for Bucheon {
    fn name(&self) -> &'static str {
        "bucheon"
    }

    fn home_url(&self) -> &'static str {
        "https://www.bucheon.go.kr/site/main/corona"
    }

    fn plan(&self) -> &'static ExtractionPlan {
        &PLAN
    }

    async fn prepare(&self, session: &Session, _config: &ScraperConfig) -> Result<(), Error> {
        session.client().execute(SEARCH_SCRIPT, vec![]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;

    fn fixture(entries: &str) -> String {
        format!(
            r#"<html><body>
                 <div class="board">
                   <div id="qna_list27434">{entries}</div>
                 </div>
               </body></html>"#
        )
    }

    const TWO_ENTRIES: &str = r#"
        <dl>
          <dt><button><span>
            <strong>확진자 52번 (고강동 거주)</strong>
            <em>2020-06-20</em>
          </span></button></dt>
          <dd>
            <p>6.19(금) 부천역 방문</p>
            <p>6.20(토) 자택</p>
          </dd>
        </dl>
        <dl>
          <dt><button><span>
            <strong>확진자 53번</strong>
            <em>2020-06-21</em>
          </span></button></dt>
          <dd>동선 조사 중</dd>
        </dl>"#;

    #[test]
    fn parses_each_disclosure_entry() {
        let table = extract::run(&PLAN, &fixture(TWO_ENTRIES)).unwrap();
        assert_eq!(
            table.columns(),
            ["summary", "confirmation_date", "routes"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "summary"), Some("확진자 52번 (고강동 거주)"));
        assert_eq!(table.get(0, "confirmation_date"), Some("2020-06-20"));
        assert_eq!(
            table.get(0, "routes"),
            Some("6.19(금) 부천역 방문 6.20(토) 자택")
        );
        assert_eq!(table.get(1, "routes"), Some("동선 조사 중"));
    }

    #[test]
    fn empty_list_yields_empty_table() {
        let table = extract::run(&PLAN, &fixture("")).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn missing_list_container_is_a_structure_error() {
        let html = r#"<html><body><div id="other_board"></div></body></html>"#;
        let err = extract::run(&PLAN, html).unwrap_err();
        assert!(matches!(err, Error::ParseStructure(_)));
    }

    #[test]
    fn entry_without_date_is_a_structure_error() {
        let entries = r#"
            <dl>
              <dt><button><span><strong>확진자 54번</strong></span></button></dt>
              <dd>자택</dd>
            </dl>"#;
        let err = extract::run(&PLAN, &fixture(entries)).unwrap_err();
        match err {
            Error::ParseStructure(msg) => assert!(msg.contains("confirmation_date")),
            other => panic!("expected ParseStructure, got {other:?}"),
        }
    }
}
