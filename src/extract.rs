use scraper::{ElementRef, Html, Selector};

use crate::error::Error;
use crate::table::{Record, ResultTable, TableBuilder};

/// Where a field's value is read from, relative to one entry element.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource {
    /// CSS selector applied inside the entry element itself.
    Within(&'static str),
    /// CSS selector applied inside the element that follows the entry in
    /// the document (detail rows rendered as a sibling `<tr>`).
    NextRow(&'static str),
}

/// One named field and the selector path that resolves it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: FieldSource,
}

/// Declarative description of one municipality's markup shape.
///
/// Adding a municipality means writing one of these, not new traversal
/// code: [`run`] consumes any plan against any page snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionPlan {
    /// Selector for the element holding all disclosure entries.
    pub container: &'static str,
    /// Selector for one repeating entry, relative to the container.
    pub entry: &'static str,
    /// Fields extracted from each entry, in declared column order.
    pub fields: &'static [FieldSpec],
}

/// Runs a plan against a rendered page snapshot.
///
/// A missing container is a structural failure: the layout changed or
/// the content never loaded. A container with zero entries is a valid
/// empty result (the source genuinely has no disclosures).
pub fn run(plan: &ExtractionPlan, html: &str) -> Result<ResultTable, Error> {
    let doc = Html::parse_document(html);
    let container_sel = selector(plan.container);
    let container = doc.select(&container_sel).next().ok_or_else(|| {
        Error::ParseStructure(format!("container '{}' not found", plan.container))
    })?;

    let entry_sel = selector(plan.entry);
    let mut builder = TableBuilder::new();
    for entry in container.select(&entry_sel) {
        builder.push(extract_record(plan, entry)?)?;
    }

    let table = builder.finish();
    ::log::debug!("extracted {} rows from '{}'", table.len(), plan.container);
    Ok(table)
}

fn extract_record(plan: &ExtractionPlan, entry: ElementRef<'_>) -> Result<Record, Error> {
    let mut record = Record::with_capacity(plan.fields.len());
    for field in plan.fields {
        let value = match field.source {
            FieldSource::Within(css) => field_text(entry, css, field.name)?,
            FieldSource::NextRow(css) => {
                let next = entry
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .next()
                    .ok_or_else(|| {
                        Error::ParseStructure(format!(
                            "field '{}': entry has no following detail row",
                            field.name
                        ))
                    })?;
                field_text(next, css, field.name)?
            }
        };
        record.push((field.name.to_string(), value));
    }
    Ok(record)
}

fn field_text(scope: ElementRef<'_>, css: &str, name: &str) -> Result<String, Error> {
    let sel = selector(css);
    let element = scope.select(&sel).next().ok_or_else(|| {
        Error::ParseStructure(format!("field '{name}': no element matches '{css}'"))
    })?;
    Ok(normalize_text(element))
}

/// Joins all text nodes and collapses runs of whitespace, so values come
/// out trimmed regardless of how the source indents its markup.
fn normalize_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Plans carry fixed selector literals; a malformed one is a bug caught
// by the adapter tests, not a runtime condition.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}
