use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One extracted disclosure entry as ordered (field, value) pairs.
pub type Record = Vec<(String, String)>;

/// Ordered, uniformly-columned collection of extracted records.
///
/// Every row carries exactly the columns listed in `columns`, in that
/// order. Built fresh per adapter invocation; nothing is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (row index, column name), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Accumulates per-record field mappings into a [`ResultTable`].
///
/// The first record pushed fixes the column set and order; every later
/// record must carry exactly the same keys in the same order. Adapters
/// uphold this by declaring one fixed field plan.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) -> Result<(), Error> {
        let (keys, values): (Vec<String>, Vec<String>) = record.into_iter().unzip();
        match &self.columns {
            None => self.columns = Some(keys),
            Some(columns) if *columns == keys => {}
            Some(columns) => {
                return Err(Error::SchemaMismatch {
                    expected: columns.clone(),
                    found: keys,
                });
            }
        }
        self.rows.push(values);
        Ok(())
    }

    /// Zero records pushed yields a zero-row, zero-column table.
    pub fn finish(self) -> ResultTable {
        ResultTable {
            columns: self.columns.unwrap_or_default(),
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn preserves_input_order() {
        let mut builder = TableBuilder::new();
        builder
            .push(record(&[("patient_id", "1"), ("routes", "mall")]))
            .unwrap();
        builder
            .push(record(&[("patient_id", "2"), ("routes", "cafe")]))
            .unwrap();
        let table = builder.finish();

        assert_eq!(table.columns(), ["patient_id", "routes"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "patient_id"), Some("1"));
        assert_eq!(table.get(1, "routes"), Some("cafe"));
    }

    #[test]
    fn rejects_differing_key_sets() {
        let mut builder = TableBuilder::new();
        builder
            .push(record(&[("patient_id", "1"), ("routes", "mall")]))
            .unwrap();
        let err = builder
            .push(record(&[("patient_id", "2"), ("residence", "Jongno")]))
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn rejects_reordered_keys() {
        let mut builder = TableBuilder::new();
        builder
            .push(record(&[("patient_id", "1"), ("routes", "mall")]))
            .unwrap();
        let err = builder
            .push(record(&[("routes", "cafe"), ("patient_id", "2")]))
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn empty_builder_yields_empty_table() {
        let table = TableBuilder::new().finish();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn missing_lookups_return_none() {
        let mut builder = TableBuilder::new();
        builder.push(record(&[("patient_id", "1")])).unwrap();
        let table = builder.finish();
        assert_eq!(table.get(0, "routes"), None);
        assert_eq!(table.get(5, "patient_id"), None);
    }
}
