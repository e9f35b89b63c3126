//! Table store collaborator for database-backed sources.

use std::collections::BTreeMap;

use tabio_stream::Row;

use crate::error::{Result, TabioError};

/// A store of named tables, each with column names and rows
///
/// Database sources read whole tables through `read_table` and replace them
/// through `write_table`.
pub trait TableStore {
    /// Names of the tables in the store, in the store's order
    fn table_names(&self) -> Result<Vec<String>>;

    /// Read a table, restricted to `columns` unless empty
    ///
    /// Returns the column names actually read and the data rows.
    fn read_table(&self, table: &str, columns: &[String]) -> Result<(Vec<String>, Vec<Row>)>;

    /// Create or replace a table with the given column names and rows
    fn write_table(&mut self, table: &str, colnames: &[String], rows: Vec<Row>) -> Result<()>;
}

/// In-memory table store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, (Vec<String>, Vec<Row>)>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryStore {
    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn read_table(&self, table: &str, columns: &[String]) -> Result<(Vec<String>, Vec<Row>)> {
        let (colnames, rows) = self
            .tables
            .get(table)
            .ok_or_else(|| TabioError::Store(format!("no such table: {}", table)))?;

        if columns.is_empty() {
            return Ok((colnames.clone(), rows.clone()));
        }

        // columns the table lacks read as Empty
        let indices: Vec<Option<usize>> = columns
            .iter()
            .map(|column| colnames.iter().position(|name| name == column))
            .collect();
        let projected = rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok((columns.to_vec(), projected))
    }

    fn write_table(&mut self, table: &str, colnames: &[String], rows: Vec<Row>) -> Result<()> {
        self.tables
            .insert(table.to_string(), (colnames.to_vec(), rows));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabio_stream::{row, CellValue};

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .write_table(
                "pets",
                &["name".to_string(), "age".to_string()],
                vec![row!["rex", 3], row!["tom"]],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_read_whole_table() {
        let (colnames, rows) = store().read_table("pets", &[]).unwrap();
        assert_eq!(colnames, vec!["name", "age"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_projection_pads_short_rows() {
        let (colnames, rows) = store().read_table("pets", &["age".to_string()]).unwrap();
        assert_eq!(colnames, vec!["age"]);
        assert_eq!(rows, vec![row![3], vec![CellValue::Empty]]);
    }

    #[test]
    fn test_unknown_column_reads_empty() {
        let columns = ["name".to_string(), "owner".to_string()];
        let (colnames, rows) = store().read_table("pets", &columns).unwrap();
        assert_eq!(colnames, vec!["name", "owner"]);
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("rex"), CellValue::Empty],
                vec![CellValue::from("tom"), CellValue::Empty],
            ]
        );
    }

    #[test]
    fn test_missing_table() {
        assert!(matches!(
            store().read_table("cats", &[]),
            Err(TabioError::Store(_))
        ));
    }
}
