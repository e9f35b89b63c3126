//! SQLite-backed table store.

use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use tabio_stream::{CellValue, Row};

use crate::error::{Result, TabioError};
use crate::store::TableStore;

/// Table store over a SQLite connection
///
/// Written tables are replaced wholesale: the table is dropped and
/// recreated with untyped columns inside one transaction.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if names.is_empty() {
            return Err(TabioError::Store(format!("no such table: {}", table)));
        }
        Ok(names)
    }
}

impl TableStore for SqliteStore {
    fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn read_table(&self, table: &str, columns: &[String]) -> Result<(Vec<String>, Vec<Row>)> {
        let existing = self.column_names(table)?;
        let colnames = if columns.is_empty() {
            existing.clone()
        } else {
            columns.to_vec()
        };
        // only columns the table has are selected; the rest read as Empty
        let selected: Vec<&String> = colnames
            .iter()
            .filter(|c| existing.contains(*c))
            .collect();
        let slots: Vec<Option<usize>> = colnames
            .iter()
            .map(|c| selected.iter().position(|s| *s == c))
            .collect();
        if selected.is_empty() {
            let count: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
                [],
                |row| row.get(0),
            )?;
            let count = usize::try_from(count).unwrap_or(0);
            let rows = vec![vec![CellValue::Empty; colnames.len()]; count];
            return Ok((colnames, rows));
        }

        let select = selected
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM {}", select, quote_identifier(table)))?;

        let rows = stmt
            .query_map([], |row| {
                slots
                    .iter()
                    .map(|slot| match slot {
                        Some(i) => row.get_ref(*i).map(cell_from_sql),
                        None => Ok(CellValue::Empty),
                    })
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::debug!("Selected {} rows from '{}'", rows.len(), table);
        Ok((colnames, rows))
    }

    fn write_table(&mut self, table: &str, colnames: &[String], rows: Vec<Row>) -> Result<()> {
        if colnames.is_empty() {
            return Err(TabioError::Store(format!(
                "cannot create table '{}' without columns",
                table
            )));
        }
        let table_name = quote_identifier(table);
        let column_list = colnames
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; colnames.len()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", table_name), [])?;
        tx.execute(&format!("CREATE TABLE {} ({})", table_name, column_list), [])?;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table_name, column_list, placeholders
            ))?;
            for row in rows {
                let mut cells = row.into_iter();
                let values = colnames
                    .iter()
                    .map(|_| cells.next().map(cell_to_sql).unwrap_or(Value::Null));
                insert.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn cell_from_sql(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Empty,
        ValueRef::Integer(i) => CellValue::Int(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn cell_to_sql(cell: CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Bool(b) => Value::Integer(i64::from(b)),
        CellValue::Int(i) => Value::Integer(i),
        CellValue::Float(f) => Value::Real(f),
        CellValue::String(s) => Value::Text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabio_stream::row;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_write_and_read() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .write_table(
                "pets",
                &columns(&["name", "age", "weight"]),
                vec![row!["rex", 3, 12.5], row!["tom"]],
            )
            .unwrap();

        let (colnames, rows) = store.read_table("pets", &[]).unwrap();
        assert_eq!(colnames, columns(&["name", "age", "weight"]));
        assert_eq!(
            rows,
            vec![
                row!["rex", 3, 12.5],
                vec![CellValue::from("tom"), CellValue::Empty, CellValue::Empty],
            ]
        );
    }

    #[test]
    fn test_write_replaces_table() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.write_table("t", &columns(&["a"]), vec![row![1]]).unwrap();
        store.write_table("t", &columns(&["b"]), vec![row![2], row![3]]).unwrap();

        let (colnames, rows) = store.read_table("t", &[]).unwrap();
        assert_eq!(colnames, columns(&["b"]));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_table_names_and_projection() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.write_table("b", &columns(&["x", "y"]), vec![row![1, 2]]).unwrap();
        store.write_table("a \"quoted\"", &columns(&["z"]), vec![]).unwrap();

        assert_eq!(store.table_names().unwrap(), vec!["a \"quoted\"", "b"]);
        let (colnames, rows) = store.read_table("b", &columns(&["y"])).unwrap();
        assert_eq!(colnames, columns(&["y"]));
        assert_eq!(rows, vec![row![2]]);
    }

    #[test]
    fn test_unknown_column_reads_empty() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.write_table("pets", &columns(&["name"]), vec![row!["rex"]]).unwrap();

        let (colnames, rows) = store.read_table("pets", &columns(&["name", "age"])).unwrap();
        assert_eq!(colnames, columns(&["name", "age"]));
        assert_eq!(rows, vec![vec![CellValue::from("rex"), CellValue::Empty]]);

        let (_, rows) = store.read_table("pets", &columns(&["age"])).unwrap();
        assert_eq!(rows, vec![vec![CellValue::Empty]]);
    }

    #[test]
    fn test_missing_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.read_table("nope", &[]),
            Err(TabioError::Store(_))
        ));
    }
}
