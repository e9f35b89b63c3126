//! Table store sources.
//!
//! A table reads as a sheet named after the table whose first row holds the
//! column names. Writing takes the column names from the sheet, or from its
//! first row when the sheet has none.

use std::path::PathBuf;

use tabio_codecs::Action;
use tabio_stream::{BookStream, CellValue, Row, SheetStream};

use crate::adapter::{wrong_kind, Context, DataReader, DataWriter, SourceAdapter};
use crate::capability::{Capability, SourceKind, Target};
use crate::error::Result;
use crate::request::{Destination, Source, WriteOutput};
use crate::store::TableStore;

/// One table as a sheet
pub struct TableSource;

const TABLE_SOURCE: Capability = Capability {
    targets: &[Target::Sheet],
    actions: &[Action::Read, Action::Write],
    kinds: &[SourceKind::Table],
    attributes: &[],
};

/// Several tables as a book
pub struct TablesSource;

const TABLES_SOURCE: Capability = Capability {
    targets: &[Target::Book],
    actions: &[Action::Read, Action::Write],
    kinds: &[SourceKind::Tables],
    attributes: &[],
};

impl SourceAdapter for TableSource {
    fn name(&self) -> &'static str {
        "table"
    }

    fn capability(&self) -> &Capability {
        &TABLE_SOURCE
    }

    fn reader<'a>(&self, source: Source<'a>, _ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        match source {
            Source::Table {
                store,
                table,
                columns,
            } => Ok(Box::new(TableReader {
                store,
                tables: vec![(table, columns)],
            })),
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }

    fn writer<'a>(
        &self,
        destination: Destination<'a>,
        _ctx: &Context<'_>,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        match destination {
            Destination::Table { store, table } => Ok(Box::new(TableWriter {
                store,
                table: Some(table),
            })),
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }
}

impl SourceAdapter for TablesSource {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn capability(&self) -> &Capability {
        &TABLES_SOURCE
    }

    fn reader<'a>(&self, source: Source<'a>, _ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        match source {
            Source::Tables { store, tables } => {
                let tables = if tables.is_empty() {
                    store.table_names()?
                } else {
                    tables
                };
                Ok(Box::new(TableReader {
                    store,
                    tables: tables.into_iter().map(|t| (t, Vec::new())).collect(),
                }))
            }
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }

    fn writer<'a>(
        &self,
        destination: Destination<'a>,
        _ctx: &Context<'_>,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        match destination {
            Destination::Tables { store } => Ok(Box::new(TableWriter { store, table: None })),
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }
}

struct TableReader<'a> {
    store: &'a dyn TableStore,
    /// `(table, columns)`; empty columns reads every column
    tables: Vec<(String, Vec<String>)>,
}

impl DataReader for TableReader<'_> {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        let names: Vec<&str> = self.tables.iter().map(|(t, _)| t.as_str()).collect();
        (format!("<tables {}>", names.join(",")), None)
    }

    fn get_data(self: Box<Self>) -> Result<BookStream> {
        let mut book = BookStream::new();
        for (table, columns) in self.tables {
            let (colnames, rows) = self.store.read_table(&table, &columns)?;
            log::debug!("Read {} rows from table '{}'", rows.len(), table);
            let header: Row = colnames.iter().map(|c| CellValue::from(c.as_str())).collect();
            let mut all = Vec::with_capacity(rows.len() + 1);
            all.push(header);
            all.extend(rows);
            book.push(SheetStream::from_rows(table, all).with_colnames(colnames));
        }
        Ok(book)
    }
}

struct TableWriter<'a> {
    store: &'a mut dyn TableStore,
    /// `None` writes one table per sheet, named after the sheet
    table: Option<String>,
}

impl TableWriter<'_> {
    fn write_sheet(&mut self, table: &str, mut sheet: SheetStream) -> Result<()> {
        let colnames = sheet.colnames().to_vec();
        let mut rows = sheet.collect_rows()?;
        let colnames = if colnames.is_empty() {
            if rows.is_empty() {
                Vec::new()
            } else {
                rows.remove(0).iter().map(ToString::to_string).collect()
            }
        } else {
            if rows.first().is_some_and(|first| is_header(first, &colnames)) {
                rows.remove(0);
            }
            colnames
        };
        log::debug!("Writing {} rows to table '{}'", rows.len(), table);
        self.store.write_table(table, &colnames, rows)
    }
}

/// Whether `row` repeats the column names
fn is_header(row: &Row, colnames: &[String]) -> bool {
    row.len() == colnames.len()
        && row
            .iter()
            .zip(colnames)
            .all(|(cell, name)| cell.as_str() == Some(name.as_str()))
}

impl DataWriter for TableWriter<'_> {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        match &self.table {
            Some(table) => (format!("<table {}>", table), None),
            None => ("<tables>".to_string(), None),
        }
    }

    fn write_data(mut self: Box<Self>, book: BookStream) -> Result<Option<WriteOutput>> {
        match self.table.take() {
            Some(table) => {
                if let Some(sheet) = book.into_sheet_at(0) {
                    self.write_sheet(&table, sheet)?;
                }
            }
            None => {
                for sheet in book {
                    let table = sheet.name().to_string();
                    self.write_sheet(&table, sheet)?;
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::store::MemoryStore;
    use tabio_codecs::Codecs;
    use tabio_stream::row;

    #[test]
    fn test_round_trip_through_store() {
        let codecs = Codecs::empty();
        let settings = Settings::default();
        let ctx = Context {
            codecs: &codecs,
            settings: &settings,
            options: Default::default(),
        };
        let mut store = MemoryStore::new();

        let sheet = SheetStream::from_rows("pets", vec![row!["name", "age"], row!["rex", 3]]);
        TableSource
            .writer(
                Destination::Table {
                    store: &mut store,
                    table: "pets".to_string(),
                },
                &ctx,
            )
            .unwrap()
            .write_data(BookStream::from(sheet))
            .unwrap();

        let mut book = TableSource
            .reader(
                Source::Table {
                    store: &store,
                    table: "pets".to_string(),
                    columns: Vec::new(),
                },
                &ctx,
            )
            .unwrap()
            .get_data()
            .unwrap();
        let sheet = book.sheet_at_mut(0).unwrap();
        assert_eq!(sheet.name(), "pets");
        assert_eq!(sheet.colnames(), ["name", "age"]);
        assert_eq!(
            sheet.collect_rows().unwrap(),
            vec![row!["name", "age"], row!["rex", 3]]
        );
    }

    #[test]
    fn test_colnames_row_not_duplicated() {
        let mut store = MemoryStore::new();
        let mut writer = TableWriter {
            store: &mut store,
            table: None,
        };
        let sheet = SheetStream::from_rows("t", vec![row!["a"], row![1]])
            .with_colnames(vec!["a".to_string()]);
        writer.write_sheet("t", sheet).unwrap();

        let (colnames, rows) = store.read_table("t", &[]).unwrap();
        assert_eq!(colnames, vec!["a"]);
        assert_eq!(rows, vec![row![1]]);
    }

    #[test]
    fn test_tables_reads_every_table() {
        let codecs = Codecs::empty();
        let settings = Settings::default();
        let ctx = Context {
            codecs: &codecs,
            settings: &settings,
            options: Default::default(),
        };
        let mut store = MemoryStore::new();
        store.write_table("b", &["x".to_string()], vec![row![1]]).unwrap();
        store.write_table("a", &["y".to_string()], vec![row![2]]).unwrap();

        let book = TablesSource
            .reader(
                Source::Tables {
                    store: &store,
                    tables: Vec::new(),
                },
                &ctx,
            )
            .unwrap()
            .get_data()
            .unwrap();
        assert_eq!(book.sheet_names(), ["a", "b"]);
    }
}
