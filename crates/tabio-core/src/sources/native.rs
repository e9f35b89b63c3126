//! Native structures: records, columns, arrays, and book dictionaries.

use std::path::PathBuf;

use tabio_codecs::Action;
use tabio_stream::{
    array_to_columns, array_to_records, columns_to_rows, records_to_rows, BookStream, Columns,
    Payload, Record, Row, SheetStream,
};

use crate::adapter::{wrong_kind, Context, DataReader, DataWriter, SourceAdapter};
use crate::capability::{Capability, SourceKind, Target};
use crate::error::Result;
use crate::request::{Destination, Source, WriteOutput};

/// Adapter for one native structure, read and write
pub struct NativeSource {
    kind: SourceKind,
    capability: Capability,
}

const SHEET_TARGET: &[Target] = &[Target::Sheet];
const BOOK_TARGET: &[Target] = &[Target::Book];
const READ_WRITE: &[Action] = &[Action::Read, Action::Write];

impl NativeSource {
    /// Keyed records
    pub const RECORDS: Self = Self::new(SourceKind::Records, SHEET_TARGET, &[SourceKind::Records]);
    /// Named columns
    pub const COLUMNS: Self = Self::new(SourceKind::Columns, SHEET_TARGET, &[SourceKind::Columns]);
    /// Two-dimensional arrays
    pub const ARRAY: Self = Self::new(SourceKind::Array, SHEET_TARGET, &[SourceKind::Array]);
    /// Book dictionaries
    pub const BOOK_DICT: Self = Self::new(SourceKind::BookDict, BOOK_TARGET, &[SourceKind::BookDict]);

    const fn new(kind: SourceKind, targets: &'static [Target], kinds: &'static [SourceKind]) -> Self {
        Self {
            kind,
            capability: Capability {
                targets,
                actions: READ_WRITE,
                kinds,
                attributes: &[],
            },
        }
    }
}

impl SourceAdapter for NativeSource {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn capability(&self) -> &Capability {
        &self.capability
    }

    fn reader<'a>(&self, source: Source<'a>, ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        let data = match source {
            Source::Records(records) => NativeData::Records(records),
            Source::Columns { columns, with_keys } => NativeData::Columns(columns, with_keys),
            Source::Array(rows) => NativeData::Array(rows),
            Source::BookDict(sheets) => NativeData::BookDict(sheets),
            other => return Err(wrong_kind(self.name(), other.kind())),
        };
        Ok(Box::new(NativeReader {
            sheet_name: ctx.settings.native.sheet_name.clone(),
            data,
        }))
    }

    fn writer<'a>(
        &self,
        destination: Destination<'a>,
        _ctx: &Context<'_>,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        let kind = destination.kind();
        match destination {
            Destination::Records
            | Destination::Columns
            | Destination::Array
            | Destination::BookDict => Ok(Box::new(NativeWriter { kind })),
            _ => Err(wrong_kind(self.name(), kind)),
        }
    }
}

enum NativeData {
    Records(Vec<Record>),
    Columns(Columns, bool),
    Array(Vec<Row>),
    BookDict(Vec<(String, Vec<Row>)>),
}

struct NativeReader {
    sheet_name: String,
    data: NativeData,
}

impl DataReader for NativeReader {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        let kind = match self.data {
            NativeData::Records(_) => SourceKind::Records,
            NativeData::Columns(..) => SourceKind::Columns,
            NativeData::Array(_) => SourceKind::Array,
            NativeData::BookDict(_) => SourceKind::BookDict,
        };
        (format!("<{}>", kind), None)
    }

    fn get_data(self: Box<Self>) -> Result<BookStream> {
        let name = self.sheet_name;
        let book = match self.data {
            NativeData::Records(records) => BookStream::from(SheetStream::new(
                name,
                Payload::generate(records_to_rows(records)),
            )),
            NativeData::Columns(columns, with_keys) => BookStream::from(SheetStream::new(
                name,
                Payload::generate(columns_to_rows(columns, with_keys)),
            )),
            NativeData::Array(rows) => BookStream::from(SheetStream::from_rows(name, rows)),
            NativeData::BookDict(sheets) => BookStream::from_ordered(sheets),
        };
        Ok(book)
    }
}

struct NativeWriter {
    kind: SourceKind,
}

impl DataWriter for NativeWriter {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        (format!("<{}>", self.kind), None)
    }

    fn write_data(self: Box<Self>, book: BookStream) -> Result<Option<WriteOutput>> {
        let output = match self.kind {
            SourceKind::BookDict => WriteOutput::BookDict(book.to_dict()?),
            SourceKind::Records => WriteOutput::Records(array_to_records(first_sheet_rows(book)?)),
            SourceKind::Columns => WriteOutput::Columns(array_to_columns(first_sheet_rows(book)?)),
            _ => WriteOutput::Array(first_sheet_rows(book)?),
        };
        Ok(Some(output))
    }
}

/// Drain the first sheet; an empty book has no rows
fn first_sheet_rows(book: BookStream) -> Result<Vec<Row>> {
    match book.into_sheet_at(0) {
        Some(mut sheet) => Ok(sheet.collect_rows()?),
        None => Ok(Vec::new()),
    }
}
