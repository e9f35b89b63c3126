//! Read and write requests.
//!
//! A request is a tagged union naming exactly one backing store. The
//! registry matches adapters on the request's [`SourceKind`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

use tabio_codecs::CodecOptions;
use tabio_stream::{columns_from_unordered, CellValue, Columns, Record, Row, Window};

use crate::capability::SourceKind;
use crate::store::TableStore;

/// Where to read from
pub enum Source<'a> {
    /// A file on disk; the type is inferred from the name unless hinted
    File {
        name: PathBuf,
        file_type: Option<String>,
    },
    /// An in-memory buffer of encoded bytes
    Content { file_type: String, content: Vec<u8> },
    /// A readable stream of encoded bytes
    Stream {
        file_type: String,
        reader: Box<dyn Read + Send>,
    },
    /// A remote resource fetched over HTTP
    Url {
        url: String,
        file_type: Option<String>,
    },
    /// Keyed records; the first record's keys are the header row
    Records(Vec<Record>),
    /// Named columns
    Columns { columns: Columns, with_keys: bool },
    /// A two-dimensional array
    Array(Vec<Row>),
    /// Sheet name to rows, in the given order
    BookDict(Vec<(String, Vec<Row>)>),
    /// One table of a table store
    Table {
        store: &'a dyn TableStore,
        table: String,
        columns: Vec<String>,
    },
    /// Several tables of a table store; every table when empty
    Tables {
        store: &'a dyn TableStore,
        tables: Vec<String>,
    },
}

impl Source<'_> {
    /// Request kind
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::File { .. } => SourceKind::File,
            Self::Content { .. } => SourceKind::Content,
            Self::Stream { .. } => SourceKind::Stream,
            Self::Url { .. } => SourceKind::Url,
            Self::Records(_) => SourceKind::Records,
            Self::Columns { .. } => SourceKind::Columns,
            Self::Array(_) => SourceKind::Array,
            Self::BookDict(_) => SourceKind::BookDict,
            Self::Table { .. } => SourceKind::Table,
            Self::Tables { .. } => SourceKind::Tables,
        }
    }

    /// Summary used by the registry
    pub fn info(&self) -> RequestInfo<'_> {
        let (name, file_type) = match self {
            Self::File { name, file_type } => {
                (Some(name.to_string_lossy()), file_type.as_deref())
            }
            Self::Url { url, file_type } => (Some(Cow::Borrowed(url.as_str())), file_type.as_deref()),
            Self::Content { file_type, .. } | Self::Stream { file_type, .. } => {
                (None, Some(file_type.as_str()))
            }
            Self::Table { table, .. } => (Some(Cow::Borrowed(table.as_str())), None),
            _ => (None, None),
        };
        RequestInfo {
            kind: self.kind(),
            name,
            file_type,
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.info())
    }
}

/// Where to write to
pub enum Destination<'a> {
    /// A file on disk; the type is inferred from the name unless hinted
    File {
        name: PathBuf,
        file_type: Option<String>,
    },
    /// A fresh in-memory buffer, returned as [`WriteOutput::Buffer`]
    Content { file_type: String },
    /// A caller-owned writer, left positioned after the written bytes
    Stream {
        file_type: String,
        writer: &'a mut dyn Write,
    },
    /// Keyed records, returned as [`WriteOutput::Records`]
    Records,
    /// Named columns, returned as [`WriteOutput::Columns`]
    Columns,
    /// A two-dimensional array, returned as [`WriteOutput::Array`]
    Array,
    /// Sheet name to rows, returned as [`WriteOutput::BookDict`]
    BookDict,
    /// One table of a table store
    Table {
        store: &'a mut dyn TableStore,
        table: String,
    },
    /// One table per sheet, named after the sheet
    Tables { store: &'a mut dyn TableStore },
}

impl Destination<'_> {
    /// Request kind
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::File { .. } => SourceKind::File,
            Self::Content { .. } => SourceKind::Content,
            Self::Stream { .. } => SourceKind::Stream,
            Self::Records => SourceKind::Records,
            Self::Columns => SourceKind::Columns,
            Self::Array => SourceKind::Array,
            Self::BookDict => SourceKind::BookDict,
            Self::Table { .. } => SourceKind::Table,
            Self::Tables { .. } => SourceKind::Tables,
        }
    }

    /// Summary used by the registry
    pub fn info(&self) -> RequestInfo<'_> {
        let (name, file_type) = match self {
            Self::File { name, file_type } => {
                (Some(name.to_string_lossy()), file_type.as_deref())
            }
            Self::Content { file_type } | Self::Stream { file_type, .. } => {
                (None, Some(file_type.as_str()))
            }
            Self::Table { table, .. } => (Some(Cow::Borrowed(table.as_str())), None),
            _ => (None, None),
        };
        RequestInfo {
            kind: self.kind(),
            name,
            file_type,
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Destination({})", self.info())
    }
}

/// What the registry sees of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo<'r> {
    /// Request kind
    pub kind: SourceKind,
    /// File name, URL, or table name
    pub name: Option<Cow<'r, str>>,
    /// Explicit file type
    pub file_type: Option<&'r str>,
}

impl fmt::Display for RequestInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " '{}'", name)?;
        }
        if let Some(file_type) = self.file_type {
            write!(f, " (type {})", file_type)?;
        }
        Ok(())
    }
}

/// A read: source plus sheet selection, pagination, and codec options
#[derive(Debug)]
pub struct ReadRequest<'a> {
    pub source: Source<'a>,
    pub sheet_name: Option<String>,
    pub sheet_index: Option<usize>,
    pub window: Window,
    pub options: CodecOptions,
}

impl<'a> From<Source<'a>> for ReadRequest<'a> {
    fn from(source: Source<'a>) -> Self {
        Self {
            source,
            sheet_name: None,
            sheet_index: None,
            window: Window::default(),
            options: CodecOptions::new(),
        }
    }
}

impl<'a> ReadRequest<'a> {
    /// Read a file
    pub fn file(name: impl Into<PathBuf>) -> Self {
        Source::File {
            name: name.into(),
            file_type: None,
        }
        .into()
    }

    /// Read an in-memory buffer
    pub fn content(file_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Source::Content {
            file_type: file_type.into(),
            content: content.into(),
        }
        .into()
    }

    /// Read a stream
    pub fn stream(file_type: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Source::Stream {
            file_type: file_type.into(),
            reader: Box::new(reader),
        }
        .into()
    }

    /// Read a URL
    pub fn url(url: impl Into<String>) -> Self {
        Source::Url {
            url: url.into(),
            file_type: None,
        }
        .into()
    }

    /// Read keyed records
    pub fn records(records: Vec<Record>) -> Self {
        Source::Records(records).into()
    }

    /// Read unordered maps; each record's keys are sorted
    pub fn records_unordered(records: Vec<HashMap<String, CellValue>>) -> Self {
        Self::records(records.into_iter().map(Record::from_unordered).collect())
    }

    /// Read named columns, with the names as the header row
    pub fn columns(columns: Columns) -> Self {
        Source::Columns {
            columns,
            with_keys: true,
        }
        .into()
    }

    /// Read named columns without a header row
    pub fn columns_without_keys(columns: Columns) -> Self {
        Source::Columns {
            columns,
            with_keys: false,
        }
        .into()
    }

    /// Read an unordered column map; columns are sorted by name
    pub fn columns_unordered(columns: HashMap<String, Vec<CellValue>>) -> Self {
        Self::columns(columns_from_unordered(columns))
    }

    /// Read a two-dimensional array
    pub fn array(rows: Vec<Row>) -> Self {
        Source::Array(rows).into()
    }

    /// Read an ordered book dictionary
    pub fn book_dict<S: Into<String>>(sheets: impl IntoIterator<Item = (S, Vec<Row>)>) -> Self {
        Source::BookDict(
            sheets
                .into_iter()
                .map(|(name, rows)| (name.into(), rows))
                .collect(),
        )
        .into()
    }

    /// Read an unordered book dictionary; sheets are sorted by name
    pub fn book_dict_unordered(sheets: HashMap<String, Vec<Row>>) -> Self {
        let mut entries: Vec<(String, Vec<Row>)> = sheets.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Source::BookDict(entries).into()
    }

    /// Read one table
    pub fn table(store: &'a dyn TableStore, table: impl Into<String>) -> Self {
        Source::Table {
            store,
            table: table.into(),
            columns: Vec::new(),
        }
        .into()
    }

    /// Read every table of a store
    pub fn tables(store: &'a dyn TableStore) -> Self {
        Source::Tables {
            store,
            tables: Vec::new(),
        }
        .into()
    }

    /// Set the explicit file type (file and URL sources)
    pub fn file_type(mut self, token: impl Into<String>) -> Self {
        match &mut self.source {
            Source::File { file_type, .. } | Source::Url { file_type, .. } => {
                *file_type = Some(token.into());
            }
            Source::Content { file_type, .. } | Source::Stream { file_type, .. } => {
                *file_type = token.into();
            }
            _ => {}
        }
        self
    }

    /// Restrict a table read to the given columns
    pub fn table_columns(mut self, names: Vec<String>) -> Self {
        if let Source::Table { columns, .. } = &mut self.source {
            *columns = names;
        }
        self
    }

    /// Restrict a tables read to the given tables
    pub fn only_tables(mut self, names: Vec<String>) -> Self {
        if let Source::Tables { tables, .. } = &mut self.source {
            *tables = names;
        }
        self
    }

    /// Select a sheet by name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Select a sheet by position
    pub fn sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = Some(index);
        self
    }

    /// Paginate rows and columns
    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Set a codec option
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(name, value);
        self
    }
}

/// A write: destination plus codec options
#[derive(Debug)]
pub struct WriteRequest<'a> {
    pub destination: Destination<'a>,
    pub options: CodecOptions,
}

impl<'a> From<Destination<'a>> for WriteRequest<'a> {
    fn from(destination: Destination<'a>) -> Self {
        Self {
            destination,
            options: CodecOptions::new(),
        }
    }
}

impl<'a> WriteRequest<'a> {
    /// Write a file
    pub fn file(name: impl Into<PathBuf>) -> Self {
        Destination::File {
            name: name.into(),
            file_type: None,
        }
        .into()
    }

    /// Render into a returned buffer
    pub fn content(file_type: impl Into<String>) -> Self {
        Destination::Content {
            file_type: file_type.into(),
        }
        .into()
    }

    /// Render into a caller-owned writer
    pub fn stream(file_type: impl Into<String>, writer: &'a mut dyn Write) -> Self {
        Destination::Stream {
            file_type: file_type.into(),
            writer,
        }
        .into()
    }

    /// Return keyed records
    pub fn records() -> Self {
        Destination::Records.into()
    }

    /// Return named columns
    pub fn columns() -> Self {
        Destination::Columns.into()
    }

    /// Return a two-dimensional array
    pub fn array() -> Self {
        Destination::Array.into()
    }

    /// Return a book dictionary
    pub fn book_dict() -> Self {
        Destination::BookDict.into()
    }

    /// Write one table
    pub fn table(store: &'a mut dyn TableStore, table: impl Into<String>) -> Self {
        Destination::Table {
            store,
            table: table.into(),
        }
        .into()
    }

    /// Write one table per sheet
    pub fn tables(store: &'a mut dyn TableStore) -> Self {
        Destination::Tables { store }.into()
    }

    /// Set the explicit file type
    pub fn file_type(mut self, token: impl Into<String>) -> Self {
        match &mut self.destination {
            Destination::File { file_type, .. } => *file_type = Some(token.into()),
            Destination::Content { file_type } | Destination::Stream { file_type, .. } => {
                *file_type = token.into();
            }
            _ => {}
        }
        self
    }

    /// Set a codec option
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(name, value);
        self
    }
}

/// Data handed back by a write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutput {
    Buffer(Vec<u8>),
    Records(Vec<Record>),
    Columns(Columns),
    Array(Vec<Row>),
    BookDict(Vec<(String, Vec<Row>)>),
}

impl WriteOutput {
    /// The rendered bytes, if this is a buffer
    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The rows, if this is an array
    pub fn into_array(self) -> Option<Vec<Row>> {
        match self {
            Self::Array(rows) => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabio_stream::row;

    #[test]
    fn test_file_info() {
        let request = ReadRequest::file("/tmp/data.s.csv");
        let info = request.source.info();
        assert_eq!(info.kind, SourceKind::File);
        assert_eq!(info.name.as_deref(), Some("/tmp/data.s.csv"));
        assert_eq!(info.file_type, None);
        assert_eq!(info.to_string(), "file '/tmp/data.s.csv'");
    }

    #[test]
    fn test_file_type_hint() {
        let request = ReadRequest::file("data.txt").file_type("csv");
        assert_eq!(request.source.info().file_type, Some("csv"));
    }

    #[test]
    fn test_book_dict_unordered_is_sorted() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), vec![row![1]]);
        map.insert("a".to_string(), vec![row![2]]);
        match ReadRequest::book_dict_unordered(map).source {
            Source::BookDict(sheets) => {
                let names: Vec<_> = sheets.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_stream_destination_info() {
        let mut buffer = Vec::new();
        let request = WriteRequest::stream("csv", &mut buffer);
        assert_eq!(request.destination.kind(), SourceKind::Stream);
        assert_eq!(request.destination.info().to_string(), "stream (type csv)");
    }

    #[test]
    fn test_columns_without_keys() {
        let request = ReadRequest::columns_without_keys(vec![("A".to_string(), vec![1.into()])]);
        assert!(matches!(
            request.source,
            Source::Columns {
                with_keys: false,
                ..
            }
        ));
    }

    #[test]
    fn test_builders() {
        let request = ReadRequest::array(vec![row![1]])
            .sheet_index(2)
            .option("delimiter", ";");
        assert_eq!(request.sheet_index, Some(2));
        assert_eq!(request.options.get("delimiter"), Some(";"));
    }
}
