//! # tabio
//!
//! Read and write tabular data through one interface, whatever it is
//! stored in: files, memory buffers, streams, URLs, native structures, or
//! database tables.
//!
//! ## Features
//!
//! - **Capability registry**: adapters declare which targets, actions, and
//!   request kinds they serve; the first eligible adapter wins
//! - **Type inference**: file types come from the longest matching suffix
//!   or an explicit hint
//! - **Streaming**: sheets are single-pass row streams, parsed lazily where
//!   the format allows it
//! - **Optional backends**: `excel` (calamine), `http` (reqwest), `sqlite`
//!   (rusqlite)
//!
//! ## Example
//!
//! ```
//! use tabio_core::{read_sheet, write_sheet, ReadRequest, WriteOutput, WriteRequest};
//!
//! let sheet = read_sheet(ReadRequest::content("csv", "a,b\n1,2\n"))?;
//! let output = write_sheet(sheet, WriteRequest::content("tsv"))?;
//! assert_eq!(output, Some(WriteOutput::Buffer(b"a\tb\r\n1\t2\r\n".to_vec())));
//! # Ok::<(), tabio_core::TabioError>(())
//! ```

pub mod adapter;
pub mod capability;
pub mod engine;
pub mod error;
pub mod formats;
pub mod registry;
pub mod request;
pub mod settings;
pub mod sources;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod store;

// Re-exports
pub use adapter::{file_type_of, Context, DataReader, DataWriter, SourceAdapter};
pub use capability::{Capability, SourceKind, Target, BOOK_READ_ORDER, SHEET_READ_ORDER};
pub use engine::{default_engine, read_book, read_sheet, write_book, write_sheet, Engine};
pub use error::{Result, TabioError};
pub use formats::FormatInfo;
pub use registry::SourceRegistry;
pub use request::{Destination, ReadRequest, RequestInfo, Source, WriteOutput, WriteRequest};
pub use settings::Settings;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::{MemoryStore, TableStore};

pub use tabio_codecs::{Action, CodecError, CodecOptions, Codecs};
pub use tabio_stream::{row, BookStream, CellValue, Columns, Record, Row, SheetStream, Window};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
