//! # tabio-stream
//!
//! The streaming data model shared by tabio's sources and codecs.
//!
//! - [`SheetStream`]: a named, single-pass row sequence
//! - [`BookStream`]: an ordered collection of sheets
//! - [`Payload`]: the eager or lazy rows behind a sheet
//!
//! ## Example
//!
//! ```
//! use tabio_stream::{row, BookStream, SheetStream};
//!
//! let mut sheet = SheetStream::from_rows("numbers", vec![row![1, 2], row![3, 4]]);
//! let rows = sheet.collect_rows().unwrap();
//! assert_eq!(rows.len(), 2);
//!
//! let book = BookStream::from_ordered(vec![("b", vec![row![1]]), ("a", vec![row![2]])]);
//! assert_eq!(book.sheet_names(), ["b", "a"]);
//! ```

pub mod book;
pub mod convert;
pub mod error;
pub mod payload;
pub mod sheet;
pub mod value;

// Re-exports
pub use book::{BookStream, IntoSheets};
pub use convert::{
    array_to_columns, array_to_records, columns_from_unordered, columns_to_array,
    columns_to_rows, records_to_array, records_to_rows, Columns, Record,
};
pub use error::{Result, StreamError};
pub use payload::{Payload, Window};
pub use sheet::SheetStream;
pub use value::{CellValue, Row};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
