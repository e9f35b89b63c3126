//! Parser and renderer traits.
//!
//! A parser turns bytes into a [`BookStream`]; a renderer drains a
//! [`BookStream`] into bytes. Both are constructed per call from a factory
//! registered under a file-type token, and receive the resolved token.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tabio_stream::BookStream;

use crate::error::{CodecError, Result};
use crate::options::CodecOptions;

/// Constructs a parser for the given token
pub type ParserFactory = fn(&str) -> Box<dyn Parser>;

/// Constructs a renderer for the given token
pub type RendererFactory = fn(&str) -> Box<dyn Renderer>;

/// Read-side codec
///
/// # Thread Safety
///
/// Parsers must be `Send + Sync`; the registries that hold their factories
/// are shared by every call.
pub trait Parser: Send + Sync {
    /// Token this parser was constructed for
    fn file_type(&self) -> &str;

    /// Parse a readable stream
    ///
    /// Rows are produced lazily where the format allows it; the returned book
    /// owns `input`.
    fn parse(&self, input: Box<dyn Read + Send>, options: &CodecOptions) -> Result<BookStream>;

    /// Parse a file on disk
    fn parse_file(&self, path: &Path, options: &CodecOptions) -> Result<BookStream> {
        let file = File::open(path)?;
        self.parse(Box::new(BufReader::new(file)), options)
    }

    /// Parse an in-memory buffer
    fn parse_bytes(&self, content: Vec<u8>, options: &CodecOptions) -> Result<BookStream> {
        self.parse(Box::new(std::io::Cursor::new(content)), options)
    }
}

/// Write-side codec
pub trait Renderer: Send + Sync {
    /// Token this renderer was constructed for
    fn file_type(&self) -> &str;

    /// Whether the format can hold only one sheet per output
    fn is_single_sheet(&self) -> bool {
        false
    }

    /// Drain `book` into `output`
    fn render(&self, book: BookStream, output: &mut dyn Write, options: &CodecOptions)
        -> Result<()>;

    /// Render into a fresh buffer
    fn render_to_vec(&self, book: BookStream, options: &CodecOptions) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.render(book, &mut buffer, options)?;
        Ok(buffer)
    }
}

/// Reject multi-sheet books for single-sheet formats
pub(crate) fn ensure_single_sheet(token: &str, book: &BookStream) -> Result<()> {
    if book.number_of_sheets() > 1 {
        return Err(CodecError::SingleSheetOnly {
            token: token.to_string(),
            sheets: book.number_of_sheets(),
        });
    }
    Ok(())
}
