//! Format dispatch table.
//!
//! Shortcuts that move a sheet or book to and from encoded bytes by token,
//! plus the list of formats the engine can read and write.

use tabio_codecs::Action;
use tabio_stream::{BookStream, SheetStream};

use crate::engine::Engine;
use crate::error::{Result, TabioError};
use crate::request::{ReadRequest, WriteOutput, WriteRequest};

/// One row of the format table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    pub token: String,
    pub readable: bool,
    pub writable: bool,
}

impl Engine {
    /// Every known token with its read/write support, sorted by token
    pub fn formats(&self) -> Vec<FormatInfo> {
        let readable = self.codecs().known_tokens(Action::Read);
        let writable = self.codecs().known_tokens(Action::Write);

        let mut tokens: Vec<&str> = readable.iter().chain(writable.iter()).copied().collect();
        tokens.sort_unstable();
        tokens.dedup();
        tokens
            .into_iter()
            .map(|token| FormatInfo {
                token: token.to_string(),
                readable: readable.contains(&token),
                writable: writable.contains(&token),
            })
            .collect()
    }

    /// Encode a sheet as `token`
    pub fn export_sheet(&self, sheet: SheetStream, token: &str) -> Result<Vec<u8>> {
        into_buffer(self.write_sheet(sheet, WriteRequest::content(token))?)
    }

    /// Encode a book as `token`
    pub fn export_book(&self, book: BookStream, token: &str) -> Result<Vec<u8>> {
        into_buffer(self.write_book(book, WriteRequest::content(token))?)
    }

    /// Decode the first sheet of `content` as `token`
    pub fn import_sheet(&self, token: &str, content: impl Into<Vec<u8>>) -> Result<SheetStream> {
        self.read_sheet(ReadRequest::content(token, content))
    }

    /// Decode `content` as `token`
    pub fn import_book(&self, token: &str, content: impl Into<Vec<u8>>) -> Result<BookStream> {
        self.read_book(ReadRequest::content(token, content))
    }
}

fn into_buffer(output: Option<WriteOutput>) -> Result<Vec<u8>> {
    match output {
        Some(WriteOutput::Buffer(bytes)) => Ok(bytes),
        _ => Err(TabioError::InvalidCapability {
            adapter: "content".to_string(),
            message: "write returned no buffer".to_string(),
        }),
    }
}
