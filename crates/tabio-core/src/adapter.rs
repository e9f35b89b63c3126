//! Source adapter traits.
//!
//! An adapter bridges one kind of backing store to the streaming model. The
//! registry picks an adapter for a request; the adapter then builds a
//! single-use [`DataReader`] or [`DataWriter`] from it.

use std::path::PathBuf;

use tabio_codecs::{Action, CodecError, CodecOptions, Codecs};
use tabio_stream::BookStream;

use crate::capability::{Capability, SourceKind};
use crate::error::{Result, TabioError};
use crate::request::{Destination, RequestInfo, Source, WriteOutput};
use crate::settings::Settings;

/// Per-call context handed to adapters
pub struct Context<'e> {
    /// Codec registries
    pub codecs: &'e Codecs,
    /// Engine settings
    pub settings: &'e Settings,
    /// Request options merged over the settings defaults
    pub options: CodecOptions,
}

/// Reads a book out of a backing store, once
pub trait DataReader {
    /// Label and optional path of the backing store
    fn source_info(&self) -> (String, Option<PathBuf>);

    /// Produce the book
    fn get_data(self: Box<Self>) -> Result<BookStream>;
}

/// Writes a book into a backing store, once
pub trait DataWriter {
    /// Label and optional path of the backing store
    fn source_info(&self) -> (String, Option<PathBuf>);

    /// Drain `book` into the store
    ///
    /// Returns data for destinations that hand something back to the
    /// caller (buffers, native structures).
    fn write_data(self: Box<Self>, book: BookStream) -> Result<Option<WriteOutput>>;
}

/// A registered source adapter
///
/// # Thread Safety
///
/// Adapters must be `Send + Sync`; they are shared by every call on an
/// engine.
pub trait SourceAdapter: Send + Sync {
    /// Adapter name used in log records and errors
    fn name(&self) -> &'static str;

    /// What the adapter serves
    fn capability(&self) -> &Capability;

    /// Check eligibility beyond the request kind
    ///
    /// `Err` means not eligible, with the reason; the registry keeps
    /// looking and reports the first reason if nothing else matches.
    fn check_eligible(&self, _info: &RequestInfo<'_>, _action: Action, _codecs: &Codecs) -> Result<()> {
        Ok(())
    }

    /// Build a reader for `source`
    fn reader<'a>(&self, _source: Source<'a>, _ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        Err(TabioError::UnsupportedAction {
            adapter: self.name().to_string(),
            action: Action::Read,
        })
    }

    /// Build a writer for `destination`
    fn writer<'a>(
        &self,
        _destination: Destination<'a>,
        _ctx: &Context<'_>,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        Err(TabioError::UnsupportedAction {
            adapter: self.name().to_string(),
            action: Action::Write,
        })
    }
}

/// Error for a request variant an adapter was not registered for
pub(crate) fn wrong_kind(adapter: &str, kind: SourceKind) -> TabioError {
    TabioError::InvalidCapability {
        adapter: adapter.to_string(),
        message: format!("cannot build from a {} request", kind),
    }
}

/// Resolve the codec token for a file-backed request
///
/// An explicit type wins; otherwise the type is inferred from the name.
pub fn file_type_of(info: &RequestInfo<'_>, action: Action, codecs: &Codecs) -> Result<String> {
    if let Some(hint) = info.file_type {
        return Ok(codecs.check_type(hint, action)?);
    }
    match &info.name {
        Some(name) => Ok(codecs.infer_type(name, action)?),
        None => Err(CodecError::UnsupportedFileType {
            extension: String::new(),
            action,
        }
        .into()),
    }
}
