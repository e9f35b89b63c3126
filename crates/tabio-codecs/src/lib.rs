//! # tabio-codecs
//!
//! File-format codecs for tabio and the registry that finds them.
//!
//! ## Features
//!
//! - **Two registries**: parsers (read) and renderers (write), keyed by
//!   lower-case file-type tokens
//! - **Soft plugins**: tokens known up front whose codec is loaded on first
//!   use (`xlsx`, `xls`, `ods`, ... through `calamine`)
//! - **Type inference**: longest-suffix match of a file name against the
//!   known tokens
//!
//! ## Example
//!
//! ```
//! use tabio_codecs::{Action, CodecOptions, Codecs};
//! use tabio_stream::{row, BookStream, SheetStream};
//!
//! let codecs = Codecs::builtin();
//! let token = codecs.infer_type("report.csv", Action::Write)?;
//!
//! let renderer = codecs.get_renderer(&token)?;
//! let book = BookStream::from(SheetStream::from_rows("s", vec![row![1, 2]]));
//! let bytes = renderer.render_to_vec(book, &CodecOptions::new())?;
//! assert_eq!(bytes, b"1,2\r\n");
//! # Ok::<(), tabio_codecs::CodecError>(())
//! ```

pub mod codec;
pub mod codecs;
pub mod error;
pub mod options;
pub mod registry;
pub mod resolver;

// Re-exports
pub use codec::{Parser, ParserFactory, Renderer, RendererFactory};
pub use codecs::CsvOptions;
pub use error::{Action, CodecError, Result};
pub use options::CodecOptions;
pub use registry::{CodecRegistry, SoftLoader};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The parser and renderer registries
///
/// The two registries are independent namespaces: a token can be readable,
/// writable, or both.
pub struct Codecs {
    parsers: CodecRegistry<ParserFactory>,
    renderers: CodecRegistry<RendererFactory>,
}

impl Default for Codecs {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Codecs {
    /// Registries holding the built-in codecs and soft plugins
    pub fn builtin() -> Self {
        let mut registries = Self::empty();
        codecs::register_builtin_parsers(&mut registries.parsers);
        codecs::register_builtin_renderers(&mut registries.renderers);
        registries
    }

    /// Registries with no codecs (for testing)
    pub fn empty() -> Self {
        Self {
            parsers: CodecRegistry::new("parser"),
            renderers: CodecRegistry::new("renderer"),
        }
    }

    /// Read-side registry
    pub fn parsers(&self) -> &CodecRegistry<ParserFactory> {
        &self.parsers
    }

    /// Mutable read-side registry
    pub fn parsers_mut(&mut self) -> &mut CodecRegistry<ParserFactory> {
        &mut self.parsers
    }

    /// Write-side registry
    pub fn renderers(&self) -> &CodecRegistry<RendererFactory> {
        &self.renderers
    }

    /// Mutable write-side registry
    pub fn renderers_mut(&mut self) -> &mut CodecRegistry<RendererFactory> {
        &mut self.renderers
    }

    /// Tokens known for `action`, built-in and soft
    pub fn known_tokens(&self, action: Action) -> Vec<&str> {
        match action {
            Action::Read => self.parsers.tokens(),
            Action::Write => self.renderers.tokens(),
        }
    }

    /// Infer the token for a file name (longest suffix match)
    pub fn infer_type(&self, name: &str, action: Action) -> Result<String> {
        resolver::infer_type(name, action, self.known_tokens(action))
    }

    /// Validate an explicit type hint
    pub fn check_type(&self, hint: &str, action: Action) -> Result<String> {
        resolver::check_type(hint, action, self.known_tokens(action))
    }

    /// Construct the parser for `token`
    pub fn get_parser(&self, token: &str) -> Result<Box<dyn Parser>> {
        let token = token.to_lowercase();
        let factory = self.parsers.get(&token)?;
        Ok(factory(&token))
    }

    /// Construct the renderer for `token`
    pub fn get_renderer(&self, token: &str) -> Result<Box<dyn Renderer>> {
        let token = token.to_lowercase();
        let factory = self.renderers.get(&token)?;
        Ok(factory(&token))
    }
}
