//! Read/write facade.
//!
//! The engine owns the source registry, the codec registries, and the
//! settings. Each call resolves one adapter, builds a single-use reader or
//! writer from the request, and runs it.
//!
//! ```text
//! read_sheet / read_book
//!   └─ resolve over [input, sheet|book] ─► reader ─► get_data ─► window ─► select sheet
//! write_sheet / write_book
//!   └─ resolve over [sheet|book] ───────► writer ─► write_data ─► Option<WriteOutput>
//! ```

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tabio_codecs::{Action, CodecOptions, Codecs};
use tabio_stream::{BookStream, SheetStream, Window};

use crate::adapter::{Context, SourceAdapter};
use crate::capability::{Target, BOOK_READ_ORDER, SHEET_READ_ORDER};
use crate::error::{Result, TabioError};
use crate::registry::SourceRegistry;
use crate::request::{ReadRequest, RequestInfo, Source, WriteOutput, WriteRequest};
use crate::settings::Settings;

/// Source registry, codec registries, and settings
///
/// Configure an engine before sharing it; after that it is read-only and
/// can serve concurrent calls.
pub struct Engine {
    sources: SourceRegistry,
    codecs: Codecs,
    settings: Settings,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the built-in sources and codecs
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an engine with the built-in sources and codecs
    pub fn with_settings(settings: Settings) -> Self {
        Self::from_parts(SourceRegistry::builtin(), Codecs::builtin(), settings)
    }

    /// Create an engine from explicit registries
    pub fn from_parts(sources: SourceRegistry, codecs: Codecs, settings: Settings) -> Self {
        Self {
            sources,
            codecs,
            settings,
        }
    }

    /// Source registry
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Codec registries
    pub fn codecs(&self) -> &Codecs {
        &self.codecs
    }

    /// Mutable codec registries
    pub fn codecs_mut(&mut self) -> &mut Codecs {
        &mut self.codecs
    }

    /// Settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a source adapter after the existing ones
    pub fn register_source(&mut self, adapter: Arc<dyn SourceAdapter>) -> Result<()> {
        self.sources.register(adapter)
    }

    /// Read one sheet
    ///
    /// The sheet is chosen by `sheet_name`, else `sheet_index`, else the
    /// first sheet in book order.
    pub fn read_sheet(&self, request: ReadRequest<'_>) -> Result<SheetStream> {
        let ReadRequest {
            source,
            sheet_name,
            sheet_index,
            window,
            options,
        } = request;
        let book = self.load(Target::Sheet, source, &options)?;

        let sheet = match (sheet_name, sheet_index) {
            (Some(name), _) => book
                .into_sheet(&name)
                .ok_or(TabioError::SheetNotFound(name))?,
            (None, Some(index)) => {
                let count = book.number_of_sheets();
                book.into_sheet_at(index).ok_or_else(|| {
                    TabioError::SheetNotFound(format!("index {} of {} sheets", index, count))
                })?
            }
            (None, None) => book
                .into_sheet_at(0)
                .ok_or_else(|| TabioError::SheetNotFound("book has no sheets".to_string()))?,
        };
        Ok(sheet.windowed(window))
    }

    /// Read a whole book
    pub fn read_book(&self, request: ReadRequest<'_>) -> Result<BookStream> {
        let ReadRequest {
            source,
            window,
            options,
            ..
        } = request;
        let book = self.load(Target::Book, source, &options)?;
        Ok(apply_window(book, window))
    }

    /// Write one sheet
    ///
    /// Returns the rendered buffer for content destinations and the built
    /// structure for native destinations.
    pub fn write_sheet(
        &self,
        sheet: SheetStream,
        request: WriteRequest<'_>,
    ) -> Result<Option<WriteOutput>> {
        self.store(Target::Sheet, BookStream::from(sheet), request)
    }

    /// Write a whole book
    pub fn write_book(
        &self,
        book: BookStream,
        request: WriteRequest<'_>,
    ) -> Result<Option<WriteOutput>> {
        self.store(Target::Book, book, request)
    }

    fn context(&self, options: &CodecOptions) -> Context<'_> {
        Context {
            codecs: &self.codecs,
            settings: &self.settings,
            options: options.merged_over(&self.settings.codec_defaults()),
        }
    }

    fn resolve(
        &self,
        target: Target,
        order: &[Target],
        action: Action,
        info: &RequestInfo<'_>,
    ) -> Result<Arc<dyn SourceAdapter>> {
        self.sources
            .resolve_in_order(order, action, info, &self.codecs)?
            .ok_or_else(|| TabioError::NoMatchingSource {
                target,
                action,
                request: info.to_string(),
            })
    }

    fn load(&self, target: Target, source: Source<'_>, options: &CodecOptions) -> Result<BookStream> {
        let order: &[Target] = match target {
            Target::Book => &BOOK_READ_ORDER,
            _ => &SHEET_READ_ORDER,
        };
        let adapter = self.resolve(target, order, Action::Read, &source.info())?;

        let reader = adapter.reader(source, &self.context(options))?;
        let (label, path) = reader.source_info();
        log::debug!("Reading {} through '{}'", label, adapter.name());
        let book = reader.get_data()?;
        Ok(book.with_source(Some(label), path))
    }

    fn store(
        &self,
        target: Target,
        book: BookStream,
        request: WriteRequest<'_>,
    ) -> Result<Option<WriteOutput>> {
        let WriteRequest {
            destination,
            options,
        } = request;
        let adapter = self.resolve(target, &[target], Action::Write, &destination.info())?;

        let writer = adapter.writer(destination, &self.context(&options))?;
        let (label, _) = writer.source_info();
        log::debug!(
            "Writing {} sheet(s) to {} through '{}'",
            book.number_of_sheets(),
            label,
            adapter.name()
        );
        writer.write_data(book)
    }
}

/// Apply a window to every sheet, keeping the book's source
fn apply_window(book: BookStream, window: Window) -> BookStream {
    if window.is_unbounded() {
        return book;
    }
    let filename = book.filename().map(str::to_string);
    let path = book.path().map(Path::to_path_buf);
    BookStream::from_sheets(book.into_iter().map(|sheet| sheet.windowed(window)))
        .with_source(filename, path)
}

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

/// Process-wide engine with the built-in sources, codecs, and default
/// settings; built on first use
pub fn default_engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

/// [`Engine::read_sheet`] on the default engine
pub fn read_sheet(request: ReadRequest<'_>) -> Result<SheetStream> {
    default_engine().read_sheet(request)
}

/// [`Engine::read_book`] on the default engine
pub fn read_book(request: ReadRequest<'_>) -> Result<BookStream> {
    default_engine().read_book(request)
}

/// [`Engine::write_sheet`] on the default engine
pub fn write_sheet(sheet: SheetStream, request: WriteRequest<'_>) -> Result<Option<WriteOutput>> {
    default_engine().write_sheet(sheet, request)
}

/// [`Engine::write_book`] on the default engine
pub fn write_book(book: BookStream, request: WriteRequest<'_>) -> Result<Option<WriteOutput>> {
    default_engine().write_book(book, request)
}
