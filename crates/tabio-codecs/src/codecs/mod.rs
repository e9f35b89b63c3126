//! Built-in codec implementations.
//!
//! This module contains codecs for delimited text, zipped delimited text,
//! JSON, and (as a soft plugin) spreadsheet workbooks.

pub mod delimited;
pub mod excel;
pub mod json;
pub mod zipped;

pub use delimited::{CsvOptions, CsvParser, CsvRenderer};
pub use json::JsonRenderer;
pub use zipped::{ZippedParser, ZippedRenderer};

#[cfg(feature = "excel")]
pub use excel::ExcelParser;

use crate::codec::{ParserFactory, RendererFactory};
use crate::registry::CodecRegistry;

/// Register the built-in parsers, plus the spreadsheet soft plugin
pub fn register_builtin_parsers(parsers: &mut CodecRegistry<ParserFactory>) {
    parsers.register("csv", delimited::csv_parser);
    parsers.register("tsv", delimited::csv_parser);
    parsers.register("csvz", zipped::zipped_parser);
    parsers.register("tsvz", zipped::zipped_parser);

    for token in excel::EXCEL_TOKENS {
        parsers.register_soft(token, excel::EXCEL_PLUGIN, excel::load_parser);
    }
}

/// Register the built-in renderers
pub fn register_builtin_renderers(renderers: &mut CodecRegistry<RendererFactory>) {
    renderers.register("csv", delimited::csv_renderer);
    renderers.register("tsv", delimited::csv_renderer);
    renderers.register("csvz", zipped::zipped_renderer);
    renderers.register("tsvz", zipped::zipped_renderer);
    renderers.register("json", json::json_renderer);
}
