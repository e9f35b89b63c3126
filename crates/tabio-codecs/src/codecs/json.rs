//! JSON renderer.
//!
//! Writes an object mapping each sheet name to its rows, in sheet order.

use std::io::Write;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tabio_stream::{BookStream, Row};

use crate::codec::Renderer;
use crate::error::Result;
use crate::options::CodecOptions;

struct OrderedSheets<'a>(&'a [(String, Vec<Row>)]);

impl Serialize for OrderedSheets<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, rows) in self.0 {
            map.serialize_entry(name, rows)?;
        }
        map.end()
    }
}

/// Renderer for `json`
pub struct JsonRenderer {
    token: String,
}

impl JsonRenderer {
    /// Create a renderer for `token`
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl Renderer for JsonRenderer {
    fn file_type(&self) -> &str {
        &self.token
    }

    /// Options: `pretty` (default false)
    fn render(
        &self,
        book: BookStream,
        output: &mut dyn Write,
        options: &CodecOptions,
    ) -> Result<()> {
        let sheets = book.to_dict()?;
        if options.get_bool("pretty", false)? {
            serde_json::to_writer_pretty(output, &OrderedSheets(&sheets))?;
        } else {
            serde_json::to_writer(output, &OrderedSheets(&sheets))?;
        }
        Ok(())
    }
}

pub(crate) fn json_renderer(token: &str) -> Box<dyn Renderer> {
    Box::new(JsonRenderer::new(token))
}
