//! Zipped delimited text (`csvz`, `tsvz`): one delimited file per sheet.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use tabio_stream::{BookStream, SheetStream};
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::codec::{Parser, Renderer};
use crate::codecs::delimited::{delimited_payload, write_delimited, CsvOptions};
use crate::error::Result;
use crate::options::CodecOptions;

/// Extension of the entries inside the archive (`csvz` → `csv`)
fn inner_extension(token: &str) -> &str {
    token.strip_suffix('z').unwrap_or(token)
}

/// Parser for `csvz` and `tsvz`
pub struct ZippedParser {
    token: String,
}

impl ZippedParser {
    /// Create a parser for `token`
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl Parser for ZippedParser {
    fn file_type(&self) -> &str {
        &self.token
    }

    fn parse(&self, mut input: Box<dyn Read + Send>, options: &CodecOptions) -> Result<BookStream> {
        let csv_options = CsvOptions::from_codec_options(inner_extension(&self.token), options)?;

        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let mut book = BookStream::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            let sheet_name = Path::new(&name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&name)
                .to_string();
            book.push(SheetStream::new(
                sheet_name,
                delimited_payload(Cursor::new(contents), csv_options.clone()),
            ));
        }

        Ok(book)
    }
}

/// Renderer for `csvz` and `tsvz`
pub struct ZippedRenderer {
    token: String,
}

impl ZippedRenderer {
    /// Create a renderer for `token`
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl Renderer for ZippedRenderer {
    fn file_type(&self) -> &str {
        &self.token
    }

    fn render(
        &self,
        book: BookStream,
        output: &mut dyn Write,
        options: &CodecOptions,
    ) -> Result<()> {
        let extension = inner_extension(&self.token);
        let csv_options = CsvOptions::from_codec_options(extension, options)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let file_options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        for sheet in book {
            zip.start_file(format!("{}.{}", sheet.name(), extension), file_options)?;
            write_delimited(sheet, &mut zip, &csv_options)?;
        }

        let archive = zip.finish()?;
        output.write_all(archive.get_ref())?;
        Ok(())
    }
}

pub(crate) fn zipped_parser(token: &str) -> Box<dyn Parser> {
    Box::new(ZippedParser::new(token))
}

pub(crate) fn zipped_renderer(token: &str) -> Box<dyn Renderer> {
    Box::new(ZippedRenderer::new(token))
}
