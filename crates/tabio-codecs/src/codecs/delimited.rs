//! Delimited text codecs (`csv`, `tsv`).

use std::io::{Read, Write};
use std::path::Path;

use tabio_stream::{BookStream, CellValue, Payload, Row, SheetStream, StreamError};

use crate::codec::{ensure_single_sheet, Parser, Renderer};
use crate::error::{CodecError, Result};
use crate::options::CodecOptions;

/// Options for delimited text
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Record terminator used when writing (default: `\r\n`)
    pub terminator: csv::Terminator,
    /// Whether to trim whitespace from fields
    pub trim: bool,
    /// Whether rows may have different lengths
    pub flexible: bool,
    /// Turn integer-looking fields into integers
    pub auto_detect_int: bool,
    /// Turn float-looking fields into floats
    pub auto_detect_float: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            terminator: csv::Terminator::CRLF,
            trim: false,
            flexible: true,
            auto_detect_int: true,
            auto_detect_float: true,
        }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Defaults for `token`, overridden by pass-through options
    ///
    /// Recognized names: `delimiter`, `quotechar`, `lineterminator`, `trim`,
    /// `flexible`, `auto_detect_int`, `auto_detect_float`.
    pub fn from_codec_options(token: &str, options: &CodecOptions) -> Result<Self> {
        let base = if token.starts_with("tsv") {
            Self::tsv()
        } else {
            Self::default()
        };

        Ok(Self {
            delimiter: options.get_byte("delimiter")?.unwrap_or(base.delimiter),
            quote: options.get_byte("quotechar")?.unwrap_or(base.quote),
            terminator: match options.get("lineterminator") {
                Some(value) => parse_terminator(value)?,
                None => base.terminator,
            },
            trim: options.get_bool("trim", base.trim)?,
            flexible: options.get_bool("flexible", base.flexible)?,
            auto_detect_int: options.get_bool("auto_detect_int", base.auto_detect_int)?,
            auto_detect_float: options.get_bool("auto_detect_float", base.auto_detect_float)?,
        })
    }

    /// Convert a raw field into a cell value
    pub fn detect(&self, field: &str) -> CellValue {
        if self.auto_detect_int && looks_like_int(field) {
            if let Ok(value) = field.parse::<i64>() {
                return CellValue::Int(value);
            }
        }
        if self.auto_detect_float && looks_like_float(field) {
            if let Ok(value) = field.parse::<f64>() {
                return CellValue::Float(value);
            }
        }
        CellValue::from(field)
    }

    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(false) // Header rows are plain rows here
            .flexible(self.flexible)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        builder
    }

    /// Bytes of the record terminator
    pub fn terminator_bytes(&self) -> &[u8] {
        match self.terminator {
            csv::Terminator::Any(ref byte) => std::slice::from_ref(byte),
            _ => b"\r\n",
        }
    }

    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(self.terminator)
            .flexible(self.flexible);
        builder
    }
}

fn parse_terminator(value: &str) -> Result<csv::Terminator> {
    match value.as_bytes() {
        b"\r\n" => Ok(csv::Terminator::CRLF),
        [byte] => Ok(csv::Terminator::Any(*byte)),
        _ => Err(CodecError::InvalidOption {
            name: "lineterminator".to_string(),
            message: format!(
                "expected '\\r\\n' or a single byte, got '{}'",
                value.escape_default()
            ),
        }),
    }
}

/// Optional sign followed by digits, without a leading zero
fn looks_like_int(field: &str) -> bool {
    let digits = field.strip_prefix(['-', '+']).unwrap_or(field);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

/// Digits around a single decimal point, with an optional exponent
fn looks_like_float(field: &str) -> bool {
    let body = field.strip_prefix(['-', '+']).unwrap_or(field);
    let mantissa = body.split(['e', 'E']).next().unwrap_or(body);
    mantissa.bytes().any(|b| b.is_ascii_digit())
        && mantissa.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && mantissa.bytes().filter(|b| *b == b'.').count() <= 1
        && !(mantissa.len() > 1 && mantissa.starts_with('0') && !mantissa.starts_with("0."))
}

/// Lazily parse delimited text into rows
pub(crate) fn delimited_payload<R>(input: R, options: CsvOptions) -> Payload
where
    R: Read + Send + 'static,
{
    let reader = options.reader_builder().from_reader(input);
    Payload::lazy(reader.into_records().map(move |record| {
        let record = record.map_err(|e| StreamError::Decode(e.to_string()))?;
        Ok(record.iter().map(|field| options.detect(field)).collect())
    }))
}

/// Drain rows into a delimited writer
///
/// An empty row is written as a bare line terminator. The parser skips
/// blank lines, so empty rows do not survive a round trip.
pub(crate) fn write_delimited<W: Write>(
    sheet: SheetStream,
    output: W,
    options: &CsvOptions,
) -> Result<()> {
    let builder = options.writer_builder();
    let mut writer = builder.from_writer(output);
    for row in sheet.into_payload() {
        let row: Row = row?;
        if row.is_empty() {
            let mut output = writer.into_inner().map_err(|e| e.into_error())?;
            output.write_all(options.terminator_bytes())?;
            writer = builder.from_writer(output);
            continue;
        }
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parser for `csv` and `tsv`
pub struct CsvParser {
    token: String,
}

impl CsvParser {
    /// Create a parser for `token`
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }

    fn book(&self, input: Box<dyn Read + Send>, name: &str, options: &CodecOptions) -> Result<BookStream> {
        let options = CsvOptions::from_codec_options(&self.token, options)?;
        Ok(BookStream::from(SheetStream::new(
            name,
            delimited_payload(input, options),
        )))
    }
}

impl Parser for CsvParser {
    fn file_type(&self) -> &str {
        &self.token
    }

    fn parse(&self, input: Box<dyn Read + Send>, options: &CodecOptions) -> Result<BookStream> {
        self.book(input, &self.token, options)
    }

    fn parse_file(&self, path: &Path, options: &CodecOptions) -> Result<BookStream> {
        let file = std::fs::File::open(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.token)
            .to_string();
        self.book(Box::new(std::io::BufReader::new(file)), &name, options)
    }
}

/// Renderer for `csv` and `tsv`
pub struct CsvRenderer {
    token: String,
}

impl CsvRenderer {
    /// Create a renderer for `token`
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl Renderer for CsvRenderer {
    fn file_type(&self) -> &str {
        &self.token
    }

    fn is_single_sheet(&self) -> bool {
        true
    }

    fn render(
        &self,
        book: BookStream,
        output: &mut dyn Write,
        options: &CodecOptions,
    ) -> Result<()> {
        ensure_single_sheet(&self.token, &book)?;
        let options = CsvOptions::from_codec_options(&self.token, options)?;
        match book.into_iter().next() {
            Some(sheet) => write_delimited(sheet, output, &options),
            None => Ok(()),
        }
    }
}

pub(crate) fn csv_parser(token: &str) -> Box<dyn Parser> {
    Box::new(CsvParser::new(token))
}

pub(crate) fn csv_renderer(token: &str) -> Box<dyn Renderer> {
    Box::new(CsvRenderer::new(token))
}
