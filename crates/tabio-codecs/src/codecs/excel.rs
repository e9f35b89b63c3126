//! Spreadsheet workbooks (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) using calamine.
//!
//! Registered as a soft plugin: the tokens are always known, the parser is
//! materialized on first request and only when the `excel` feature is on.

use crate::codec::ParserFactory;

/// Tokens served by this plugin
pub const EXCEL_TOKENS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Plugin name used in log records and errors
pub const EXCEL_PLUGIN: &str = "calamine";

/// Soft loader for the spreadsheet parser
pub fn load_parser() -> Result<ParserFactory, String> {
    #[cfg(feature = "excel")]
    {
        Ok(imp::excel_parser)
    }
    #[cfg(not(feature = "excel"))]
    {
        Err("built without the `excel` feature".to_string())
    }
}

#[cfg(feature = "excel")]
pub use imp::ExcelParser;

#[cfg(feature = "excel")]
mod imp {
    use std::io::{Cursor, Read, Seek};
    use std::path::Path;

    use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
    use tabio_stream::{BookStream, CellValue, Row, SheetStream};

    use crate::codec::Parser;
    use crate::error::Result;
    use crate::options::CodecOptions;

    /// Workbook parser; rows are read eagerly, calamine loads whole ranges
    pub struct ExcelParser {
        token: String,
    }

    impl ExcelParser {
        /// Create a parser for `token`
        pub fn new(token: &str) -> Self {
            Self {
                token: token.to_string(),
            }
        }

        /// Convert a calamine cell to a cell value
        fn cell_value(cell: &Data) -> CellValue {
            match cell {
                Data::Empty => CellValue::Empty,
                Data::String(s) => CellValue::String(s.clone()),
                Data::Int(i) => CellValue::Int(*i),
                Data::Float(f) => CellValue::Float(*f),
                Data::Bool(b) => CellValue::Bool(*b),
                Data::Error(e) => CellValue::String(format!("#ERROR: {:?}", e)),
                Data::DateTime(dt) => CellValue::String(format!("{}", dt)),
                Data::DateTimeIso(s) => CellValue::String(s.clone()),
                Data::DurationIso(s) => CellValue::String(s.clone()),
            }
        }

        fn read_workbook<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<BookStream> {
            let mut book = BookStream::new();
            for name in workbook.sheet_names() {
                let range = workbook.worksheet_range(&name)?;
                let rows: Vec<Row> = range
                    .rows()
                    .map(|row| row.iter().map(Self::cell_value).collect())
                    .collect();
                book.push(SheetStream::from_rows(name, rows));
            }
            Ok(book)
        }
    }

    impl Parser for ExcelParser {
        fn file_type(&self) -> &str {
            &self.token
        }

        fn parse(&self, mut input: Box<dyn Read + Send>, _options: &CodecOptions) -> Result<BookStream> {
            let mut bytes = Vec::new();
            input.read_to_end(&mut bytes)?;
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
            Self::read_workbook(&mut workbook)
        }

        fn parse_file(&self, path: &Path, _options: &CodecOptions) -> Result<BookStream> {
            let mut workbook = open_workbook_auto(path)?;
            Self::read_workbook(&mut workbook)
        }
    }

    pub(crate) fn excel_parser(token: &str) -> Box<dyn Parser> {
        Box::new(ExcelParser::new(token))
    }

}
