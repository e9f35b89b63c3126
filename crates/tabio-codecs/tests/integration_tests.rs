//! Integration tests for tabio-codecs

use tabio_codecs::{Action, CodecError, CodecOptions, Codecs, Parser, Renderer};
use tabio_stream::{row, BookStream, Row, SheetStream};
use tempfile::NamedTempFile;

fn first_sheet_rows(book: BookStream) -> Vec<Row> {
    book.into_sheet_at(0)
        .expect("book has a sheet")
        .collect_rows()
        .expect("rows decode")
}

struct SemicolonParser;

impl Parser for SemicolonParser {
    fn file_type(&self) -> &str {
        "s.csv"
    }

    fn parse(
        &self,
        input: Box<dyn std::io::Read + Send>,
        options: &CodecOptions,
    ) -> tabio_codecs::Result<BookStream> {
        let csv = Codecs::builtin().get_parser("csv")?;
        csv.parse(input, &options.clone().with("delimiter", ";"))
    }
}

fn semicolon_parser(_token: &str) -> Box<dyn Parser> {
    Box::new(SemicolonParser)
}

#[test]
fn test_compound_extension_wins() {
    let mut codecs = Codecs::builtin();
    codecs.parsers_mut().register("s.csv", semicolon_parser);

    let token = codecs.infer_type("data.s.csv", Action::Read).unwrap();
    assert_eq!(token, "s.csv");
    assert_eq!(codecs.infer_type("data.csv", Action::Read).unwrap(), "csv");

    let parser = codecs.get_parser(&token).unwrap();
    let book = parser
        .parse_bytes(b"1;2\n".to_vec(), &CodecOptions::new())
        .unwrap();
    assert_eq!(first_sheet_rows(book), vec![row![1, 2]]);
}

#[test]
fn test_unknown_suffix_is_unsupported() {
    let codecs = Codecs::builtin();
    match codecs.infer_type("report.docx", Action::Read) {
        Err(CodecError::UnsupportedFileType { extension, action }) => {
            assert_eq!(extension, "docx");
            assert_eq!(action, Action::Read);
        }
        other => panic!("expected UnsupportedFileType, got {:?}", other),
    }
}

#[test]
fn test_inference_is_deterministic() {
    let codecs = Codecs::builtin();
    let first = codecs.infer_type("Archive.TSVZ", Action::Write).unwrap();
    for _ in 0..10 {
        assert_eq!(codecs.infer_type("Archive.TSVZ", Action::Write).unwrap(), first);
    }
    assert_eq!(first, "tsvz");
}

#[test]
fn test_csv_file_round_trip() {
    let codecs = Codecs::builtin();
    let file = NamedTempFile::with_suffix(".csv").unwrap();

    let book = BookStream::from(SheetStream::from_rows(
        "people",
        vec![row!["name", "zip"], row!["Ann", "02134"], row!["Bob", 7]],
    ));
    let bytes = codecs
        .get_renderer("csv")
        .unwrap()
        .render_to_vec(book, &CodecOptions::new())
        .unwrap();
    std::fs::write(file.path(), &bytes).unwrap();

    let book = codecs
        .get_parser("csv")
        .unwrap()
        .parse_file(file.path(), &CodecOptions::new())
        .unwrap();
    assert_eq!(
        first_sheet_rows(book),
        vec![row!["name", "zip"], row!["Ann", "02134"], row!["Bob", 7]]
    );
}

#[test]
fn test_csvz_keeps_every_sheet() {
    let codecs = Codecs::builtin();
    let book = BookStream::from_ordered(vec![
        ("first", vec![row![1, 2]]),
        ("second", vec![row!["a"], row!["b"]]),
    ]);
    let renderer = codecs.get_renderer("csvz").unwrap();
    assert!(!renderer.is_single_sheet());
    let bytes = renderer.render_to_vec(book, &CodecOptions::new()).unwrap();

    let mut book = codecs
        .get_parser("csvz")
        .unwrap()
        .parse_bytes(bytes, &CodecOptions::new())
        .unwrap();
    assert_eq!(book.sheet_names(), ["first", "second"]);
    assert_eq!(
        book.sheet_mut("second").unwrap().collect_rows().unwrap(),
        vec![row!["a"], row!["b"]]
    );
}

#[test]
fn test_single_sheet_renderer_rejects_books() {
    let codecs = Codecs::builtin();
    let renderer: Box<dyn Renderer> = codecs.get_renderer("tsv").unwrap();
    let book = BookStream::from_ordered(vec![("a", vec![row![1]]), ("b", vec![row![2]])]);
    assert!(matches!(
        renderer.render_to_vec(book, &CodecOptions::new()),
        Err(CodecError::SingleSheetOnly { sheets: 2, .. })
    ));
}

#[test]
fn test_spreadsheet_tokens_follow_feature() {
    let codecs = Codecs::builtin();
    assert!(codecs.parsers().contains("ods"));
    let result = codecs.get_parser("ods");
    if cfg!(feature = "excel") {
        assert!(result.is_ok());
        assert!(codecs.parsers().is_loaded("ods"));
    } else {
        assert!(matches!(result, Err(CodecError::NoCodec { .. })));
    }
}

#[test]
fn test_bad_option_is_reported() {
    let codecs = Codecs::builtin();
    let options = CodecOptions::new().with("delimiter", "::");
    let result = codecs
        .get_parser("csv")
        .unwrap()
        .parse_bytes(b"1::2".to_vec(), &options);
    assert!(matches!(result, Err(CodecError::InvalidOption { name, .. }) if name == "delimiter"));
}
