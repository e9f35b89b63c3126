//! Integration tests for tabio-stream

use std::collections::HashMap;

use tabio_stream::{
    array_to_columns, array_to_records, columns_from_unordered, columns_to_array, records_to_array,
    row, BookStream, CellValue, Payload, Record, SheetStream, StreamError, Window,
};

#[test]
fn test_unordered_book_is_sorted() {
    let mut map = HashMap::new();
    map.insert("b".to_string(), vec![row![1]]);
    map.insert("a".to_string(), vec![row![2]]);

    let book = BookStream::from_unordered(map);
    assert_eq!(book.sheet_names(), ["a", "b"]);
}

#[test]
fn test_ordered_book_keeps_order() {
    let book = BookStream::from_ordered(vec![("b", vec![row![1]]), ("a", vec![row![2]])]);
    assert_eq!(book.sheet_names(), ["b", "a"]);

    let names: Vec<String> = book.into_iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_to_array_returns_same_payload() {
    let mut sheet = SheetStream::new("s", Payload::generate(vec![row![1], row![2]].into_iter()));

    let first: *const Payload = sheet.to_array();
    let second: *const Payload = sheet.to_array();
    assert!(std::ptr::eq(first, second));

    // draining through one handle is visible through the next
    assert!(sheet.to_array().next().is_some());
    let rest: Vec<_> = sheet.to_array().collect::<Result<_, _>>().unwrap();
    assert_eq!(rest, vec![row![2]]);
    assert!(sheet.to_array().next().is_none());
}

#[test]
fn test_columns_with_keys() {
    let mut map = HashMap::new();
    map.insert("A".to_string(), vec![1.into(), 2.into(), 3.into()]);
    map.insert("B".to_string(), vec![5.into(), 6.into()]);

    let rows = columns_to_array(columns_from_unordered(map), true);
    assert_eq!(
        rows,
        vec![row!["A", "B"], row![1, 5], row![2, 6], row![3, ""]]
    );
}

#[test]
fn test_records_to_array() {
    let records = vec![
        Record::new().with("x", 1).with("y", 2),
        Record::new().with("x", 3).with("y", 4),
    ];
    assert_eq!(
        records_to_array(records),
        vec![row!["x", "y"], row![1, 2], row![3, 4]]
    );
}

#[test]
fn test_array_back_to_native() {
    let rows = vec![row!["x", "y"], row![1, 2], row![3]];

    let records = array_to_records(rows.clone());
    assert_eq!(records[1].get("x"), Some(&CellValue::Int(3)));
    assert_eq!(records[1].get("y"), Some(&CellValue::Empty));

    let columns = array_to_columns(rows);
    assert_eq!(columns[0].0, "x");
    assert_eq!(columns[0].1, vec![CellValue::Int(1), CellValue::Int(3)]);
}

#[test]
fn test_sheet_at_out_of_range() {
    let book = BookStream::from_ordered(vec![("only", vec![row![1]])]);
    assert!(book.sheet_at(0).is_some());
    assert!(book.sheet_at(1).is_none());
    assert!(BookStream::new().sheet_at(0).is_none());
}

#[test]
fn test_to_dict_drains_every_sheet() {
    let lazy = SheetStream::new("lazy", Payload::generate((1..=2).map(|i| row![i])));
    let eager = SheetStream::from_rows("eager", vec![row!["x"]]);
    let book = BookStream::from_sheets(vec![lazy, eager]);

    let dict = book.to_dict().unwrap();
    assert_eq!(
        dict,
        vec![
            ("lazy".to_string(), vec![row![1], row![2]]),
            ("eager".to_string(), vec![row!["x"]]),
        ]
    );
}

#[test]
fn test_row_error_surfaces_once() {
    let rows = vec![
        Ok(row![1]),
        Err(StreamError::Decode("bad quote".to_string())),
        Ok(row![3]),
    ];
    let mut sheet = SheetStream::new("s", Payload::lazy(rows.into_iter()));
    assert!(matches!(sheet.collect_rows(), Err(StreamError::Decode(_))));
}

#[test]
fn test_window_is_lazy_pagination() {
    let payload = Payload::generate((0..1_000_000).map(|i| row![i, i + 1, i + 2]));
    let window = Window {
        skip_rows: 10,
        row_limit: Some(2),
        skip_columns: 1,
        column_limit: Some(1),
    };
    let rows: Vec<_> = payload.window(window).collect::<Result<_, _>>().unwrap();
    assert_eq!(rows, vec![row![11], row![12]]);
}
