//! Conversions between native structures and row arrays.
//!
//! Native structures are keyed records and named columns. Both turn into
//! a two-dimensional array whose first row holds the keys.

use std::collections::HashMap;

use crate::value::{CellValue, Row};

/// Named columns, in column order
pub type Columns = Vec<(String, Vec<CellValue>)>;

/// A record: ordered `(key, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from an unordered map; keys are sorted
    pub fn from_unordered(map: HashMap<String, CellValue>) -> Self {
        let mut fields: Vec<(String, CellValue)> = map.into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self { fields }
    }

    /// Set a field, replacing an existing value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder form of [`Record::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in record order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Lazily turn records into rows
///
/// The first record's key order becomes the header row. Keys missing from
/// later records yield [`CellValue::Empty`]; keys they add are ignored.
pub fn records_to_rows(records: Vec<Record>) -> impl Iterator<Item = Row> + Send {
    let header: Vec<String> = records
        .first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default();
    let header_row: Option<Row> = records
        .first()
        .map(|_| header.iter().map(|k| CellValue::from(k.as_str())).collect());

    header_row
        .into_iter()
        .chain(records.into_iter().map(move |record| {
            header
                .iter()
                .map(|k| record.get(k).cloned().unwrap_or_default())
                .collect()
        }))
}

/// Eager form of [`records_to_rows`]
pub fn records_to_array(records: Vec<Record>) -> Vec<Row> {
    records_to_rows(records).collect()
}

/// Sort an unordered column map by column name
pub fn columns_from_unordered(map: HashMap<String, Vec<CellValue>>) -> Columns {
    let mut columns: Columns = map.into_iter().collect();
    columns.sort_by(|(a, _), (b, _)| a.cmp(b));
    columns
}

/// Lazily zip named columns into rows
///
/// Shorter columns are padded with an empty string up to the longest one.
/// With `with_keys` the column names form the first row.
pub fn columns_to_rows(columns: Columns, with_keys: bool) -> impl Iterator<Item = Row> + Send {
    let header: Option<Row> = (with_keys && !columns.is_empty())
        .then(|| columns.iter().map(|(k, _)| CellValue::from(k.as_str())).collect());
    let remaining = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    header.into_iter().chain(ColumnRows {
        columns: columns.into_iter().map(|(_, v)| v.into_iter()).collect(),
        remaining,
    })
}

/// Eager form of [`columns_to_rows`]
pub fn columns_to_array(columns: Columns, with_keys: bool) -> Vec<Row> {
    columns_to_rows(columns, with_keys).collect()
}

struct ColumnRows {
    columns: Vec<std::vec::IntoIter<CellValue>>,
    remaining: usize,
}

impl Iterator for ColumnRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(
            self.columns
                .iter_mut()
                .map(|col| col.next().unwrap_or_else(|| CellValue::from("")))
                .collect(),
        )
    }
}

/// Turn an array whose first row is a header into records
///
/// Short rows yield [`CellValue::Empty`] for the missing keys; cells beyond
/// the header width are dropped.
pub fn array_to_records(rows: Vec<Row>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(ToString::to_string).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        let mut cells = row.into_iter();
        header
            .iter()
            .map(|key| (key.clone(), cells.next().unwrap_or_default()))
            .collect()
    })
    .collect()
}

/// Turn an array whose first row is a header into named columns
pub fn array_to_columns(rows: Vec<Row>) -> Columns {
    let mut rows = rows.into_iter();
    let mut columns: Columns = match rows.next() {
        Some(header) => header
            .iter()
            .map(|key| (key.to_string(), Vec::new()))
            .collect(),
        None => return Vec::new(),
    };

    for row in rows {
        let mut cells = row.into_iter();
        for (_, values) in columns.iter_mut() {
            values.push(cells.next().unwrap_or_default());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_records_use_first_key_order() {
        let records = vec![
            Record::new().with("x", 1).with("y", 2),
            Record::new().with("y", 4).with("x", 3),
        ];
        assert_eq!(
            records_to_array(records),
            vec![row!["x", "y"], row![1, 2], row![3, 4]]
        );
    }

    #[test]
    fn test_records_missing_key_is_empty() {
        let records = vec![
            Record::new().with("a", 1).with("b", 2),
            Record::new().with("a", 3).with("c", 9),
        ];
        let rows = records_to_array(records);
        assert_eq!(rows[2], vec![CellValue::Int(3), CellValue::Empty]);
    }

    #[test]
    fn test_unordered_record_is_sorted() {
        let mut map = HashMap::new();
        map.insert("z".to_string(), CellValue::from(1));
        map.insert("a".to_string(), CellValue::from(2));

        let record = Record::from_unordered(map);
        assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "z"]);
    }

    #[test]
    fn test_no_records_no_rows() {
        assert!(records_to_array(Vec::new()).is_empty());
    }

    #[test]
    fn test_columns_are_padded() {
        let columns: Columns = vec![
            ("A".to_string(), row![1, 2, 3]),
            ("B".to_string(), row![5, 6]),
        ];
        assert_eq!(
            columns_to_array(columns, true),
            vec![row!["A", "B"], row![1, 5], row![2, 6], row![3, ""]]
        );
    }

    #[test]
    fn test_columns_without_keys() {
        let columns: Columns = vec![("A".to_string(), row![1]), ("B".to_string(), row![2])];
        assert_eq!(columns_to_array(columns, false), vec![row![1, 2]]);
    }

    #[test]
    fn test_unordered_columns_sorted() {
        let mut map = HashMap::new();
        map.insert("B".to_string(), row![2]);
        map.insert("A".to_string(), row![1]);

        let columns = columns_from_unordered(map);
        assert_eq!(columns[0].0, "A");
        assert_eq!(columns_to_array(columns, true)[1], row![1, 2]);
    }

    #[test]
    fn test_array_to_records_and_columns() {
        let rows = vec![row!["x", "y"], row![1, 2], row![3]];

        let records = array_to_records(rows.clone());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("y"), Some(&CellValue::Int(2)));
        assert_eq!(records[1].get("y"), Some(&CellValue::Empty));

        let columns = array_to_columns(rows);
        assert_eq!(columns[0], ("x".to_string(), row![1, 3]));
        assert_eq!(columns[1], ("y".to_string(), vec![CellValue::Int(2), CellValue::Empty]));
    }
}
