//! Single-sheet stream.

use crate::error::Result;
use crate::payload::{Payload, Window};
use crate::value::Row;

/// A named, lazy sequence of rows
///
/// The payload can be drained once. Draining it again yields nothing.
#[derive(Debug)]
pub struct SheetStream {
    name: String,
    payload: Payload,
    colnames: Vec<String>,
}

impl SheetStream {
    /// Create a sheet over any payload
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            colnames: Vec::new(),
        }
    }

    /// Create a sheet backed by owned rows
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::new(name, Payload::from_rows(rows))
    }

    /// Attach column names
    pub fn with_colnames(mut self, colnames: Vec<String>) -> Self {
        self.colnames = colnames;
        self
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the sheet
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Column names (may be empty)
    pub fn colnames(&self) -> &[String] {
        &self.colnames
    }

    /// Whether the payload is already materialized
    pub fn is_eager(&self) -> bool {
        self.payload.is_eager()
    }

    /// The underlying payload, unchanged
    ///
    /// No rows are materialized. Calling this twice returns the same
    /// payload, which may already be drained.
    pub fn to_array(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Drain the remaining rows, stopping at the first row error
    pub fn collect_rows(&mut self) -> Result<Vec<Row>> {
        self.payload.by_ref().collect()
    }

    /// Apply pagination to the payload
    pub fn windowed(mut self, window: Window) -> Self {
        self.payload = self.payload.window(window);
        self
    }

    /// Consume the sheet, keeping only its payload
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Consume the sheet into `(name, colnames, payload)`
    pub fn into_parts(self) -> (String, Vec<String>, Payload) {
        (self.name, self.colnames, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_to_array_returns_same_payload() {
        let mut sheet = SheetStream::new("s", Payload::generate(vec![row![1], row![2]].into_iter()));

        let first: *const Payload = sheet.to_array();
        let second: *const Payload = sheet.to_array();
        assert!(std::ptr::eq(first, second));
        assert!(!sheet.is_eager());
    }

    #[test]
    fn test_to_array_after_drain_is_empty() {
        let mut sheet = SheetStream::from_rows("s", vec![row![1, 2], row![3, 4]]);

        let drained: Vec<Row> = sheet.to_array().map(|r| r.unwrap()).collect();
        assert_eq!(drained.len(), 2);

        assert!(sheet.to_array().next().is_none());
        assert!(sheet.collect_rows().unwrap().is_empty());
    }

    #[test]
    fn test_colnames_and_rename() {
        let mut sheet = SheetStream::from_rows("old", vec![])
            .with_colnames(vec!["a".to_string(), "b".to_string()]);
        sheet.set_name("new");

        assert_eq!(sheet.name(), "new");
        assert_eq!(sheet.colnames(), ["a", "b"]);
    }

    #[test]
    fn test_windowed_sheet() {
        let mut sheet = SheetStream::from_rows("s", vec![row![1], row![2], row![3]]).windowed(
            Window {
                skip_rows: 2,
                ..Default::default()
            },
        );
        assert_eq!(sheet.collect_rows().unwrap(), vec![row![3]]);
    }
}
