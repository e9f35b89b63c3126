//! Multi-sheet stream.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sheet::SheetStream;
use crate::value::Row;

/// Ordered, named collection of [`SheetStream`]s
///
/// `name_order[i]` always names the sheet at position `i`; sheet names are
/// unique within a book.
#[derive(Debug, Default)]
pub struct BookStream {
    sheets: HashMap<String, SheetStream>,
    name_order: Vec<String>,
    filename: Option<String>,
    path: Option<PathBuf>,
}

impl BookStream {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book from sheets, keeping their order
    pub fn from_sheets(sheets: impl IntoIterator<Item = SheetStream>) -> Self {
        let mut book = Self::new();
        for sheet in sheets {
            book.push(sheet);
        }
        book
    }

    /// Create a book from an explicitly ordered sequence of `(name, rows)`
    pub fn from_ordered<S: Into<String>>(sheets: impl IntoIterator<Item = (S, Vec<Row>)>) -> Self {
        Self::from_sheets(
            sheets
                .into_iter()
                .map(|(name, rows)| SheetStream::from_rows(name, rows)),
        )
    }

    /// Create a book from an unordered map; sheets are sorted by name
    pub fn from_unordered(sheets: HashMap<String, Vec<Row>>) -> Self {
        let mut entries: Vec<(String, Vec<Row>)> = sheets.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self::from_ordered(entries)
    }

    /// Record where the book came from
    pub fn with_source(mut self, filename: Option<String>, path: Option<PathBuf>) -> Self {
        self.filename = filename;
        self.path = path;
        self
    }

    /// Append a sheet
    ///
    /// A sheet whose name is already present replaces the earlier sheet and
    /// keeps its position.
    pub fn push(&mut self, sheet: SheetStream) {
        let name = sheet.name().to_string();
        if self.sheets.insert(name.clone(), sheet).is_none() {
            self.name_order.push(name);
        }
    }

    /// Source label (usually a file name)
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Source path, for file-backed books
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sheet names in iteration order
    pub fn sheet_names(&self) -> &[String] {
        &self.name_order
    }

    /// Number of sheets
    pub fn number_of_sheets(&self) -> usize {
        self.name_order.len()
    }

    /// Whether the book has no sheets
    pub fn is_empty(&self) -> bool {
        self.name_order.is_empty()
    }

    /// Sheet at position `index`, or `None` when out of range
    pub fn sheet_at(&self, index: usize) -> Option<&SheetStream> {
        self.name_order
            .get(index)
            .and_then(|name| self.sheets.get(name))
    }

    /// Mutable sheet at position `index`, or `None` when out of range
    pub fn sheet_at_mut(&mut self, index: usize) -> Option<&mut SheetStream> {
        let name = self.name_order.get(index)?;
        self.sheets.get_mut(name)
    }

    /// Sheet by name
    pub fn sheet(&self, name: &str) -> Option<&SheetStream> {
        self.sheets.get(name)
    }

    /// Mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut SheetStream> {
        self.sheets.get_mut(name)
    }

    /// Consume the book, keeping only the sheet at `index`
    pub fn into_sheet_at(mut self, index: usize) -> Option<SheetStream> {
        let name = self.name_order.get(index)?;
        self.sheets.remove(name)
    }

    /// Consume the book, keeping only the named sheet
    pub fn into_sheet(mut self, name: &str) -> Option<SheetStream> {
        self.sheets.remove(name)
    }

    /// Drain every sheet into `(name, rows)` pairs in sheet order
    ///
    /// This is the one place where laziness is given up; it consumes the book.
    pub fn to_dict(self) -> Result<Vec<(String, Vec<Row>)>> {
        self.into_iter()
            .map(|mut sheet| {
                let rows = sheet.collect_rows()?;
                let (name, _, _) = sheet.into_parts();
                Ok((name, rows))
            })
            .collect()
    }
}

impl From<BTreeMap<String, Vec<Row>>> for BookStream {
    fn from(sheets: BTreeMap<String, Vec<Row>>) -> Self {
        Self::from_ordered(sheets)
    }
}

impl From<HashMap<String, Vec<Row>>> for BookStream {
    fn from(sheets: HashMap<String, Vec<Row>>) -> Self {
        Self::from_unordered(sheets)
    }
}

impl From<SheetStream> for BookStream {
    fn from(sheet: SheetStream) -> Self {
        Self::from_sheets([sheet])
    }
}

impl FromIterator<SheetStream> for BookStream {
    fn from_iter<I: IntoIterator<Item = SheetStream>>(iter: I) -> Self {
        Self::from_sheets(iter)
    }
}

impl IntoIterator for BookStream {
    type Item = SheetStream;
    type IntoIter = IntoSheets;

    fn into_iter(self) -> Self::IntoIter {
        IntoSheets {
            sheets: self.sheets,
            order: self.name_order.into_iter(),
        }
    }
}

/// Owning iterator over a book's sheets, in sheet order
#[derive(Debug)]
pub struct IntoSheets {
    sheets: HashMap<String, SheetStream>,
    order: std::vec::IntoIter<String>,
}

impl Iterator for IntoSheets {
    type Item = SheetStream;

    fn next(&mut self) -> Option<Self::Item> {
        for name in self.order.by_ref() {
            if let Some(sheet) = self.sheets.remove(&name) {
                return Some(sheet);
            }
        }
        None
    }
}
