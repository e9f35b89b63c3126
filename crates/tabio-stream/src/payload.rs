//! Row payloads.
//!
//! A [`Payload`] is the forward-only row sequence carried by a sheet. It is
//! either eager (backed by an owned `Vec`) or lazy (backed by any boxed
//! iterator, typically a codec reading from a file). Both variants are fused:
//! once exhausted they keep returning `None`.

use std::fmt;
use std::iter::Fuse;

use crate::error::Result;
use crate::value::Row;

type LazyRows = Fuse<Box<dyn Iterator<Item = Result<Row>> + Send>>;

/// Forward-only, single-pass sequence of rows
pub enum Payload {
    /// Rows already held in memory
    Eager(std::vec::IntoIter<Row>),
    /// Rows produced on demand
    Lazy(LazyRows),
}

impl Payload {
    /// Create an eager payload from owned rows
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::Eager(rows.into_iter())
    }

    /// Create a lazy payload from a fallible row iterator
    pub fn lazy<I>(rows: I) -> Self
    where
        I: Iterator<Item = Result<Row>> + Send + 'static,
    {
        let boxed: Box<dyn Iterator<Item = Result<Row>> + Send> = Box::new(rows);
        Self::Lazy(boxed.fuse())
    }

    /// Create a lazy payload from an infallible row iterator
    pub fn generate<I>(rows: I) -> Self
    where
        I: Iterator<Item = Row> + Send + 'static,
    {
        Self::lazy(rows.map(Ok))
    }

    /// Whether the rows are already materialized
    pub fn is_eager(&self) -> bool {
        matches!(self, Self::Eager(_))
    }

    /// Apply row/column pagination without draining the payload
    pub fn window(self, window: Window) -> Self {
        if window.is_unbounded() {
            return self;
        }
        match self {
            Self::Eager(rows) => {
                let limit = window.row_limit.unwrap_or(usize::MAX);
                Self::from_rows(
                    rows.skip(window.skip_rows)
                        .take(limit)
                        .map(|row| window.slice_columns(row))
                        .collect(),
                )
            }
            lazy @ Self::Lazy(_) => Self::lazy(Windowed::new(lazy, window)),
        }
    }
}

impl Iterator for Payload {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Eager(rows) => rows.next().map(Ok),
            Self::Lazy(rows) => rows.next(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(rows) => f
                .debug_struct("Payload::Eager")
                .field("remaining", &rows.len())
                .finish(),
            Self::Lazy(_) => f.write_str("Payload::Lazy"),
        }
    }
}

impl From<Vec<Row>> for Payload {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}

/// Row and column pagination applied while reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// Rows to skip from the top
    pub skip_rows: usize,
    /// Maximum number of rows to yield after skipping
    pub row_limit: Option<usize>,
    /// Columns to skip from the left of every row
    pub skip_columns: usize,
    /// Maximum number of columns to keep per row
    pub column_limit: Option<usize>,
}

impl Window {
    /// Check whether the window passes every row through unchanged
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    fn slice_columns(&self, row: Row) -> Row {
        if self.skip_columns == 0 && self.column_limit.is_none() {
            return row;
        }
        row.into_iter()
            .skip(self.skip_columns)
            .take(self.column_limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Lazy pagination; row errors are passed through, never skipped
struct Windowed<I> {
    inner: I,
    window: Window,
    skipped: usize,
    taken: usize,
}

impl<I> Windowed<I> {
    fn new(inner: I, window: Window) -> Self {
        Self {
            inner,
            window,
            skipped: 0,
            taken: 0,
        }
    }
}

impl<I> Iterator for Windowed<I>
where
    I: Iterator<Item = Result<Row>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(limit) = self.window.row_limit {
                if self.taken >= limit {
                    return None;
                }
            }
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(_) if self.skipped < self.window.skip_rows => {
                    self.skipped += 1;
                }
                Ok(row) => {
                    self.taken += 1;
                    return Some(Ok(self.window.slice_columns(row)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::row;

    fn drain(payload: Payload) -> Vec<Row> {
        payload.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_eager_and_lazy_yield_same_rows() {
        let rows = vec![row![1, 2], row![3, 4]];
        let eager = Payload::from_rows(rows.clone());
        let lazy = Payload::generate(rows.clone().into_iter());

        assert!(eager.is_eager());
        assert!(!lazy.is_eager());
        assert_eq!(drain(eager), rows);
        assert_eq!(drain(lazy), rows);
    }

    #[test]
    fn test_exhausted_payload_stays_empty() {
        let mut payload = Payload::generate(vec![row![1]].into_iter());
        assert!(payload.next().is_some());
        assert!(payload.next().is_none());
        assert!(payload.next().is_none());
    }

    #[test]
    fn test_window_rows_and_columns() {
        let rows = vec![row![1, 2, 3], row![4, 5, 6], row![7, 8, 9], row![10, 11, 12]];
        let window = Window {
            skip_rows: 1,
            row_limit: Some(2),
            skip_columns: 1,
            column_limit: Some(1),
        };

        let eager = Payload::from_rows(rows.clone()).window(window);
        assert_eq!(drain(eager), vec![row![5], row![8]]);

        let lazy = Payload::generate(rows.into_iter()).window(window);
        assert!(!lazy.is_eager());
        assert_eq!(drain(lazy), vec![row![5], row![8]]);
    }

    #[test]
    fn test_window_propagates_errors_while_skipping() {
        let items: Vec<Result<Row>> = vec![
            Err(StreamError::Decode("bad".to_string())),
            Ok(row![1]),
        ];
        let mut payload = Payload::lazy(items.into_iter()).window(Window {
            skip_rows: 1,
            ..Default::default()
        });

        assert!(matches!(payload.next(), Some(Err(StreamError::Decode(_)))));
        assert!(payload.next().is_none());
    }

    #[test]
    fn test_unbounded_window_is_noop() {
        let payload = Payload::from_rows(vec![row![1]]).window(Window::default());
        assert!(payload.is_eager());
        assert_eq!(drain(payload), vec![row![1]]);
    }
}
