//! Cell values and rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single row: an ordered sequence of cell values
pub type Row = Vec<CellValue>;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    String(String),
}

impl CellValue {
    /// Check whether the cell carries no visible content
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Borrow the text of a string cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => {
                // Integral floats print without a trailing ".0"
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{:.0}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Build a [`Row`] from a list of values convertible into [`CellValue`]
///
/// ```
/// use tabio_stream::{row, CellValue};
///
/// let r = row![1, "a", 2.5];
/// assert_eq!(r[1], CellValue::from("a"));
/// ```
#[macro_export]
macro_rules! row {
    () => {
        ::std::vec::Vec::<$crate::CellValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::CellValue::from($value)),+]
    };
}
