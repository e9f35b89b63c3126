//! Adapter capability descriptors.
//!
//! A [`Capability`] states which targets and actions an adapter serves and
//! which request kinds it accepts. The registry keys adapters by
//! `(target, action)` and filters them by request kind.

use std::fmt;

use tabio_codecs::Action;

/// What a request is ultimately after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Raw input: file, memory, or URL bytes decoded by a codec
    Input,
    /// One sheet
    Sheet,
    /// A whole book
    Book,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Sheet => f.write_str("sheet"),
            Self::Book => f.write_str("book"),
        }
    }
}

/// Targets consulted, in order, when reading a sheet
pub const SHEET_READ_ORDER: [Target; 2] = [Target::Input, Target::Sheet];

/// Targets consulted, in order, when reading a book
pub const BOOK_READ_ORDER: [Target; 2] = [Target::Input, Target::Book];

/// Tag of a [`Source`](crate::Source) or [`Destination`](crate::Destination)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    File,
    Content,
    Stream,
    Url,
    Records,
    Columns,
    Array,
    BookDict,
    Table,
    Tables,
}

impl SourceKind {
    /// Whether the kind carries encoded bytes that need a codec
    pub fn is_file_backed(&self) -> bool {
        matches!(self, Self::File | Self::Content | Self::Stream | Self::Url)
    }

    /// Lower-case name used in descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Content => "content",
            Self::Stream => "stream",
            Self::Url => "url",
            Self::Records => "records",
            Self::Columns => "columns",
            Self::Array => "array",
            Self::BookDict => "bookdict",
            Self::Table => "table",
            Self::Tables => "tables",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared capability of an adapter
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    /// Targets the adapter serves
    pub targets: &'static [Target],
    /// Actions the adapter implements
    pub actions: &'static [Action],
    /// Request kinds the adapter accepts
    pub kinds: &'static [SourceKind],
    /// Free-form attributes (file types, plugin names) for diagnostics
    pub attributes: &'static [&'static str],
}

impl Capability {
    /// Whether the adapter accepts a request of `kind`
    pub fn accepts(&self, kind: SourceKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// `(target, action)` keys this capability registers under
    pub fn keys(&self) -> impl Iterator<Item = (Target, Action)> + '_ {
        self.targets
            .iter()
            .flat_map(move |target| self.actions.iter().map(move |action| (*target, *action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: Capability = Capability {
        targets: &[Target::Sheet, Target::Book],
        actions: &[Action::Write],
        kinds: &[SourceKind::File],
        attributes: &[],
    };

    #[test]
    fn test_keys() {
        let keys: Vec<_> = CAP.keys().collect();
        assert_eq!(
            keys,
            vec![(Target::Sheet, Action::Write), (Target::Book, Action::Write)]
        );
    }

    #[test]
    fn test_accepts() {
        assert!(CAP.accepts(SourceKind::File));
        assert!(!CAP.accepts(SourceKind::Content));
    }

    #[test]
    fn test_read_order_puts_input_first() {
        assert_eq!(SHEET_READ_ORDER[0], Target::Input);
        assert_eq!(BOOK_READ_ORDER, [Target::Input, Target::Book]);
    }
}
