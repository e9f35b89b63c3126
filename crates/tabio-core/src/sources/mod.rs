//! Built-in source adapters.
//!
//! | Adapter | Request kinds | Targets |
//! |---|---|---|
//! | [`FileSource`] / [`FileSink`] | file | input read / sheet, book write |
//! | [`MemorySource`] / [`MemorySink`] | content, stream | input read / sheet, book write |
//! | [`UrlSource`] | url | input read (feature `http`) |
//! | [`NativeSource`] | records, columns, array / bookdict | sheet / book |
//! | [`TableSource`] / [`TablesSource`] | table / tables | sheet / book |

use std::sync::Arc;

pub mod database;
pub mod file;
pub mod memory;
pub mod native;
#[cfg(feature = "http")]
pub mod url;

pub use database::{TableSource, TablesSource};
pub use file::{FileSink, FileSource};
pub use memory::{MemorySink, MemorySource};
pub use native::NativeSource;
#[cfg(feature = "http")]
pub use url::UrlSource;

use crate::adapter::SourceAdapter;
use crate::registry::SourceRegistry;

/// The built-in adapters, in registration order
pub fn builtin_sources() -> Vec<Arc<dyn SourceAdapter>> {
    let mut sources: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(FileSource),
        Arc::new(FileSink),
        Arc::new(MemorySource),
        Arc::new(MemorySink),
    ];

    #[cfg(feature = "http")]
    sources.push(Arc::new(UrlSource));

    sources.extend([
        Arc::new(NativeSource::RECORDS) as Arc<dyn SourceAdapter>,
        Arc::new(NativeSource::COLUMNS),
        Arc::new(NativeSource::ARRAY),
        Arc::new(NativeSource::BOOK_DICT),
        Arc::new(TableSource),
        Arc::new(TablesSource),
    ]);
    sources
}

/// Register the built-in adapters
pub fn register_builtin_sources(registry: &mut SourceRegistry) {
    for source in builtin_sources() {
        // Built-in capabilities are never empty
        if let Err(err) = registry.register(source) {
            log::warn!("Skipped built-in source: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Target;
    use tabio_codecs::Action;

    #[test]
    fn test_every_target_has_adapters() {
        let registry = SourceRegistry::builtin();
        assert!(!registry.adapters(Target::Input, Action::Read).is_empty());
        assert!(!registry.adapters(Target::Sheet, Action::Read).is_empty());
        assert!(!registry.adapters(Target::Sheet, Action::Write).is_empty());
        assert!(!registry.adapters(Target::Book, Action::Read).is_empty());
        assert!(!registry.adapters(Target::Book, Action::Write).is_empty());
        assert!(registry.adapters(Target::Input, Action::Write).is_empty());
    }

    #[test]
    fn test_file_adapters_registered_first() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.adapters(Target::Input, Action::Read)[0].name(), "file");
        assert_eq!(registry.adapters(Target::Book, Action::Write)[0].name(), "file");
    }
}
