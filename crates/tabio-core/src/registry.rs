//! Source registry
//!
//! Keeps adapters in registration order under every `(target, action)` pair
//! their capability declares, and resolves a request to the first eligible
//! adapter.

use std::collections::HashMap;
use std::sync::Arc;

use tabio_codecs::{Action, Codecs};

use crate::adapter::SourceAdapter;
use crate::capability::Target;
use crate::error::{Result, TabioError};
use crate::request::RequestInfo;

/// Ordered adapter lists keyed by `(target, action)`
#[derive(Default, Clone)]
pub struct SourceRegistry {
    adapters: HashMap<(Target, Action), Vec<Arc<dyn SourceAdapter>>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in adapters
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::sources::register_builtin_sources(&mut registry);
        registry
    }

    /// Register an adapter under every `(target, action)` it declares
    ///
    /// Adapters registered earlier win over later ones for the same request.
    /// Duplicates are kept.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) -> Result<()> {
        let capability = *adapter.capability();
        let invalid = |message: &str| TabioError::InvalidCapability {
            adapter: adapter.name().to_string(),
            message: message.to_string(),
        };
        if capability.targets.is_empty() {
            return Err(invalid("no targets"));
        }
        if capability.actions.is_empty() {
            return Err(invalid("no actions"));
        }
        if capability.kinds.is_empty() {
            return Err(invalid("no request kinds"));
        }

        for key in capability.keys() {
            log::debug!(
                "Registered source '{}' for {} {}",
                adapter.name(),
                key.0,
                key.1
            );
            self.adapters.entry(key).or_default().push(Arc::clone(&adapter));
        }
        Ok(())
    }

    /// Adapters registered for `(target, action)`, in priority order
    pub fn adapters(&self, target: Target, action: Action) -> &[Arc<dyn SourceAdapter>] {
        self.adapters
            .get(&(target, action))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find the first adapter for `(target, action)` that accepts `info`
    ///
    /// Returns `Ok(None)` when no adapter accepts the request kind. When
    /// adapters accept the kind but all fail their eligibility check, the
    /// first failure is returned.
    pub fn resolve(
        &self,
        target: Target,
        action: Action,
        info: &RequestInfo<'_>,
        codecs: &Codecs,
    ) -> Result<Option<Arc<dyn SourceAdapter>>> {
        self.resolve_in_order(&[target], action, info, codecs)
    }

    /// Like [`resolve`](Self::resolve), consulting `targets` in order
    pub fn resolve_in_order(
        &self,
        targets: &[Target],
        action: Action,
        info: &RequestInfo<'_>,
        codecs: &Codecs,
    ) -> Result<Option<Arc<dyn SourceAdapter>>> {
        let mut rejection = None;
        for target in targets {
            for adapter in self.adapters(*target, action) {
                if !adapter.capability().accepts(info.kind) {
                    continue;
                }
                match adapter.check_eligible(info, action, codecs) {
                    Ok(()) => {
                        log::debug!(
                            "Resolved {} for {} {} to '{}'",
                            info,
                            target,
                            action,
                            adapter.name()
                        );
                        return Ok(Some(Arc::clone(adapter)));
                    }
                    Err(err) => {
                        log::debug!("Source '{}' rejected {}: {}", adapter.name(), info, err);
                        rejection.get_or_insert(err);
                    }
                }
            }
        }
        match rejection {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}
