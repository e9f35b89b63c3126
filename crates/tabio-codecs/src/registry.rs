//! Two-tier codec registry.
//!
//! Built-in codecs are registered directly. Soft codecs are registered by
//! token with a loader; the loader runs the first time the token is
//! requested and its outcome (factory or failure) is kept for every later
//! lookup.
//!
//! ```text
//! get(token)
//!   ├─ built-in tier hit ──────────────► factory
//!   ├─ soft tier hit ── ensure_loaded ─► factory | NoCodec
//!   └─ miss ───────────────────────────► NoCodec
//! ```

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::OnceCell;

use crate::error::{CodecError, Result};

/// Loads the factory of a soft codec
pub type SoftLoader<F> = fn() -> std::result::Result<F, String>;

struct SoftEntry<F> {
    plugin: &'static str,
    loader: SoftLoader<F>,
    loaded: OnceCell<std::result::Result<F, String>>,
}

impl<F: Copy> SoftEntry<F> {
    fn ensure_loaded(&self, token: &str) -> Result<F> {
        let outcome = self.loaded.get_or_init(|| {
            log::debug!("Loading soft plugin '{}' for '{}'", self.plugin, token);
            let outcome = (self.loader)();
            if let Err(reason) = &outcome {
                log::warn!("Soft plugin '{}' failed to load: {}", self.plugin, reason);
            }
            outcome
        });
        outcome.clone().map_err(|reason| CodecError::NoCodec {
            token: token.to_string(),
            reason,
        })
    }
}

/// Token → factory map with a built-in tier and a lazily loaded soft tier
pub struct CodecRegistry<F> {
    kind: &'static str,
    builtin: BTreeMap<String, F>,
    soft: BTreeMap<String, SoftEntry<F>>,
}

impl<F: Copy> CodecRegistry<F> {
    /// Create an empty registry; `kind` names it in log records
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            builtin: BTreeMap::new(),
            soft: BTreeMap::new(),
        }
    }

    /// Register a built-in codec for `token`
    ///
    /// Tokens are stored lower-cased. Registering a token twice replaces
    /// the earlier factory.
    pub fn register(&mut self, token: &str, factory: F) {
        let token = token.to_lowercase();
        if self.builtin.insert(token.clone(), factory).is_some() {
            log::warn!("Replaced {} for '{}'", self.kind, token);
        } else {
            log::debug!("Registered {} for '{}'", self.kind, token);
        }
    }

    /// Register a soft codec, loaded by `loader` on first request
    pub fn register_soft(&mut self, token: &str, plugin: &'static str, loader: SoftLoader<F>) {
        let token = token.to_lowercase();
        log::debug!(
            "Registered soft {} for '{}' (plugin '{}')",
            self.kind,
            token,
            plugin
        );
        self.soft.insert(
            token,
            SoftEntry {
                plugin,
                loader,
                loaded: OnceCell::new(),
            },
        );
    }

    /// Whether `token` is known to either tier
    pub fn contains(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.builtin.contains_key(&token) || self.soft.contains_key(&token)
    }

    /// Whether `token` is only known through a soft plugin
    pub fn is_soft(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        !self.builtin.contains_key(&token) && self.soft.contains_key(&token)
    }

    /// Whether a soft plugin for `token` has already been loaded successfully
    pub fn is_loaded(&self, token: &str) -> bool {
        self.soft
            .get(&token.to_lowercase())
            .and_then(|entry| entry.loaded.get())
            .is_some_and(|outcome| outcome.is_ok())
    }

    /// Name of the soft plugin that provides `token`
    pub fn soft_plugin(&self, token: &str) -> Option<&'static str> {
        self.soft.get(&token.to_lowercase()).map(|entry| entry.plugin)
    }

    /// All known tokens, built-in and soft, sorted and deduplicated
    pub fn tokens(&self) -> Vec<&str> {
        let tokens: BTreeSet<&str> = self
            .builtin
            .keys()
            .chain(self.soft.keys())
            .map(String::as_str)
            .collect();
        tokens.into_iter().collect()
    }

    /// Look up the factory for `token`, loading a soft plugin if needed
    pub fn get(&self, token: &str) -> Result<F> {
        let token = token.to_lowercase();
        if let Some(factory) = self.builtin.get(&token) {
            return Ok(*factory);
        }
        match self.soft.get(&token) {
            Some(entry) => entry.ensure_loaded(&token),
            None => Err(CodecError::NoCodec {
                reason: format!("no {} registered", self.kind),
                token,
            }),
        }
    }
}
