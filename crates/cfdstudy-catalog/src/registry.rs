//! Published catalogs.
//!
//! A [`Registry`] holds the current catalog behind an `Arc`. Readers take a
//! snapshot and keep using it; a reload builds the new catalog completely and
//! then swaps the pointer, so a reader sees either the old or the new catalog
//! and never a partial one.

use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use cfdstudy_core::error::CatalogError;
use cfdstudy_core::model::Catalog;
use tracing::{info, warn};

use crate::format::format;
use crate::lookup::resolve;
use crate::parse::{load_file_with, LoadOptions};

/// Single-writer, many-reader holder of the current catalog.
#[derive(Debug, Default)]
pub struct Registry {
    current: RwLock<Arc<Catalog>>,
}

impl Registry {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog published at the time of the call.
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Publish `catalog`, returning the one it replaces.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        self.swap(Arc::new(catalog))
    }

    fn swap(&self, next: Arc<Catalog>) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Load `path` and publish it. On failure the current catalog stays.
    pub fn reload_file(
        &self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<Arc<Catalog>, CatalogError> {
        let path = path.as_ref();
        match load_file_with(path, options) {
            Ok(catalog) => {
                let next = Arc::new(catalog);
                self.swap(Arc::clone(&next));
                info!("reloaded catalog from {}", path.display());
                Ok(next)
            }
            Err(e) => {
                warn!("reload of {} failed, keeping current catalog: {e}", path.display());
                Err(e)
            }
        }
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, created empty on first use.
pub fn global_registry() -> &'static Registry {
    GLOBAL.get_or_init(Registry::default)
}

/// Publish `catalog` process-wide.
pub fn install(catalog: Catalog) {
    global_registry().replace(catalog);
}

/// The process-wide catalog, `None` until [`install`] or [`global_registry`] is first called.
pub fn global() -> Option<Arc<Catalog>> {
    GLOBAL.get().map(Registry::snapshot)
}

/// Formatted text from the process-wide catalog, or the raw key.
pub fn tr<S: AsRef<str>>(context: &str, key: &str, args: &[S]) -> String {
    let Some(catalog) = global() else {
        return key.to_string();
    };
    match resolve(&catalog, context, key) {
        Some(template) => format(template, args),
        None => key.to_string(),
    }
}
