//! `(context, key)` resolution and display fallbacks.

use std::sync::Arc;

use cfdstudy_core::error::CatalogError;
use cfdstudy_core::model::Catalog;
use tracing::debug;

use crate::format::{format, try_format};

/// The translation template for `(context, key)`.
///
/// Both parts must match exactly once surrounding whitespace is trimmed.
/// Returns `None` when the context or key is
/// absent, or when the message has no `<translation>` element. Callers decide
/// the display fallback, usually the raw key.
pub fn resolve<'c>(catalog: &'c Catalog, context: &str, key: &str) -> Option<&'c str> {
    catalog.lookup(context, key)?.translation.as_deref()
}

/// Locale catalog with an optional default-locale fallback.
#[derive(Debug, Clone)]
pub struct Translator {
    primary: Arc<Catalog>,
    fallback: Option<Arc<Catalog>>,
}

impl Translator {
    pub fn new(primary: Arc<Catalog>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<Catalog>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Template from the primary catalog, else from the fallback.
    pub fn template(&self, context: &str, key: &str) -> Option<&str> {
        resolve(&self.primary, context, key).or_else(|| {
            self.fallback
                .as_deref()
                .and_then(|catalog| resolve(catalog, context, key))
        })
    }

    /// Formatted text, or the raw key when no catalog has it.
    pub fn tr<S: AsRef<str>>(&self, context: &str, key: &str, args: &[S]) -> String {
        match self.template(context, key) {
            Some(template) => format(template, args),
            None => {
                debug!("no translation for {context}/{key}");
                key.to_string()
            }
        }
    }

    /// Like [`Translator::tr`], but a placeholder without an argument is an error.
    pub fn try_tr<S: AsRef<str>>(
        &self,
        context: &str,
        key: &str,
        args: &[S],
    ) -> Result<String, CatalogError> {
        match self.template(context, key) {
            Some(template) => try_format(template, args),
            None => Ok(key.to_string()),
        }
    }
}
