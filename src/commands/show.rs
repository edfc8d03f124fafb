//! `lookup` and `dump`.

use std::sync::Arc;

use cfdstudy_catalog::{to_ts_string, Catalog, Translator};
use cfdstudy_core::config::MissingArgumentPolicy;
use tracing::warn;

/// Formatted text for `(context, key)`; the raw key when nothing matches.
pub fn lookup(
    primary: Arc<Catalog>,
    fallback: Option<Arc<Catalog>>,
    context: &str,
    key: &str,
    args: &[String],
    policy: MissingArgumentPolicy,
) -> anyhow::Result<String> {
    let mut translator = Translator::new(primary);
    if let Some(fallback) = fallback {
        translator = translator.with_fallback(fallback);
    }
    if translator.template(context, key).is_none() {
        warn!("{context}/{key} not found, showing the key");
    }
    let text = match policy {
        MissingArgumentPolicy::Keep => translator.tr(context, key, args),
        MissingArgumentPolicy::Error => translator.try_tr(context, key, args)?,
    };
    Ok(text)
}

/// The catalog as TS markup or pretty JSON.
pub fn dump(catalog: &Catalog, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(catalog)?))
    } else {
        Ok(to_ts_string(catalog))
    }
}
