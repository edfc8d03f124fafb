//! CLI subcommands. Each returns the text to print so it can be tested directly.

mod check;
mod show;


pub use check::{check, diff, Outcome};
pub use show::{dump, lookup};

use std::path::Path;

use anyhow::Context as _;
use cfdstudy_catalog::{bundled, load_file_with, Catalog, LoadOptions};
use cfdstudy_core::config::Config;

/// Where a catalog comes from.
pub enum Source<'a> {
    File(&'a Path),
    /// A locale listed under `[catalog.locales]`.
    Locale(&'a str),
    /// The default locale's file, or the bundled English catalog if none is configured.
    Default,
}

/// Load a catalog. Relative configured paths resolve against `base`.
pub fn open(source: Source<'_>, cfg: &Config, base: &Path) -> anyhow::Result<Catalog> {
    let options = LoadOptions::from(&cfg.catalog);
    let path = match source {
        Source::File(path) => path.to_path_buf(),
        Source::Locale(locale) => cfg
            .catalog
            .locale_path(locale, base)
            .with_context(|| format!("no catalog configured for locale '{locale}'"))?,
        Source::Default => match cfg.catalog.locale_path(&cfg.catalog.default_locale, base) {
            Some(path) => path,
            None => return Ok(bundled::english()?),
        },
    };
    load_file_with(&path, &options).with_context(|| format!("failed to load {}", path.display()))
}
