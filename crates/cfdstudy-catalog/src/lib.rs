//! # cfdstudy-catalog
//!
//! Loads Qt Linguist (`.ts`) message catalogs into the [`Catalog`] model,
//! resolves `(context, key)` pairs, substitutes `%1`..`%9` placeholders,
//! and publishes catalogs process-wide with whole-catalog swaps.
//!
//! ```
//! use cfdstudy_catalog::{format, load, resolve};
//!
//! let catalog = load(cfdstudy_catalog::bundled::CFDSTUDY_EN).unwrap();
//! let template = resolve(&catalog, "@default", "ENV_DLG_INVALID_DIRECTORY").unwrap();
//! assert_eq!(format(template, &["/tmp/x"]), "Directory /tmp/x does not exists!!! ");
//! assert!(resolve(&catalog, "@default", "NOT_A_REAL_KEY").is_none());
//! ```

pub mod bundled;
mod format;
mod lookup;
mod parse;
pub mod registry;
pub mod validate;
mod writer;

// Re-export public API — consumers use `cfdstudy_catalog::*` paths.
pub use cfdstudy_core::error::{CatalogError, FormatError};
pub use cfdstudy_core::model::{Catalog, Context, Header, Message, TranslationStatus};
pub use format::{format, format_with, placeholders, try_format};
pub use lookup::{resolve, Translator};
pub use parse::{load, load_file, load_file_with, load_with, LoadOptions};
pub use writer::{to_ts_string, write_ts};
