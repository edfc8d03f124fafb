//! Catalogs shipped with the CFDSTUDY module.

use cfdstudy_core::error::CatalogError;
use cfdstudy_core::model::Catalog;

/// English CFDSTUDY catalog source.
pub const CFDSTUDY_EN: &str = include_str!("../resources/CFDSTUDY_msg_en.ts");

/// Parse the bundled English catalog.
pub fn english() -> Result<Catalog, CatalogError> {
    crate::load(CFDSTUDY_EN)
}
