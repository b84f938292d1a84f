pub mod curve;
pub mod fight;
pub mod sample;
pub mod talents;

use std::path::Path;

use ef_core::Catalog;
use ef_mechanics::{EngineConfig, TalentCatalog};

/// Load a catalog file, or the built-in sample when none is given.
fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    match path {
        Some(path) => Catalog::from_json_file(path)
            .map_err(|e| format!("cannot load catalog {}: {e}", path.display())),
        None => Ok(sample::catalog()),
    }
}

/// Load an engine config file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    match path {
        Some(path) => EngineConfig::from_json_file(path)
            .map_err(|e| format!("cannot load config {}: {e}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Index the catalog's talent trees.
fn talent_catalog(catalog: &Catalog) -> TalentCatalog {
    TalentCatalog::new(catalog.talents.iter().cloned())
}
