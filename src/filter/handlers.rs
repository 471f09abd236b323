// src/filter/handlers.rs

//! Handler table and the machines it allows

use crate::error::{Error, Result};
use crate::filter::config::FilterConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One row of the handler table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandlerRow {
    #[serde(rename = "Overlay Identifier")]
    pub overlay_identifier: String,
    #[serde(rename = "Mod DisplayName")]
    pub mod_name: String,
    /// Name recipes of this handler carry as their machine
    #[serde(rename = "Handler Recipe Name")]
    pub recipe_name: String,
}

/// Read the handler table
pub fn load_handlers(path: &Path) -> Result<Vec<HandlerRow>> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<HandlerRow>, _>>()?;
    debug!("Read {} handler rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Machine names whose recipes are kept
///
/// A handler is selected by identifier or by mod, and dropped again if its
/// identifier is explicitly excluded.
pub fn allowed_machines(config: &FilterConfig, handlers: &[HandlerRow]) -> HashSet<String> {
    let names: HashSet<&str> = config.handler_names.iter().map(String::as_str).collect();
    let mods: HashSet<&str> = config.handler_mods.iter().map(String::as_str).collect();
    let excluded: HashSet<&str> = config
        .exclude_handler_names
        .iter()
        .map(String::as_str)
        .collect();

    handlers
        .iter()
        .filter(|h| {
            let id = h.overlay_identifier.as_str();
            (names.contains(id) || mods.contains(h.mod_name.as_str())) && !excluded.contains(id)
        })
        .map(|h| h.recipe_name.clone())
        .collect()
}
