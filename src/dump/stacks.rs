// src/dump/stacks.rs

//! Item and fluid registry written next to the dump
//!
//! Maps every slug used in recipes to the game's own identifiers. The filter
//! step needs the unlocalized item name (to join against the oredict) and
//! the fluid name.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry entry for an item slug
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub reg_name: String,
    /// Unlocalized name, e.g. `item.ingotIron` or `gt.metaitem.01.11305`
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub nbt: Option<serde_json::Value>,
}

/// Registry entry for a fluid slug
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FluidInfo {
    pub fluid_name: String,
    #[serde(default)]
    pub unlocalized_name: String,
    #[serde(default)]
    pub id: i64,
}

/// Contents of the stacks file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackRegistry {
    #[serde(default)]
    pub items: HashMap<String, ItemInfo>,
    #[serde(default)]
    pub fluids: HashMap<String, FluidInfo>,
}

impl StackRegistry {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        Self::from_slice(&fs::read(path)?)
    }
}
