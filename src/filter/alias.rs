// src/filter/alias.rs

//! Slug to alias (oredict name) lookup
//!
//! Recipes only know stacks by slug, e.g. `i4521d3` for item id 4521 with
//! damage 3. The oredict table is keyed by the game's item stack notation,
//! `1x<unlocalized name>@<damage>`. The stack registry bridges the two.
//!
//! Rows flagged as wildcard apply to every damage value of an item. When an
//! item has both exact and wildcard entries, the exact ones win.

use crate::dump::stacks::StackRegistry;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One row of the oredict table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OredictRow {
    /// Stack notation, `1x<name>@<damage>`
    #[serde(rename = "ItemStack")]
    pub item_stack: String,
    #[serde(rename = "Ore Name")]
    pub ore_name: String,
    #[serde(rename = "Wildcard", deserialize_with = "deserialize_flag")]
    pub wildcard: bool,
}

/// Accept `true`/`True`/`TRUE`/`1` style booleans as written by spreadsheet tools
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid wildcard flag '{}'",
            other
        ))),
    }
}

/// Read the oredict table
pub fn load_oredict(path: &Path) -> Result<Vec<OredictRow>> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<OredictRow>, _>>()?;
    debug!("Read {} oredict rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Drop a trailing `.<digits>` some mods append to unlocalized names
fn strip_damage_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => name,
    }
}

/// Damage part of an item slug: everything after the first `d`
fn slug_damage(slug: &str) -> Option<&str> {
    slug.split_once('d').map(|(_, damage)| damage)
}

/// Map from stack slug to the aliases it is known by
///
/// A slug that is present with no aliases is known but unaliased; a slug
/// that is absent could not be resolved at all.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the stack registry with the oredict table
    ///
    /// Every registry item gets an entry. Fluids are aliased by their fluid
    /// name since the oredict doesn't cover them.
    pub fn build(registry: &StackRegistry, oredict: &[OredictRow]) -> Self {
        let mut exact: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut wildcard: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in oredict {
            if row.wildcard {
                let base = row
                    .item_stack
                    .rsplit_once('@')
                    .map_or(row.item_stack.as_str(), |(base, _)| base);
                wildcard.entry(base).or_default().push(row.ore_name.as_str());
            } else {
                exact.entry(row.item_stack.as_str()).or_default().push(row.ore_name.as_str());
            }
        }

        let mut table = Self::new();
        for (slug, item) in &registry.items {
            let base = format!("1x{}", strip_damage_suffix(&item.name));
            let exact_aliases = slug_damage(slug)
                .and_then(|damage| exact.get(format!("{}@{}", base, damage).as_str()));

            let aliases = match exact_aliases {
                Some(names) if !names.is_empty() => names.as_slice(),
                _ => wildcard.get(base.as_str()).map_or(&[][..], Vec::as_slice),
            };
            table.insert(slug.clone(), aliases.iter().map(|s| s.to_string()).collect());
        }

        for (slug, fluid) in &registry.fluids {
            table.insert(slug.clone(), vec![fluid.fluid_name.clone()]);
        }

        debug!(
            "Alias table: {} slugs from {} items, {} fluids",
            table.len(),
            registry.items.len(),
            registry.fluids.len()
        );
        table
    }

    pub fn insert(&mut self, slug: impl Into<String>, aliases: Vec<String>) {
        self.aliases.insert(slug.into(), aliases);
    }

    /// Aliases of a slug, or `None` if the slug is unknown
    pub fn resolve(&self, slug: &str) -> Option<&[String]> {
        self.aliases.get(slug).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            aliases: iter.into_iter().collect(),
        }
    }
}
