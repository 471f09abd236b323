// src/dump/format.rs

//! Wire shapes of the recipe-inspector dump
//!
//! ```json
//! {
//!   "version": "1.4.2",
//!   "queries": [
//!     {
//!       "query_item": "i58d0",
//!       "handlers": [
//!         {"id": "crafting", "name": "Shaped", "tab_name": "Shaped Crafting",
//!          "recipes": [{"generic": {"ingredients": [...], "otherStacks": [], "outItem": ...}}]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Only the fields the converter needs are modelled; anything else the
//! dumper writes is ignored.

use crate::error::{Error, Result};
use crate::recipe::slot::RawSlot;
use serde::{Deserialize, Serialize};

/// A recipe from a handler without dedicated input/output fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericRecipe {
    #[serde(default)]
    pub ingredients: Vec<Option<RawSlot>>,
    #[serde(default)]
    pub other_stacks: Vec<Option<RawSlot>>,
    #[serde(default)]
    pub out_item: Option<RawSlot>,
}

/// A recipe with explicit typed inputs, outputs, chances and timing
///
/// Slot lists may contain `null` entries for UI positions left empty on
/// purpose (e.g. the fuel slot of a primitive furnace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineRecipe {
    #[serde(rename = "mInputs", alias = "inputs", default)]
    pub inputs: Vec<Option<RawSlot>>,
    #[serde(rename = "mOutputs", alias = "outputs", default)]
    pub outputs: Vec<Option<RawSlot>>,
    #[serde(rename = "mFluidInputs", alias = "fluidInputs", default)]
    pub fluid_inputs: Vec<Option<RawSlot>>,
    #[serde(rename = "mFluidOutputs", alias = "fluidOutputs", default)]
    pub fluid_outputs: Vec<Option<RawSlot>>,
    /// Drop chance per output slot, in 1/10000 units
    #[serde(rename = "mChances", alias = "chances", default)]
    pub chances: Vec<i64>,
    #[serde(rename = "mEUt", alias = "power", default)]
    pub power: i64,
    #[serde(rename = "mDuration", alias = "duration", default)]
    pub duration: i64,
}

/// One dumped recipe entry, carrying exactly one of the two variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpedRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<GenericRecipe>,
    #[serde(rename = "greg_data", alias = "machine", default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineRecipe>,
}

/// Borrowed view of the variant a dumped recipe carries
#[derive(Debug, Clone, Copy)]
pub enum RecipeData<'a> {
    Generic(&'a GenericRecipe),
    Machine(&'a MachineRecipe),
}

impl DumpedRecipe {
    /// Resolve which variant this entry carries
    ///
    /// Generic data wins if both are present. An entry with neither is
    /// malformed; `handler` and `index` locate it in the error.
    pub fn data(&self, handler: &str, index: usize) -> Result<RecipeData<'_>> {
        match (&self.generic, &self.machine) {
            (Some(generic), _) => Ok(RecipeData::Generic(generic)),
            (None, Some(machine)) => Ok(RecipeData::Machine(machine)),
            (None, None) => Err(Error::MalformedRecipe {
                handler: handler.to_string(),
                index,
            }),
        }
    }
}

/// All recipes a single handler produced for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerDump {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Display name of the crafting method; becomes the recipe's machine
    pub tab_name: String,
    #[serde(default)]
    pub recipes: Vec<DumpedRecipe>,
}

/// One element of the dump's `queries` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDump {
    #[serde(default)]
    pub handlers: Vec<HandlerDump>,
    #[serde(default)]
    pub query_item: Option<RawSlot>,
}

impl QueryDump {
    /// Number of recipe entries across all handlers
    pub fn recipe_count(&self) -> usize {
        self.handlers.iter().map(|h| h.recipes.len()).sum()
    }
}
