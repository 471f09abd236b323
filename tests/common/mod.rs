// tests/common/mod.rs

//! Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use nerd_converter::DataLayout;
use std::fs;
use tempfile::TempDir;

/// A small dump covering both recipe variants.
///
/// - Two furnace entries with the same ingredients: their outputs accumulate
/// - A crafting recipe with a repeated ingredient and an empty slot
/// - A macerator recipe with a 50% byproduct and a fluid input, listed
///   under both queries: collapses to one
pub const DUMP: &str = r#"{
    "version": "2.1.4",
    "queries": [
        {
            "query_item": "i10d0",
            "handlers": [
                {"id": "smelting", "name": "Furnace", "tab_name": "Furnace", "recipes": [
                    {"generic": {"ingredients": ["i20d0"], "otherStacks": [], "outItem": {"itemSlug": "i10d0", "count": 1}}},
                    {"generic": {"ingredients": ["i20d0"], "otherStacks": [], "outItem": {"itemSlug": "i30d0", "count": 1}}}
                ]},
                {"id": "crafting", "name": "Shaped", "tab_name": "Shaped Crafting", "recipes": [
                    {"generic": {"ingredients": ["i10d0", "i10d0", null, "i40d0"], "otherStacks": [], "outItem": {"itemSlug": "i50d0", "count": 1}}}
                ]},
                {"id": "gt.recipe.macerator", "name": "Macerator", "tab_name": "Macerator", "recipes": [
                    {"greg_data": {
                        "mInputs": [{"itemSlug": "i60d0", "count": 1}],
                        "mOutputs": [{"itemSlug": "i20d0", "count": 2}, {"itemSlug": "i70d0", "count": 1}],
                        "mFluidInputs": [{"fluidSlug": "f1", "amount": 100}],
                        "mFluidOutputs": [],
                        "mChances": [10000, 5000],
                        "mDuration": 400,
                        "mEUt": 2,
                        "mSpecialValue": 0,
                        "mEnabled": true
                    }}
                ]}
            ]
        },
        {
            "query_item": "i20d0",
            "handlers": [
                {"id": "gt.recipe.macerator", "name": "Macerator", "tab_name": "Macerator", "recipes": [
                    {"greg_data": {
                        "mInputs": [{"itemSlug": "i60d0", "count": 1}],
                        "mOutputs": [{"itemSlug": "i20d0", "count": 2}, {"itemSlug": "i70d0", "count": 1}],
                        "mFluidInputs": [{"fluidSlug": "f1", "amount": 100}],
                        "mFluidOutputs": [],
                        "mChances": [10000, 5000],
                        "mDuration": 400,
                        "mEUt": 2,
                        "mSpecialValue": 0,
                        "mEnabled": true
                    }}
                ]}
            ]
        }
    ]
}"#;

/// Registry for every slug used by [`DUMP`] except `i70d0`
///
/// Slag and the sword have no oredict entry.
pub const STACKS: &str = r#"{
    "items": {
        "i10d0": {"id": 10, "regName": "minecraft:iron_ingot", "name": "item.ingotIron", "displayName": "Iron Ingot", "nbt": null},
        "i20d0": {"id": 20, "regName": "gregtech:dust", "name": "gt.metaitem.01.2032", "displayName": "Iron Dust", "nbt": null},
        "i30d0": {"id": 30, "regName": "minecraft:slag", "name": "item.slag", "displayName": "Slag", "nbt": null},
        "i40d0": {"id": 40, "regName": "minecraft:stick", "name": "item.stick", "displayName": "Stick", "nbt": null},
        "i50d0": {"id": 50, "regName": "minecraft:iron_sword", "name": "item.swordIron", "displayName": "Iron Sword", "nbt": null},
        "i60d0": {"id": 60, "regName": "minecraft:iron_ore", "name": "tile.oreIron", "displayName": "Iron Ore", "nbt": null}
    },
    "fluids": {
        "f1": {"fluidName": "water", "unlocalizedName": "fluid.tile.water", "luminosity": 0, "density": 1000,
               "temperature": 295, "viscosity": 1000, "isGaseous": false, "rarity": "common", "id": 1}
    }
}"#;

pub const OREDICT: &str = "ItemStack,Ore Name,Wildcard
1xitem.ingotIron@0,ingotIron,False
1xgt.metaitem.01@0,dustIron,False
1xtile.oreIron@32767,oreIron,True
1xitem.stick@0,stickWood,False
";

pub const HANDLERS: &str = "Overlay Identifier,Mod DisplayName,Handler Recipe Name
smelting,Minecraft,Furnace
crafting,Minecraft,Shaped Crafting
gt.recipe.macerator,GregTech,Macerator
gt.recipe.fakeAssembly,GregTech,Assembly Line
";

/// A data/output directory pair with every input written.
///
/// Keep the returned TempDir alive for the duration of the test.
pub fn setup_data_dir() -> (TempDir, DataLayout) {
    let temp_dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(temp_dir.path().join("data"), temp_dir.path().join("output"));
    fs::create_dir_all(&layout.data_dir).unwrap();
    fs::create_dir_all(&layout.output_dir).unwrap();

    fs::write(layout.dump(), DUMP).unwrap();
    fs::write(layout.stacks(), STACKS).unwrap();
    fs::write(layout.oredict(), OREDICT).unwrap();
    fs::write(layout.handlers(), HANDLERS).unwrap();

    (temp_dir, layout)
}
