// src/recipe/aggregate.rs

//! Turning dumped recipe entries into a de-duplicated recipe set
//!
//! Machine recipes are complete on their own and go straight into the set.
//! Generic recipes are not: a handler may emit the same ingredients once per
//! output, so their outputs are collected per `(ingredients, machine)` and
//! only turned into recipes by [`RecipeAggregator::finish`].

use crate::dump::format::{DumpedRecipe, GenericRecipe, HandlerDump, MachineRecipe, RecipeData};
use crate::error::Result;
use crate::recipe::format::{Recipe, RecipeMeta, RecipeSet};
use crate::recipe::slot::{
    normalize_slots, normalize_slots_with_chances, stacks_from_slots, RawSlot,
};
use crate::stack::{group_and_sum, Stack};
use std::collections::HashMap;
use tracing::debug;

/// Outputs accumulated for one generic `(ingredients, machine)` pair
#[derive(Debug)]
struct GenericEntry {
    ingredients: Vec<Option<RawSlot>>,
    machine: String,
    outputs: Vec<Stack>,
}

/// Accumulates dumped recipes into a [`RecipeSet`]
#[derive(Debug, Default)]
pub struct RecipeAggregator {
    recipes: RecipeSet,
    generic: Vec<GenericEntry>,
    /// Canonical `(ingredients JSON, machine)` -> index into `generic`
    generic_index: HashMap<(String, String), usize>,
    processed: u64,
}

impl RecipeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dumped recipe entries consumed so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Consume every recipe of a handler
    pub fn add_handler(&mut self, handler: &HandlerDump) -> Result<()> {
        for (index, recipe) in handler.recipes.iter().enumerate() {
            self.add_recipe(&handler.tab_name, index, recipe)?;
        }
        Ok(())
    }

    /// Consume one dumped recipe produced by `machine`
    ///
    /// `index` is the entry's position within its handler, used to locate
    /// malformed entries.
    pub fn add_recipe(&mut self, machine: &str, index: usize, recipe: &DumpedRecipe) -> Result<()> {
        match recipe.data(machine, index)? {
            RecipeData::Generic(generic) => self.add_generic(machine, generic)?,
            RecipeData::Machine(data) => self.add_machine(machine, data)?,
        }
        self.processed += 1;
        Ok(())
    }

    fn add_machine(&mut self, machine: &str, data: &MachineRecipe) -> Result<()> {
        let mut inputs = normalize_slots(&data.inputs)?;
        inputs.extend(normalize_slots(&data.fluid_inputs)?);

        let mut outputs = normalize_slots_with_chances(&data.outputs, &data.chances)?;
        outputs.extend(normalize_slots(&data.fluid_outputs)?);

        let recipe = Recipe::new(group_and_sum(inputs), group_and_sum(outputs), machine)
            .with_meta(RecipeMeta {
                power: data.power,
                duration: data.duration,
            });
        self.recipes.insert(recipe);
        Ok(())
    }

    fn add_generic(&mut self, machine: &str, generic: &GenericRecipe) -> Result<()> {
        // An explicit output is the whole output list. Without one, the handler most
        // likely lists its outputs among the "other" stacks.
        let outputs = match &generic.out_item {
            Some(_) => normalize_slots(std::slice::from_ref(&generic.out_item))?,
            None => stacks_from_slots(&generic.other_stacks)?,
        };

        let ingredients_key = serde_json::to_string(&generic.ingredients)?;
        let key = (ingredients_key, machine.to_string());
        match self.generic_index.get(&key) {
            Some(&i) => self.generic[i].outputs.extend(outputs),
            None => {
                self.generic_index.insert(key, self.generic.len());
                self.generic.push(GenericEntry {
                    ingredients: generic.ingredients.clone(),
                    machine: machine.to_string(),
                    outputs,
                });
            }
        }
        Ok(())
    }

    /// Fold the accumulated generic recipes in and return the final set
    pub fn finish(mut self) -> Result<RecipeSet> {
        debug!(
            "Folding {} generic recipe groups into {} machine recipes",
            self.generic.len(),
            self.recipes.len()
        );

        for entry in self.generic {
            let inputs = stacks_from_slots(&entry.ingredients)?;
            let outputs = group_and_sum(entry.outputs);
            self.recipes.insert(Recipe::new(inputs, outputs, entry.machine));
        }
        Ok(self.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::stack::{Amount, StackKind};

    fn generic(ingredients: Vec<RawSlot>, out_item: Option<RawSlot>) -> DumpedRecipe {
        DumpedRecipe {
            generic: Some(GenericRecipe {
                ingredients: ingredients.into_iter().map(Some).collect(),
                other_stacks: Vec::new(),
                out_item,
            }),
            machine: None,
        }
    }

    fn machine(inputs: Vec<RawSlot>, outputs: Vec<RawSlot>, chances: Vec<i64>) -> DumpedRecipe {
        DumpedRecipe {
            generic: None,
            machine: Some(MachineRecipe {
                inputs: inputs.into_iter().map(Some).collect(),
                outputs: outputs.into_iter().map(Some).collect(),
                chances,
                power: 2,
                duration: 400,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_identical_entries_collapse() {
        let entry = machine(
            vec![RawSlot::item("ore", 1)],
            vec![RawSlot::item("dust", 2)],
            vec![],
        );

        let mut agg = RecipeAggregator::new();
        agg.add_recipe("Macerator", 0, &entry).unwrap();
        agg.add_recipe("Macerator", 1, &entry).unwrap();
        assert_eq!(agg.processed(), 2);

        let set = agg.finish().unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_machine_recipe_groups_and_scales() {
        let mut data = MachineRecipe {
            inputs: vec![Some(RawSlot::item("ore", 1)), None, Some(RawSlot::item("ore", 1))],
            outputs: vec![
                Some(RawSlot::item("dust", 2)),
                Some(RawSlot::item("tiny_dust", 2)),
            ],
            fluid_inputs: vec![Some(RawSlot::fluid("water", 100))],
            fluid_outputs: vec![None],
            chances: vec![10000, 5000],
            power: 2,
            duration: 400,
        };
        data.fluid_outputs.push(Some(RawSlot::fluid("sludge", 10)));
        let entry = DumpedRecipe {
            generic: None,
            machine: Some(data),
        };

        let mut agg = RecipeAggregator::new();
        agg.add_recipe("Macerator", 0, &entry).unwrap();
        let recipes = agg.finish().unwrap().into_vec();

        let recipe = &recipes[0];
        assert_eq!(recipe.inputs.len(), 2);
        assert_eq!(recipe.inputs[0].amount, Amount::from(2));
        assert_eq!(recipe.inputs[1].kind, StackKind::Fluid);
        assert_eq!(recipe.outputs.len(), 3);
        assert_eq!(recipe.outputs[0].amount, Amount::from(2));
        assert_eq!(recipe.outputs[1].amount, Amount::from(1));
        assert_eq!(recipe.outputs[2].slug, "sludge");
        assert_eq!(
            recipe.meta,
            Some(RecipeMeta {
                power: 2,
                duration: 400
            })
        );
    }

    #[test]
    fn test_generic_outputs_accumulate_per_ingredients_and_machine() {
        let ingredients = vec![RawSlot::item("log", 1)];

        let mut agg = RecipeAggregator::new();
        agg.add_recipe("Sawmill", 0, &generic(ingredients.clone(), Some(RawSlot::item("plank", 4))))
            .unwrap();
        agg.add_recipe("Sawmill", 1, &generic(ingredients.clone(), Some(RawSlot::item("sawdust", 1))))
            .unwrap();
        agg.add_recipe("Sawmill", 2, &generic(ingredients.clone(), Some(RawSlot::item("plank", 2))))
            .unwrap();
        // Same ingredients, different machine: a separate recipe
        agg.add_recipe("Crafting", 0, &generic(ingredients, Some(RawSlot::item("plank", 4))))
            .unwrap();

        let recipes = agg.finish().unwrap().into_vec();
        assert_eq!(recipes.len(), 2);

        let sawmill = &recipes[0];
        assert_eq!(sawmill.machine, "Sawmill");
        assert_eq!(sawmill.meta, None);
        assert_eq!(sawmill.outputs.len(), 2);
        assert_eq!(sawmill.outputs[0].slug, "plank");
        assert_eq!(sawmill.outputs[0].amount, Amount::from(6));
        assert_eq!(sawmill.outputs[1].slug, "sawdust");

        assert_eq!(recipes[1].machine, "Crafting");
        assert_eq!(recipes[1].outputs[0].amount, Amount::from(4));
    }

    #[test]
    fn test_generic_without_out_item_uses_other_stacks() {
        let entry = DumpedRecipe {
            generic: Some(GenericRecipe {
                ingredients: vec![Some(RawSlot::Slug("seed".to_string()))],
                other_stacks: vec![
                    Some(RawSlot::item("wheat", 1)),
                    Some(RawSlot::item("wheat", 1)),
                    None,
                ],
                out_item: None,
            }),
            machine: None,
        };

        let mut agg = RecipeAggregator::new();
        agg.add_recipe("Farm", 0, &entry).unwrap();
        let recipes = agg.finish().unwrap().into_vec();

        assert_eq!(recipes[0].inputs[0].slug, "seed");
        assert_eq!(recipes[0].outputs.len(), 1);
        assert_eq!(recipes[0].outputs[0].amount, Amount::from(2));
    }

    #[test]
    fn test_out_item_not_grouped_with_other_stacks() {
        let entry = DumpedRecipe {
            generic: Some(GenericRecipe {
                ingredients: vec![Some(RawSlot::item("coal", 1))],
                other_stacks: vec![Some(RawSlot::item("fuel", 1))],
                out_item: Some(RawSlot::item("torch", 4)),
            }),
            machine: None,
        };

        let mut agg = RecipeAggregator::new();
        agg.add_recipe("Crafting", 0, &entry).unwrap();
        let recipes = agg.finish().unwrap().into_vec();
        assert_eq!(recipes[0].outputs.len(), 1);
        assert_eq!(recipes[0].outputs[0].slug, "torch");
    }

    #[test]
    fn test_empty_out_item_yields_no_outputs() {
        let mut agg = RecipeAggregator::new();
        for (i, out_item) in [RawSlot::item("ghost", 0), RawSlot::Slug(String::new())]
            .into_iter()
            .enumerate()
        {
            let entry = DumpedRecipe {
                generic: Some(GenericRecipe {
                    ingredients: vec![Some(RawSlot::item("coal", i as i64 + 1))],
                    other_stacks: vec![Some(RawSlot::item("fuel", 1))],
                    out_item: Some(out_item),
                }),
                machine: None,
            };
            agg.add_recipe("Crafting", i, &entry).unwrap();
        }

        let recipes = agg.finish().unwrap().into_vec();
        assert_eq!(recipes.len(), 2);
        // The "other" stacks are not used as a fallback either
        assert!(recipes.iter().all(|r| r.outputs.is_empty()));
    }

    #[test]
    fn test_malformed_entry_is_fatal() {
        let mut agg = RecipeAggregator::new();
        let err = agg
            .add_recipe("Furnace", 3, &DumpedRecipe::default())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecipe { index: 3, .. }));
        assert_eq!(agg.processed(), 0);
    }

    #[test]
    fn test_invalid_slot_is_fatal() {
        let entry = machine(
            vec![RawSlot::Unrecognized(serde_json::json!([1, 2]))],
            vec![RawSlot::item("dust", 1)],
            vec![],
        );
        let mut agg = RecipeAggregator::new();
        assert!(matches!(
            agg.add_recipe("Macerator", 0, &entry),
            Err(Error::InvalidSlot(_))
        ));
    }
}
