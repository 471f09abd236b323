// src/recipe/slot.rs

//! Slot normalization
//!
//! Dumped recipes describe their ingredients as "slots" in one of three
//! shapes: a bare item slug, an item with a count, or a fluid with an amount.
//! Slots may also be `null` when the recipe UI leaves a position empty.
//! Normalization turns each present slot into a [`Stack`], scaling the
//! quantity by an optional drop chance.

use crate::error::{Error, Result};
use crate::stack::{group_and_sum, Amount, Stack, StackKind};
use serde::{Deserialize, Serialize};

/// Chance values in machine recipes are expressed in units of 1/10000
pub const CHANCE_SCALE: f64 = 10000.0;

/// An item with a count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSlot {
    #[serde(rename = "itemSlug", alias = "slug")]
    pub slug: String,
    pub count: i64,
    #[serde(rename = "NBT", alias = "nbt", default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<serde_json::Value>,
}

/// A fluid with an amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSlot {
    #[serde(rename = "fluidSlug", alias = "slug")]
    pub slug: String,
    pub amount: i64,
    #[serde(rename = "NBT", alias = "nbt", default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<serde_json::Value>,
}

/// One raw recipe slot as found in the dump
///
/// Variants are tried in order; anything that fits none of the recognized
/// shapes lands in `Unrecognized` and is rejected at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSlot {
    Slug(String),
    Item(ItemSlot),
    Fluid(FluidSlot),
    Unrecognized(serde_json::Value),
}

impl RawSlot {
    pub fn item(slug: impl Into<String>, count: i64) -> Self {
        Self::Item(ItemSlot {
            slug: slug.into(),
            count,
            nbt: None,
        })
    }

    pub fn fluid(slug: impl Into<String>, amount: i64) -> Self {
        Self::Fluid(FluidSlot {
            slug: slug.into(),
            amount,
            nbt: None,
        })
    }
}

/// Convert a chance in [`CHANCE_SCALE`] units into a multiplier
pub fn chance_fraction(chance: i64) -> f64 {
    chance as f64 / CHANCE_SCALE
}

/// Normalize one slot into a stack
///
/// The quantity is multiplied by `chance_fraction`; whole results stay whole
/// and anything else is kept as an expected (fractional) amount.
pub fn normalize(slot: &RawSlot, chance_fraction: f64) -> Result<Stack> {
    let (kind, slug, quantity) = match slot {
        RawSlot::Slug(slug) => (StackKind::Item, slug.as_str(), 1),
        RawSlot::Item(item) => (StackKind::Item, item.slug.as_str(), item.count),
        RawSlot::Fluid(fluid) => (StackKind::Fluid, fluid.slug.as_str(), fluid.amount),
        RawSlot::Unrecognized(value) => return Err(Error::InvalidSlot(value.to_string())),
    };

    Ok(Stack::new(
        kind,
        slug,
        Amount::new(quantity as f64 * chance_fraction),
    ))
}

/// Whether a slot occupies its position at all
fn is_present(slot: &Option<RawSlot>) -> Option<&RawSlot> {
    match slot {
        Some(RawSlot::Slug(slug)) if slug.is_empty() => None,
        Some(slot) => Some(slot),
        None => None,
    }
}

/// Normalize every present slot, dropping empty positions and non-positive
/// quantities
pub fn normalize_slots(slots: &[Option<RawSlot>]) -> Result<Vec<Stack>> {
    let mut stacks = Vec::with_capacity(slots.len());
    for slot in slots.iter().filter_map(is_present) {
        let stack = normalize(slot, 1.0)?;
        if stack.amount.is_positive() {
            stacks.push(stack);
        }
    }
    Ok(stacks)
}

/// Like [`normalize_slots`], scaling slot `i` by `chances[i]`
///
/// An empty chance list means every slot is guaranteed. Otherwise slots past
/// the end of the chance list are dropped.
pub fn normalize_slots_with_chances(
    slots: &[Option<RawSlot>],
    chances: &[i64],
) -> Result<Vec<Stack>> {
    if chances.is_empty() {
        return normalize_slots(slots);
    }

    let mut stacks = Vec::with_capacity(slots.len().min(chances.len()));
    for (slot, &chance) in slots.iter().zip(chances) {
        let Some(slot) = is_present(slot) else {
            continue;
        };
        let fraction = chance_fraction(chance);
        let stack = normalize(slot, fraction)?;
        if stack.amount.is_positive() {
            stacks.push(stack);
        }
    }
    Ok(stacks)
}

/// Normalize and group a list of slots
pub fn stacks_from_slots(slots: &[Option<RawSlot>]) -> Result<Vec<Stack>> {
    normalize_slots(slots).map(group_and_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawSlot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_slot_shapes() {
        assert_eq!(parse(r#""i123d0""#), RawSlot::Slug("i123d0".to_string()));
        assert_eq!(
            parse(r#"{"itemSlug": "i5d2", "count": 3}"#),
            RawSlot::item("i5d2", 3)
        );
        assert_eq!(
            parse(r#"{"fluidSlug": "f9", "amount": 144}"#),
            RawSlot::fluid("f9", 144)
        );
        assert_eq!(parse(r#"{"slug": "i5d2", "count": 3}"#), RawSlot::item("i5d2", 3));
        assert_eq!(parse(r#"{"slug": "f9", "amount": 144}"#), RawSlot::fluid("f9", 144));
        assert!(matches!(parse(r#"{"what": 1}"#), RawSlot::Unrecognized(_)));
        assert!(matches!(parse("42"), RawSlot::Unrecognized(_)));
    }

    #[test]
    fn test_parse_slot_with_nbt() {
        let slot = parse(r#"{"itemSlug": "i1d0", "count": 1, "NBT": {"Damage": 3}}"#);
        match slot {
            RawSlot::Item(item) => assert!(item.nbt.is_some()),
            other => panic!("expected item slot, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_shapes() {
        let stack = normalize(&RawSlot::Slug("i1d0".to_string()), 1.0).unwrap();
        assert_eq!(stack.kind, StackKind::Item);
        assert_eq!(stack.amount, Amount::from(1));

        let stack = normalize(&RawSlot::fluid("water", 1000), 1.0).unwrap();
        assert_eq!(stack.kind, StackKind::Fluid);
        assert_eq!(stack.amount, Amount::from(1000));
    }

    #[test]
    fn test_normalize_rejects_unrecognized() {
        let slot = RawSlot::Unrecognized(serde_json::json!({"bogus": true}));
        assert!(matches!(normalize(&slot, 1.0), Err(Error::InvalidSlot(_))));
    }

    #[test]
    fn test_chance_scaling() {
        let slot = RawSlot::item("dust", 2);

        let half = normalize(&slot, chance_fraction(5000)).unwrap();
        assert_eq!(half.amount, Amount::from(1));
        assert!(half.amount.is_whole());

        let full = normalize(&slot, chance_fraction(10000)).unwrap();
        assert_eq!(full.amount, Amount::from(2));

        let quarter = normalize(&RawSlot::item("dust", 1), chance_fraction(2500)).unwrap();
        assert_eq!(quarter.amount, Amount::new(0.25));
    }

    #[test]
    fn test_null_and_empty_slots_skipped() {
        let slots = vec![
            None,
            Some(RawSlot::item("ore", 1)),
            Some(RawSlot::Slug(String::new())),
            None,
            Some(RawSlot::item("ore", 2)),
        ];
        let stacks = stacks_from_slots(&slots).unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].amount, Amount::from(3));
    }

    #[test]
    fn test_non_positive_quantities_dropped() {
        let slots = vec![
            Some(RawSlot::item("ghost", 0)),
            Some(RawSlot::fluid("void", -5)),
            Some(RawSlot::item("real", 1)),
        ];
        let stacks = normalize_slots(&slots).unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].slug, "real");
    }

    #[test]
    fn test_chances_align_with_positions() {
        let slots = vec![
            Some(RawSlot::item("main", 1)),
            None,
            Some(RawSlot::item("byproduct", 4)),
            Some(RawSlot::item("extra", 1)),
        ];
        let stacks = normalize_slots_with_chances(&slots, &[10000, 10000, 2500]).unwrap();

        // The last slot has no chance entry and is dropped
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].amount, Amount::from(1));
        assert_eq!(stacks[1].slug, "byproduct");
        assert_eq!(stacks[1].amount, Amount::from(1));
    }

    #[test]
    fn test_short_chance_list_truncates_outputs() {
        let slots = vec![Some(RawSlot::item("dust", 1)), Some(RawSlot::item("extra", 3))];

        let stacks = normalize_slots_with_chances(&slots, &[5000]).unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].slug, "dust");
        assert_eq!(stacks[0].amount, Amount::new(0.5));

        // No chances at all: every slot at full quantity
        let stacks = normalize_slots_with_chances(&slots, &[]).unwrap();
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[1].amount, Amount::from(3));
    }

    #[test]
    fn test_zero_chance_output_dropped() {
        let slots = vec![Some(RawSlot::item("never", 1))];
        let stacks = normalize_slots_with_chances(&slots, &[0]).unwrap();
        assert!(stacks.is_empty());
    }
}
