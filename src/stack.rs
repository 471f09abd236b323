// src/stack.rs

//! The canonical item/fluid quantity
//!
//! A [`Stack`] is identified by its kind and slug only; the amount is left
//! out of identity so stacks of the same thing can be summed. Amounts may be
//! fractional because machine outputs with a drop chance are stored as an
//! expected value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};

/// Whether a stack is a solid item or a fluid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Item,
    Fluid,
}

impl StackKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Fluid => "fluid",
        }
    }
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack quantity
///
/// Whole values are written as JSON integers, everything else as floats.
/// Equality and hashing use the bit pattern of the normalized value, which
/// makes the amount usable inside recipe identity keys.
#[derive(Debug, Clone, Copy)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Create an amount, folding `-0.0` into `0.0`
    pub fn new(value: f64) -> Self {
        Self(value + 0.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the amount is a whole number
    pub fn is_whole(self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }

    /// Whether the amount is a usable, strictly positive quantity
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    fn canonical_bits(self) -> u64 {
        (self.0 + 0.0).to_bits()
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::new(value as f64)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for Amount {}

impl Hash for Amount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() && self.0.abs() < i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Amount::new)
    }
}

/// Grouping key of a stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackKey {
    pub kind: StackKind,
    pub slug: String,
}

/// A typed quantity of an item or fluid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    #[serde(rename = "type")]
    pub kind: StackKind,
    pub slug: String,
    pub amount: Amount,
}

impl Stack {
    pub fn new(kind: StackKind, slug: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            kind,
            slug: slug.into(),
            amount: amount.into(),
        }
    }

    pub fn item(slug: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self::new(StackKind::Item, slug, amount)
    }

    pub fn fluid(slug: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self::new(StackKind::Fluid, slug, amount)
    }

    /// The `(kind, slug)` key stacks are grouped by
    pub fn key(&self) -> StackKey {
        StackKey {
            kind: self.kind,
            slug: self.slug.clone(),
        }
    }
}

// Identity deliberately ignores the amount.
impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.slug == other.slug
    }
}

impl Eq for Stack {}

impl Hash for Stack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.slug.hash(state);
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}:{}", self.amount, self.kind, self.slug)
    }
}

/// Sum stacks that share a `(kind, slug)` key
///
/// Emits one stack per key, in the order each key was first seen.
pub fn group_and_sum(stacks: Vec<Stack>) -> Vec<Stack> {
    if stacks.len() <= 1 {
        return stacks;
    }

    let mut index: HashMap<StackKey, usize> = HashMap::with_capacity(stacks.len());
    let mut grouped: Vec<Stack> = Vec::with_capacity(stacks.len());

    for stack in stacks {
        match index.get(&stack.key()) {
            Some(&i) => grouped[i].amount += stack.amount,
            None => {
                index.insert(stack.key(), grouped.len());
                grouped.push(stack);
            }
        }
    }

    grouped
}
