// src/filter/config.rs

//! Filter configuration types

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How an ingredient list is matched against alias patterns
///
/// Patterns are regular expressions that must match a whole alias,
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngredientListFilter {
    /// Some stack has an alias matching some pattern
    AnyMatchAny { oredict: Vec<String> },
    /// Every stack has an alias matching at least one pattern
    AllMatchAny { oredict: Vec<String> },
    /// For every pattern, exactly `num_matches[i]` stacks match it
    ExactlyMatch {
        oredict: Vec<String>,
        /// Number of matching stacks, not their amounts
        #[serde(alias = "numMatches")]
        num_matches: Vec<usize>,
    },
}

impl IngredientListFilter {
    /// The alias patterns this filter uses
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::AnyMatchAny { oredict }
            | Self::AllMatchAny { oredict }
            | Self::ExactlyMatch { oredict, .. } => oredict,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AnyMatchAny { .. } => "any_match_any",
            Self::AllMatchAny { .. } => "all_match_any",
            Self::ExactlyMatch { .. } => "exactly_match",
        }
    }
}

/// A recipe exclusion rule
///
/// The rule matches a recipe when its input filter matches the inputs or its
/// output filter matches the outputs. `machines`, when given, limits the
/// rule to recipes made by one of those machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    #[serde(default)]
    pub machines: Option<Vec<String>>,
    #[serde(default)]
    pub inputs: Option<IngredientListFilter>,
    #[serde(default)]
    pub outputs: Option<IngredientListFilter>,
}

impl RecipeFilter {
    fn sides(&self) -> impl Iterator<Item = &IngredientListFilter> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// Which handlers to keep and which recipes to exclude
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Handler overlay identifiers to keep
    #[serde(default, alias = "handlerNames")]
    pub handler_names: Vec<String>,
    /// Keep every handler belonging to one of these mods
    #[serde(default, alias = "handlerMods")]
    pub handler_mods: Vec<String>,
    /// Handler identifiers to drop even if selected above
    #[serde(default, alias = "excludeHandlerNames")]
    pub exclude_handler_names: Vec<String>,
    #[serde(default, alias = "excludeRecipes")]
    pub exclude_recipes: Vec<RecipeFilter>,
}

impl FilterConfig {
    /// Every distinct alias pattern used by the exclusion rules, in first-use order
    pub fn patterns(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.exclude_recipes
            .iter()
            .flat_map(RecipeFilter::sides)
            .flat_map(|f| f.patterns())
            .map(String::as_str)
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Check the rules for mistakes that would otherwise only show up as
    /// silently wrong filtering
    pub fn validate(&self) -> Result<()> {
        if self.handler_names.is_empty() && self.handler_mods.is_empty() {
            warn!("Filter config selects no handlers; every recipe will be rejected");
        }

        for (i, rule) in self.exclude_recipes.iter().enumerate() {
            if rule.inputs.is_none() && rule.outputs.is_none() && rule.machines.is_none() {
                warn!("Exclusion rule #{} has no conditions and never matches", i);
            }

            for side in rule.sides() {
                if let IngredientListFilter::ExactlyMatch {
                    oredict,
                    num_matches,
                } = side
                {
                    if oredict.len() != num_matches.len() {
                        return Err(Error::InvalidConfig(format!(
                            "exclusion rule #{}: exactly_match has {} patterns but {} counts",
                            i,
                            oredict.len(),
                            num_matches.len()
                        )));
                    }
                }
                for pattern in side.patterns() {
                    compile_pattern(pattern).map_err(|e| {
                        Error::InvalidConfig(format!(
                            "exclusion rule #{}: bad {} pattern '{}': {}",
                            i,
                            side.kind_name(),
                            pattern,
                            e
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Compile an alias pattern so it only matches whole aliases
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})$", pattern))?)
}
