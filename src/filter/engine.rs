// src/filter/engine.rs

//! Recipe filter engine
//!
//! A recipe is kept when its machine is allowed and no exclusion rule
//! matches it. Alias patterns are matched once per known slug up front, so
//! evaluating a rule is a lookup per stack rather than a regex run.

use crate::error::Result;
use crate::filter::alias::AliasTable;
use crate::filter::config::{FilterConfig, IngredientListFilter, RecipeFilter};
use crate::progress::ProgressTracker;
use crate::recipe::format::Recipe;
use crate::stack::Stack;
use regex::RegexSet;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Counters collected during one filter pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub total: usize,
    pub kept: usize,
    /// Rejected because their machine is not allowed
    pub rejected_machine: usize,
    /// Rejected by an exclusion rule
    pub rejected_rule: usize,
    /// Rule evaluations that hit a slug missing from the alias table
    pub missing_slug_lookups: usize,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept {}/{} recipes ({} disallowed machine, {} excluded by rule, {} missing slug lookups)",
            self.kept, self.total, self.rejected_machine, self.rejected_rule, self.missing_slug_lookups
        )
    }
}

/// Outcome for a single recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    DisallowedMachine,
    /// Index of the first exclusion rule that matched
    Excluded(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListPolicy {
    AnyMatchAny,
    AllMatchAny,
    ExactlyMatch,
}

/// An ingredient list filter with patterns resolved to indices
#[derive(Debug)]
struct ListRule {
    policy: ListPolicy,
    patterns: Vec<usize>,
    /// Expected match count per pattern, for `ExactlyMatch`
    counts: Vec<usize>,
}

#[derive(Debug)]
struct Rule {
    machines: Option<HashSet<String>>,
    inputs: Option<ListRule>,
    outputs: Option<ListRule>,
}

/// Compiled filter configuration
#[derive(Debug)]
pub struct FilterEngine {
    allowed_machines: HashSet<String>,
    rules: Vec<Rule>,
    /// For every known slug, whether any of its aliases matches pattern `i`
    slug_matches: HashMap<String, Vec<bool>>,
}

impl FilterEngine {
    /// Compile the exclusion rules and precompute alias matches
    pub fn new(
        config: &FilterConfig,
        allowed_machines: HashSet<String>,
        aliases: &AliasTable,
    ) -> Result<Self> {
        config.validate()?;

        let patterns = config.patterns();
        let index: HashMap<&str, usize> = patterns.iter().enumerate().map(|(i, p)| (*p, i)).collect();
        let set = RegexSet::new(patterns.iter().map(|p| format!("^(?:{})$", p)))?;

        let slug_matches = aliases
            .iter()
            .map(|(slug, names)| {
                let mut row = vec![false; patterns.len()];
                for name in names {
                    for i in set.matches(name).iter() {
                        row[i] = true;
                    }
                }
                (slug.to_string(), row)
            })
            .collect::<HashMap<_, _>>();

        let rules = config
            .exclude_recipes
            .iter()
            .map(|rule| compile_rule(rule, &index))
            .collect();

        debug!(
            "Filter engine: {} rules, {} patterns, {} slugs, {} allowed machines",
            config.exclude_recipes.len(),
            patterns.len(),
            slug_matches.len(),
            allowed_machines.len()
        );

        Ok(Self {
            allowed_machines,
            rules,
            slug_matches,
        })
    }

    /// Decide whether a recipe is kept, counting missing slug lookups
    pub fn evaluate(&self, recipe: &Recipe, report: &mut FilterReport) -> Verdict {
        if !self.allowed_machines.contains(&recipe.machine) {
            return Verdict::DisallowedMachine;
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if self.rule_matches(rule, recipe, report) {
                return Verdict::Excluded(i);
            }
        }
        Verdict::Keep
    }

    /// Run every recipe through the filter, keeping the survivors in order
    pub fn filter(
        &self,
        recipes: Vec<Recipe>,
        progress: &dyn ProgressTracker,
    ) -> (Vec<Recipe>, FilterReport) {
        let mut report = FilterReport {
            total: recipes.len(),
            ..Default::default()
        };
        progress.set_length(recipes.len() as u64);

        let mut kept = Vec::new();
        for recipe in recipes {
            match self.evaluate(&recipe, &mut report) {
                Verdict::Keep => kept.push(recipe),
                Verdict::DisallowedMachine => report.rejected_machine += 1,
                Verdict::Excluded(_) => report.rejected_rule += 1,
            }
            progress.increment(1);
        }

        report.kept = kept.len();
        (kept, report)
    }

    fn rule_matches(&self, rule: &Rule, recipe: &Recipe, report: &mut FilterReport) -> bool {
        if let Some(machines) = &rule.machines {
            if !machines.contains(&recipe.machine) {
                return false;
            }
        }

        match (&rule.inputs, &rule.outputs) {
            (None, None) => rule.machines.is_some(),
            (inputs, outputs) => {
                inputs
                    .as_ref()
                    .is_some_and(|list| self.list_matches(list, &recipe.inputs, report))
                    || outputs
                        .as_ref()
                        .is_some_and(|list| self.list_matches(list, &recipe.outputs, report))
            }
        }
    }

    fn list_matches(&self, list: &ListRule, stacks: &[Stack], report: &mut FilterReport) -> bool {
        let mut rows = Vec::with_capacity(stacks.len());
        for stack in stacks {
            match self.slug_matches.get(&stack.slug) {
                Some(row) => rows.push(row),
                None => {
                    debug!("No alias entry for slug {}", stack.slug);
                    report.missing_slug_lookups += 1;
                    return false;
                }
            }
        }

        match list.policy {
            ListPolicy::AnyMatchAny => rows
                .iter()
                .any(|row| list.patterns.iter().any(|&p| row[p])),
            ListPolicy::AllMatchAny => rows
                .iter()
                .all(|row| list.patterns.iter().any(|&p| row[p])),
            ListPolicy::ExactlyMatch => list.patterns.iter().zip(&list.counts).all(|(&p, &count)| {
                rows.iter().filter(|row| row[p]).count() == count
            }),
        }
    }
}

fn compile_rule(rule: &RecipeFilter, index: &HashMap<&str, usize>) -> Rule {
    let compile_list = |filter: &IngredientListFilter| -> ListRule {
        let patterns = filter
            .patterns()
            .iter()
            .filter_map(|p| index.get(p.as_str()).copied())
            .collect();
        let (policy, counts) = match filter {
            IngredientListFilter::AnyMatchAny { .. } => (ListPolicy::AnyMatchAny, Vec::new()),
            IngredientListFilter::AllMatchAny { .. } => (ListPolicy::AllMatchAny, Vec::new()),
            IngredientListFilter::ExactlyMatch { num_matches, .. } => {
                (ListPolicy::ExactlyMatch, num_matches.clone())
            }
        };
        ListRule {
            policy,
            patterns,
            counts,
        }
    };

    Rule {
        machines: rule
            .machines
            .as_ref()
            .map(|machines| machines.iter().cloned().collect()),
        inputs: rule.inputs.as_ref().map(compile_list),
        outputs: rule.outputs.as_ref().map(compile_list),
    }
}
