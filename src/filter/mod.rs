// src/filter/mod.rs

//! Recipe filtering
//!
//! Filtering narrows the preprocessed catalog down to the handlers a user
//! cares about and drops recipes matching exclusion rules. Rules match
//! stacks through their oredict aliases, e.g. "exclude any recipe whose
//! inputs are all `circuit.*`".

pub mod alias;
pub mod config;
pub mod engine;
pub mod handlers;

pub use alias::{load_oredict, AliasTable, OredictRow};
pub use config::{compile_pattern, FilterConfig, IngredientListFilter, RecipeFilter};
pub use engine::{FilterEngine, FilterReport, Verdict};
pub use handlers::{allowed_machines, load_handlers, HandlerRow};
