//! Recipe structure extraction and shopping list aggregation.
//!
//! The engine takes loosely structured recipe drafts (as produced by an
//! AI or OCR step), turns them into canonical recipes with optional
//! sub-recipe sections, and merges the scaled ingredients of many recipes
//! into one grouped shopping list.
//!
//! ```no_run
//! use recipe_engine::{normalize_str, aggregate, AggregationRequest};
//!
//! let recipe = normalize_str(r#"{"name": "Cake", "serves": 4, "ingredients": ["1 cup sugar"]}"#)?;
//! let entries = aggregate(&[AggregationRequest {
//!     recipe,
//!     target_servings: 8.0,
//!     menu_section: "Dessert".to_string(),
//! }]);
//! assert_eq!(entries[0].quantity, 2.0);
//! # Ok::<(), recipe_engine::EngineError>(())
//! ```

pub mod config;
pub mod error;
pub mod ingredient;
pub mod model;
pub mod normalizer;
pub mod sections;
pub mod shopping;
pub mod uniffi_bindings;

pub use config::{load_config, EngineConfig, LookupConfig, NormalizerLimits, ShoppingConfig};
pub use error::EngineError;
pub use ingredient::{
    format_quantity, parse, scale, scale_factor, ParsedIngredientLine, ScaledQuantity,
};
pub use model::{Instructions, RawRecipeDraft, RawSection, Recipe, Section};
pub use normalizer::{format_bullets, normalize, normalize_json, normalize_str, Normalizer};
pub use sections::{detect, is_section_header, Detection, SectionDetector, SectionStrategy};
pub use shopping::{
    aggregate, aggregate_menu, group, group_with, AggregationRequest, GroupBy, IngredientKey,
    LookupSource, LookupSourceFactory, LookupTable, Menu, MenuItem, MenuSection, RecipeRef,
    ShoppingAggregator, ShoppingGroups, ShoppingListEntry,
};
