//! UniFFI bindings for recipe-engine
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! Everything here is synchronous; the engine itself does no I/O.

use std::fmt;

use crate::ingredient::{self, ParsedIngredientLine, ScaledQuantity};
use crate::model::{Recipe, Section};
use crate::EngineError;

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible canonical recipe
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub name: String,
    pub serves: u32,
    /// Flat ingredient lines
    pub ingredients: Vec<String>,
    pub instructions: String,
    /// Sub-recipes (empty when the recipe is not sectioned)
    pub sections: Vec<FfiSection>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub total_time: Option<u32>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSection {
    pub id: String,
    pub label: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl From<Section> for FfiSection {
    fn from(section: Section) -> Self {
        FfiSection {
            id: section.id,
            label: section.label,
            ingredients: section.ingredients,
            instructions: section.instructions,
        }
    }
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            name: recipe.name,
            serves: recipe.serves,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            sections: recipe
                .sections
                .unwrap_or_default()
                .into_iter()
                .map(FfiSection::from)
                .collect(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            tags: recipe.tags,
            allergens: recipe.allergens,
            notes: recipe.notes,
        }
    }
}

/// FFI-compatible parsed ingredient line
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedIngredient {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

impl From<ParsedIngredientLine> for FfiParsedIngredient {
    fn from(line: ParsedIngredientLine) -> Self {
        FfiParsedIngredient {
            quantity: line.quantity,
            unit: line.unit,
            name: line.name,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiScaledQuantity {
    pub value: f64,
    pub display: String,
}

impl From<ScaledQuantity> for FfiScaledQuantity {
    fn from(scaled: ScaledQuantity) -> Self {
        FfiScaledQuantity {
            value: scaled.value,
            display: scaled.display,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiEngineError {
    /// The draft had nothing to normalize
    EmptyRecipe { message: String },
    /// The draft payload could not be read
    InvalidInput { message: String },
    /// Lookup dataset could not be loaded
    LookupError { message: String },
    /// Configuration or I/O error
    ConfigError { message: String },
}

impl fmt::Display for FfiEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiEngineError::EmptyRecipe { message } => write!(f, "Empty recipe: {}", message),
            FfiEngineError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiEngineError::LookupError { message } => write!(f, "Lookup error: {}", message),
            FfiEngineError::ConfigError { message } => write!(f, "Config error: {}", message),
        }
    }
}

impl std::error::Error for FfiEngineError {}

impl From<EngineError> for FfiEngineError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::EmptyRecipe => FfiEngineError::EmptyRecipe { message },
            EngineError::InvalidDraft(_) | EngineError::Json(_) => {
                FfiEngineError::InvalidInput { message }
            }
            EngineError::LookupFetch(_)
            | EngineError::LookupStatus(_)
            | EngineError::InvalidLookup(_) => FfiEngineError::LookupError { message },
            EngineError::Io(_) | EngineError::ConfigError(_) => {
                FfiEngineError::ConfigError { message }
            }
        }
    }
}

/// Normalize a JSON recipe draft into the canonical recipe
///
/// # Arguments
/// * `json` - The draft as produced by the AI/OCR step
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn normalize_recipe_json(json: String) -> Result<FfiRecipe, FfiEngineError> {
    let value: serde_json::Value = serde_json::from_str(&json).map_err(EngineError::from)?;
    let recipe = crate::normalizer::Normalizer::default().normalize_producer_json(&value)?;
    Ok(recipe.into())
}

/// Split an ingredient line into quantity, unit and name
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_ingredient(line: String) -> FfiParsedIngredient {
    ingredient::parse(&line).into()
}

/// Multiply a quantity and format the result for display
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scale_quantity(quantity: f64, factor: f64) -> FfiScaledQuantity {
    ingredient::scale(quantity, factor).into()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
