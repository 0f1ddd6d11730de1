use thiserror::Error;

/// Errors surfaced by the recipe engine.
///
/// Only [`EngineError::EmptyRecipe`] comes out of the normalization rules
/// themselves; everything else happens at the I/O boundary (draft payloads,
/// lookup datasets, configuration).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The draft has no name, ingredients, instructions or sections
    #[error("Recipe draft is empty: no name, ingredients, instructions or sections")]
    EmptyRecipe,

    /// The draft payload is not a JSON object
    #[error("Invalid recipe draft: {0}")]
    InvalidDraft(String),

    /// Failed to fetch the category/supplier lookup dataset
    #[error("Failed to fetch lookup dataset: {0}")]
    LookupFetch(#[from] reqwest::Error),

    /// The lookup endpoint answered with a non-success status
    #[error("Lookup dataset request failed with status {0}")]
    LookupStatus(u16),

    /// The lookup dataset has an unexpected shape
    #[error("Invalid lookup dataset: {0}")]
    InvalidLookup(String),

    /// Failed to read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
