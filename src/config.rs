use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level engine configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// Limits and defaults applied while normalizing drafts
    #[serde(default)]
    pub limits: NormalizerLimits,
    /// Defaults used when grouping shopping lists
    #[serde(default)]
    pub shopping: ShoppingConfig,
    /// Where to load the category/supplier lookup dataset from
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Field limits and fallback values for canonical recipes
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NormalizerLimits {
    /// Maximum length of a recipe name, in characters
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,
    /// Maximum number of flat ingredient lines
    #[serde(default = "default_max_ingredients")]
    pub max_ingredients: usize,
    /// Maximum number of tags
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    /// Maximum length of notes, in characters
    #[serde(default = "default_max_notes_chars")]
    pub max_notes_chars: usize,
    /// Serving count used when the draft has none or an invalid one
    #[serde(default = "default_serves")]
    pub default_serves: u32,
    /// Largest accepted serving count
    #[serde(default = "default_max_serves")]
    pub max_serves: u32,
    /// Name used when the draft has none
    #[serde(default = "default_name")]
    pub default_name: String,
}

impl Default for NormalizerLimits {
    fn default() -> Self {
        Self {
            max_name_chars: default_max_name_chars(),
            max_ingredients: default_max_ingredients(),
            max_tags: default_max_tags(),
            max_notes_chars: default_max_notes_chars(),
            default_serves: default_serves(),
            max_serves: default_max_serves(),
            default_name: default_name(),
        }
    }
}

/// Fallback group names for shopping lists
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ShoppingConfig {
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_supplier")]
    pub default_supplier: String,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            default_supplier: default_supplier(),
        }
    }
}

/// Source of the category/supplier lookup dataset.
///
/// `path` wins over `url` when both are set. With neither, grouping runs
/// against an empty table and every entry lands in the default group.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LookupConfig {
    /// JSON file on disk
    pub path: Option<String>,
    /// HTTP endpoint serving the same JSON
    pub url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            timeout_secs: default_timeout(),
        }
    }
}

// Default value functions
fn default_max_name_chars() -> usize {
    200
}

fn default_max_ingredients() -> usize {
    100
}

fn default_max_tags() -> usize {
    20
}

fn default_max_notes_chars() -> usize {
    1000
}

fn default_serves() -> u32 {
    4
}

fn default_max_serves() -> u32 {
    1000
}

fn default_name() -> String {
    "Untitled Recipe".to_string()
}

fn default_category() -> String {
    "other".to_string()
}

fn default_supplier() -> String {
    "Unknown Supplier".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl EngineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_ENGINE__ prefix
    /// 2. recipe-engine.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_ENGINE__LIMITS__MAX_TAGS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`EngineConfig::load`] for the source priority.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-engine").required(false))
        // Use double underscore for nested: RECIPE_ENGINE__LOOKUP__URL
        .add_source(
            Environment::with_prefix("RECIPE_ENGINE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let limits = NormalizerLimits::default();
        assert_eq!(limits.max_name_chars, 200);
        assert_eq!(limits.max_ingredients, 100);
        assert_eq!(limits.max_tags, 20);
        assert_eq!(limits.max_notes_chars, 1000);
        assert_eq!(limits.default_serves, 4);
        assert_eq!(limits.max_serves, 1000);
        assert_eq!(limits.default_name, "Untitled Recipe");
    }

    #[test]
    fn test_shopping_defaults() {
        let shopping = ShoppingConfig::default();
        assert_eq!(shopping.default_category, "other");
        assert_eq!(shopping.default_supplier, "Unknown Supplier");
    }

    #[test]
    fn test_lookup_config_default() {
        let lookup = LookupConfig::default();
        assert!(lookup.path.is_none());
        assert!(lookup.url.is_none());
        assert_eq!(lookup.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "[limits]\nmax_tags = 5\n\n[lookup]\nurl = \"http://localhost/lookup\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: EngineConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.limits.max_tags, 5);
        assert_eq!(config.limits.max_ingredients, 100);
        assert_eq!(config.shopping, ShoppingConfig::default());
        assert_eq!(
            config.lookup.url.as_deref(),
            Some("http://localhost/lookup")
        );
        assert_eq!(config.lookup.timeout_secs, 30);
    }

    #[test]
    fn test_empty_sources_yield_defaults() {
        let settings = Config::builder().build().unwrap();
        let config: EngineConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.limits, NormalizerLimits::default());
        assert_eq!(config.lookup, LookupConfig::default());
    }
}
