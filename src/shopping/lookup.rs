use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::IngredientKey;
use crate::config::LookupConfig;
use crate::error::EngineError;

/// Category and supplier of one ingredient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientInfo {
    pub category: Option<String>,
    pub supplier: Option<String>,
}

/// Ingredient name -> category/supplier, matched on the lowercased name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: HashMap<IngredientKey, IngredientInfo>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, info: IngredientInfo) {
        self.entries.insert(IngredientKey::new(name), info);
    }

    pub fn get(&self, key: &IngredientKey) -> Option<&IngredientInfo> {
        self.entries.get(key)
    }

    pub fn category(&self, key: &IngredientKey) -> Option<&str> {
        self.get(key).and_then(|info| info.category.as_deref())
    }

    pub fn supplier(&self, key: &IngredientKey) -> Option<&str> {
        self.get(key).and_then(|info| info.supplier.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a table from either shape of the dataset:
    ///
    /// ```json
    /// [{"name": "sugar", "category": "baking", "supplier": "Mill"}]
    /// {"sugar": {"category": "baking", "supplier": "Mill"}}
    /// ```
    ///
    /// Rows use `name` or `ingredient` for the ingredient. Rows without one
    /// are skipped.
    pub fn from_json_value(value: &Value) -> Result<Self, EngineError> {
        let mut table = LookupTable::new();

        match value {
            Value::Array(rows) => {
                for row in rows {
                    let name = row
                        .get("name")
                        .or_else(|| row.get("ingredient"))
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|n| !n.is_empty());
                    match name {
                        Some(name) => table.insert(name, info_from_value(row)),
                        None => warn!("Skipping lookup row without a name: {}", row),
                    }
                }
            }
            Value::Object(map) => {
                for (name, row) in map {
                    if !row.is_object() {
                        warn!("Skipping lookup entry '{}': not an object", name);
                        continue;
                    }
                    table.insert(name, info_from_value(row));
                }
            }
            _ => {
                return Err(EngineError::InvalidLookup(
                    "expected an array of rows or an object keyed by ingredient".to_string(),
                ))
            }
        }

        debug!("Lookup table has {} entries", table.len());
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }
}

fn info_from_value(row: &Value) -> IngredientInfo {
    let text = |field: &str| {
        row.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    IngredientInfo {
        category: text("category"),
        supplier: text("supplier"),
    }
}

/// Somewhere a lookup table can be loaded from
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Short description for logs ("file", "http", "empty")
    fn source_name(&self) -> &str;

    async fn load(&self) -> Result<LookupTable, EngineError>;
}

/// Lookup dataset stored as a JSON file
pub struct FileLookupSource {
    path: PathBuf,
}

impl FileLookupSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LookupSource for FileLookupSource {
    fn source_name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<LookupTable, EngineError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let table = LookupTable::from_json_str(&json)?;
        info!(
            "Loaded {} lookup entries from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Lookup dataset served as JSON over HTTP
pub struct HttpLookupSource {
    client: Client,
    url: String,
}

impl HttpLookupSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LookupSource for HttpLookupSource {
    fn source_name(&self) -> &str {
        "http"
    }

    async fn load(&self) -> Result<LookupTable, EngineError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(EngineError::LookupStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let table = LookupTable::from_json_str(&body)?;
        info!("Loaded {} lookup entries from {}", table.len(), self.url);
        Ok(table)
    }
}

/// Used when no dataset is configured
pub struct EmptyLookupSource;

#[async_trait]
impl LookupSource for EmptyLookupSource {
    fn source_name(&self) -> &str {
        "empty"
    }

    async fn load(&self) -> Result<LookupTable, EngineError> {
        Ok(LookupTable::new())
    }
}

pub struct LookupSourceFactory;

impl LookupSourceFactory {
    /// Pick a source from configuration: `path` first, then `url`, else an
    /// empty table
    pub fn from_config(config: &LookupConfig) -> Result<Box<dyn LookupSource>, EngineError> {
        if let Some(path) = config.path.as_deref().filter(|p| !p.trim().is_empty()) {
            return Ok(Box::new(FileLookupSource::new(path)));
        }
        if let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(Box::new(HttpLookupSource::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?));
        }
        debug!("No lookup dataset configured");
        Ok(Box::new(EmptyLookupSource))
    }
}
