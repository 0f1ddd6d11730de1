//! Cross-recipe shopping list aggregation.
//!
//! Every ingredient line of every requested recipe is parsed, scaled to the
//! target serving count and merged into one entry per ingredient name.
//! Grouping by category, supplier or recipe happens afterwards against a
//! [`LookupTable`].

mod grouping;
mod lookup;

pub use grouping::{group, group_with, GroupBy, ShoppingGroups};
pub use lookup::{
    EmptyLookupSource, FileLookupSource, HttpLookupSource, IngredientInfo, LookupSource,
    LookupSourceFactory, LookupTable,
};

use std::collections::HashMap;
use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::ingredient::{format_quantity, parse, scale, scale_factor};
use crate::model::Recipe;

/// Identity of an ingredient across recipes: its name, trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientKey(String);

impl IngredientKey {
    pub fn new(name: &str) -> Self {
        IngredientKey(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recipe that contributed to an entry, and the menu section it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipeRef {
    pub name: String,
    pub menu_section: String,
}

/// One line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub key: IngredientKey,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub recipes: Vec<RecipeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl ShoppingListEntry {
    /// Total quantity formatted for display ("1 1/2", "3", "0.20")
    pub fn display_quantity(&self) -> String {
        format_quantity(self.quantity)
    }
}

/// A recipe to shop for, at a given serving count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub recipe: Recipe,
    pub target_servings: f64,
    #[serde(default)]
    pub menu_section: String,
}

/// A menu plan: named sections listing recipes by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A recipe reference inside a menu section. Without `servings` the
/// recipe is cooked as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub recipe_id: String,
    #[serde(default)]
    pub servings: Option<f64>,
}

/// Accumulates entries recipe by recipe. Entries keep first-seen order.
#[derive(Debug, Default)]
pub struct ShoppingAggregator {
    entries: Vec<ShoppingListEntry>,
    index: HashMap<IngredientKey, usize>,
    recipes: usize,
}

impl ShoppingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every ingredient of `recipe`, scaled from its own serving count
    /// to `target_servings`
    pub fn add_recipe(&mut self, recipe: &Recipe, target_servings: f64, menu_section: &str) {
        let factor = scale_factor(target_servings, Some(f64::from(recipe.serves)));
        debug!(
            "Adding '{}' for {} servings (factor {})",
            recipe.name, target_servings, factor
        );

        let recipe_ref = RecipeRef {
            name: recipe.name.clone(),
            menu_section: menu_section.to_string(),
        };

        for line in recipe.shopping_lines() {
            let parsed = parse(line);
            if parsed.name.is_empty() {
                continue;
            }
            let quantity = scale(parsed.quantity, factor).value;
            self.merge(&parsed.name, quantity, &parsed.unit, &recipe_ref);
        }
        self.recipes += 1;
    }

    /// Add every item of a menu, resolving recipe ids against `catalog`.
    /// Items whose recipe is not in the catalog are skipped.
    pub fn add_menu(&mut self, menu: &Menu, catalog: &HashMap<String, Recipe>) {
        for section in &menu.sections {
            for item in &section.items {
                let Some(recipe) = catalog.get(&item.recipe_id) else {
                    warn!(
                        "Menu '{}' references unknown recipe '{}', skipping",
                        menu.name, item.recipe_id
                    );
                    continue;
                };
                let servings = item.servings.unwrap_or(f64::from(recipe.serves));
                self.add_recipe(recipe, servings, &section.name);
            }
        }
    }

    fn merge(&mut self, name: &str, quantity: f64, unit: &str, recipe_ref: &RecipeRef) {
        let key = IngredientKey::new(name);
        match self.index.get(&key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                if entry.unit != unit {
                    debug!(
                        "Summing '{}' across units '{}' and '{}'",
                        key, entry.unit, unit
                    );
                }
                entry.quantity += quantity;
                if !entry.recipes.contains(recipe_ref) {
                    entry.recipes.push(recipe_ref.clone());
                }
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(ShoppingListEntry {
                    key,
                    name: name.trim().to_string(),
                    quantity,
                    unit: unit.to_string(),
                    recipes: vec![recipe_ref.clone()],
                    category: None,
                    supplier: None,
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<ShoppingListEntry> {
        info!(
            "Built shopping list with {} entries from {} recipe(s)",
            self.entries.len(),
            self.recipes
        );
        self.entries
    }
}

/// Aggregate a batch of recipes into shopping list entries
pub fn aggregate(requests: &[AggregationRequest]) -> Vec<ShoppingListEntry> {
    let mut aggregator = ShoppingAggregator::new();
    for request in requests {
        aggregator.add_recipe(
            &request.recipe,
            request.target_servings,
            &request.menu_section,
        );
    }
    aggregator.finish()
}

/// Aggregate a menu plan against a recipe catalog keyed by recipe id
pub fn aggregate_menu(menu: &Menu, catalog: &HashMap<String, Recipe>) -> Vec<ShoppingListEntry> {
    let mut aggregator = ShoppingAggregator::new();
    aggregator.add_menu(menu, catalog);
    aggregator.finish()
}
