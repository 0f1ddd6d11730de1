use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{LookupTable, ShoppingListEntry};
use crate::config::ShoppingConfig;

/// Shopping list entries by group name, groups in sorted order
pub type ShoppingGroups = BTreeMap<String, Vec<ShoppingListEntry>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Category,
    Supplier,
    Recipe,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(GroupBy::Category),
            "supplier" => Ok(GroupBy::Supplier),
            "recipe" => Ok(GroupBy::Recipe),
            other => Err(format!(
                "Unknown grouping '{}', expected category, supplier or recipe",
                other
            )),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupBy::Category => "category",
            GroupBy::Supplier => "supplier",
            GroupBy::Recipe => "recipe",
        };
        f.write_str(name)
    }
}

/// Group entries with the default fallback names ("other", "Unknown Supplier")
pub fn group(entries: &[ShoppingListEntry], by: GroupBy, lookup: &LookupTable) -> ShoppingGroups {
    group_with(entries, by, lookup, &ShoppingConfig::default())
}

/// Group entries, resolving category and supplier through `lookup`.
///
/// Every grouped entry carries its resolved category and supplier. When
/// grouping by recipe, an entry shows up under each recipe that uses it;
/// entries without any recipe fall into the default category group.
/// Entries inside a group are sorted by name.
pub fn group_with(
    entries: &[ShoppingListEntry],
    by: GroupBy,
    lookup: &LookupTable,
    defaults: &ShoppingConfig,
) -> ShoppingGroups {
    let mut groups = ShoppingGroups::new();

    for entry in entries {
        let mut resolved = entry.clone();
        resolved.category = Some(
            lookup
                .category(&entry.key)
                .unwrap_or(defaults.default_category.as_str())
                .to_string(),
        );
        resolved.supplier = Some(
            lookup
                .supplier(&entry.key)
                .unwrap_or(defaults.default_supplier.as_str())
                .to_string(),
        );

        let names: Vec<String> = match by {
            GroupBy::Category => resolved.category.clone().into_iter().collect(),
            GroupBy::Supplier => resolved.supplier.clone().into_iter().collect(),
            GroupBy::Recipe => {
                let mut names: Vec<String> = Vec::new();
                for recipe in &entry.recipes {
                    if !names.contains(&recipe.name) {
                        names.push(recipe.name.clone());
                    }
                }
                if names.is_empty() {
                    names.push(defaults.default_category.clone());
                }
                names
            }
        };

        for name in names {
            groups.entry(name).or_default().push(resolved.clone());
        }
    }

    for members in groups.values_mut() {
        members.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
    }
    groups
}
