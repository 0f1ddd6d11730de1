use std::collections::HashMap;

use recipe_engine::normalizer::normalize_json;
use recipe_engine::shopping::{
    aggregate, aggregate_menu, group, AggregationRequest, GroupBy, IngredientInfo, LookupTable,
    Menu, MenuItem, MenuSection, ShoppingAggregator,
};
use recipe_engine::Recipe;
use serde_json::json;

fn recipe(value: serde_json::Value) -> Recipe {
    normalize_json(&value).unwrap()
}

fn request(recipe: Recipe, target_servings: f64, menu_section: &str) -> AggregationRequest {
    AggregationRequest {
        recipe,
        target_servings,
        menu_section: menu_section.to_string(),
    }
}

#[test]
fn test_cake_and_pie_share_sugar() {
    let cake = recipe(json!({"name": "Cake", "serves": 4, "ingredients": ["1 cup sugar"]}));
    let pie = recipe(json!({"name": "Pie", "serves": 2, "ingredients": ["1 cup sugar"]}));

    let entries = aggregate(&[request(cake, 8.0, "Dessert"), request(pie, 2.0, "Dessert")]);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "sugar");
    assert_eq!(entries[0].quantity, 3.0);
    let recipes: Vec<&str> = entries[0].recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(recipes, vec!["Cake", "Pie"]);
}

#[test]
fn test_sectioned_recipes_use_section_ingredients() {
    let bars = recipe(json!({
        "name": "Lemon Bars",
        "serves": 12,
        "sections": [
            {"label": "Crust", "ingredients": ["2 cups flour", "1 cup butter"]},
            {"label": "Filling", "ingredients": ["4 eggs", "1 1/2 cups sugar"]}
        ]
    }));

    let entries = aggregate(&[request(bars, 6.0, "Dessert")]);
    let by_name: HashMap<&str, f64> = entries
        .iter()
        .map(|e| (e.key.as_str(), e.quantity))
        .collect();

    assert_eq!(by_name["flour"], 1.0);
    assert_eq!(by_name["butter"], 0.5);
    assert_eq!(by_name["eggs"], 2.0);
    assert_eq!(by_name["sugar"], 0.75);

    let sugar = entries.iter().find(|e| e.name == "sugar").unwrap();
    assert_eq!(sugar.display_quantity(), "3/4");
    assert_eq!(sugar.unit, "cups");
}

#[test]
fn test_unparseable_lines_count_as_one_each() {
    let entries = aggregate(&[request(
        recipe(json!({"name": "Soup", "serves": 2, "ingredients": ["salt", "Salt"]})),
        4.0,
        "Dinner",
    )]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].unit, "each");
    assert_eq!(entries[0].quantity, 4.0);
}

#[test]
fn test_units_are_not_converted() {
    let mut aggregator = ShoppingAggregator::new();
    aggregator.add_recipe(
        &recipe(json!({"name": "A", "serves": 1, "ingredients": ["1 cup milk"]})),
        1.0,
        "",
    );
    aggregator.add_recipe(
        &recipe(json!({"name": "B", "serves": 1, "ingredients": ["8 oz milk"]})),
        1.0,
        "",
    );
    assert_eq!(aggregator.len(), 1);

    let entries = aggregator.finish();
    assert_eq!(entries[0].quantity, 9.0);
    assert_eq!(entries[0].unit, "cup");
}

#[test]
fn test_menu_against_catalog() {
    let mut catalog = HashMap::new();
    catalog.insert(
        "pancakes".to_string(),
        recipe(json!({"name": "Pancakes", "serves": 2, "ingredients": ["1 cup flour", "2 eggs"]})),
    );
    catalog.insert(
        "omelette".to_string(),
        recipe(json!({"name": "Omelette", "serves": 1, "ingredients": ["3 eggs"]})),
    );

    let menu: Menu = serde_json::from_value(json!({
        "name": "Brunch",
        "sections": [
            {"name": "Sweet", "items": [{"recipe_id": "pancakes", "servings": 4}]},
            {"name": "Savory", "items": [{"recipe_id": "omelette"}, {"recipe_id": "gone"}]}
        ]
    }))
    .unwrap();

    let entries = aggregate_menu(&menu, &catalog);
    let eggs = entries.iter().find(|e| e.key.as_str() == "eggs").unwrap();
    assert_eq!(eggs.quantity, 7.0);
    let sections: Vec<&str> = eggs.recipes.iter().map(|r| r.menu_section.as_str()).collect();
    assert_eq!(sections, vec!["Sweet", "Savory"]);

    let built = Menu {
        name: "Brunch".to_string(),
        sections: vec![MenuSection {
            name: "Sweet".to_string(),
            items: vec![MenuItem {
                recipe_id: "pancakes".to_string(),
                servings: None,
            }],
        }],
    };
    let entries = aggregate_menu(&built, &catalog);
    assert_eq!(entries[0].quantity, 1.0);
}

#[test]
fn test_grouping_with_lookup() {
    let entries = aggregate(&[
        request(
            recipe(json!({
                "name": "Salad",
                "serves": 2,
                "ingredients": ["1 head lettuce", "2 tomatoes", "1 tbsp olive oil"]
            })),
            2.0,
            "Lunch",
        ),
        request(
            recipe(json!({
                "name": "Pasta",
                "serves": 4,
                "ingredients": ["4 tomatoes", "400 g spaghetti"]
            })),
            4.0,
            "Dinner",
        ),
    ]);

    let mut lookup = LookupTable::new();
    lookup.insert(
        "Tomatoes",
        IngredientInfo {
            category: Some("produce".to_string()),
            supplier: Some("Green Grocer".to_string()),
        },
    );
    lookup.insert(
        "lettuce",
        IngredientInfo {
            category: Some("produce".to_string()),
            supplier: None,
        },
    );

    let by_category = group(&entries, GroupBy::Category, &lookup);
    let produce: Vec<&str> = by_category["produce"].iter().map(|e| e.name.as_str()).collect();
    assert_eq!(produce, vec!["lettuce", "tomatoes"]);
    let other: Vec<&str> = by_category["other"].iter().map(|e| e.name.as_str()).collect();
    assert_eq!(other, vec!["olive oil", "spaghetti"]);

    let by_supplier = group(&entries, GroupBy::Supplier, &lookup);
    assert_eq!(by_supplier["Green Grocer"].len(), 1);
    assert_eq!(by_supplier["Unknown Supplier"].len(), 3);

    let by_recipe = group(&entries, GroupBy::Recipe, &lookup);
    assert_eq!(by_recipe["Salad"].len(), 3);
    assert_eq!(by_recipe["Pasta"].len(), 2);
    let tomatoes = by_recipe["Pasta"].iter().find(|e| e.name == "tomatoes").unwrap();
    assert_eq!(tomatoes.quantity, 6.0);
    assert_eq!(tomatoes.category.as_deref(), Some("produce"));
}
