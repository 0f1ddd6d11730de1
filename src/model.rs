use html_escape::decode_html_entities;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recipe object as handed over by the AI/OCR producer.
///
/// Built leniently from JSON: fields of the wrong type are treated as
/// missing instead of failing the whole draft. Text is read as written;
/// scraped producer output goes through [`RawRecipeDraft::decode_entities`]
/// once, at intake.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RawRecipeDraft {
    pub name: Option<String>,
    pub serves: Option<f64>,
    pub ingredients: Vec<String>,
    pub instructions: Option<Instructions>,
    pub sections: Option<Vec<RawSection>>,
    pub prep_time: Option<f64>,
    pub cook_time: Option<f64>,
    pub total_time: Option<f64>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub notes: Option<String>,
}

/// Instructions as supplied by the producer: one blob or a list of steps
#[derive(Debug, Clone, PartialEq)]
pub enum Instructions {
    Text(String),
    Steps(Vec<String>),
}

impl Instructions {
    /// Flatten into a single text, steps separated by newlines
    pub fn to_text(&self) -> String {
        match self {
            Instructions::Text(text) => text.clone(),
            Instructions::Steps(steps) => steps
                .iter()
                .map(|step| step.trim())
                .filter(|step| !step.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.to_text().trim().is_empty()
    }
}

impl From<&str> for Instructions {
    fn from(text: &str) -> Self {
        Instructions::Text(text.to_string())
    }
}

impl From<String> for Instructions {
    fn from(text: String) -> Self {
        Instructions::Text(text)
    }
}

impl From<Vec<String>> for Instructions {
    fn from(steps: Vec<String>) -> Self {
        Instructions::Steps(steps)
    }
}

/// A producer-supplied sub-recipe, unvalidated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSection {
    pub id: Option<String>,
    pub label: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

impl RawSection {
    fn is_empty(&self) -> bool {
        self.label.as_deref().map_or(true, |l| l.trim().is_empty())
            && self.ingredients.iter().all(|i| i.trim().is_empty())
            && self.instructions.as_deref().map_or(true, |i| i.trim().is_empty())
    }
}

/// A named sub-recipe with its own ingredients and instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub label: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl Section {
    /// Build a section, dropping blank ingredient lines
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Section {
            id: id.into(),
            label: label.into(),
            ingredients: ingredients
                .into_iter()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            instructions: instructions.into(),
        }
    }
}

/// The canonical recipe record produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub serves: u32,
    pub ingredients: Vec<String>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub total_time: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Recipe {
    /// Ingredient lines used for shopping: section ingredients when the
    /// recipe is sectioned, the flat list otherwise
    pub fn shopping_lines(&self) -> Vec<&str> {
        match &self.sections {
            Some(sections) if !sections.is_empty() => sections
                .iter()
                .flat_map(|section| section.ingredients.iter().map(String::as_str))
                .collect(),
            _ => self.ingredients.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_sectioned(&self) -> bool {
        self.sections.as_ref().is_some_and(|s| !s.is_empty())
    }
}

impl From<Value> for RawRecipeDraft {
    fn from(value: Value) -> Self {
        RawRecipeDraft::from_value(&value)
    }
}

impl From<&Recipe> for RawRecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        RawRecipeDraft {
            name: Some(recipe.name.clone()),
            serves: Some(f64::from(recipe.serves)),
            ingredients: recipe.ingredients.clone(),
            instructions: Some(Instructions::Text(recipe.instructions.clone())),
            sections: recipe.sections.as_ref().map(|sections| {
                sections
                    .iter()
                    .map(|section| RawSection {
                        id: Some(section.id.clone()),
                        label: Some(section.label.clone()),
                        ingredients: section.ingredients.clone(),
                        instructions: Some(section.instructions.clone()),
                    })
                    .collect()
            }),
            prep_time: recipe.prep_time.map(f64::from),
            cook_time: recipe.cook_time.map(f64::from),
            total_time: recipe.total_time.map(f64::from),
            tags: recipe.tags.clone(),
            allergens: recipe.allergens.clone(),
            notes: recipe.notes.clone(),
        }
    }
}

impl RawRecipeDraft {
    /// Read a draft out of an arbitrary JSON value. Never fails; a
    /// non-object value yields an empty draft.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("Recipe draft is not a JSON object; treating it as empty");
            return RawRecipeDraft::default();
        };

        let sections = object.get("sections").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let section = section_from_value(item);
                    if section.is_none() {
                        warn!("Dropping malformed section entry: {}", item);
                    }
                    section
                })
                .filter(|section| !section.is_empty())
                .collect::<Vec<_>>()
        });

        RawRecipeDraft {
            name: object.get("name").and_then(as_text),
            serves: object.get("serves").and_then(as_number),
            ingredients: object.get("ingredients").map(as_lines).unwrap_or_default(),
            instructions: object.get("instructions").and_then(as_instructions),
            sections,
            prep_time: object.get("prep_time").and_then(as_number),
            cook_time: object.get("cook_time").and_then(as_number),
            total_time: object.get("total_time").and_then(as_number),
            tags: object.get("tags").map(as_list).unwrap_or_default(),
            allergens: object.get("allergens").map(as_list).unwrap_or_default(),
            notes: object.get("notes").and_then(as_text),
        }
    }

    /// Read a draft straight from the producer, decoding HTML entities
    /// carried over from scraped pages.
    pub fn from_producer_value(value: &Value) -> Self {
        RawRecipeDraft::from_value(value).decode_entities()
    }

    /// Decode HTML entities in every text field
    pub fn decode_entities(self) -> Self {
        RawRecipeDraft {
            name: self.name.as_deref().map(decode_text),
            serves: self.serves,
            ingredients: decode_all(&self.ingredients),
            instructions: self.instructions.map(|instructions| match instructions {
                Instructions::Text(text) => Instructions::Text(decode_text(&text)),
                Instructions::Steps(steps) => Instructions::Steps(decode_all(&steps)),
            }),
            sections: self.sections.map(|sections| {
                sections
                    .into_iter()
                    .map(|section| RawSection {
                        id: section.id.as_deref().map(decode_text),
                        label: section.label.as_deref().map(decode_text),
                        ingredients: decode_all(&section.ingredients),
                        instructions: section.instructions.as_deref().map(decode_text),
                    })
                    .collect()
            }),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time,
            tags: decode_all(&self.tags),
            allergens: decode_all(&self.allergens),
            notes: self.notes.as_deref().map(decode_text),
        }
    }

    /// True when there is nothing at all to normalize
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.ingredients.iter().all(|i| i.trim().is_empty())
            && self.instructions.as_ref().map_or(true, Instructions::is_blank)
            && self.sections.as_ref().map_or(true, Vec::is_empty)
    }
}

fn section_from_value(value: &Value) -> Option<RawSection> {
    let object = value.as_object()?;
    Some(RawSection {
        id: object.get("id").and_then(as_text),
        label: object
            .get("label")
            .or_else(|| object.get("name"))
            .and_then(as_text),
        ingredients: object.get("ingredients").map(as_lines).unwrap_or_default(),
        instructions: object
            .get("instructions")
            .and_then(as_instructions)
            .map(|i| i.to_text()),
    })
}

fn decode_text(text: &str) -> String {
    decode_html_entities(text).to_string()
}

fn decode_all(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| decode_text(line)).collect()
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(String::from)
            .collect(),
        Value::String(s) => s.lines().map(String::from).collect(),
        _ => Vec::new(),
    }
}

fn as_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        Value::String(s) => s.split(',').map(String::from).collect(),
        _ => Vec::new(),
    }
}

fn as_instructions(value: &Value) -> Option<Instructions> {
    match value {
        Value::String(s) => Some(Instructions::Text(s.clone())),
        Value::Array(items) => Some(Instructions::Steps(
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(String::from)
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_types_are_treated_as_missing() {
        let draft = RawRecipeDraft::from_value(&json!({
            "name": ["not", "a", "string"],
            "serves": {"n": 4},
            "ingredients": [1, "2 cups flour", null],
            "instructions": 42,
            "tags": "quick, easy"
        }));

        assert_eq!(draft.name, None);
        assert_eq!(draft.serves, None);
        assert_eq!(draft.ingredients, vec!["2 cups flour"]);
        assert_eq!(draft.instructions, None);
        assert_eq!(draft.tags, vec!["quick", " easy"]);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let draft = RawRecipeDraft::from_value(&json!({
            "serves": "6",
            "prep_time": " 15 ",
            "cook_time": "soon"
        }));
        assert_eq!(draft.serves, Some(6.0));
        assert_eq!(draft.prep_time, Some(15.0));
        assert_eq!(draft.cook_time, None);
    }

    #[test]
    fn test_ingredients_as_single_string() {
        let draft = RawRecipeDraft::from_value(&json!({
            "ingredients": "1 cup flour\n2 eggs"
        }));
        assert_eq!(draft.ingredients, vec!["1 cup flour", "2 eggs"]);
    }

    #[test]
    fn test_instruction_steps() {
        let draft: RawRecipeDraft = serde_json::from_value(json!({
            "instructions": ["Mix the flour.", "  ", "Bake it."]
        }))
        .unwrap();
        let instructions = draft.instructions.unwrap();
        assert_eq!(instructions.to_text(), "Mix the flour.\nBake it.");
    }

    #[test]
    fn test_producer_entities_are_decoded() {
        let value = json!({
            "name": "Mac &amp; Cheese",
            "ingredients": ["1 cup milk &amp; cream"],
            "instructions": ["Stir &lt;gently&gt;."],
            "sections": [{"label": "Sauce &amp; Topping", "ingredients": ["1 tbsp butter"]}]
        });

        let draft = RawRecipeDraft::from_producer_value(&value);
        assert_eq!(draft.name.as_deref(), Some("Mac & Cheese"));
        assert_eq!(draft.ingredients, vec!["1 cup milk & cream"]);
        assert_eq!(draft.instructions.unwrap().to_text(), "Stir <gently>.");
        let sections = draft.sections.unwrap();
        assert_eq!(sections[0].label.as_deref(), Some("Sauce & Topping"));

        // plain intake keeps text as written
        let draft = RawRecipeDraft::from_value(&value);
        assert_eq!(draft.name.as_deref(), Some("Mac &amp; Cheese"));
    }

    #[test]
    fn test_malformed_sections_are_dropped() {
        let draft = RawRecipeDraft::from_value(&json!({
            "sections": [
                "just a string",
                {},
                {"name": "Crust", "ingredients": ["1 cup flour"], "instructions": ["Press.", "Chill."]}
            ]
        }));
        let sections = draft.sections.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label.as_deref(), Some("Crust"));
        assert_eq!(sections[0].instructions.as_deref(), Some("Press.\nChill."));
    }

    #[test]
    fn test_non_object_draft_is_empty() {
        let draft = RawRecipeDraft::from_value(&json!("hello"));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_section_new_filters_blank_lines() {
        let section = Section::new(
            "section-1",
            "Crust",
            vec!["1 cup flour".to_string(), "   ".to_string(), String::new()],
            "Press into pan.",
        );
        assert_eq!(section.ingredients, vec!["1 cup flour"]);
    }

    #[test]
    fn test_shopping_lines_prefers_sections() {
        let recipe = Recipe {
            name: "Pie".to_string(),
            serves: 4,
            ingredients: vec!["Filling:".to_string(), "2 apples".to_string()],
            instructions: String::new(),
            sections: Some(vec![Section::new(
                "section-1",
                "Filling",
                vec!["2 apples".to_string()],
                "",
            )]),
            prep_time: None,
            cook_time: None,
            total_time: None,
            tags: vec![],
            allergens: vec![],
            notes: None,
        };
        assert_eq!(recipe.shopping_lines(), vec!["2 apples"]);
    }
}
