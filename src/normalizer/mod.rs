//! Turns a producer draft into the canonical [`Recipe`] record.

mod bullets;

pub use bullets::format_bullets;

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::NormalizerLimits;
use crate::error::EngineError;
use crate::model::{RawRecipeDraft, RawSection, Recipe, Section};
use crate::sections::{is_section_header, Detection, SectionDetector};

/// Sections adopted from the producer, remembering which labels were made up
struct AdoptedSection {
    section: Section,
    label_missing: bool,
}

/// Recipe normalizer with configurable limits
pub struct Normalizer {
    limits: NormalizerLimits,
    detector: SectionDetector,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(NormalizerLimits::default())
    }
}

impl Normalizer {
    pub fn new(limits: NormalizerLimits) -> Self {
        Normalizer {
            limits,
            detector: SectionDetector::default(),
        }
    }

    /// Build the canonical recipe.
    ///
    /// # Errors
    /// Returns [`EngineError::EmptyRecipe`] when the draft has no name, no
    /// ingredients, no instructions and no sections. Every other defect is
    /// repaired with a default.
    pub fn normalize(&self, draft: &RawRecipeDraft) -> Result<Recipe, EngineError> {
        if draft.is_empty() {
            return Err(EngineError::EmptyRecipe);
        }

        let name = self.name(draft.name.as_deref());
        let producer_instructions = draft
            .instructions
            .as_ref()
            .map(|i| i.to_text().trim().to_string())
            .unwrap_or_default();
        let flat_ingredients: Vec<String> = draft
            .ingredients
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let adopted = draft
            .sections
            .as_deref()
            .filter(|sections| !sections.is_empty())
            .map(adopt_sections);

        let (sections, ingredients, instructions) = match adopted {
            Some(adopted) => {
                debug!("Adopting {} producer section(s)", adopted.len());
                let ingredients = if flat_ingredients.is_empty() {
                    concat_ingredients(adopted.iter().map(|a| &a.section))
                } else {
                    flat_ingredients
                };
                let instructions = if producer_instructions.is_empty() {
                    derive_instructions(&adopted)
                } else {
                    producer_instructions
                };
                let sections = adopted.into_iter().map(|a| a.section).collect();
                (Some(sections), ingredients, instructions)
            }
            None => {
                let instructions = draft.instructions.clone().unwrap_or_else(|| "".into());
                match self.detector.run(&flat_ingredients, instructions) {
                    Detection::Sections { strategy, sections } => {
                        debug!(
                            "Detected {} sections with '{}'",
                            sections.len(),
                            strategy
                        );
                        // Header lines are not ingredients
                        let ingredients: Vec<String> = flat_ingredients
                            .into_iter()
                            .filter(|line| !is_section_header(line))
                            .collect();
                        let adopted: Vec<AdoptedSection> = sections
                            .into_iter()
                            .map(|section| AdoptedSection {
                                section,
                                label_missing: false,
                            })
                            .collect();
                        let instructions = if producer_instructions.is_empty() {
                            derive_instructions(&adopted)
                        } else {
                            producer_instructions
                        };
                        let sections = adopted.into_iter().map(|a| a.section).collect();
                        (Some(sections), ingredients, instructions)
                    }
                    Detection::NoSections => (
                        None,
                        flat_ingredients,
                        format_bullets(&producer_instructions),
                    ),
                }
            }
        };

        let mut ingredients = ingredients;
        if ingredients.len() > self.limits.max_ingredients {
            warn!(
                "Recipe '{}' has {} ingredients, keeping the first {}",
                name,
                ingredients.len(),
                self.limits.max_ingredients
            );
            ingredients.truncate(self.limits.max_ingredients);
        }

        let prep_time = positive_minutes(draft.prep_time);
        let cook_time = positive_minutes(draft.cook_time);
        let total_time = positive_minutes(draft.total_time).or(match (prep_time, cook_time) {
            (Some(prep), Some(cook)) => prep.checked_add(cook),
            _ => None,
        });

        let mut tags = dedupe(&draft.tags);
        tags.truncate(self.limits.max_tags);

        let recipe = Recipe {
            serves: self.serves(draft.serves),
            name,
            ingredients,
            instructions,
            sections,
            prep_time,
            cook_time,
            total_time,
            tags,
            allergens: dedupe(&draft.allergens),
            notes: draft
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| truncate_chars(n, self.limits.max_notes_chars)),
        };

        info!(
            "Normalized recipe '{}' ({} ingredients, {} sections)",
            recipe.name,
            recipe.ingredients.len(),
            recipe.sections.as_ref().map_or(0, Vec::len)
        );
        Ok(recipe)
    }

    fn name(&self, name: Option<&str>) -> String {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => truncate_chars(name, self.limits.max_name_chars),
            None => self.limits.default_name.clone(),
        }
    }

    /// Validate a JSON value and normalize it. Text is taken as written,
    /// so canonical output fed back in comes out unchanged.
    ///
    /// # Errors
    /// [`EngineError::InvalidDraft`] for anything but a JSON object, plus
    /// the errors of [`Normalizer::normalize`].
    pub fn normalize_json(&self, value: &Value) -> Result<Recipe, EngineError> {
        check_object(value)?;
        self.normalize(&RawRecipeDraft::from_value(value))
    }

    /// Like [`Normalizer::normalize_json`], for raw producer output whose
    /// text may carry HTML entities.
    pub fn normalize_producer_json(&self, value: &Value) -> Result<Recipe, EngineError> {
        check_object(value)?;
        self.normalize(&RawRecipeDraft::from_producer_value(value))
    }

    pub fn normalize_str(&self, json: &str) -> Result<Recipe, EngineError> {
        let value: Value = serde_json::from_str(json)?;
        self.normalize_json(&value)
    }

    fn serves(&self, serves: Option<f64>) -> u32 {
        match serves {
            Some(n) if n.is_finite() && n >= 1.0 && n <= f64::from(self.limits.max_serves) => {
                n.round() as u32
            }
            Some(n) => {
                debug!("Serves value {} out of range, using default", n);
                self.limits.default_serves
            }
            None => self.limits.default_serves,
        }
    }
}

/// Normalize a draft with the default limits
pub fn normalize(draft: &RawRecipeDraft) -> Result<Recipe, EngineError> {
    Normalizer::default().normalize(draft)
}

/// Normalize a JSON draft. The value must be a JSON object.
pub fn normalize_json(value: &Value) -> Result<Recipe, EngineError> {
    Normalizer::default().normalize_json(value)
}

/// Parse and normalize a JSON draft
pub fn normalize_str(json: &str) -> Result<Recipe, EngineError> {
    Normalizer::default().normalize_str(json)
}

fn check_object(value: &Value) -> Result<(), EngineError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(EngineError::InvalidDraft(
            "expected a JSON object".to_string(),
        ))
    }
}

fn adopt_sections(raw: &[RawSection]) -> Vec<AdoptedSection> {
    raw.iter()
        .enumerate()
        .map(|(idx, section)| {
            let number = idx + 1;
            let label = section
                .label
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty());
            if label.is_none() {
                warn!("Section {} has no label", number);
            }
            let id = section
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .unwrap_or_else(|| format!("section-{number}"));

            AdoptedSection {
                section: Section::new(
                    id,
                    label.map_or_else(|| format!("Part {number}"), String::from),
                    section.ingredients.clone(),
                    section.instructions.as_deref().unwrap_or_default().trim(),
                ),
                label_missing: label.is_none(),
            }
        })
        .collect()
}

fn concat_ingredients<'a>(sections: impl Iterator<Item = &'a Section>) -> Vec<String> {
    sections
        .flat_map(|section| section.ingredients.iter().cloned())
        .collect()
}

/// "<label>:\n<instructions>" per section, blank-line separated. A single
/// unlabelled section contributes its bare instructions.
fn derive_instructions(sections: &[AdoptedSection]) -> String {
    if let [only] = sections {
        if only.label_missing {
            return only.section.instructions.clone();
        }
    }

    sections
        .iter()
        .filter(|a| !a.section.instructions.trim().is_empty())
        .map(|a| format!("{}:\n{}", a.section.label, a.section.instructions))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Positive whole minutes. Values beyond `u32::MAX` are dropped like
/// negative ones instead of saturating.
fn positive_minutes(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(f64::round)
        .filter(|&v| v > 0.0 && v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

/// Trimmed, non-empty, first occurrence wins (case-insensitive)
fn dedupe(values: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let key = value.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            result.push(value.to_string());
        }
    }
    result
}

/// Cut to `max` characters. The cut may expose trailing whitespace,
/// which is trimmed so the result is stable under re-normalization.
fn truncate_chars(text: &str, max: usize) -> String {
    let cut: String = text.chars().take(max).collect();
    cut.trim_end().to_string()
}
