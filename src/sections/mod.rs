//! Section detection: decides whether a flat recipe is really several
//! sub-recipes and partitions ingredients and instructions accordingly.

mod ingredient_headers;
mod instruction_headers;
mod labels;

pub use ingredient_headers::IngredientHeaders;
pub use instruction_headers::InstructionHeaders;
pub use labels::{is_section_header, title_case};

use log::debug;

use crate::model::{Instructions, Section};

/// Minimum number of sections worth splitting a recipe into
pub const MIN_SECTIONS: usize = 2;

/// What a detection strategy works on: non-blank ingredient lines and the
/// instructions flattened to one text
#[derive(Debug, Clone)]
pub struct DetectionInput {
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl DetectionInput {
    pub fn new<S: AsRef<str>>(ingredients: &[S], instructions: Instructions) -> Self {
        DetectionInput {
            ingredients: ingredients
                .iter()
                .map(|line| line.as_ref().trim())
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            instructions: instructions.to_text(),
        }
    }
}

/// One way of finding sections. Returns `None` when it finds nothing usable.
pub trait SectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self, input: &DetectionInput) -> Option<Vec<Section>>;
}

/// Outcome of running the detector
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    NoSections,
    Sections {
        strategy: &'static str,
        sections: Vec<Section>,
    },
}

impl Detection {
    pub fn into_sections(self) -> Option<Vec<Section>> {
        match self {
            Detection::NoSections => None,
            Detection::Sections { sections, .. } => Some(sections),
        }
    }
}

/// Ordered list of strategies; the first one yielding at least
/// [`MIN_SECTIONS`] sections wins
pub struct SectionDetector {
    strategies: Vec<Box<dyn SectionStrategy>>,
}

impl Default for SectionDetector {
    fn default() -> Self {
        SectionDetector {
            strategies: vec![Box::new(IngredientHeaders), Box::new(InstructionHeaders)],
        }
    }
}

impl SectionDetector {
    pub fn with_strategies(strategies: Vec<Box<dyn SectionStrategy>>) -> Self {
        SectionDetector { strategies }
    }

    pub fn run<S: AsRef<str>>(&self, ingredients: &[S], instructions: Instructions) -> Detection {
        let input = DetectionInput::new(ingredients, instructions);

        for strategy in &self.strategies {
            match strategy.detect(&input) {
                Some(sections) if sections.len() >= MIN_SECTIONS => {
                    debug!(
                        "Strategy '{}' found {} sections",
                        strategy.name(),
                        sections.len()
                    );
                    return Detection::Sections {
                        strategy: strategy.name(),
                        sections,
                    };
                }
                _ => debug!("Strategy '{}' found no sections", strategy.name()),
            }
        }

        Detection::NoSections
    }
}

/// Split a recipe into sections, or `None` when it is a single recipe
pub fn detect<S: AsRef<str>>(
    ingredients: &[S],
    instructions: impl Into<Instructions>,
) -> Option<Vec<Section>> {
    SectionDetector::default()
        .run(ingredients, instructions.into())
        .into_sections()
}
