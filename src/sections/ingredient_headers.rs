use log::debug;

use super::labels::{header_label, locate_label, slice_at, title_case};
use super::{DetectionInput, SectionStrategy};
use crate::model::Section;

const IMPLICIT_LABEL: &str = "Main";

/// Sections marked by header lines inside the ingredient list itself
/// ("Cherry Filling:", "For the crust:").
pub struct IngredientHeaders;

struct Group {
    label: String,
    ingredients: Vec<String>,
    implicit: bool,
}

impl SectionStrategy for IngredientHeaders {
    fn name(&self) -> &'static str {
        "ingredient_headers"
    }

    fn detect(&self, input: &DetectionInput) -> Option<Vec<Section>> {
        let mut groups: Vec<Group> = Vec::new();
        let mut headers = 0;

        for line in &input.ingredients {
            if let Some(label) = header_label(line) {
                headers += 1;
                groups.push(Group {
                    label: title_case(&label),
                    ingredients: Vec::new(),
                    implicit: false,
                });
                continue;
            }

            match groups.last_mut() {
                Some(group) => group.ingredients.push(line.to_string()),
                None => groups.push(Group {
                    label: IMPLICIT_LABEL.to_string(),
                    ingredients: vec![line.to_string()],
                    implicit: true,
                }),
            }
        }

        if headers == 0 {
            return None;
        }

        groups.retain(|group| !group.ingredients.is_empty());
        debug!(
            "Found {} ingredient header(s), {} non-empty group(s)",
            headers,
            groups.len()
        );
        if groups.len() < 2 {
            return None;
        }

        let text = input.instructions.as_str();
        let mut starts: Vec<Option<usize>> = groups
            .iter()
            .map(|group| {
                if group.implicit {
                    None
                } else {
                    locate_label(text, &group.label)
                }
            })
            .collect();

        let first_match = starts.iter().flatten().min().copied();
        match first_match {
            // The implicit group owns whatever comes before the first labelled part
            Some(first) => {
                for (group, start) in groups.iter().zip(starts.iter_mut()) {
                    if group.implicit && first > 0 {
                        *start = Some(0);
                    }
                }
            }
            // Nothing mentions any label: keep the text with the first group
            None => starts[0] = Some(0),
        }

        let slices = slice_at(text, &starts);
        Some(
            groups
                .into_iter()
                .zip(slices)
                .enumerate()
                .map(|(idx, (group, instructions))| {
                    Section::new(
                        format!("section-{}", idx + 1),
                        group.label,
                        group.ingredients,
                        instructions,
                    )
                })
                .collect(),
        )
    }
}
