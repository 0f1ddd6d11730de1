//! Label grammar shared by the detection strategies: section header lines,
//! title casing, keyword extraction and case-insensitive label lookup.

/// Trailing words that mark a line like "Cherry Filling" as a section header
const HEADER_SUFFIXES: [&str; 9] = [
    "topping", "filling", "sauce", "dressing", "glaze", "streusel", "crust", "base", "mixture",
];

/// Words that say what kind of section something is, not which one
const GENERIC_WORDS: [&str; 14] = [
    "topping",
    "filling",
    "sauce",
    "dressing",
    "glaze",
    "streusel",
    "crust",
    "base",
    "mixture",
    "ingredients",
    "the",
    "and",
    "for",
    "with",
];

const MAX_HEADER_CHARS: usize = 60;
const MAX_HEADER_WORDS: usize = 6;

/// If `line` is a section header, return its (untitled) label.
///
/// Recognised shapes:
/// - `<Label> Ingredients:`
/// - `For (the) <Label>:`
/// - `<Label> (Topping|Filling|Sauce|...)`, with a colon or in title case
///
/// Lines that start with a quantity are always ingredients.
pub fn header_label(line: &str) -> Option<String> {
    let text = line
        .trim()
        .trim_matches(|c: char| c == '#' || c == '*' || c == '_' || c.is_whitespace());
    if text.is_empty() || text.chars().count() > MAX_HEADER_CHARS {
        return None;
    }

    let has_colon = text.ends_with(':');
    let body = text.trim_end_matches(':').trim();
    if !is_label_text(body) {
        return None;
    }

    let words: Vec<&str> = body.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_HEADER_WORDS {
        return None;
    }
    let last = words[words.len() - 1].to_ascii_lowercase();

    if has_colon && last == "ingredients" && words.len() > 1 {
        return Some(words[..words.len() - 1].join(" "));
    }

    if has_colon && words[0].eq_ignore_ascii_case("for") && words.len() > 1 {
        let rest = if words[1].eq_ignore_ascii_case("the") {
            &words[2..]
        } else {
            &words[1..]
        };
        if !rest.is_empty() {
            return Some(rest.join(" "));
        }
    }

    if HEADER_SUFFIXES.contains(&last.as_str()) && (has_colon || is_title_case(&words)) {
        return Some(words.join(" "));
    }

    None
}

/// True when `line` is a section header rather than an ingredient
pub fn is_section_header(line: &str) -> bool {
    header_label(line).is_some()
}

fn is_label_text(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_alphabetic)
        && text
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '&' | '\'' | '-'))
}

fn is_title_case(words: &[&str]) -> bool {
    words
        .iter()
        .filter(|w| !matches!(w.to_ascii_lowercase().as_str(), "and" | "or" | "of" | "the" | "&"))
        .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

/// Capitalize every word, lowercase the rest
pub fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Distinctive words of a label, lowercased ("Cherry Filling" -> ["cherry"])
pub fn label_keywords(label: &str) -> Vec<String> {
    label
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 3 && !GENERIC_WORDS.contains(&w.as_str()))
        .collect()
}

/// Does `text` (already lowercased) mention `keyword`, allowing simple plurals
pub fn mentions(text: &str, keyword: &str) -> bool {
    if text.contains(keyword) {
        return true;
    }
    if let Some(stem) = keyword.strip_suffix('y') {
        if text.contains(&format!("{stem}ies")) {
            return true;
        }
    }
    if let Some(stem) = keyword.strip_suffix('s') {
        if stem.chars().count() >= 3 && text.contains(stem) {
            return true;
        }
    }
    false
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

/// Where the instructions for `label` start: the earliest mention of the
/// label itself or of "make the <label>", "prepare the <label>" or
/// "for the <label>", falling back to its distinctive keywords.
pub fn locate_label(text: &str, label: &str) -> Option<usize> {
    let candidates = [
        label.to_string(),
        format!("make the {label}"),
        format!("prepare the {label}"),
        format!("for the {label}"),
    ];
    let direct = candidates
        .iter()
        .filter_map(|needle| find_ci(text, needle))
        .min();
    if direct.is_some() {
        return direct;
    }

    label_keywords(label)
        .iter()
        .filter_map(|keyword| find_ci(text, keyword))
        .min()
}

/// Cut `text` at the given start offsets. `starts` holds one optional offset
/// per section; each found section runs until the next larger offset.
pub fn slice_at(text: &str, starts: &[Option<usize>]) -> Vec<String> {
    let mut found: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .filter_map(|(idx, start)| start.map(|s| (s, idx)))
        .collect();
    found.sort();

    let mut slices = vec![String::new(); starts.len()];
    for (k, &(start, idx)) in found.iter().enumerate() {
        let end = found[k + 1..]
            .iter()
            .map(|&(s, _)| s)
            .find(|&s| s > start)
            .unwrap_or(text.len());
        let end = if k + 1 < found.len() && found[k + 1].0 == start {
            start
        } else {
            end
        };
        slices[idx] = text[start..end].trim().to_string();
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredients_header() {
        assert_eq!(
            header_label("Almond Shortbread Ingredients:").as_deref(),
            Some("Almond Shortbread")
        );
        assert_eq!(header_label("Ingredients:"), None);
    }

    #[test]
    fn test_for_the_header() {
        assert_eq!(header_label("For the Crust:").as_deref(), Some("Crust"));
        assert_eq!(header_label("For glaze:").as_deref(), Some("glaze"));
        assert_eq!(header_label("**For the topping:**").as_deref(), Some("topping"));
    }

    #[test]
    fn test_suffix_header() {
        assert_eq!(header_label("Cherry Filling:").as_deref(), Some("Cherry Filling"));
        assert_eq!(header_label("Lemon Glaze").as_deref(), Some("Lemon Glaze"));
        assert_eq!(header_label("## Crumb Topping").as_deref(), Some("Crumb Topping"));
    }

    #[test]
    fn test_ingredients_are_not_headers() {
        assert!(!is_section_header("1 cup tomato sauce"));
        assert!(!is_section_header("hot sauce"));
        assert!(!is_section_header("2 cups cherries"));
        assert!(!is_section_header("Salt, to taste"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cherry  filling"), "Cherry Filling");
        assert_eq!(title_case("ALMOND shortbread"), "Almond Shortbread");
    }

    #[test]
    fn test_keywords_and_mentions() {
        assert_eq!(label_keywords("Cherry Filling"), vec!["cherry"]);
        assert!(mentions("2 cups cherries", "cherry"));
        assert!(mentions("1 cup pecan halves", "pecans"));
        assert!(!mentions("1 cup flour", "cherry"));
    }

    #[test]
    fn test_locate_label_prefers_earliest_paraphrase() {
        let text = "First make the cherry filling. Stir the cherry filling often.";
        assert_eq!(locate_label(text, "Cherry Filling"), Some(6));
        assert_eq!(locate_label("Bake the shortbread.", "Almond Shortbread"), Some(9));
        assert_eq!(locate_label("Mix and bake.", "Crust"), None);
    }

    #[test]
    fn test_slice_at() {
        let text = "aaa bbb ccc";
        let slices = slice_at(text, &[Some(4), None, Some(0)]);
        assert_eq!(slices, vec!["bbb ccc", "", "aaa"]);
    }
}
