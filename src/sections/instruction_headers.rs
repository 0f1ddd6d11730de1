use log::debug;

use super::labels::{label_keywords, mentions, slice_at, title_case};
use super::{DetectionInput, SectionStrategy};
use crate::ingredient;
use crate::model::Section;

/// Words that end a "<label> <keyword>:" header in running instructions
const HEADER_KEYWORDS: [&str; 10] = [
    "ingredients",
    "mixture",
    "topping",
    "filling",
    "sauce",
    "dressing",
    "glaze",
    "streusel",
    "crust",
    "base",
];

/// Words that never belong to a label; walking back from a keyword stops here
const STOP_WORDS: [&str; 20] = [
    "the", "a", "an", "for", "make", "prepare", "and", "then", "to", "of", "your", "now", "next",
    "first", "meanwhile", "while", "in", "with", "by", "finally",
];

/// Things that get prepared but are not sub-recipes
const NOT_LABELS: [&str; 8] = ["oven", "pan", "pans", "dish", "tray", "sheet", "bowl", "grill"];

const MAX_LABEL_WORDS: usize = 4;

/// Sections named by headers inside the instruction text ("For the crust:",
/// "Cherry filling:", "Make the glaze by ..."). Ingredients are assigned
/// by keyword or by their main word appearing in a section's instructions.
pub struct InstructionHeaders;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Word,
    Colon,
    Break,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    start: usize,
}

impl Token<'_> {
    fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }

    fn is_label_word(&self) -> bool {
        self.kind == TokenKind::Word
            && self.text.chars().all(char::is_alphabetic)
            && !STOP_WORDS.contains(&self.text.to_ascii_lowercase().as_str())
    }
}

/// Split text into words, colons and sentence breaks
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() || c == '\'' || c == '-' {
            if word_start.is_none() {
                word_start = Some(i);
            }
            continue;
        }

        if let Some(start) = word_start.take() {
            tokens.push(Token {
                kind: TokenKind::Word,
                text: &text[start..i],
                start,
            });
        }

        let kind = match c {
            ':' => TokenKind::Colon,
            '.' | '!' | '?' | ';' | ',' | '\n' | '•' | '(' | ')' => TokenKind::Break,
            _ => continue,
        };
        tokens.push(Token {
            kind,
            text: &text[i..i + c.len_utf8()],
            start: i,
        });
    }

    if let Some(start) = word_start {
        tokens.push(Token {
            kind: TokenKind::Word,
            text: &text[start..],
            start,
        });
    }

    tokens
}

/// A header occurrence: label text and where it starts
#[derive(Debug, Clone, PartialEq)]
struct HeaderMatch {
    label: String,
    start: usize,
}

/// Label words following position `from`, up to a colon (or "by" when
/// `allow_by`). Returns None when the run is empty, too long or broken.
fn label_run(tokens: &[Token], from: usize, allow_by: bool) -> Option<Vec<String>> {
    let mut words = Vec::new();
    for token in &tokens[from..] {
        match token.kind {
            TokenKind::Colon => break,
            TokenKind::Word if allow_by && token.is_word("by") => break,
            TokenKind::Word if token.text.chars().all(char::is_alphabetic) => {
                words.push(token.text.to_string());
                if words.len() > MAX_LABEL_WORDS {
                    return None;
                }
            }
            _ => return None,
        }
    }
    if words.is_empty() {
        return None;
    }
    Some(words)
}

/// "for (the) <label>:"
fn match_for_the(tokens: &[Token], i: usize) -> Option<HeaderMatch> {
    if !tokens[i].is_word("for") {
        return None;
    }
    let from = if tokens.get(i + 1).is_some_and(|t| t.is_word("the")) {
        i + 2
    } else {
        i + 1
    };
    let words = label_run(tokens, from, false)?;
    // the run must actually end in a colon
    let end = from + words.len();
    if tokens.get(end).map(|t| t.kind) != Some(TokenKind::Colon) {
        return None;
    }
    Some(HeaderMatch {
        label: words.join(" "),
        start: tokens[i].start,
    })
}

/// "(make|prepare) (the) <label> (by|:)"
fn match_make_the(tokens: &[Token], i: usize) -> Option<HeaderMatch> {
    if !(tokens[i].is_word("make") || tokens[i].is_word("prepare")) {
        return None;
    }
    let from = if tokens.get(i + 1).is_some_and(|t| t.is_word("the")) {
        i + 2
    } else {
        i + 1
    };
    let words = label_run(tokens, from, true)?;
    let end = from + words.len();
    let terminated = tokens
        .get(end)
        .is_some_and(|t| t.kind == TokenKind::Colon || t.is_word("by"));
    if !terminated {
        return None;
    }
    Some(HeaderMatch {
        label: words.join(" "),
        start: tokens[i].start,
    })
}

/// "<label> (ingredients|mixture|topping|...):", `i` pointing at the colon
fn match_keyword_colon(tokens: &[Token], i: usize) -> Option<HeaderMatch> {
    if tokens[i].kind != TokenKind::Colon || i == 0 {
        return None;
    }
    let keyword_token = tokens[i - 1];
    let keyword = keyword_token.text.to_ascii_lowercase();
    if keyword_token.kind != TokenKind::Word || !HEADER_KEYWORDS.contains(&keyword.as_str()) {
        return None;
    }

    let mut first = i - 1;
    while first > 0 && (i - 1) - (first - 1) < MAX_LABEL_WORDS && tokens[first - 1].is_label_word()
    {
        first -= 1;
    }

    let prefix: Vec<&str> = tokens[first..i - 1].iter().map(|t| t.text).collect();
    let label = if keyword == "ingredients" {
        if prefix.is_empty() {
            return None;
        }
        prefix.join(" ")
    } else {
        tokens[first..i]
            .iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ")
    };

    Some(HeaderMatch {
        label,
        start: tokens[first].start,
    })
}

/// Distinct labels in order of first appearance
fn find_headers(text: &str) -> Vec<HeaderMatch> {
    let tokens = tokenize(text);
    let mut matches: Vec<HeaderMatch> = (0..tokens.len())
        .flat_map(|i| {
            [
                match_for_the(&tokens, i),
                match_keyword_colon(&tokens, i),
                match_make_the(&tokens, i),
            ]
        })
        .flatten()
        .filter(|m| !NOT_LABELS.contains(&m.label.to_ascii_lowercase().as_str()))
        .collect();
    matches.sort_by_key(|m| m.start);

    let mut seen: Vec<String> = Vec::new();
    matches.retain(|m| {
        let key = m.label.to_lowercase();
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    matches
}

/// The main word of an ingredient: last word of its name before any
/// comma or parenthesis ("2 cups all-purpose flour, sifted" -> "flour")
fn trailing_word(line: &str) -> Option<String> {
    let parsed = ingredient::parse(line);
    let head = parsed
        .name
        .split(|c: char| c == ',' || c == '(')
        .next()
        .unwrap_or_default();
    head.split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| w.chars().count() >= 3)
}

impl SectionStrategy for InstructionHeaders {
    fn name(&self) -> &'static str {
        "instruction_headers"
    }

    fn detect(&self, input: &DetectionInput) -> Option<Vec<Section>> {
        let text = input.instructions.as_str();
        let headers = find_headers(text);
        debug!(
            "Instruction headers: {:?}",
            headers.iter().map(|h| h.label.as_str()).collect::<Vec<_>>()
        );
        if headers.len() < 2 {
            return None;
        }

        let starts: Vec<Option<usize>> = headers.iter().map(|h| Some(h.start)).collect();
        let slices = slice_at(text, &starts);

        let mut sections = Vec::new();
        for (header, slice) in headers.iter().zip(slices) {
            let keywords = label_keywords(&header.label);
            let slice_lower = slice.to_lowercase();

            // An ingredient may land in several sections; assignments are not
            // de-duplicated across labels.
            let assigned: Vec<String> = input
                .ingredients
                .iter()
                .filter(|line| {
                    let lower = line.to_lowercase();
                    keywords.iter().any(|k| mentions(&lower, k))
                        || trailing_word(line).is_some_and(|w| slice_lower.contains(&w))
                })
                .cloned()
                .collect();

            if assigned.is_empty() {
                continue;
            }
            sections.push((title_case(&header.label), assigned, slice));
        }

        if sections.len() < 2 {
            return None;
        }

        Some(
            sections
                .into_iter()
                .enumerate()
                .map(|(idx, (label, ingredients, instructions))| {
                    Section::new(
                        format!("section-{}", idx + 1),
                        label,
                        ingredients,
                        instructions,
                    )
                })
                .collect(),
        )
    }
}
