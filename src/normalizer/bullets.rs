const BULLET: &str = "• ";

/// Fragments this short are noise ("Serve.", "Enjoy!") and are dropped
const MIN_FRAGMENT_CHARS: usize = 10;

/// Turn an instructions blob into bullet points.
///
/// 1. Split on sentence boundaries (a period followed by a capital letter),
///    blank lines and leading `1.`/`1)` step markers. If at least two
///    fragments longer than ten characters remain, each becomes a
///    capitalized bullet ending in a period.
/// 2. Otherwise, with two or more non-empty lines, lines without a bullet or
///    number marker get one.
/// 3. Otherwise the whole text is a single bullet.
///
/// Running the formatter on its own output leaves it unchanged.
pub fn format_bullets(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let fragments: Vec<String> = split_fragments(text)
        .into_iter()
        .filter(|f| f.chars().count() > MIN_FRAGMENT_CHARS)
        .collect();
    if fragments.len() >= 2 {
        return fragments
            .iter()
            .map(|f| format!("{BULLET}{}", ensure_period(&capitalize(strip_marker(f)))))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() >= 2 {
        return lines
            .iter()
            .map(|line| {
                if has_marker(line) {
                    line.to_string()
                } else {
                    format!("{BULLET}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    if has_marker(text) {
        text.to_string()
    } else {
        format!("{BULLET}{text}")
    }
}

/// Paragraphs (split on blank lines and step markers), then sentences.
/// Whitespace inside a fragment is collapsed to single spaces.
fn split_fragments(text: &str) -> Vec<String> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            flush(&mut current, &mut paragraphs);
            continue;
        }
        if let Some(rest) = strip_step_number(line) {
            flush(&mut current, &mut paragraphs);
            current.push(rest);
            continue;
        }
        current.push(line);
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
        .iter()
        .flat_map(|p| split_sentences(p))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

fn flush(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
        current.clear();
    }
}

/// Split after every period that is followed by whitespace and a capital letter
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c != '.' {
            continue;
        }
        let after = &text[i + 1..];
        let rest = after.trim_start();
        let has_gap = rest.len() < after.len();
        if has_gap && rest.chars().next().is_some_and(char::is_uppercase) {
            sentences.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// "1. Mix" / "2) Bake" -> the text after the marker
fn strip_step_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn has_marker(line: &str) -> bool {
    line.starts_with('•')
        || line.starts_with("- ")
        || line.starts_with("* ")
        || strip_step_number(line).is_some()
}

fn strip_marker(fragment: &str) -> &str {
    if let Some(rest) = strip_step_number(fragment) {
        return rest;
    }
    fragment
        .trim_start_matches(|c: char| c == '•' || c == '-' || c == '*')
        .trim_start()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ensure_period(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}
