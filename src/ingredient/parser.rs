use serde::Serialize;

/// Unit used when a line carries no unit word
pub const DEFAULT_UNIT: &str = "each";

/// One ingredient line split into quantity, unit and name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredientLine {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
}

impl ParsedIngredientLine {
    fn unquantified(line: &str) -> Self {
        ParsedIngredientLine {
            quantity: 1.0,
            unit: DEFAULT_UNIT.to_string(),
            name: line.trim().to_string(),
        }
    }
}

/// Parse a free-text ingredient line.
///
/// Grammar: `QUANTITY [UNIT] NAME`, where QUANTITY is an integer, a decimal,
/// a simple fraction `a/b`, a mixed number `1 1/2` or a unicode vulgar
/// fraction, and UNIT is any alphabetic token directly after it. Units are
/// not checked against a vocabulary. Lines without a leading quantity come
/// back as `1 each <line>`. Never fails.
pub fn parse(line: &str) -> ParsedIngredientLine {
    let text = line.trim();

    let Some((quantity, consumed)) = read_quantity(text) else {
        return ParsedIngredientLine::unquantified(text);
    };

    let rest = text[consumed..].trim_start();
    if rest.is_empty() {
        return ParsedIngredientLine::unquantified(text);
    }

    match read_unit(rest) {
        Some((unit, remainder)) => {
            let name = strip_of(remainder.trim());
            if name.is_empty() {
                // "2 eggs": the only word is the ingredient itself
                ParsedIngredientLine {
                    quantity,
                    unit: DEFAULT_UNIT.to_string(),
                    name: unit.to_string(),
                }
            } else {
                ParsedIngredientLine {
                    quantity,
                    unit: unit.to_string(),
                    name: name.to_string(),
                }
            }
        }
        None => ParsedIngredientLine {
            quantity,
            unit: DEFAULT_UNIT.to_string(),
            name: rest.to_string(),
        },
    }
}

/// Read the leading quantity token. Returns its value and the number of
/// bytes consumed.
fn read_quantity(text: &str) -> Option<(f64, usize)> {
    if let Some((value, len)) = read_vulgar(text) {
        return Some((value, len));
    }

    let (whole, mut pos) = read_number(text)?;
    let mut value = whole;

    let after = &text[pos..];
    if let Some((frac, len)) = read_vulgar(after) {
        // "1½"
        value += frac;
        pos += len;
    } else if whole.fract() == 0.0 && after.starts_with(char::is_whitespace) {
        // "1 1/2" or "1 ½"
        let trimmed = after.trim_start();
        let skipped = after.len() - trimmed.len();
        if let Some((frac, len)) = read_vulgar(trimmed) {
            value += frac;
            pos += skipped + len;
        } else if let Some((frac, len)) = read_fraction(trimmed) {
            if frac < 1.0 {
                value += frac;
                pos += skipped + len;
            }
        }
    }

    Some((value, pos))
}

/// Integer, decimal or simple fraction
fn read_number(text: &str) -> Option<(f64, usize)> {
    if let Some(fraction) = read_fraction(text) {
        return Some(fraction);
    }

    let int_len = digit_run(text);
    if int_len == 0 {
        return None;
    }

    let rest = &text[int_len..];
    if rest.starts_with('/') {
        // "1/0": a fraction that failed to read is not a quantity
        return None;
    }
    if let Some(decimals) = rest.strip_prefix('.') {
        let dec_len = digit_run(decimals);
        if dec_len > 0 {
            let len = int_len + 1 + dec_len;
            return text[..len].parse::<f64>().ok().map(|v| (v, len));
        }
    }

    text[..int_len].parse::<f64>().ok().map(|v| (v, int_len))
}

/// `a/b` with a non-zero denominator
fn read_fraction(text: &str) -> Option<(f64, usize)> {
    let num_len = digit_run(text);
    if num_len == 0 {
        return None;
    }
    let rest = text[num_len..].strip_prefix('/')?;
    let den_len = digit_run(rest);
    if den_len == 0 {
        return None;
    }

    let numerator = text[..num_len].parse::<f64>().ok()?;
    let denominator = rest[..den_len].parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }

    Some((numerator / denominator, num_len + 1 + den_len))
}

fn read_vulgar(text: &str) -> Option<(f64, usize)> {
    let c = text.chars().next()?;
    let value = match c {
        '¼' => 0.25,
        '½' => 0.5,
        '¾' => 0.75,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '⅛' => 0.125,
        '⅜' => 0.375,
        '⅝' => 0.625,
        '⅞' => 0.875,
        _ => return None,
    };
    Some((value, c.len_utf8()))
}

fn digit_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// An alphabetic token (with an optional abbreviation dot) followed by a
/// word boundary. Returns the unit and the text after it.
fn read_unit(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }

    let unit = &text[..end];
    let mut rest = &text[end..];
    if let Some(after_dot) = rest.strip_prefix('.') {
        rest = after_dot;
    }

    match rest.chars().next() {
        None => Some((unit, rest)),
        Some(c) if c.is_whitespace() => Some((unit, rest)),
        // "2 x-large", "1 onion, diced": not a clean unit token
        Some(_) => None,
    }
}

fn strip_of(name: &str) -> &str {
    match name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("of ") => name[3..].trim_start(),
        _ => name,
    }
}
