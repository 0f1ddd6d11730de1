use serde::Serialize;

/// How close a value has to be to a whole number or a known fraction to be
/// displayed as one
const TOLERANCE: f64 = 0.01;

const KNOWN_FRACTIONS: [(f64, &str); 5] = [
    (0.25, "1/4"),
    (1.0 / 3.0, "1/3"),
    (0.5, "1/2"),
    (2.0 / 3.0, "2/3"),
    (0.75, "3/4"),
];

/// A scaled amount together with its human-readable form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledQuantity {
    pub value: f64,
    pub display: String,
}

/// Multiply `qty` by `factor` and format the result for display
pub fn scale(qty: f64, factor: f64) -> ScaledQuantity {
    let value = qty * factor;
    ScaledQuantity {
        value,
        display: format_quantity(value),
    }
}

/// Ratio of desired servings to a recipe's native servings.
///
/// A missing or non-positive base counts as 1. A zero target scales to
/// nothing; only a NaN or infinite target falls back to "as written".
pub fn scale_factor(desired: f64, base: Option<f64>) -> f64 {
    if !desired.is_finite() {
        return 1.0;
    }
    let base = match base {
        Some(b) if b.is_finite() && b > 0.0 => b,
        _ => 1.0,
    };
    desired / base
}

/// Render a quantity as an integer, a common fraction or a decimal.
///
/// Near-integers print as integers; values whose fractional part is close
/// to a quarter, third, half, two-thirds or three-quarters print as
/// `whole fraction` (`1 1/2`, `2/3`); everything else gets two decimals
/// with a trailing `.00` dropped.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_quantity(-value));
    }

    let rounded = value.round();
    if (value - rounded).abs() < TOLERANCE {
        return format!("{}", rounded as i64);
    }

    let whole = value.trunc();
    let remainder = value - whole;
    if let Some((_, fraction)) = KNOWN_FRACTIONS
        .iter()
        .find(|(known, _)| (remainder - known).abs() <= TOLERANCE)
    {
        return if whole == 0.0 {
            fraction.to_string()
        } else {
            format!("{} {}", whole as i64, fraction)
        };
    }

    let decimal = format!("{:.2}", value);
    match decimal.strip_suffix(".00") {
        Some(stripped) => stripped.to_string(),
        None => decimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(scale(2.0, 1.0).display, "2");
        assert_eq!(scale(0.3333, 3.0).display, "1");
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(12.0), "12");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(scale(0.5, 1.0).display, "1/2");
        assert_eq!(format_quantity(0.25), "1/4");
        assert_eq!(format_quantity(0.333), "1/3");
        assert_eq!(format_quantity(0.6667), "2/3");
        assert_eq!(format_quantity(0.75), "3/4");
        assert_eq!(format_quantity(1.5), "1 1/2");
        assert_eq!(format_quantity(2.33), "2 1/3");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(format_quantity(0.2), "0.20");
        assert_eq!(format_quantity(1.1), "1.10");
        assert_eq!(format_quantity(2.875), "2.88");
    }

    #[test]
    fn test_linearity() {
        for (qty, factor) in [(1.0, 2.0), (0.75, 1.5), (3.0, 0.25), (2.5, 4.0)] {
            assert_eq!(scale(qty, factor).value, qty * factor);
        }
    }

    #[test]
    fn test_scale_factor_guards() {
        assert_eq!(scale_factor(8.0, Some(4.0)), 2.0);
        assert_eq!(scale_factor(3.0, Some(0.0)), 3.0);
        assert_eq!(scale_factor(3.0, None), 3.0);
        assert_eq!(scale_factor(0.0, Some(4.0)), 0.0);
        assert_eq!(scale_factor(-2.0, Some(4.0)), -0.5);
        assert_eq!(scale_factor(f64::NAN, Some(4.0)), 1.0);
        assert_eq!(scale_factor(f64::INFINITY, None), 1.0);
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(format_quantity(f64::INFINITY), "0");
        assert_eq!(format_quantity(-0.5), "-1/2");
    }
}
