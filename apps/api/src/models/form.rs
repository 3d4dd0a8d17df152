//! Helpers for values that arrive from HTML form inputs.
//!
//! Form fields are strings, but API clients often send numbers for the same
//! fields. Both are accepted and kept as the raw string; callers decide how
//! to coerce.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
    Null,
}

/// Deserializes a string, a number or `null` into a `String` (`null` → `""`).
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
        StringOrNumber::Null => String::new(),
    })
}

/// Coerces a form value the way a loose numeric input does: blank is `0`,
/// anything unparseable is `NaN`. Only finite numbers parse, so spellings
/// such as `inf` or `nan` are `NaN` too.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_or_number")]
        value: String,
    }

    fn probe(json: &str) -> String {
        serde_json::from_str::<Probe>(json).unwrap().value
    }

    #[test]
    fn test_accepts_strings_and_numbers() {
        assert_eq!(probe(r#"{"value": "110"}"#), "110");
        assert_eq!(probe(r#"{"value": 110}"#), "110");
        assert_eq!(probe(r#"{"value": 1.5}"#), "1.5");
        assert_eq!(probe(r#"{"value": null}"#), "");
        assert_eq!(probe(r#"{}"#), "");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("  "), 0.0);
        assert_eq!(coerce_number(" 2000 "), 2000.0);
        assert_eq!(coerce_number("1.5"), 1.5);
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("120/80").is_nan());
    }

    #[test]
    fn test_non_finite_spellings_are_nan() {
        for raw in ["inf", "-inf", "infinity", "Infinity", "nan", "NaN", "1e400"] {
            assert!(coerce_number(raw).is_nan(), "{raw}");
        }
    }
}
