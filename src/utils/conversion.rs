//! Lenient numeric decoding for upstream JSON.
//!
//! Exchange APIs disagree on whether numbers travel as JSON numbers or as
//! strings (`"123.45"`), and some send `null` or `""` for idle markets.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Parse a numeric string, treating empty or malformed input as missing.
pub fn str_to_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serde helper: number, numeric string, `null` or absent -> `f64` (0.0 when unusable).
pub fn de_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_f64_lenient(deserializer)?.unwrap_or(0.0))
}

/// Serde helper: number, numeric string, `null` or absent -> `Option<f64>`.
pub fn de_opt_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrString::String(s)) => str_to_f64(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "de_f64_lenient")]
        a: f64,
        #[serde(default, deserialize_with = "de_opt_f64_lenient")]
        b: Option<f64>,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let row: Row = serde_json::from_str(r#"{"a":"12.5","b":3}"#).unwrap();
        assert_eq!(row.a, 12.5);
        assert_eq!(row.b, Some(3.0));
    }

    #[test]
    fn test_missing_and_empty_values() {
        let row: Row = serde_json::from_str(r#"{"b":""}"#).unwrap();
        assert_eq!(row.a, 0.0);
        assert_eq!(row.b, None);

        let row: Row = serde_json::from_str(r#"{"a":null,"b":null}"#).unwrap();
        assert_eq!(row.a, 0.0);
        assert_eq!(row.b, None);
    }

    #[test]
    fn test_str_to_f64() {
        assert_eq!(str_to_f64(" 1e3 "), Some(1000.0));
        assert_eq!(str_to_f64("abc"), None);
        assert_eq!(str_to_f64("NaN"), None);
    }
}
