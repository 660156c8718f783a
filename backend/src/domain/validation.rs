//! Field-level input checks shared by the expense and category services.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{FieldError, NumberInput};

use crate::domain::period::{parse_timestamp, Bound};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

/// Trimmed, non-empty text
pub fn required_text(field: &str, value: Option<&str>, message: &str) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FieldError::new(field, message)),
    }
}

/// Largest accepted amount, budget or calculator input. Sums of bounded values stay finite.
pub const MAX_NUMBER: f64 = 1e12;

/// A finite number between zero and `MAX_NUMBER`
pub fn non_negative(field: &str, value: Option<&NumberInput>, message: &str) -> Result<f64, FieldError> {
    match value.and_then(NumberInput::value) {
        Some(v) if v > MAX_NUMBER => Err(FieldError::new(field, too_large())),
        Some(v) if v >= 0.0 => Ok(v),
        _ => Err(FieldError::new(field, message)),
    }
}

fn too_large() -> String {
    format!("Must not exceed {}", MAX_NUMBER)
}

/// `#RRGGBB`
pub fn hex_color(field: &str, value: Option<&str>) -> Result<String, FieldError> {
    let color = required_text(field, value, "Color is required")?;
    if HEX_COLOR.is_match(&color) {
        Ok(color)
    } else {
        Err(FieldError::new(field, "Valid color hex code is required"))
    }
}

pub fn timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, FieldError> {
    parse_timestamp(value, Bound::Start).ok_or_else(|| FieldError::new(field, "Valid date is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("title", Some("  Coffee "), "Title is required").unwrap(), "Coffee");
        assert!(required_text("title", Some("   "), "Title is required").is_err());
        assert!(required_text("title", None, "Title is required").is_err());
    }

    #[test]
    fn test_non_negative() {
        let msg = "Amount must be a positive number";
        assert_eq!(non_negative("amount", Some(&NumberInput::Number(0.0)), msg).unwrap(), 0.0);
        assert_eq!(
            non_negative("amount", Some(&NumberInput::Text("4.50".into())), msg).unwrap(),
            4.5
        );
        assert!(non_negative("amount", Some(&NumberInput::Number(-1.0)), msg).is_err());
        assert!(non_negative("amount", Some(&NumberInput::Text("four".into())), msg).is_err());
        assert!(non_negative("amount", None, msg).is_err());
    }

    #[test]
    fn test_non_negative_rejects_values_above_ceiling() {
        let msg = "Amount must be a positive number";
        assert_eq!(
            non_negative("amount", Some(&NumberInput::Number(MAX_NUMBER)), msg).unwrap(),
            MAX_NUMBER
        );

        let err = non_negative("amount", Some(&NumberInput::Number(1e308)), msg).unwrap_err();
        assert_eq!(err.field, "amount");
        assert_eq!(err.message, "Must not exceed 1000000000000");

        let err = non_negative("budget", Some(&NumberInput::Text("1e13".into())), msg).unwrap_err();
        assert_eq!(err.field, "budget");
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("color", Some("#3B82F6")).unwrap(), "#3B82F6");
        assert_eq!(hex_color("color", Some(" #abcdef ")).unwrap(), "#abcdef");

        let missing = hex_color("color", None).unwrap_err();
        assert_eq!(missing.message, "Color is required");

        for bad in ["3B82F6", "#3B82F", "#3B82F6A", "#GGGGGG"] {
            let err = hex_color("color", Some(bad)).unwrap_err();
            assert_eq!(err.message, "Valid color hex code is required", "input {}", bad);
        }
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(
            timestamp("date", "2025-01-10").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            timestamp("date", "2025-01-10T15:30:00Z").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 10, 15, 30, 0).unwrap()
        );
        assert_eq!(timestamp("date", "tomorrow").unwrap_err().field, "date");
    }
}
