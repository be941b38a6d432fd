//! Stateless draft validation
//!
//! Consulted by the panel before a draft is submitted. Each rule looks at
//! one field and reports every problem it finds instead of stopping at the
//! first one, so the operator sees the whole list at once.

use crate::blips::DraftRecord;
use serde_json::Number;
use std::fmt;

/// Longest name the host's database column accepts
pub const MAX_NAME_LEN: usize = 50;

const SPRITE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1000.0;
const COLOR_RANGE: std::ops::RangeInclusive<f64> = 0.0..=255.0;
const ALPHA_RANGE: std::ops::RangeInclusive<i64> = 0..=255;
/// Matches the scale slider in the settings form
const SCALE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_name(name: Option<&str>) -> Option<ValidationError> {
    let Some(name) = name else {
        return Some(ValidationError::new("name", "Blip name is required"));
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some(ValidationError::new("name", "Blip name cannot be empty"))
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        Some(ValidationError::new(
            "name",
            format!("Blip name cannot exceed {} characters", MAX_NAME_LEN),
        ))
    } else {
        None
    }
}

fn validate_int_range(
    field: &'static str,
    label: &str,
    value: Option<i64>,
    range: &std::ops::RangeInclusive<i64>,
) -> Option<ValidationError> {
    match value {
        None => Some(ValidationError::new(field, format!("{} is required", label))),
        Some(v) if !range.contains(&v) => Some(ValidationError::new(
            field,
            format!(
                "{} must be between {} and {}",
                label,
                range.start(),
                range.end()
            ),
        )),
        Some(_) => None,
    }
}

fn validate_number_range(
    field: &'static str,
    label: &str,
    value: Option<&Number>,
    range: &std::ops::RangeInclusive<f64>,
) -> Option<ValidationError> {
    let value = match value {
        None => return Some(ValidationError::new(field, format!("{} is required", label))),
        Some(n) => n.as_f64(),
    };
    match value {
        Some(v) if range.contains(&v) => None,
        _ => Some(ValidationError::new(
            field,
            format!(
                "{} must be between {} and {}",
                label,
                range.start(),
                range.end()
            ),
        )),
    }
}

pub fn validate_scale(scale: Option<f64>) -> Option<ValidationError> {
    match scale {
        None => Some(ValidationError::new("scale", "Scale is required")),
        Some(s) if !s.is_finite() || !SCALE_RANGE.contains(&s) => Some(ValidationError::new(
            "scale",
            format!(
                "Scale must be between {} and {}",
                SCALE_RANGE.start(),
                SCALE_RANGE.end()
            ),
        )),
        Some(_) => None,
    }
}

/// An unset timer means "host default"; a negative one is never valid
pub fn validate_flash_interval(ms: Option<&Number>) -> Option<ValidationError> {
    match ms.and_then(Number::as_f64) {
        Some(ms) if ms < 0.0 => Some(ValidationError::new(
            "ftimer",
            "Flash timer cannot be negative",
        )),
        _ => None,
    }
}

/// Run every rule against a draft; an empty list means it can be submitted
pub fn validate_draft(draft: &DraftRecord) -> Vec<ValidationError> {
    [
        validate_name(draft.name.as_deref()),
        validate_flash_interval(draft.flash_interval_ms.as_ref()),
        validate_number_range("Sprite", "Sprite", draft.sprite_id.as_ref(), &SPRITE_RANGE),
        validate_number_range("sColor", "Color", draft.color_id.as_ref(), &COLOR_RANGE),
        validate_int_range("alpha", "Alpha", draft.opacity, &ALPHA_RANGE),
        validate_scale(draft.scale),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DraftRecord {
        let mut draft = DraftRecord::blank();
        draft.name = Some(name.to_string());
        draft
    }

    #[test]
    fn test_named_blank_draft_is_valid() {
        assert!(validate_draft(&named("Bank")).is_empty());
    }

    #[test]
    fn test_blank_draft_needs_a_name() {
        let errors = validate_draft(&DraftRecord::blank());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name(None).is_some());
        assert!(validate_name(Some("   ")).is_some());
        assert!(validate_name(Some(&"x".repeat(MAX_NAME_LEN))).is_none());
        assert!(validate_name(Some(&"x".repeat(MAX_NAME_LEN + 1))).is_some());
        // Surrounding whitespace does not count toward the limit
        assert!(validate_name(Some(&format!("  {}  ", "x".repeat(MAX_NAME_LEN)))).is_none());
    }

    #[test]
    fn test_reports_every_failing_field() {
        let mut draft = named("Bank");
        draft.sprite_id = Some(Number::from(1001));
        draft.color_id = None;
        draft.opacity = Some(-1);
        draft.scale = Some(12.0);
        draft.flash_interval_ms = Some(Number::from(-5));

        let fields: Vec<_> = validate_draft(&draft).iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["ftimer", "Sprite", "sColor", "alpha", "scale"]);
    }

    #[test]
    fn test_fractional_sprite_in_range_is_accepted() {
        let mut draft = named("Bank");
        draft.sprite_id = Number::from_f64(60.5);
        assert!(validate_draft(&draft).is_empty());

        let over = Number::from_f64(1000.5);
        let error =
            validate_number_range("Sprite", "Sprite", over.as_ref(), &SPRITE_RANGE).unwrap();
        assert_eq!(error.message, "Sprite must be between 0 and 1000");
    }

    #[test]
    fn test_scale_rejects_nan() {
        assert!(validate_scale(Some(f64::NAN)).is_some());
        assert!(validate_scale(Some(0.0)).is_none());
        assert!(validate_scale(Some(10.0)).is_none());
    }

    #[test]
    fn test_display_includes_field() {
        let error = validate_name(None).unwrap();
        assert_eq!(error.to_string(), "name: Blip name is required");
    }
}
