//! Typed coercion between raw inputs and stored item values.
//!
//! Every value that enters an item passes through here exactly once, at
//! write time. Reads never validate; whatever is stored is served as-is.

use serde_json::Value;

use crate::model::{Field, FieldType};

/// Spellings that a boolean field reads as true. Anything else non-empty
/// is false; boolean coercion never fails.
const TRUE_WORDS: [&str; 4] = ["true", "1", "yes", "on"];

/// A typed value produced by coercion. The set is closed: whatever a
/// field claims to be, the stored value has one of these shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(String),
}

impl FieldValue {
    /// Storage representation. Dates stay opaque strings.
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => Value::String(s),
            FieldValue::Number(n) => Value::from(n),
            FieldValue::Boolean(b) => Value::Bool(b),
        }
    }
}

/// Field-level rejection. The messages are stable: they surface verbatim
/// in API responses and import reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field '{0}' is empty")]
    RequiredFieldEmpty(String),
    #[error("invalid number for field '{0}'")]
    InvalidNumber(String),
    #[error("unsupported value for field '{0}'")]
    UnsupportedValue(String),
}

/// Coerce a textual input (a CSV cell, a form value) against a field
/// definition.
///
/// `Ok(None)` means absent: empty input on a non-required field stores no
/// entry at all. The required check runs before any type dispatch, so an
/// empty required number field reports "required", not "invalid number".
pub fn coerce_text(field: &Field, input: &str) -> Result<Option<FieldValue>, ValidationError> {
    if input.is_empty() {
        if field.required {
            return Err(ValidationError::RequiredFieldEmpty(field.name.clone()));
        }
        return Ok(None);
    }
    let value = match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Markdown | FieldType::Email | FieldType::Url => {
            FieldValue::Text(input.to_string())
        }
        FieldType::Number => {
            let number: f64 = input
                .parse()
                .map_err(|_| ValidationError::InvalidNumber(field.name.clone()))?;
            // NaN and infinities parse but have no JSON representation
            if !number.is_finite() {
                return Err(ValidationError::InvalidNumber(field.name.clone()));
            }
            FieldValue::Number(number)
        }
        FieldType::Boolean => FieldValue::Boolean(TRUE_WORDS.contains(&input)),
        FieldType::Date => FieldValue::Date(input.to_string()),
    };
    Ok(Some(value))
}

/// Coerce a JSON input (admin API writes) against a field definition.
/// Scalars reduce to the textual rules; arrays and objects are rejected.
pub fn coerce_json(field: &Field, input: &Value) -> Result<Option<FieldValue>, ValidationError> {
    match input {
        Value::Null => {
            if field.required {
                Err(ValidationError::RequiredFieldEmpty(field.name.clone()))
            } else {
                Ok(None)
            }
        }
        Value::String(s) => coerce_text(field, s),
        Value::Bool(b) => coerce_text(field, if *b { "true" } else { "false" }),
        Value::Number(n) => coerce_text(field, &n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(ValidationError::UnsupportedValue(field.name.clone())),
    }
}

/// Render a stored value for CSV export. Dispatch is on the stored shape,
/// so legacy or passthrough values still degrade to something printable.
pub fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => {
            if n.is_f64() {
                // std float Display is shortest round-trip and never
                // switches to exponent notation
                match n.as_f64() {
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            } else {
                n.to_string()
            }
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn field(name: &str, field_type: FieldType, required: bool) -> Field {
        Field {
            id: 0,
            collection_id: 0,
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            required,
            placeholder: String::new(),
            default_value: String::new(),
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn text_family_passes_through() {
        for ft in [FieldType::Text, FieldType::Textarea, FieldType::Markdown, FieldType::Email, FieldType::Url] {
            let f = field("body", ft, false);
            assert_eq!(
                coerce_text(&f, "hello <b>world</b>").unwrap(),
                Some(FieldValue::Text("hello <b>world</b>".to_string()))
            );
        }
    }

    #[test]
    fn boolean_truthy_table() {
        let f = field("published", FieldType::Boolean, false);
        for word in TRUE_WORDS {
            assert_eq!(coerce_text(&f, word).unwrap(), Some(FieldValue::Boolean(true)));
        }
        // exact spellings only; everything else non-empty is false
        for word in ["TRUE", "True", "false", "0", "no", "off", "banana"] {
            assert_eq!(coerce_text(&f, word).unwrap(), Some(FieldValue::Boolean(false)));
        }
    }

    #[test]
    fn number_parses_floats() {
        let f = field("price", FieldType::Number, false);
        assert_eq!(coerce_text(&f, "3.14").unwrap(), Some(FieldValue::Number(3.14)));
        assert_eq!(coerce_text(&f, "-42").unwrap(), Some(FieldValue::Number(-42.0)));
        assert_eq!(coerce_text(&f, "1e3").unwrap(), Some(FieldValue::Number(1000.0)));
    }

    #[test]
    fn number_rejects_garbage() {
        let f = field("price", FieldType::Number, false);
        for bad in ["abc", "12px", "NaN", "inf"] {
            let err = coerce_text(&f, bad).unwrap_err();
            assert_eq!(err.to_string(), "invalid number for field 'price'");
        }
    }

    #[test]
    fn required_empty_wins_over_type() {
        let f = field("price", FieldType::Number, true);
        let err = coerce_text(&f, "").unwrap_err();
        assert_eq!(err.to_string(), "required field 'price' is empty");
    }

    #[test]
    fn optional_empty_is_absent() {
        let f = field("note", FieldType::Text, false);
        assert_eq!(coerce_text(&f, "").unwrap(), None);
    }

    #[test]
    fn whitespace_is_not_empty() {
        let f = field("note", FieldType::Text, true);
        assert_eq!(coerce_text(&f, " ").unwrap(), Some(FieldValue::Text(" ".to_string())));
    }

    #[test]
    fn date_is_opaque() {
        let f = field("due", FieldType::Date, false);
        assert_eq!(
            coerce_text(&f, "not-a-date").unwrap(),
            Some(FieldValue::Date("not-a-date".to_string()))
        );
    }

    #[test]
    fn json_null_is_absent_unless_required() {
        let optional = field("note", FieldType::Text, false);
        assert_eq!(coerce_json(&optional, &Value::Null).unwrap(), None);

        let required = field("title", FieldType::Text, true);
        let err = coerce_json(&required, &Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "required field 'title' is empty");
    }

    #[test]
    fn json_scalars_reduce_to_text_rules() {
        let price = field("price", FieldType::Number, false);
        assert_eq!(coerce_json(&price, &json!(2.5)).unwrap(), Some(FieldValue::Number(2.5)));

        let published = field("published", FieldType::Boolean, false);
        assert_eq!(coerce_json(&published, &json!(true)).unwrap(), Some(FieldValue::Boolean(true)));

        let title = field("title", FieldType::Text, false);
        assert_eq!(coerce_json(&title, &json!(5)).unwrap(), Some(FieldValue::Text("5".to_string())));
    }

    #[test]
    fn json_compounds_are_unsupported() {
        let f = field("tags", FieldType::Text, false);
        for bad in [json!([1, 2]), json!({"a": 1})] {
            let err = coerce_json(&f, &bad).unwrap_err();
            assert_eq!(err.to_string(), "unsupported value for field 'tags'");
        }
    }

    #[test]
    fn render_covers_every_stored_shape() {
        assert_eq!(render(None), "");
        assert_eq!(render(Some(&Value::Null)), "");
        assert_eq!(render(Some(&json!("plain"))), "plain");
        assert_eq!(render(Some(&json!(true))), "true");
        assert_eq!(render(Some(&json!(false))), "false");
        assert_eq!(render(Some(&json!(3.14))), "3.14");
        assert_eq!(render(Some(&json!(42))), "42");
    }

    #[test]
    fn render_never_uses_exponent_form() {
        assert_eq!(render(Some(&json!(1e20))), "100000000000000000000");
        assert_eq!(render(Some(&json!(100.0))), "100");
    }

    #[test]
    fn values_round_trip_through_json() {
        assert_eq!(FieldValue::Number(2.5).into_json(), json!(2.5));
        assert_eq!(FieldValue::Boolean(false).into_json(), json!(false));
        assert_eq!(FieldValue::Date("2024-01-01".to_string()).into_json(), json!("2024-01-01"));
    }
}
