use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A content type: a named group of typed field definitions that items
/// conform to.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Populated on single-collection fetches, absent in list responses.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Definition of one value inside a collection's items.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: i64,
    pub collection_id: i64,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: String,
    pub default_value: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated field definition ready to be written to the store.
#[derive(Debug, Clone)]
pub struct FieldInput {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: String,
    pub default_value: String,
    pub sort_order: i64,
}

/// The closed set of field types. Everything except `number`, `boolean`
/// and `date` stores plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Markdown,
    Email,
    Url,
    Number,
    Date,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field type '{0}'")]
pub struct InvalidFieldType(pub String);

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Markdown => "markdown",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = InvalidFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "textarea" => Ok(FieldType::Textarea),
            "markdown" => Ok(FieldType::Markdown),
            "email" => Ok(FieldType::Email),
            "url" => Ok(FieldType::Url),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(InvalidFieldType(other.to_string())),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_field_type() {
        for name in ["text", "textarea", "markdown", "email", "url", "number", "date", "boolean"] {
            let parsed: FieldType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn rejects_unknown_field_type() {
        let err = "json".parse::<FieldType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid field type 'json'");
    }
}
