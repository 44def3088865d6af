//! The legacy flat form model: a `Section` holding `Field`s, with one level
//! of nesting for `repeater`/`group` fields.
//!
//! Every key is optional when reading so historical documents always load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::SelectOption;
use super::lenient;

/// A legacy select option: a bare string or an already-shaped pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyOption {
    Text(String),
    Pair(SelectOption),
    /// Anything else found in stored data (numbers, malformed objects).
    Other(Value),
}

impl LegacyOption {
    /// Normalize to a `{ value, label }` pair.
    ///
    /// Scalars are stringified, including the `value`/`label` of objects that
    /// did not parse as a string pair (`{ "value": 1, "label": "One" }`). A
    /// missing label repeats the value. Shapes with no usable value yield
    /// `None`.
    pub fn normalize(&self) -> Option<SelectOption> {
        match self {
            LegacyOption::Text(s) => Some(SelectOption::new(s.clone(), s.clone())),
            LegacyOption::Pair(pair) => Some(pair.clone()),
            LegacyOption::Other(Value::Object(map)) => {
                let value = map
                    .get("value")
                    .and_then(lenient::scalar_text)
                    .or_else(|| map.get("label").and_then(lenient::scalar_text))?;
                let label = map
                    .get("label")
                    .and_then(lenient::scalar_text)
                    .unwrap_or_else(|| value.clone());
                Some(SelectOption::new(value, label))
            }
            LegacyOption::Other(other) => {
                lenient::scalar_text(other).map(|s| SelectOption::new(s.clone(), s))
            }
        }
    }
}

/// Secondary storage for kind-specific settings on a legacy field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyFieldConfig {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_list"
    )]
    pub options: Option<Vec<LegacyOption>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub max_length: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub min_length: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub pattern: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub min_items: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_u32"
    )]
    pub max_items: Option<u32>,
}

impl LegacyFieldConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyField {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Legacy field kind (`text`, `select`, `repeater`, ...). Unknown kinds are kept verbatim.
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub placeholder: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub required: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub width: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_list"
    )]
    pub options: Option<Vec<LegacyOption>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub config: Option<LegacyFieldConfig>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_list"
    )]
    pub children: Option<Vec<LegacyField>>,
}

impl LegacyField {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            ..Default::default()
        }
    }
}

impl Default for LegacyField {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: "text".to_string(),
            label: String::new(),
            placeholder: None,
            description: None,
            required: false,
            width: "full".to_string(),
            validation: None,
            options: None,
            config: None,
            children: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySection {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub section_type: String,
    #[serde(deserialize_with = "lenient::list")]
    pub fields: Vec<LegacyField>,
}
