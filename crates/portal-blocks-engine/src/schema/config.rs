use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::BlockType;
use crate::error::{BlockError, Result};
use crate::registry::registry;

/// Horizontal space a field takes in its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
}

impl FieldWidth {
    /// Legacy widths are free-form strings; only `"half"` survives, everything else is full.
    pub fn from_legacy(width: &str) -> Self {
        match width {
            "half" => FieldWidth::Half,
            _ => FieldWidth::Full,
        }
    }

    pub fn as_legacy(self) -> &'static str {
        match self {
            FieldWidth::Full => "full",
            FieldWidth::Half => "half",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Config for single-value input fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldBlockConfig {
    pub label: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub width: FieldWidth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    // Text-only constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Config for select, radio and multiselect fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFieldBlockConfig {
    #[serde(flatten)]
    pub field: FieldBlockConfig,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeaterBlockConfig {
    pub label: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub width: FieldWidth,
    pub min_items: u32,
    pub max_items: u32,
}

impl Default for RepeaterBlockConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            name: String::new(),
            description: None,
            required: false,
            width: FieldWidth::Full,
            min_items: 1,
            max_items: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupBlockConfig {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionBlockConfig {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub collapsible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingBlockConfig {
    pub text: String,
    pub level: u8,
}

impl Default for HeadingBlockConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphBlockConfig {
    pub text: String,
}

/// Columns, dividers and spacers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutBlockConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageBlockConfig {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalloutBlockConfig {
    pub text: String,
    pub tone: String,
}

impl Default for CalloutBlockConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            tone: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthBlockConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    pub allow_signup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonBlockConfig {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub variant: String,
}

impl ButtonBlockConfig {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ButtonBlockConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            href: None,
            variant: "primary".to_string(),
        }
    }
}

/// Type-specific block payload.
///
/// Serialized without a tag: the owning block's `type` selects the shape
/// when reading (see `ConfigShape` in the registry).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockConfig {
    Field(FieldBlockConfig),
    Select(SelectFieldBlockConfig),
    Repeater(RepeaterBlockConfig),
    Group(GroupBlockConfig),
    Section(SectionBlockConfig),
    Heading(HeadingBlockConfig),
    Paragraph(ParagraphBlockConfig),
    Layout(LayoutBlockConfig),
    Image(ImageBlockConfig),
    Callout(CalloutBlockConfig),
    Auth(AuthBlockConfig),
    Button(ButtonBlockConfig),
}

impl BlockConfig {
    /// The human-facing text of the block: label, title or body text.
    pub fn caption(&self) -> Option<&str> {
        let caption = match self {
            BlockConfig::Field(c) => c.label.as_str(),
            BlockConfig::Select(c) => c.field.label.as_str(),
            BlockConfig::Repeater(c) => c.label.as_str(),
            BlockConfig::Group(c) => c.label.as_str(),
            BlockConfig::Section(c) => c.title.as_str(),
            BlockConfig::Heading(c) => c.text.as_str(),
            BlockConfig::Paragraph(c) => c.text.as_str(),
            BlockConfig::Callout(c) => c.text.as_str(),
            BlockConfig::Button(c) => c.label.as_str(),
            BlockConfig::Image(c) => c.alt.as_str(),
            BlockConfig::Auth(c) => c.title.as_deref().unwrap_or_default(),
            BlockConfig::Layout(_) => "",
        };
        (!caption.is_empty()).then_some(caption)
    }

    /// The submitted field name, for shapes that post a value.
    pub fn name_mut(&mut self) -> Option<&mut String> {
        match self {
            BlockConfig::Field(c) => Some(&mut c.name),
            BlockConfig::Select(c) => Some(&mut c.field.name),
            BlockConfig::Repeater(c) => Some(&mut c.name),
            _ => None,
        }
    }

    /// The flat field config, for shapes that have one.
    pub fn field(&self) -> Option<&FieldBlockConfig> {
        match self {
            BlockConfig::Field(c) => Some(c),
            BlockConfig::Select(c) => Some(&c.field),
            _ => None,
        }
    }

    /// Merge `patch` one level deep and re-read the result as `block_type`'s
    /// config shape.
    ///
    /// Keys present in the patch overwrite, keys absent are kept, and a
    /// `null` resets the key to its default. Keys the shape has no slot for
    /// are ignored. A value of the wrong type is an `InvalidConfig` error and
    /// leaves `self` untouched.
    pub fn merged(&self, block_type: BlockType, patch: &ConfigPatch) -> Result<BlockConfig> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(source) => return Err(BlockError::InvalidConfig { block_type, source }),
        };
        for (key, value) in patch.entries() {
            if value.is_null() {
                map.remove(key);
            } else {
                map.insert(key.clone(), value.clone());
            }
        }
        registry()
            .definition_for(block_type)
            .shape
            .parse(block_type, Value::Object(map))
    }
}

/// A partial config update, keyed by wire (camelCase) config key.
///
/// Stays untyped so one patch can target any block's shape; typing happens
/// when it is merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPatch(Map<String, Value>);

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(label: impl Into<String>) -> Self {
        let label: String = label.into();
        Self::new().set("label", label)
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Reset `key` to the shape's default on merge.
    pub fn clear(self, key: &str) -> Self {
        self.set(key, Value::Null)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
