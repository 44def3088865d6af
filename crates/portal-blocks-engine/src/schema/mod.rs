//! # Block Schema
//!
//! Pure data definitions for the portal block model.
//!
//! ## Modules
//!
//! - **`config`**: Per-type configuration payloads (`BlockConfig`) and the
//!   partial `ConfigPatch` used by tree updates
//! - **`legacy`**: The flat `Section -> Field[]` document the legacy adapter reads and writes
//! - **`lenient`**: null- and type-tolerant readers for legacy keys
//!
//! ## Key Invariants
//!
//! - A block's category is derived from its type through the registry and is never stored
//! - Only container blocks (`section`, `repeater`, `group`) carry children
//! - Sibling order is the order of the `children` vector; `position` is advisory

pub mod config;
pub mod legacy;
mod lenient;

use std::fmt;
use std::str::FromStr;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::error::BlockError;
use crate::registry::registry;

pub use config::{
    AuthBlockConfig, BlockConfig, ButtonBlockConfig, CalloutBlockConfig, ConfigPatch,
    FieldBlockConfig, FieldWidth, GroupBlockConfig, HeadingBlockConfig, ImageBlockConfig,
    LayoutBlockConfig, ParagraphBlockConfig, RepeaterBlockConfig, SectionBlockConfig,
    SelectFieldBlockConfig, SelectOption,
};
pub use legacy::{LegacyField, LegacyFieldConfig, LegacyOption, LegacySection};

/// An ordered list of sibling blocks.
///
/// Persistent vector: cloning is cheap and edits copy only the touched path.
pub type Forest = Vector<Block>;

/// Identifier of a block, unique within one document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BlockId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Broad grouping of block types, used for registry queries and containment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Field,
    Container,
    Layout,
    Display,
    Auth,
    Action,
}

/// The closed set of block type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    // Fields
    TextField,
    TextareaField,
    EmailField,
    PhoneField,
    NumberField,
    DateField,
    SelectField,
    CheckboxField,
    FileUpload,
    RadioField,
    MultiselectField,
    // Containers
    Section,
    Repeater,
    Group,
    // Layout
    Columns,
    Divider,
    Spacer,
    // Display
    Heading,
    Paragraph,
    Image,
    Callout,
    // Auth
    LoginForm,
    SignupForm,
    PasswordReset,
    // Actions
    SubmitButton,
    SaveDraftButton,
    LinkButton,
}

impl BlockType {
    pub const ALL: [BlockType; 27] = [
        BlockType::TextField,
        BlockType::TextareaField,
        BlockType::EmailField,
        BlockType::PhoneField,
        BlockType::NumberField,
        BlockType::DateField,
        BlockType::SelectField,
        BlockType::CheckboxField,
        BlockType::FileUpload,
        BlockType::RadioField,
        BlockType::MultiselectField,
        BlockType::Section,
        BlockType::Repeater,
        BlockType::Group,
        BlockType::Columns,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Heading,
        BlockType::Paragraph,
        BlockType::Image,
        BlockType::Callout,
        BlockType::LoginForm,
        BlockType::SignupForm,
        BlockType::PasswordReset,
        BlockType::SubmitButton,
        BlockType::SaveDraftButton,
        BlockType::LinkButton,
    ];

    /// The wire tag, e.g. `"text-field"`.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::TextField => "text-field",
            BlockType::TextareaField => "textarea-field",
            BlockType::EmailField => "email-field",
            BlockType::PhoneField => "phone-field",
            BlockType::NumberField => "number-field",
            BlockType::DateField => "date-field",
            BlockType::SelectField => "select-field",
            BlockType::CheckboxField => "checkbox-field",
            BlockType::FileUpload => "file-upload",
            BlockType::RadioField => "radio-field",
            BlockType::MultiselectField => "multiselect-field",
            BlockType::Section => "section",
            BlockType::Repeater => "repeater",
            BlockType::Group => "group",
            BlockType::Columns => "columns",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Image => "image",
            BlockType::Callout => "callout",
            BlockType::LoginForm => "login-form",
            BlockType::SignupForm => "signup-form",
            BlockType::PasswordReset => "password-reset",
            BlockType::SubmitButton => "submit-button",
            BlockType::SaveDraftButton => "save-draft-button",
            BlockType::LinkButton => "link-button",
        }
    }

    pub fn category(self) -> Category {
        registry().definition_for(self).category
    }

    pub fn is_container(self) -> bool {
        self.category() == Category::Container
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| BlockError::UnknownBlockType(tag.to_string()))
    }
}

/// A node in the portal block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Advisory sibling order carried for legacy compatibility.
    pub position: usize,
    pub config: BlockConfig,
    /// Always empty for non-container blocks.
    pub children: Forest,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, block_type: BlockType, config: BlockConfig) -> Self {
        Self {
            id: id.into(),
            block_type,
            position: 0,
            config,
            children: Vector::new(),
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Attach children. Ignored (and logged) for non-container blocks.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Block>) -> Self {
        let children: Forest = children.into_iter().collect();
        if self.is_container() {
            self.children = children;
        } else if !children.is_empty() {
            log::warn!(
                "ignoring {} children on {} block {}",
                children.len(),
                self.block_type,
                self.id
            );
        }
        self
    }

    pub fn category(&self) -> Category {
        self.block_type.category()
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireBlock<'a> {
    id: &'a BlockId,
    #[serde(rename = "type")]
    block_type: BlockType,
    category: Category,
    position: usize,
    config: &'a BlockConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a Forest>,
}

impl Serialize for Block {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireBlock {
            id: &self.id,
            block_type: self.block_type,
            category: self.category(),
            position: self.position,
            config: &self.config,
            children: self.is_container().then_some(&self.children),
        }
        .serialize(serializer)
    }
}

/// Deserialization input; `category` on the wire is ignored and re-derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    position: usize,
    #[serde(default)]
    config: Option<serde_json::Value>,
    #[serde(default)]
    children: Forest,
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let definition = registry().definition(&raw.block_type)?;
        let config = match raw.config {
            Some(value) => definition.shape.parse(definition.block_type, value)?,
            None => definition.default_config_for(&raw.id),
        };
        Ok(Block::new(raw.id, definition.block_type, config)
            .at(raw.position)
            .with_children(raw.children))
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBlock::deserialize(deserializer)?;
        Block::try_from(raw).map_err(serde::de::Error::custom)
    }
}
