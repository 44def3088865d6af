//! # Block Registry
//!
//! Read-only table from block type to category, default config and legacy
//! field kind. Built once on first use; every other module resolves
//! categories and defaults through it.

use std::sync::LazyLock;

use serde_json::Value;

use crate::error::{BlockError, Result};
use crate::schema::{
    AuthBlockConfig, BlockConfig, BlockId, BlockType, ButtonBlockConfig, CalloutBlockConfig, Category,
    FieldBlockConfig, GroupBlockConfig, HeadingBlockConfig, ImageBlockConfig, LayoutBlockConfig,
    ParagraphBlockConfig, RepeaterBlockConfig, SectionBlockConfig, SelectFieldBlockConfig,
    SelectOption,
};

/// Which `BlockConfig` variant a block type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigShape {
    Field,
    Select,
    Repeater,
    Group,
    Section,
    Heading,
    Paragraph,
    Layout,
    Image,
    Callout,
    Auth,
    Button,
}

impl ConfigShape {
    /// Read a config payload of this shape from JSON.
    pub fn parse(self, block_type: BlockType, value: Value) -> Result<BlockConfig> {
        let parsed = match self {
            ConfigShape::Field => serde_json::from_value(value).map(BlockConfig::Field),
            ConfigShape::Select => serde_json::from_value(value).map(BlockConfig::Select),
            ConfigShape::Repeater => serde_json::from_value(value).map(BlockConfig::Repeater),
            ConfigShape::Group => serde_json::from_value(value).map(BlockConfig::Group),
            ConfigShape::Section => serde_json::from_value(value).map(BlockConfig::Section),
            ConfigShape::Heading => serde_json::from_value(value).map(BlockConfig::Heading),
            ConfigShape::Paragraph => serde_json::from_value(value).map(BlockConfig::Paragraph),
            ConfigShape::Layout => serde_json::from_value(value).map(BlockConfig::Layout),
            ConfigShape::Image => serde_json::from_value(value).map(BlockConfig::Image),
            ConfigShape::Callout => serde_json::from_value(value).map(BlockConfig::Callout),
            ConfigShape::Auth => serde_json::from_value(value).map(BlockConfig::Auth),
            ConfigShape::Button => serde_json::from_value(value).map(BlockConfig::Button),
        };
        parsed.map_err(|source| BlockError::InvalidConfig { block_type, source })
    }
}

/// How a block type maps onto the legacy field vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyMapping {
    pub kind: &'static str,
    /// Whether blocks of this type convert back into a legacy field.
    pub reversible: bool,
}

#[derive(Debug, Clone)]
pub struct BlockDefinition {
    pub block_type: BlockType,
    pub category: Category,
    pub display_name: &'static str,
    pub shape: ConfigShape,
    pub legacy: Option<LegacyMapping>,
    defaults: fn() -> BlockConfig,
}

impl BlockDefinition {
    pub fn is_container(&self) -> bool {
        self.category == Category::Container
    }

    /// The type's config template. Field `name`s are left empty because
    /// they derive from a block id; use `default_config_for` when one is known.
    pub fn default_config(&self) -> BlockConfig {
        (self.defaults)()
    }

    /// A structurally valid config for block `id`, with every required key
    /// filled and any field `name` generated from the id.
    pub fn default_config_for(&self, id: &BlockId) -> BlockConfig {
        let mut config = self.default_config();
        if let Some(name) = config.name_mut() {
            *name = field_name(DEFAULT_NAME_PREFIX, id);
        }
        config
    }
}

pub struct BlockRegistry {
    /// Indexed by `BlockType` discriminant, in `BlockType::ALL` order.
    definitions: Vec<BlockDefinition>,
}

impl BlockRegistry {
    fn builtin() -> Self {
        Self {
            definitions: BlockType::ALL.into_iter().map(builtin_definition).collect(),
        }
    }

    pub fn definition_for(&self, block_type: BlockType) -> &BlockDefinition {
        &self.definitions[block_type as usize]
    }

    /// Strict lookup by wire tag.
    pub fn definition(&self, tag: &str) -> Result<&BlockDefinition> {
        self.definitions
            .iter()
            .find(|d| d.block_type.as_str() == tag)
            .ok_or_else(|| BlockError::UnknownBlockType(tag.to_string()))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions
            .iter()
            .filter(move |d| d.category == category)
    }

    /// Block type for a legacy field kind, if the kind is mapped.
    pub fn block_type_for_legacy(&self, kind: &str) -> Option<BlockType> {
        self.definitions
            .iter()
            .find(|d| d.legacy.is_some_and(|l| l.kind == kind))
            .map(|d| d.block_type)
    }

    pub fn legacy_kind(&self, block_type: BlockType) -> Option<&'static str> {
        self.definition_for(block_type).legacy.map(|l| l.kind)
    }
}

static REGISTRY: LazyLock<BlockRegistry> = LazyLock::new(BlockRegistry::builtin);

pub fn registry() -> &'static BlockRegistry {
    &REGISTRY
}

pub const DEFAULT_FIELD_LABEL: &str = "New Field";
pub const DEFAULT_NAME_PREFIX: &str = "field_";

/// `prefix` followed by `id` with every non-alphanumeric replaced by `_`.
pub fn field_name(prefix: &str, id: &BlockId) -> String {
    let slug: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{prefix}{slug}")
}

fn field_defaults() -> BlockConfig {
    BlockConfig::Field(FieldBlockConfig {
        label: DEFAULT_FIELD_LABEL.to_string(),
        ..Default::default()
    })
}

fn select_defaults() -> BlockConfig {
    BlockConfig::Select(SelectFieldBlockConfig {
        field: FieldBlockConfig {
            label: DEFAULT_FIELD_LABEL.to_string(),
            ..Default::default()
        },
        options: vec![
            SelectOption::new("option-1", "Option 1"),
            SelectOption::new("option-2", "Option 2"),
        ],
    })
}

const fn field(kind: &'static str) -> Option<LegacyMapping> {
    Some(LegacyMapping {
        kind,
        reversible: true,
    })
}

fn builtin_definition(block_type: BlockType) -> BlockDefinition {
    use BlockType as T;
    use Category as C;
    use ConfigShape as S;

    let (category, display_name, shape, legacy, defaults): (
        Category,
        &'static str,
        ConfigShape,
        Option<LegacyMapping>,
        fn() -> BlockConfig,
    ) = match block_type {
        T::TextField => (C::Field, "Text", S::Field, field("text"), field_defaults),
        T::TextareaField => (C::Field, "Long Text", S::Field, field("textarea"), field_defaults),
        T::EmailField => (C::Field, "Email", S::Field, field("email"), field_defaults),
        T::PhoneField => (C::Field, "Phone", S::Field, field("phone"), field_defaults),
        T::NumberField => (C::Field, "Number", S::Field, field("number"), field_defaults),
        T::DateField => (C::Field, "Date", S::Field, field("date"), field_defaults),
        T::SelectField => (C::Field, "Dropdown", S::Select, field("select"), select_defaults),
        T::CheckboxField => (C::Field, "Checkbox", S::Field, field("checkbox"), field_defaults),
        T::FileUpload => (C::Field, "File Upload", S::Field, field("file"), field_defaults),
        T::RadioField => (C::Field, "Radio", S::Select, field("radio"), select_defaults),
        T::MultiselectField => (
            C::Field,
            "Multi Select",
            S::Select,
            field("multiselect"),
            select_defaults,
        ),
        T::Section => (C::Container, "Section", S::Section, None, || {
            BlockConfig::Section(SectionBlockConfig {
                title: "New Section".to_string(),
                ..Default::default()
            })
        }),
        T::Repeater => (C::Container, "Repeater", S::Repeater, field("repeater"), || {
            BlockConfig::Repeater(RepeaterBlockConfig {
                label: "New Repeater".to_string(),
                ..Default::default()
            })
        }),
        T::Group => (
            C::Container,
            "Group",
            S::Group,
            Some(LegacyMapping {
                kind: "group",
                reversible: false,
            }),
            || {
                BlockConfig::Group(GroupBlockConfig {
                    label: "New Group".to_string(),
                    ..Default::default()
                })
            },
        ),
        T::Columns => (C::Layout, "Columns", S::Layout, None, || {
            BlockConfig::Layout(LayoutBlockConfig {
                columns: Some(2),
                height: None,
            })
        }),
        T::Divider => (C::Layout, "Divider", S::Layout, None, || {
            BlockConfig::Layout(LayoutBlockConfig::default())
        }),
        T::Spacer => (C::Layout, "Spacer", S::Layout, None, || {
            BlockConfig::Layout(LayoutBlockConfig {
                columns: None,
                height: Some(24),
            })
        }),
        T::Heading => (C::Display, "Heading", S::Heading, None, || {
            BlockConfig::Heading(HeadingBlockConfig {
                text: "New Heading".to_string(),
                level: 2,
            })
        }),
        T::Paragraph => (C::Display, "Paragraph", S::Paragraph, None, || {
            BlockConfig::Paragraph(ParagraphBlockConfig::default())
        }),
        T::Image => (C::Display, "Image", S::Image, None, || {
            BlockConfig::Image(ImageBlockConfig::default())
        }),
        T::Callout => (C::Display, "Callout", S::Callout, None, || {
            BlockConfig::Callout(CalloutBlockConfig::default())
        }),
        T::LoginForm => (C::Auth, "Login Form", S::Auth, None, || {
            BlockConfig::Auth(AuthBlockConfig {
                title: Some("Sign in".to_string()),
                redirect_to: None,
                allow_signup: true,
            })
        }),
        T::SignupForm => (C::Auth, "Signup Form", S::Auth, None, || {
            BlockConfig::Auth(AuthBlockConfig {
                title: Some("Create an account".to_string()),
                ..Default::default()
            })
        }),
        T::PasswordReset => (C::Auth, "Password Reset", S::Auth, None, || {
            BlockConfig::Auth(AuthBlockConfig {
                title: Some("Reset your password".to_string()),
                ..Default::default()
            })
        }),
        T::SubmitButton => (C::Action, "Submit Button", S::Button, None, || {
            BlockConfig::Button(ButtonBlockConfig::labelled("Submit"))
        }),
        T::SaveDraftButton => (C::Action, "Save Draft Button", S::Button, None, || {
            BlockConfig::Button(ButtonBlockConfig {
                variant: "secondary".to_string(),
                ..ButtonBlockConfig::labelled("Save Draft")
            })
        }),
        T::LinkButton => (C::Action, "Link Button", S::Button, None, || {
            BlockConfig::Button(ButtonBlockConfig {
                variant: "link".to_string(),
                ..ButtonBlockConfig::labelled("Learn more")
            })
        }),
    };

    BlockDefinition {
        block_type,
        category,
        display_name,
        shape,
        legacy,
        defaults,
    }
}
