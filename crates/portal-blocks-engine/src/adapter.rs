//! # Legacy Adapter
//!
//! Converts between the legacy `Section -> Field[]` documents and block trees.
//!
//! Reading is permissive: any legacy field, however sparse or unknown its
//! kind, becomes some block (unknown kinds become `text-field`). Writing is
//! lossy by design: blocks with no legacy field equivalent are dropped,
//! including non-field children of a repeater.
//!
//! A section's title and description travel as synthetic `heading` and
//! `paragraph` blocks with ids `<section>-title` and `<section>-description`.

use serde::{Deserialize, Serialize};

use crate::registry::{ConfigShape, registry};
use crate::schema::{
    Block, BlockConfig, BlockId, BlockType, FieldBlockConfig, FieldWidth, Forest,
    GroupBlockConfig, HeadingBlockConfig, LegacyField, LegacyFieldConfig, LegacyOption,
    LegacySection, ParagraphBlockConfig, RepeaterBlockConfig, SelectFieldBlockConfig,
};

const TITLE_SUFFIX: &str = "-title";
const DESCRIPTION_SUFFIX: &str = "-description";

/// Defaults applied to legacy data that leaves settings unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterSettings {
    pub default_min_items: u32,
    pub default_max_items: u32,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            default_min_items: 1,
            default_max_items: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LegacyAdapter {
    settings: AdapterSettings,
}

impl LegacyAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Convert one legacy field (and, for repeaters and groups, its children).
    pub fn field_to_block(&self, field: &LegacyField, position: usize) -> Block {
        let block_type = registry()
            .block_type_for_legacy(&field.kind)
            .unwrap_or_else(|| {
                log::debug!(
                    "legacy field {} has unmapped kind {:?}, using text-field",
                    field.id,
                    field.kind
                );
                BlockType::TextField
            });
        let definition = registry().definition_for(block_type);
        let legacy_config = field.config.clone().unwrap_or_default();

        let config = match definition.shape {
            ConfigShape::Repeater => BlockConfig::Repeater(RepeaterBlockConfig {
                label: field.label.clone(),
                name: field.id.clone(),
                description: field.description.clone(),
                required: field.required,
                width: FieldWidth::from_legacy(&field.width),
                min_items: legacy_config
                    .min_items
                    .unwrap_or(self.settings.default_min_items),
                max_items: legacy_config
                    .max_items
                    .unwrap_or(self.settings.default_max_items),
            }),
            ConfigShape::Group => BlockConfig::Group(GroupBlockConfig {
                label: field.label.clone(),
                description: field.description.clone(),
            }),
            ConfigShape::Select => BlockConfig::Select(SelectFieldBlockConfig {
                field: flat_field_config(field),
                options: normalize_options(field),
            }),
            ConfigShape::Field => {
                let mut config = flat_field_config(field);
                if block_type == BlockType::TextField {
                    config.max_length = legacy_config.max_length;
                    config.min_length = legacy_config.min_length;
                    config.pattern = legacy_config.pattern.clone();
                }
                BlockConfig::Field(config)
            }
            _ => definition.default_config(),
        };

        let block = Block::new(field.id.as_str(), block_type, config).at(position);
        if definition.is_container() {
            let children = field
                .children
                .iter()
                .flatten()
                .enumerate()
                .map(|(i, child)| self.field_to_block(child, i));
            block.with_children(children)
        } else {
            block
        }
    }

    /// Title heading, description paragraph, then fields; positions are output indices.
    pub fn section_to_blocks(&self, section: &LegacySection) -> Forest {
        let mut blocks = Forest::new();

        if !section.title.is_empty() {
            let heading = Block::new(
                title_block_id(&section.id),
                BlockType::Heading,
                BlockConfig::Heading(HeadingBlockConfig {
                    text: section.title.clone(),
                    level: 2,
                }),
            );
            blocks.push_back(heading.at(blocks.len()));
        }

        if !section.description.is_empty() {
            let paragraph = Block::new(
                description_block_id(&section.id),
                BlockType::Paragraph,
                BlockConfig::Paragraph(ParagraphBlockConfig {
                    text: section.description.clone(),
                }),
            );
            blocks.push_back(paragraph.at(blocks.len()));
        }

        for field in &section.fields {
            let block = self.field_to_block(field, blocks.len());
            blocks.push_back(block);
        }

        blocks
    }

    /// Convert a block back to a legacy field, or `None` when the block type
    /// has no legacy equivalent.
    pub fn block_to_field(&self, block: &Block) -> Option<LegacyField> {
        let legacy = registry()
            .definition_for(block.block_type)
            .legacy
            .filter(|l| l.reversible)?;

        let mut field = LegacyField {
            id: block.id.to_string(),
            kind: legacy.kind.to_string(),
            ..Default::default()
        };

        match &block.config {
            BlockConfig::Field(config) => {
                fill_from_field_config(&mut field, config);
                field.config = text_constraints(config);
            }
            BlockConfig::Select(config) => {
                fill_from_field_config(&mut field, &config.field);
                field.options = Some(
                    config
                        .options
                        .iter()
                        .cloned()
                        .map(LegacyOption::Pair)
                        .collect(),
                );
            }
            BlockConfig::Repeater(config) => {
                field.label = config.label.clone();
                field.description = config.description.clone();
                field.required = config.required;
                field.width = config.width.as_legacy().to_string();
                field.config = Some(LegacyFieldConfig {
                    min_items: Some(config.min_items),
                    max_items: Some(config.max_items),
                    ..Default::default()
                });
                field.children = Some(
                    block
                        .children
                        .iter()
                        .filter_map(|child| self.block_to_field(child))
                        .collect(),
                );
            }
            other => {
                log::warn!(
                    "{} block {} carries a mismatched config, keeping caption only",
                    block.block_type,
                    block.id
                );
                field.label = other.caption().unwrap_or_default().to_string();
            }
        }

        Some(field)
    }

    /// Rebuild a legacy section from a flat list of blocks.
    ///
    /// Only the top level is scanned; nesting below it is whatever
    /// `block_to_field` reconstructs.
    pub fn blocks_to_section(
        &self,
        section_id: &str,
        blocks: &Forest,
        original: Option<&LegacySection>,
    ) -> LegacySection {
        let mut title = original.map(|s| s.title.clone()).unwrap_or_default();
        let mut description = original.map(|s| s.description.clone()).unwrap_or_default();
        let mut fields = Vec::new();

        for block in blocks {
            match &block.config {
                BlockConfig::Heading(heading)
                    if block.block_type == BlockType::Heading
                        && block.id.as_str().ends_with(TITLE_SUFFIX) =>
                {
                    title = heading.text.clone();
                }
                BlockConfig::Paragraph(paragraph)
                    if block.block_type == BlockType::Paragraph
                        && block.id.as_str().ends_with(DESCRIPTION_SUFFIX) =>
                {
                    description = paragraph.text.clone();
                }
                _ => fields.extend(self.block_to_field(block)),
            }
        }

        LegacySection {
            id: section_id.to_string(),
            title,
            description,
            section_type: original.map(|s| s.section_type.clone()).unwrap_or_default(),
            fields,
        }
    }
}

fn flat_field_config(field: &LegacyField) -> FieldBlockConfig {
    FieldBlockConfig {
        label: field.label.clone(),
        name: field.id.clone(),
        placeholder: field.placeholder.clone(),
        description: field.description.clone(),
        required: field.required,
        width: FieldWidth::from_legacy(&field.width),
        validation: field.validation.clone(),
        ..Default::default()
    }
}

/// `field.options` wins over `field.config.options`; both go through the same normalization.
fn normalize_options(field: &LegacyField) -> Vec<crate::schema::SelectOption> {
    let source = field
        .options
        .as_ref()
        .or_else(|| field.config.as_ref().and_then(|c| c.options.as_ref()));
    source
        .into_iter()
        .flatten()
        .filter_map(LegacyOption::normalize)
        .collect()
}

fn fill_from_field_config(field: &mut LegacyField, config: &FieldBlockConfig) {
    field.label = config.label.clone();
    field.placeholder = config.placeholder.clone();
    field.description = config.description.clone();
    field.required = config.required;
    field.width = config.width.as_legacy().to_string();
    field.validation = config.validation.clone();
}

fn text_constraints(config: &FieldBlockConfig) -> Option<LegacyFieldConfig> {
    let constraints = LegacyFieldConfig {
        max_length: config.max_length,
        min_length: config.min_length,
        pattern: config.pattern.clone(),
        ..Default::default()
    };
    (!constraints.is_empty()).then_some(constraints)
}

/// Convert with default settings.
pub fn field_to_block(field: &LegacyField, position: usize) -> Block {
    LegacyAdapter::default().field_to_block(field, position)
}

pub fn section_to_blocks(section: &LegacySection) -> Forest {
    LegacyAdapter::default().section_to_blocks(section)
}

pub fn block_to_field(block: &Block) -> Option<LegacyField> {
    LegacyAdapter::default().block_to_field(block)
}

pub fn blocks_to_section(
    section_id: &str,
    blocks: &Forest,
    original: Option<&LegacySection>,
) -> LegacySection {
    LegacyAdapter::default().blocks_to_section(section_id, blocks, original)
}

/// Synthetic id of the heading carrying a section's title.
pub fn title_block_id(section_id: &str) -> BlockId {
    BlockId::new(format!("{section_id}{TITLE_SUFFIX}"))
}

pub fn description_block_id(section_id: &str) -> BlockId {
    BlockId::new(format!("{section_id}{DESCRIPTION_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LegacyOption, SelectOption};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(id: &str, label: &str) -> LegacyField {
        LegacyField::new(id, "text", label)
    }

    #[rstest]
    #[case("text", BlockType::TextField)]
    #[case("textarea", BlockType::TextareaField)]
    #[case("email", BlockType::EmailField)]
    #[case("phone", BlockType::PhoneField)]
    #[case("number", BlockType::NumberField)]
    #[case("date", BlockType::DateField)]
    #[case("select", BlockType::SelectField)]
    #[case("checkbox", BlockType::CheckboxField)]
    #[case("file", BlockType::FileUpload)]
    #[case("radio", BlockType::RadioField)]
    #[case("multiselect", BlockType::MultiselectField)]
    #[case("repeater", BlockType::Repeater)]
    #[case("group", BlockType::Group)]
    #[case("mystery-kind", BlockType::TextField)]
    #[case("", BlockType::TextField)]
    fn test_field_kind_mapping(#[case] kind: &str, #[case] expected: BlockType) {
        let block = field_to_block(&LegacyField::new("f1", kind, "Label"), 4);
        assert_eq!(block.block_type, expected);
        assert_eq!(block.position, 4);
        assert_eq!(block.id, "f1");
    }

    #[test]
    fn test_flat_field_config() {
        let field = LegacyField {
            placeholder: Some("jane@example.com".into()),
            description: Some("We never share it".into()),
            required: true,
            width: "half".into(),
            validation: Some(serde_json::json!({ "message": "Invalid email" })),
            ..LegacyField::new("email", "email", "Email")
        };

        let block = field_to_block(&field, 0);

        assert_eq!(
            block.config,
            BlockConfig::Field(FieldBlockConfig {
                label: "Email".into(),
                name: "email".into(),
                placeholder: Some("jane@example.com".into()),
                description: Some("We never share it".into()),
                required: true,
                width: FieldWidth::Half,
                validation: Some(serde_json::json!({ "message": "Invalid email" })),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_unusual_width_normalizes_to_full() {
        let field = LegacyField {
            width: "third".into(),
            ..text("f1", "Name")
        };
        let block = field_to_block(&field, 0);
        assert_eq!(block.config.field().unwrap().width, FieldWidth::Full);
    }

    #[test]
    fn test_text_constraints_carried() {
        let field = LegacyField {
            config: Some(LegacyFieldConfig {
                max_length: Some(80),
                min_length: Some(2),
                pattern: Some("^[A-Z]".into()),
                ..Default::default()
            }),
            ..text("name", "Name")
        };

        let block = field_to_block(&field, 0);
        let config = block.config.field().unwrap();

        assert_eq!(config.max_length, Some(80));
        assert_eq!(config.min_length, Some(2));
        assert_eq!(config.pattern.as_deref(), Some("^[A-Z]"));
    }

    #[test]
    fn test_constraints_ignored_for_non_text_kinds() {
        let field = LegacyField {
            config: Some(LegacyFieldConfig {
                max_length: Some(80),
                ..Default::default()
            }),
            ..LegacyField::new("bio", "textarea", "Bio")
        };
        let block = field_to_block(&field, 0);
        assert_eq!(block.config.field().unwrap().max_length, None);
    }

    #[test]
    fn test_options_prefer_field_over_config() {
        let field = LegacyField {
            options: Some(vec![LegacyOption::Text("Red".into())]),
            config: Some(LegacyFieldConfig {
                options: Some(vec![LegacyOption::Text("Blue".into())]),
                ..Default::default()
            }),
            ..LegacyField::new("colour", "select", "Colour")
        };

        let block = field_to_block(&field, 0);

        let BlockConfig::Select(select) = block.config else {
            panic!("expected select config");
        };
        assert_eq!(select.options, vec![SelectOption::new("Red", "Red")]);
    }

    #[rstest]
    #[case("select")]
    #[case("radio")]
    #[case("multiselect")]
    fn test_options_from_config_are_normalized(#[case] kind: &str) {
        let field = LegacyField {
            config: Some(LegacyFieldConfig {
                options: Some(vec![
                    LegacyOption::Text("Yes".into()),
                    LegacyOption::Pair(SelectOption::new("n", "No")),
                ]),
                ..Default::default()
            }),
            ..LegacyField::new("q", kind, "Question")
        };

        let block = field_to_block(&field, 0);

        let BlockConfig::Select(select) = block.config else {
            panic!("expected select config");
        };
        assert_eq!(
            select.options,
            vec![SelectOption::new("Yes", "Yes"), SelectOption::new("n", "No")]
        );
    }

    #[test]
    fn test_repeater_children_and_bounds() {
        let field = LegacyField {
            children: Some(vec![text("name", "Name"), text("email", "Email")]),
            ..LegacyField::new("refs", "repeater", "References")
        };

        let block = field_to_block(&field, 2);

        assert_eq!(block.block_type, BlockType::Repeater);
        let positions: Vec<_> = block.children.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1]);
        let BlockConfig::Repeater(config) = &block.config else {
            panic!("expected repeater config");
        };
        assert_eq!((config.min_items, config.max_items), (1, 10));
    }

    #[test]
    fn test_repeater_bounds_from_legacy_config() {
        let field = LegacyField {
            config: Some(LegacyFieldConfig {
                min_items: Some(0),
                max_items: Some(3),
                ..Default::default()
            }),
            ..LegacyField::new("refs", "repeater", "References")
        };
        let block = field_to_block(&field, 0);
        let BlockConfig::Repeater(config) = &block.config else {
            panic!("expected repeater config");
        };
        assert_eq!((config.min_items, config.max_items), (0, 3));
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_adapter_settings_change_repeater_defaults() {
        let adapter = LegacyAdapter::new(AdapterSettings {
            default_min_items: 2,
            default_max_items: 5,
        });
        let block = adapter.field_to_block(&LegacyField::new("r", "repeater", "R"), 0);
        let BlockConfig::Repeater(config) = &block.config else {
            panic!("expected repeater config");
        };
        assert_eq!((config.min_items, config.max_items), (2, 5));
    }

    #[test]
    fn test_children_ignored_on_leaf_kinds() {
        let field = LegacyField {
            children: Some(vec![text("x", "X")]),
            ..text("f1", "Name")
        };
        assert!(field_to_block(&field, 0).children.is_empty());
    }

    #[test]
    fn test_section_positions_are_gap_free() {
        let section = LegacySection {
            id: "s1".into(),
            title: String::new(),
            description: "Tell us about you".into(),
            fields: vec![text("a", "A"), text("b", "B")],
            ..Default::default()
        };

        let blocks = section_to_blocks(&section);

        let summary: Vec<_> = blocks
            .iter()
            .map(|b| (b.id.to_string(), b.position))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("s1-description".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_section_synthetic_blocks_round_trip() {
        let section = LegacySection {
            id: "s1".into(),
            title: "T".into(),
            description: "D".into(),
            ..Default::default()
        };

        let blocks = section_to_blocks(&section);
        let ids: Vec<_> = blocks.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, vec!["s1-title", "s1-description"]);

        let back = blocks_to_section("s1", &blocks, None);
        assert_eq!(back.title, "T");
        assert_eq!(back.description, "D");
        assert!(back.fields.is_empty());
    }

    #[test]
    fn test_blocks_to_section_falls_back_to_original() {
        let original = LegacySection {
            id: "s1".into(),
            title: "Original".into(),
            description: "Kept".into(),
            section_type: "eligibility".into(),
            fields: vec![],
        };
        let blocks: Forest = [Block::new(
            "s1-title",
            BlockType::Heading,
            BlockConfig::Heading(HeadingBlockConfig {
                text: "Edited".into(),
                level: 2,
            }),
        )]
        .into_iter()
        .collect();

        let back = blocks_to_section("s1", &blocks, Some(&original));

        assert_eq!(back.title, "Edited");
        assert_eq!(back.description, "Kept");
        assert_eq!(back.section_type, "eligibility");
    }

    #[test]
    fn test_plain_heading_is_not_a_title() {
        let blocks: Forest = [Block::new(
            "intro",
            BlockType::Heading,
            BlockConfig::Heading(HeadingBlockConfig {
                text: "Welcome".into(),
                level: 1,
            }),
        )]
        .into_iter()
        .collect();

        let back = blocks_to_section("s1", &blocks, None);

        assert_eq!(back.title, "");
        assert!(back.fields.is_empty());
    }

    #[test]
    fn test_non_field_blocks_convert_to_nothing() {
        for block_type in [
            BlockType::Section,
            BlockType::Group,
            BlockType::Heading,
            BlockType::Divider,
            BlockType::LoginForm,
            BlockType::SubmitButton,
        ] {
            let definition = registry().definition_for(block_type);
            let block = Block::new("x", block_type, definition.default_config());
            assert_eq!(block_to_field(&block), None, "{block_type}");
        }
    }

    #[test]
    fn test_repeater_drops_non_field_children() {
        let repeater = Block::new(
            "refs",
            BlockType::Repeater,
            BlockConfig::Repeater(RepeaterBlockConfig {
                label: "References".into(),
                ..Default::default()
            }),
        )
        .with_children([
            Block::new(
                "hint",
                BlockType::Heading,
                BlockConfig::Heading(HeadingBlockConfig::default()),
            ),
            field_to_block(&text("name", "Name"), 1),
        ]);

        let field = block_to_field(&repeater).unwrap();

        let children = field.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "name");
    }

    #[test]
    fn test_blocks_to_section_does_not_flatten_containers() {
        let section = Block::new(
            "inner",
            BlockType::Section,
            BlockConfig::Section(Default::default()),
        )
        .with_children([field_to_block(&text("deep", "Deep"), 0)]);
        let blocks: Forest = [section].into_iter().collect();

        let back = blocks_to_section("s1", &blocks, None);

        assert!(back.fields.is_empty());
    }
}
