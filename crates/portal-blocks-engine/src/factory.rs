//! # Block Factory
//!
//! Builds new blocks from registry defaults. Unlike the legacy adapter the
//! factory is strict: an unrecognised type is an `UnknownBlockType` error.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{BlockError, Result};
use crate::registry::{BlockDefinition, field_name, registry};
use crate::schema::{Block, BlockConfig, BlockId};

/// Editor-facing defaults for newly created blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactorySettings {
    /// Label given to new fields.
    pub default_label: String,
    /// Prefix of generated block ids.
    pub id_prefix: String,
    /// Prefix of generated field names.
    pub name_prefix: String,
}

impl Default for FactorySettings {
    fn default() -> Self {
        Self {
            default_label: crate::registry::DEFAULT_FIELD_LABEL.to_string(),
            id_prefix: "block".to_string(),
            name_prefix: crate::registry::DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockFactory {
    settings: FactorySettings,
}

impl BlockFactory {
    pub fn new(settings: FactorySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FactorySettings {
        &self.settings
    }

    /// Create a field block from a legacy field kind (`text`, `select`, ...).
    pub fn create_field_block(&self, field_type: &str, id: Option<BlockId>) -> Result<Block> {
        let block_type = registry()
            .block_type_for_legacy(field_type)
            .ok_or_else(|| BlockError::UnknownBlockType(field_type.to_string()))?;
        Ok(self.build(registry().definition_for(block_type), id))
    }

    /// Create any block from its wire tag (`text-field`, `heading`, ...).
    pub fn create_block(&self, tag: &str, id: Option<BlockId>) -> Result<Block> {
        Ok(self.build(registry().definition(tag)?, id))
    }

    pub fn generate_id(&self) -> BlockId {
        generate_block_id(&self.settings.id_prefix)
    }

    fn build(&self, definition: &BlockDefinition, id: Option<BlockId>) -> Block {
        let id = id.unwrap_or_else(|| self.generate_id());
        let mut config = definition.default_config();

        if let Some(name) = config.name_mut() {
            *name = field_name(&self.settings.name_prefix, &id);
        }
        match &mut config {
            BlockConfig::Field(c) => c.label.clone_from(&self.settings.default_label),
            BlockConfig::Select(c) => c.field.label.clone_from(&self.settings.default_label),
            _ => {}
        }

        Block::new(id, definition.block_type, config)
    }
}

/// `<prefix>-<millis base36>-<8 hex chars>`: unique enough within one document.
pub fn generate_block_id(prefix: &str) -> BlockId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = uuid::Uuid::new_v4().simple().to_string();
    BlockId::new(format!("{prefix}-{}-{}", base36(millis), &random[..8]))
}

fn base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

pub fn create_field_block(field_type: &str, id: Option<BlockId>) -> Result<Block> {
    BlockFactory::default().create_field_block(field_type, id)
}

pub fn create_block(tag: &str, id: Option<BlockId>) -> Result<Block> {
    BlockFactory::default().create_block(tag, id)
}
