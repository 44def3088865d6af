use crate::schema::BlockType;

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A type tag that no registry entry (and no fallback) covers.
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
    #[error("Invalid config for {block_type} block: {source}")]
    InvalidConfig {
        block_type: BlockType,
        source: serde_json::Error,
    },
}

pub type Result<T, E = BlockError> = std::result::Result<T, E>;
