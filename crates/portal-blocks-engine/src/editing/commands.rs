use serde::Deserialize;

use crate::schema::{Block, BlockId};
use crate::tree::BlockUpdate;

/// One editor action against the block tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Cmd {
    /// Insert at the top level.
    Insert { block: Block, index: usize },
    /// Insert into a container's children.
    #[serde(rename_all = "camelCase")]
    InsertChild {
        parent_id: BlockId,
        block: Block,
        index: usize,
    },
    Move { from: usize, to: usize },
    #[serde(rename_all = "camelCase")]
    MoveChild {
        parent_id: BlockId,
        from: usize,
        to: usize,
    },
    Update { id: BlockId, updates: BlockUpdate },
    Delete { id: BlockId },
}

impl Cmd {
    /// The block this command introduces, if any.
    pub fn inserted(&self) -> Option<&Block> {
        match self {
            Cmd::Insert { block, .. } | Cmd::InsertChild { block, .. } => Some(block),
            _ => None,
        }
    }
}
