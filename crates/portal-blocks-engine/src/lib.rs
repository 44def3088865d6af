//! # portal-blocks-engine
//!
//! The block model behind portal and application-form pages: a typed,
//! recursive tree of blocks plus the operations that keep it consistent.
//!
//! ## Module Structure
//!
//! - **`schema`**: `Block`, `BlockType`, `Category`, config payloads, legacy section/field types
//! - **`registry`**: read-only type -> category/defaults/legacy-kind table
//! - **`adapter`**: legacy `Section -> Field[]` documents to block trees and back
//! - **`tree`**: immutable find/update/delete/insert/move over a forest
//! - **`factory`**: new blocks with registry defaults and generated ids
//! - **`editing`**: `Document` + `Cmd` for editors holding a current tree
//! - **`invariants`**: optional structural checks (`check_forest`)
//! - **`outline`**: text rendering of a forest
//!
//! Everything here is synchronous and free of I/O.

pub mod adapter;
pub mod editing;
pub mod error;
pub mod factory;
pub mod invariants;
pub mod outline;
pub mod registry;
pub mod schema;
pub mod tree;

// Re-export key types for easier usage
pub use adapter::{
    AdapterSettings, LegacyAdapter, block_to_field, blocks_to_section, field_to_block,
    section_to_blocks,
};
pub use error::{BlockError, Result};
pub use factory::{BlockFactory, FactorySettings, create_block, create_field_block};
pub use registry::{BlockDefinition, BlockRegistry, registry};
pub use schema::*;
pub use tree::{
    BlockUpdate, delete_block_from_tree, find_block_by_id, insert_block_at, insert_child_at,
    move_block, move_child, renumber_positions, update_block_in_tree,
};
