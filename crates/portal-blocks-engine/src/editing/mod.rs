//! # Editing
//!
//! A small command layer over the tree engine for editors that keep one
//! "current tree" and apply user actions to it in order.
//!
//! ## Module Structure
//!
//! - **`document`**: `Document` holding the current forest and a version counter
//! - **`commands`**: `Cmd` enum, one variant per tree edit
//! - **`patch`**: result metadata returned by `Document::apply`
//!
//! ## Usage Pattern
//!
//! ```rust
//! use portal_blocks_engine::editing::{Cmd, Document};
//! use portal_blocks_engine::factory::create_field_block;
//!
//! let mut doc = Document::new();
//! let block = create_field_block("text", Some("name".into())).unwrap();
//!
//! let patch = doc.apply(Cmd::Insert { block, index: 0 });
//! assert!(patch.changed);
//!
//! // Stale ids are ignored rather than rejected
//! let patch = doc.apply(Cmd::Delete { id: "gone".into() });
//! assert!(!patch.changed);
//! ```

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
