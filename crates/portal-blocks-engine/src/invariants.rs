//! Structural checks for a block forest.
//!
//! The tree engine assumes its input is well formed and never validates on
//! its own; editors call `check_forest` on load or before save.

use std::collections::HashSet;

use regex::Regex;

use crate::schema::{BlockId, Forest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The id appears more than once; find/update only reach the first.
    DuplicateId(BlockId),
    /// A non-container block carries children that no traversal will visit.
    LeafWithChildren(BlockId),
    /// A text field's `pattern` does not compile.
    InvalidPattern {
        id: BlockId,
        pattern: String,
        reason: String,
    },
}

pub fn check_forest(blocks: &Forest) -> Vec<Violation> {
    let mut seen = HashSet::new();
    let mut violations = Vec::new();
    check_level(blocks, &mut seen, &mut violations);
    violations
}

fn check_level<'a>(
    blocks: &'a Forest,
    seen: &mut HashSet<&'a BlockId>,
    violations: &mut Vec<Violation>,
) {
    for block in blocks {
        if !seen.insert(&block.id) {
            violations.push(Violation::DuplicateId(block.id.clone()));
        }

        if let Some(pattern) = block.config.field().and_then(|c| c.pattern.as_deref())
            && let Err(err) = Regex::new(pattern)
        {
            violations.push(Violation::InvalidPattern {
                id: block.id.clone(),
                pattern: pattern.to_string(),
                reason: err.to_string(),
            });
        }

        if block.is_container() {
            check_level(&block.children, seen, violations);
        } else if !block.children.is_empty() {
            violations.push(Violation::LeafWithChildren(block.id.clone()));
        }
    }
}
