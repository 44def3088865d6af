//! # Tree Engine
//!
//! Immutable edits over a block forest. Every operation takes the forest by
//! reference and returns a new one; untouched subtrees are shared with the
//! input through `im::Vector`.
//!
//! Traversal only descends into container blocks. Lookups are pre-order and
//! return the first match. An id that is not in the tree turns every edit into
//! a no-op returning the input unchanged.

use serde::Deserialize;

use crate::schema::{Block, ConfigPatch, Forest};

/// Changes to merge onto one block.
///
/// `config` is merged one level deep (see `BlockConfig::merged`); every
/// other field overwrites.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockUpdate {
    pub position: Option<usize>,
    pub config: Option<ConfigPatch>,
    /// Only honoured for container blocks.
    pub children: Option<Forest>,
}

impl BlockUpdate {
    pub fn position(position: usize) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn config(patch: ConfigPatch) -> Self {
        Self {
            config: Some(patch),
            ..Default::default()
        }
    }

    pub fn children(children: Forest) -> Self {
        Self {
            children: Some(children),
            ..Default::default()
        }
    }

    fn apply_to(&self, block: &mut Block) {
        if let Some(position) = self.position {
            block.position = position;
        }
        if let Some(patch) = &self.config {
            match block.config.merged(block.block_type, patch) {
                Ok(config) => block.config = config,
                Err(err) => log::warn!("ignoring config update on {}: {err}", block.id),
            }
        }
        if let Some(children) = &self.children {
            if block.is_container() {
                block.children = children.clone();
            } else {
                log::warn!(
                    "ignoring children update on {} block {}",
                    block.block_type,
                    block.id
                );
            }
        }
    }
}

pub fn find_block_by_id<'a>(blocks: &'a Forest, id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if block.is_container()
            && let Some(found) = find_block_by_id(&block.children, id)
        {
            return Some(found);
        }
    }
    None
}

/// Index path from the forest root to the first pre-order match.
pub fn find_path(blocks: &Forest, id: &str) -> Option<Vec<usize>> {
    for (index, block) in blocks.iter().enumerate() {
        if block.id == id {
            return Some(vec![index]);
        }
        if block.is_container()
            && let Some(mut path) = find_path(&block.children, id)
        {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

pub fn update_block_in_tree(blocks: &Forest, id: &str, updates: &BlockUpdate) -> Forest {
    match find_path(blocks, id) {
        Some(path) => update_along(blocks, &path, updates),
        None => {
            log::trace!("update: no block with id {id}");
            blocks.clone()
        }
    }
}

fn update_along(blocks: &Forest, path: &[usize], updates: &BlockUpdate) -> Forest {
    let Some((&index, rest)) = path.split_first() else {
        return blocks.clone();
    };
    let Some(block) = blocks.get(index) else {
        return blocks.clone();
    };

    let mut block = block.clone();
    if rest.is_empty() {
        updates.apply_to(&mut block);
    } else {
        block.children = update_along(&block.children, rest, updates);
    }

    let mut next = blocks.clone();
    next.set(index, block);
    next
}

/// Remove every block with `id`, along with its subtree.
pub fn delete_block_from_tree(blocks: &Forest, id: &str) -> Forest {
    prune(blocks, id).unwrap_or_else(|| {
        log::trace!("delete: no block with id {id}");
        blocks.clone()
    })
}

/// `None` when nothing under `blocks` matched.
fn prune(blocks: &Forest, id: &str) -> Option<Forest> {
    let mut changed = false;
    let mut kept = Forest::new();

    for block in blocks {
        if block.id == id {
            changed = true;
            continue;
        }
        if block.is_container()
            && let Some(children) = prune(&block.children, id)
        {
            changed = true;
            let mut block = block.clone();
            block.children = children;
            kept.push_back(block);
            continue;
        }
        kept.push_back(block.clone());
    }

    changed.then_some(kept)
}

/// Insert at the top level; `index` past the end appends.
pub fn insert_block_at(blocks: &Forest, block: Block, index: usize) -> Forest {
    let mut next = blocks.clone();
    next.insert(index.min(next.len()), block);
    next
}

/// Reorder at the top level. An out-of-range `from` is a no-op; `to` past the end appends.
pub fn move_block(blocks: &Forest, from: usize, to: usize) -> Forest {
    if from >= blocks.len() {
        log::trace!("move: index {from} out of range ({} blocks)", blocks.len());
        return blocks.clone();
    }
    let mut next = blocks.clone();
    let block = next.remove(from);
    next.insert(to.min(next.len()), block);
    next
}

/// Insert `block` into the children of container `parent_id`.
///
/// A missing or non-container parent is a no-op.
pub fn insert_child_at(blocks: &Forest, parent_id: &str, block: Block, index: usize) -> Forest {
    match find_block_by_id(blocks, parent_id) {
        Some(parent) if parent.is_container() => {
            let children = insert_block_at(&parent.children, block, index);
            update_block_in_tree(blocks, parent_id, &BlockUpdate::children(children))
        }
        _ => {
            log::trace!("insert: no container with id {parent_id}");
            blocks.clone()
        }
    }
}

/// Reorder the children of container `parent_id`.
pub fn move_child(blocks: &Forest, parent_id: &str, from: usize, to: usize) -> Forest {
    match find_block_by_id(blocks, parent_id) {
        Some(parent) if parent.is_container() => {
            let children = move_block(&parent.children, from, to);
            update_block_in_tree(blocks, parent_id, &BlockUpdate::children(children))
        }
        _ => {
            log::trace!("move: no container with id {parent_id}");
            blocks.clone()
        }
    }
}

/// Rewrite every advisory `position` to the block's index among its siblings.
pub fn renumber_positions(blocks: &Forest) -> Forest {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let mut block = block.clone();
            block.position = index;
            if block.is_container() {
                block.children = renumber_positions(&block.children);
            }
            block
        })
        .collect()
}

/// Every id in the forest, pre-order, containers only descended.
pub fn collect_ids(blocks: &Forest) -> Vec<&crate::schema::BlockId> {
    let mut ids = Vec::new();
    walk(blocks, &mut |block| ids.push(&block.id));
    ids
}

/// Visit blocks pre-order, descending only into containers.
pub fn walk<'a>(blocks: &'a Forest, visit: &mut impl FnMut(&'a Block)) {
    for block in blocks {
        visit(block);
        if block.is_container() {
            walk(&block.children, visit);
        }
    }
}
