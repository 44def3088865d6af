use std::collections::HashSet;

use crate::adapter::LegacyAdapter;
use crate::editing::{Cmd, Patch};
use crate::schema::{Block, BlockId, Forest, LegacySection};
use crate::tree;

/// The editor's current block tree.
///
/// Every command replaces the forest with the tree engine's output; the
/// version only moves when the tree actually changed, so callers can use it
/// to skip redundant autosaves.
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Forest,
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Forest) -> Self {
        Self { blocks, version: 0 }
    }

    pub fn from_section(section: &LegacySection, adapter: &LegacyAdapter) -> Self {
        Self::from_blocks(adapter.section_to_blocks(section))
    }

    pub fn to_section(
        &self,
        adapter: &LegacyAdapter,
        section_id: &str,
        original: Option<&LegacySection>,
    ) -> LegacySection {
        adapter.blocks_to_section(section_id, &self.blocks, original)
    }

    pub fn blocks(&self) -> &Forest {
        &self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        tree::find_block_by_id(&self.blocks, id)
    }

    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        if let Some(block) = cmd.inserted()
            && let Some(clash) = self.first_clash(block)
        {
            log::warn!("rejecting insert of {}: id {clash} already in use", block.id);
            return self.patch(false);
        }

        let next = match cmd {
            Cmd::Insert { block, index } => tree::insert_block_at(&self.blocks, block, index),
            Cmd::InsertChild {
                parent_id,
                block,
                index,
            } => tree::insert_child_at(&self.blocks, parent_id.as_str(), block, index),
            Cmd::Move { from, to } => tree::move_block(&self.blocks, from, to),
            Cmd::MoveChild {
                parent_id,
                from,
                to,
            } => tree::move_child(&self.blocks, parent_id.as_str(), from, to),
            Cmd::Update { id, updates } => {
                tree::update_block_in_tree(&self.blocks, id.as_str(), &updates)
            }
            Cmd::Delete { id } => tree::delete_block_from_tree(&self.blocks, id.as_str()),
        };

        let changed = next != self.blocks;
        if changed {
            self.blocks = next;
            self.version += 1;
        }
        self.patch(changed)
    }

    /// First id of `block`'s subtree that already exists in the document.
    fn first_clash(&self, block: &Block) -> Option<BlockId> {
        let existing: HashSet<&BlockId> = tree::collect_ids(&self.blocks).into_iter().collect();
        let incoming = Forest::unit(block.clone());
        tree::collect_ids(&incoming)
            .into_iter()
            .find(|id| existing.contains(id))
            .cloned()
    }

    fn patch(&self, changed: bool) -> Patch {
        Patch {
            changed,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{create_block, create_field_block};
    use crate::schema::{BlockConfig, ConfigPatch, LegacyField};
    use crate::tree::BlockUpdate;
    use pretty_assertions::assert_eq;

    fn text(id: &str) -> Block {
        create_field_block("text", Some(id.into())).unwrap()
    }

    fn ids(doc: &Document) -> Vec<String> {
        doc.blocks().iter().map(|b| b.id.to_string()).collect()
    }

    #[test]
    fn test_apply_bumps_version_on_change() {
        let mut doc = Document::new();

        let patch = doc.apply(Cmd::Insert {
            block: text("a"),
            index: 0,
        });

        assert_eq!(
            patch,
            Patch {
                changed: true,
                version: 1
            }
        );
        assert_eq!(ids(&doc), vec!["a"]);
    }

    #[test]
    fn test_noop_keeps_version() {
        let mut doc = Document::new();
        doc.apply(Cmd::Insert {
            block: text("a"),
            index: 0,
        });

        let patch = doc.apply(Cmd::Delete { id: "stale".into() });

        assert!(!patch.changed);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut doc = Document::new();
        doc.apply(Cmd::Insert {
            block: text("a"),
            index: 0,
        });

        let patch = doc.apply(Cmd::Insert {
            block: text("a"),
            index: 1,
        });

        assert!(!patch.changed);
        assert_eq!(ids(&doc), vec!["a"]);
    }

    #[test]
    fn test_nested_edit_sequence() {
        let repeater = create_field_block("repeater", Some("refs".into())).unwrap();
        let mut doc = Document::new();
        doc.apply(Cmd::Insert {
            block: repeater,
            index: 0,
        });
        doc.apply(Cmd::InsertChild {
            parent_id: "refs".into(),
            block: text("name"),
            index: 0,
        });
        doc.apply(Cmd::InsertChild {
            parent_id: "refs".into(),
            block: text("email"),
            index: 9,
        });
        doc.apply(Cmd::MoveChild {
            parent_id: "refs".into(),
            from: 1,
            to: 0,
        });
        let patch = doc.apply(Cmd::Update {
            id: "email".into(),
            updates: BlockUpdate::config(ConfigPatch::label("Email")),
        });

        assert_eq!(patch.version, 5);
        let refs = doc.find("refs").unwrap();
        let children: Vec<_> = refs.children.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(children, vec!["email", "name"]);
        assert_eq!(doc.find("email").unwrap().config.caption(), Some("Email"));
    }

    #[test]
    fn test_commands_deserialize_from_editor_json() {
        let cmd: Cmd = serde_json::from_str(
            r#"{ "cmd": "update", "id": "a", "updates": { "config": { "label": "X" } } }"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Cmd::Update {
                id: "a".into(),
                updates: BlockUpdate::config(ConfigPatch::label("X")),
            }
        );

        let cmd: Cmd =
            serde_json::from_str(r#"{ "cmd": "moveChild", "parentId": "s", "from": 0, "to": 1 }"#)
                .unwrap();
        assert!(matches!(cmd, Cmd::MoveChild { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_update_commands_reach_non_field_config_keys() {
        let mut doc = Document::new();
        for (tag, id) in [("callout", "c"), ("submit-button", "go")] {
            doc.apply(Cmd::Insert {
                block: create_block(tag, Some(id.into())).unwrap(),
                index: 9,
            });
        }

        let tone = doc.apply(
            serde_json::from_str(
                r#"{ "cmd": "update", "id": "c", "updates": { "config": { "tone": "warning" } } }"#,
            )
            .unwrap(),
        );
        let variant = doc.apply(
            serde_json::from_str(
                r#"{ "cmd": "update", "id": "go", "updates": { "config": { "variant": "secondary" } } }"#,
            )
            .unwrap(),
        );

        assert!(tone.changed);
        assert!(variant.changed);
        assert!(matches!(
            &doc.find("c").unwrap().config,
            BlockConfig::Callout(c) if c.tone == "warning"
        ));
        assert!(matches!(
            &doc.find("go").unwrap().config,
            BlockConfig::Button(b) if b.variant == "secondary" && b.label == "Submit"
        ));
    }

    #[test]
    fn test_section_round_trip_through_document() {
        let adapter = LegacyAdapter::default();
        let section = LegacySection {
            id: "s1".into(),
            title: "About you".into(),
            fields: vec![LegacyField::new("name", "text", "Name")],
            ..Default::default()
        };
        let mut doc = Document::from_section(&section, &adapter);

        doc.apply(Cmd::Update {
            id: "name".into(),
            updates: BlockUpdate::config(ConfigPatch::label("Full name")),
        });
        let saved = doc.to_section(&adapter, "s1", Some(&section));

        assert_eq!(saved.title, "About you");
        assert_eq!(saved.fields[0].label, "Full name");
    }
}
