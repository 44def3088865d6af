//! Plain-text outline of a block forest, for logs and snapshot tests.

use crate::schema::{Block, Forest};

/// One line per block: `type [id] "caption"`, children indented two spaces.
pub fn format_outline(blocks: &Forest) -> String {
    let mut out = String::new();
    for block in blocks {
        format_block(&mut out, block, 0);
    }
    out
}

fn format_block(out: &mut String, block: &Block, indent: usize) {
    out.push_str(&"  ".repeat(indent));
    out.push_str(&format!("{} [{}]", block.block_type, block.id));
    if let Some(caption) = block.config.caption() {
        out.push_str(&format!(" {caption:?}"));
    }
    out.push('\n');

    if block.is_container() {
        for child in &block.children {
            format_block(out, child, indent + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_block;
    use crate::tree::insert_child_at;
    use im::vector;

    #[test]
    fn test_outline_indents_children() {
        let section = create_block("section", Some("s".into())).unwrap();
        let divider = create_block("divider", Some("d".into())).unwrap();
        let tree = insert_child_at(&vector![section], "s", divider, 0);

        assert_eq!(
            format_outline(&tree),
            "section [s] \"New Section\"\n  divider [d]\n"
        );
    }
}
