use std::collections::BTreeMap;

use super::models::Block;

/// Merges blocks that start at the same position, returning them sorted by
/// `(start_line, start_col)`.
///
/// The first block seen for a start position keeps its span and statement
/// count; later blocks with the same start only add their hit counts to it.
/// End positions are ignored when matching, so two blocks that start together
/// but end in different places are still merged.
pub fn unique_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Vec<Block> {
    let mut unique: BTreeMap<(u32, u32), Block> = BTreeMap::new();
    for block in blocks {
        unique
            .entry(block.key())
            .and_modify(|first| first.hit_count = first.hit_count.saturating_add(block.hit_count))
            .or_insert(*block);
    }
    unique.into_values().collect()
}
