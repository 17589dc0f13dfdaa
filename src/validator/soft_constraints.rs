use crate::catalogue::CatalogueSnapshot;
use crate::scheduler::placement_penalty;
use crate::types::{reassemble_blocks, PlacedSlot, TimeGrid};

/// Total lecturer-preference penalty of a slot set.
///
/// Penalties are defined on session blocks, not hours, so the expanded
/// records are first re-aggregated by identity tuple and contiguity.
/// Adjacent blocks of the same session merge during re-aggregation, so
/// this can undercount the solver objective by the merged blocks' share.
pub fn preference_penalty(
    slots: &[PlacedSlot],
    catalogue: &CatalogueSnapshot,
    grid: &TimeGrid,
) -> u32 {
    reassemble_blocks(slots, grid)
        .iter()
        .filter_map(|block| {
            catalogue
                .lecturer(block.lecturer_id)
                .map(|l| placement_penalty(&l.preferences, block.start_idx, block.duration, grid))
        })
        .sum()
}
