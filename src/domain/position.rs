//! Position Allocation
//!
//! Pure ordering math for sibling sets (lists within a board, cards within a list).
//! Positions are 1-based and dense: a parent with N children holds exactly 1..=N.

use std::collections::HashMap;
use std::hash::Hash;

/// Stateless allocator for sibling positions
pub struct PositionAllocator;

impl PositionAllocator {
    /// Position for appending at the end: `max + 1`, or 1 when empty.
    ///
    /// Saturates at `i32::MAX`, which still sorts after every stored sibling.
    pub fn next_position(existing: &[i32]) -> i32 {
        existing
            .iter()
            .copied()
            .max()
            .map_or(1, |max| max.max(0).saturating_add(1))
    }

    /// Assign 1..N in the given order
    pub fn reindex<Id: Copy + Eq + Hash>(ordered_ids: &[Id]) -> HashMap<Id, i32> {
        ordered_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx as i32 + 1))
            .collect()
    }

    /// Convert a requested 1-based position into an insertion index for `len` items.
    ///
    /// Anything below 1 lands at the front, anything past `len + 1` at the end.
    pub fn clamp_position(requested: i32, len: usize) -> usize {
        if requested <= 1 {
            0
        } else {
            (requested as usize - 1).min(len)
        }
    }

    /// Remove `id` from the order (if present) and reinsert it at `requested`.
    pub fn place<Id: Copy + Eq>(ordered_ids: &[Id], id: Id, requested: i32) -> Vec<Id> {
        let mut order: Vec<Id> = ordered_ids.iter().copied().filter(|x| *x != id).collect();
        let idx = Self::clamp_position(requested, order.len());
        order.insert(idx, id);
        order
    }

    /// True when the positions, in any order, are exactly 1..=N
    pub fn is_dense(positions: &[i32]) -> bool {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(idx, p)| *p == idx as i32 + 1)
    }
}
