//! Display ordering of a word's definitions.
//!
//! # Invariants
//! - Higher `votes` first; equal votes order by most recent `updated_at`.
//! - Sorting is stable, so exact ties keep their incoming order.
//! - Ranking is idempotent: ranking a ranked slice is a no-op.

use crate::model::definition::Definition;
use std::cmp::Ordering;

/// Total order used for display: `Less` means `a` is shown before `b`.
pub fn compare_definitions(a: &Definition, b: &Definition) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

/// Sorts definitions in place into display order.
pub fn rank_definitions(definitions: &mut [Definition]) {
    definitions.sort_by(compare_definitions);
}

/// Returns `definitions` in display order.
pub fn ranked(mut definitions: Vec<Definition>) -> Vec<Definition> {
    rank_definitions(&mut definitions);
    definitions
}

/// Returns whether `definitions` is already in display order.
pub fn is_ranked(definitions: &[Definition]) -> bool {
    definitions
        .windows(2)
        .all(|pair| compare_definitions(&pair[0], &pair[1]) != Ordering::Greater)
}
