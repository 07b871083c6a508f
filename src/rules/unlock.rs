use std::collections::HashSet;

use crate::data::levels::UnlockRequirement;

/// Check the authored prerequisites for a level against completed level ids
/// and the accumulated star total.
pub fn unlock_satisfied(
    requirement: &UnlockRequirement,
    completed: &HashSet<String>,
    total_stars: u32,
) -> bool {
    if total_stars < requirement.required_stars {
        return false;
    }
    requirement
        .required_levels
        .iter()
        .all(|id| completed.contains(id))
}
