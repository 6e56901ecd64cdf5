//! Formation purchase (フォーメーション): a candidate set per finishing slot.

use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::combination::{distinct_sorted, CombinationSet, WagerCombination};
use crate::single::single_combinations;

/// Candidate horses per finishing slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationSelection {
    pub first: Vec<u8>,
    pub second: Vec<u8>,
    #[serde(default)]
    pub third: Vec<u8>,
}

/// Generate formation combinations.
///
/// Cross product of the slot sets with any tuple repeating a horse dropped.
/// Unordered categories collapse tuples holding the same horses.
///
/// # Returns
/// Empty when the first or second slot is empty, or the third slot is empty
/// for a 3-horse category.
pub fn formation_combinations(
    category: BetCategory,
    selection: &FormationSelection,
) -> Vec<WagerCombination> {
    if category.is_single() {
        return single_combinations(category, &selection.first);
    }

    let k = category.arity();
    let slots: Vec<Vec<u8>> = [&selection.first, &selection.second, &selection.third]
        .into_iter()
        .take(k)
        .map(|s| distinct_sorted(s))
        .collect();

    if slots.iter().any(|s| s.is_empty()) {
        return Vec::new();
    }

    let mut set = CombinationSet::new(category);
    let mut current = Vec::with_capacity(k);
    cross(&slots, &mut current, &mut set);
    set.into_vec()
}

fn cross(slots: &[Vec<u8>], current: &mut Vec<u8>, set: &mut CombinationSet) {
    let depth = current.len();
    if depth == slots.len() {
        set.insert(WagerCombination::new(current.clone()));
        return;
    }
    for &horse in &slots[depth] {
        if current.contains(&horse) {
            continue;
        }
        current.push(horse);
        cross(slots, current, set);
        current.pop();
    }
}
