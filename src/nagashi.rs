//! Wheel purchase (ながし): axis horses against a partner set.

use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::box_bet::{permutations, subsets};
use crate::combination::{distinct_sorted, CombinationSet, WagerCombination};
use crate::single::single_combinations;

/// Finishing slot the axis horse is pinned to.
///
/// Only ordered categories (馬単, 3連単) look at it; unordered categories
/// accept the axis in either slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPosition {
    #[default]
    First, // 1着固定
    Second, // 2着固定
    Third,  // 3着固定
    Any,    // 着順不問
}

impl AxisPosition {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1" | "1着" => Some(AxisPosition::First),
            "second" | "2" | "2着" => Some(AxisPosition::Second),
            "third" | "3" | "3着" => Some(AxisPosition::Third),
            "any" | "either" | "着順不問" => Some(AxisPosition::Any),
            _ => None,
        }
    }

    /// Zero-based slots this position covers for a combination of `arity`.
    fn slots(&self, arity: usize) -> Vec<usize> {
        let slots = match self {
            AxisPosition::First => vec![0],
            AxisPosition::Second => vec![1],
            AxisPosition::Third => vec![2],
            AxisPosition::Any => (0..arity).collect(),
        };
        slots.into_iter().filter(|s| *s < arity).collect()
    }
}

/// Wheel selection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSelection {
    pub axis: Vec<u8>,
    pub partners: Vec<u8>,
    #[serde(default)]
    pub axis_position: AxisPosition,
    /// マルチ: also generate with axis and partner roles swapped
    #[serde(default)]
    pub multi: bool,
}

/// Generate wheel combinations.
///
/// Each axis horse is combined with `arity - 1` distinct partners (a partner
/// equal to the axis horse is skipped). With `multi`, the roles are swapped and
/// both results are merged by canonical key, first occurrence kept.
///
/// # Returns
/// Empty when either the axis or the partner set is empty.
pub fn nagashi_combinations(category: BetCategory, selection: &WheelSelection) -> Vec<WagerCombination> {
    if selection.axis.is_empty() || selection.partners.is_empty() {
        return Vec::new();
    }

    if category.is_single() {
        let mut horses = selection.axis.clone();
        if selection.multi {
            horses.extend_from_slice(&selection.partners);
        }
        return single_combinations(category, &horses);
    }

    let mut set = CombinationSet::new(category);
    set.extend(wheel_once(
        category,
        &selection.axis,
        &selection.partners,
        selection.axis_position,
    ));

    if selection.multi {
        set.extend(wheel_once(
            category,
            &selection.partners,
            &selection.axis,
            selection.axis_position,
        ));
    }

    set.into_vec()
}

fn wheel_once(
    category: BetCategory,
    axis: &[u8],
    partners: &[u8],
    position: AxisPosition,
) -> Vec<WagerCombination> {
    let k = category.arity();
    let slots = if category.is_ordered() {
        position.slots(k)
    } else {
        vec![0]
    };

    let mut out = Vec::new();
    for a in distinct_sorted(axis) {
        let others: Vec<u8> = distinct_sorted(partners)
            .into_iter()
            .filter(|p| *p != a)
            .collect();

        let fills = if category.is_ordered() {
            permutations(&others, k - 1)
        } else {
            subsets(&others, k - 1)
        };

        for &slot in &slots {
            for fill in &fills {
                let mut horses = fill.clone();
                horses.insert(slot, a);
                out.push(WagerCombination::new(horses));
            }
        }
    }

    out
}
