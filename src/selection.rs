//! Purchase methods and the single recompute entry point.
//!
//! Callers hold the full selection state and call [`recompute`] on every
//! change; the result is a pure function of `(category, selection)`.

use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::box_bet::box_combinations;
use crate::combination::WagerCombination;
use crate::formation::{formation_combinations, FormationSelection};
use crate::nagashi::{nagashi_combinations, WheelSelection};
use crate::single::{single_combinations, support_ticket_combinations};

/// Purchase method (買い方).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMethod {
    Direct,    // 通常
    Box,       // BOX
    Wheel,     // ながし
    Formation, // フォーメーション
}

impl PurchaseMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "normal" | "通常" => Some(PurchaseMethod::Direct),
            "box" | "ボックス" => Some(PurchaseMethod::Box),
            "wheel" | "nagashi" | "ながし" | "流し" => Some(PurchaseMethod::Wheel),
            "formation" | "フォーメーション" => Some(PurchaseMethod::Formation),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PurchaseMethod::Direct => "通常",
            PurchaseMethod::Box => "BOX",
            PurchaseMethod::Wheel => "ながし",
            PurchaseMethod::Formation => "フォーメーション",
        }
    }
}

/// Full selection state, tagged by purchase method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Selection {
    Direct { horses: Vec<u8> },
    Box { horses: Vec<u8> },
    Wheel(WheelSelection),
    Formation(FormationSelection),
}

impl Selection {
    pub fn method(&self) -> PurchaseMethod {
        match self {
            Selection::Direct { .. } => PurchaseMethod::Direct,
            Selection::Box { .. } => PurchaseMethod::Box,
            Selection::Wheel(_) => PurchaseMethod::Wheel,
            Selection::Formation(_) => PurchaseMethod::Formation,
        }
    }

    /// Horses a 応援馬券 is bought on under this selection.
    fn support_horses(&self) -> Vec<u8> {
        match self {
            Selection::Direct { horses } | Selection::Box { horses } => horses.clone(),
            Selection::Wheel(w) => w.axis.iter().chain(&w.partners).copied().collect(),
            Selection::Formation(f) => f.first.clone(),
        }
    }

    /// Copy with every number outside `1..=max_number` removed.
    ///
    /// Out-of-range numbers are treated as noise from a half-filled form,
    /// not as an error.
    pub fn sanitized(&self, max_number: u8) -> Self {
        let keep = |horses: &[u8]| -> Vec<u8> {
            horses
                .iter()
                .copied()
                .filter(|h| (1..=max_number).contains(h))
                .collect()
        };
        match self {
            Selection::Direct { horses } => Selection::Direct {
                horses: keep(horses),
            },
            Selection::Box { horses } => Selection::Box {
                horses: keep(horses),
            },
            Selection::Wheel(w) => Selection::Wheel(WheelSelection {
                axis: keep(&w.axis),
                partners: keep(&w.partners),
                axis_position: w.axis_position,
                multi: w.multi,
            }),
            Selection::Formation(f) => Selection::Formation(FormationSelection {
                first: keep(&f.first),
                second: keep(&f.second),
                third: keep(&f.third),
            }),
        }
    }
}

/// Derive the full combination list for the current selection.
///
/// 応援馬券 always yields a win and a place leg per selected horse, whatever
/// the method. Direct purchases of multi-horse categories are computed as a
/// BOX over the chosen horses.
pub fn recompute(category: BetCategory, selection: &Selection) -> Vec<WagerCombination> {
    if category == BetCategory::SupportTicket {
        return support_ticket_combinations(&selection.support_horses());
    }

    match selection {
        Selection::Direct { horses } if category.is_single() => {
            single_combinations(category, horses)
        }
        Selection::Direct { horses } | Selection::Box { horses } => {
            box_combinations(category, horses)
        }
        Selection::Wheel(wheel) => nagashi_combinations(category, wheel),
        Selection::Formation(formation) => formation_combinations(category, formation),
    }
}
