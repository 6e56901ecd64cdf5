//! Wager combinations and canonical keys.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::bet_type::BetCategory;

/// Half of a support ticket (応援馬券 = 単勝 + 複勝).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLeg {
    Win,
    Place,
}

/// A single wager: horse numbers (bracket numbers for 枠連) plus optional odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerCombination {
    pub horses: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<SupportLeg>,
}

impl WagerCombination {
    pub fn new(horses: Vec<u8>) -> Self {
        Self {
            horses,
            odds: None,
            leg: None,
        }
    }

    pub fn support_leg(horse: u8, leg: SupportLeg) -> Self {
        Self {
            horses: vec![horse],
            odds: None,
            leg: Some(leg),
        }
    }

    pub fn with_odds(mut self, odds: f64) -> Self {
        self.odds = Some(odds);
        self
    }

    /// Canonical key under `category`'s order sensitivity.
    pub fn key(&self, category: BetCategory) -> String {
        canonical_key(category, &self.horses)
    }

    pub fn contains(&self, horse: u8) -> bool {
        self.horses.contains(&horse)
    }

    /// True when no number appears twice.
    pub fn is_distinct(&self) -> bool {
        let mut seen = HashSet::new();
        self.horses.iter().all(|h| seen.insert(*h))
    }
}

/// Canonical key for a combination.
///
/// Unordered categories sort ascending, ordered categories keep positions.
/// Numbers are joined by `-` without padding: `[3, 1]` on 馬連 → `"1-3"`.
pub fn canonical_key(category: BetCategory, horses: &[u8]) -> String {
    let mut numbers = horses.to_vec();
    if !category.is_ordered() {
        numbers.sort_unstable();
    }
    numbers
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Sorted, de-duplicated copy of a horse list.
pub fn distinct_sorted(horses: &[u8]) -> Vec<u8> {
    let mut out = horses.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Order-stable set of combinations keyed by canonical key.
///
/// The first combination pushed for a key wins; later duplicates are dropped.
#[derive(Debug)]
pub struct CombinationSet {
    category: BetCategory,
    seen: HashSet<String>,
    items: Vec<WagerCombination>,
}

impl CombinationSet {
    pub fn new(category: BetCategory) -> Self {
        Self {
            category,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Insert a combination, canonicalizing unordered ones.
    ///
    /// Returns false when the key was already present or the combination
    /// repeats a number.
    pub fn insert(&mut self, mut combination: WagerCombination) -> bool {
        if !combination.is_distinct() {
            return false;
        }
        if !self.category.is_ordered() {
            combination.horses.sort_unstable();
        }
        let key = combination.key(self.category);
        if !self.seen.insert(key) {
            return false;
        }
        self.items.push(combination);
        true
    }

    pub fn extend<I: IntoIterator<Item = WagerCombination>>(&mut self, iter: I) {
        for combination in iter {
            self.insert(combination);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<WagerCombination> {
        self.items
    }
}
