//! Attach parsed odds to generated combinations.

use std::collections::HashMap;

use crate::bet_type::BetCategory;
use crate::combination::{canonical_key, SupportLeg, WagerCombination};
use crate::parsers::ParsedOddsRecord;
use crate::types::HorseSelection;

/// Key → odds map with record keys re-canonicalized under `category`.
///
/// Records parsed without a category keep textual order; re-keying here makes
/// "2-1" match a generated 馬連 "1-2". A key seen twice keeps the later value.
pub fn odds_map(category: BetCategory, records: &[ParsedOddsRecord]) -> HashMap<String, f64> {
    records
        .iter()
        .filter(|r| r.odds.is_finite() && r.odds > 0.0)
        .map(|r| (canonical_key(category, &r.horses), r.odds))
        .collect()
}

/// Support-ticket leg priced by odds text of the given category.
///
/// 複勝 text prices the place leg, anything else the win leg.
pub fn support_leg_for(detected: Option<BetCategory>) -> SupportLeg {
    match detected {
        Some(BetCategory::Place) => SupportLeg::Place,
        _ => SupportLeg::Win,
    }
}

/// Whether records priced for `leg` apply to this combination.
///
/// Both legs of a 応援馬券 share the horse key, so only one leg is priced.
fn takes_odds(combination: &WagerCombination, leg: SupportLeg) -> bool {
    combination.leg.map_or(true, |l| l == leg)
}

/// Return combinations with odds filled in where a record matches.
///
/// Combinations without a matching record keep their current odds. Support
/// tickets only get odds on the win leg; use [`attach_leg_odds`] for 複勝 text.
pub fn attach_odds(
    category: BetCategory,
    combinations: &[WagerCombination],
    records: &[ParsedOddsRecord],
) -> Vec<WagerCombination> {
    attach_leg_odds(category, combinations, records, SupportLeg::Win)
}

/// Like [`attach_odds`], pricing the given support-ticket leg.
pub fn attach_leg_odds(
    category: BetCategory,
    combinations: &[WagerCombination],
    records: &[ParsedOddsRecord],
    leg: SupportLeg,
) -> Vec<WagerCombination> {
    let map = odds_map(category, records);
    combinations
        .iter()
        .map(|c| match map.get(&c.key(category)) {
            Some(&odds) if takes_odds(c, leg) => c.clone().with_odds(odds),
            _ => c.clone(),
        })
        .collect()
}

/// Number of combinations a set of records would fill, for previews.
pub fn count_matches(
    category: BetCategory,
    combinations: &[WagerCombination],
    records: &[ParsedOddsRecord],
    leg: SupportLeg,
) -> usize {
    let map = odds_map(category, records);
    combinations
        .iter()
        .filter(|c| takes_odds(c, leg) && map.contains_key(&c.key(category)))
        .count()
}

/// Fill single-horse combinations from per-horse win odds on the race card.
///
/// 複勝 legs of a support ticket are left alone since win odds do not apply.
pub fn attach_win_odds(
    combinations: &[WagerCombination],
    field: &[HorseSelection],
) -> Vec<WagerCombination> {
    let by_horse: HashMap<u8, f64> = field
        .iter()
        .filter_map(|h| h.odds.filter(|o| o.is_finite() && *o > 0.0).map(|o| (h.number, o)))
        .collect();

    combinations
        .iter()
        .map(|c| match c.horses.as_slice() {
            [horse] if c.odds.is_none() && c.leg != Some(SupportLeg::Place) => match by_horse.get(horse) {
                Some(&odds) => c.clone().with_odds(odds),
                None => c.clone(),
            },
            _ => c.clone(),
        })
        .collect()
}
