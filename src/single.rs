//! Single-horse categories: 単勝, 複勝 and 応援馬券.

use crate::bet_type::BetCategory;
use crate::combination::{distinct_sorted, SupportLeg, WagerCombination};

/// One combination per distinct horse; two (win leg, place leg) for 応援馬券.
///
/// Multi-horse categories are not handled here and yield nothing.
pub fn single_combinations(category: BetCategory, horses: &[u8]) -> Vec<WagerCombination> {
    match category {
        BetCategory::SupportTicket => support_ticket_combinations(horses),
        BetCategory::Win | BetCategory::Place => distinct_sorted(horses)
            .into_iter()
            .map(|h| WagerCombination::new(vec![h]))
            .collect(),
        _ => Vec::new(),
    }
}

/// 応援馬券 is always exactly two fixed-cost units per horse.
pub fn support_ticket_combinations(horses: &[u8]) -> Vec<WagerCombination> {
    distinct_sorted(horses)
        .into_iter()
        .flat_map(|h| {
            [
                WagerCombination::support_leg(h, SupportLeg::Win),
                WagerCombination::support_leg(h, SupportLeg::Place),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_one_per_horse() {
        let combos = single_combinations(BetCategory::Win, &[7, 3, 7]);
        let horses: Vec<_> = combos.iter().map(|c| c.horses.clone()).collect();
        assert_eq!(horses, vec![vec![3], vec![7]]);
        assert!(combos.iter().all(|c| c.leg.is_none()));
    }

    #[test]
    fn test_support_ticket_two_legs_per_horse() {
        let combos = support_ticket_combinations(&[5, 2]);
        assert_eq!(combos.len(), 4);
        assert_eq!(combos[0], WagerCombination::support_leg(2, SupportLeg::Win));
        assert_eq!(combos[1], WagerCombination::support_leg(2, SupportLeg::Place));
        assert_eq!(combos[2].horses, vec![5]);
    }

    #[test]
    fn test_multi_horse_category_yields_nothing() {
        assert!(single_combinations(BetCategory::Quinella, &[1, 2]).is_empty());
    }
}
