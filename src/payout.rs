//! Settlement: hit detection, expected payout and actual payout.
//!
//! Everything here is total over its inputs. Missing result fields, zero
//! stakes and empty selections produce zero results instead of errors, since
//! these run on every change of a half-filled form.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::bracket::{bracket_of, horses_in_bracket};
use crate::combination::{SupportLeg, WagerCombination};

/// Official race result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub first: Option<u8>,
    pub second: Option<u8>,
    #[serde(default)]
    pub third: Option<u8>,
    /// Brackets of the 1st and 2nd horse (needed for 枠連)
    #[serde(default)]
    pub first_bracket: Option<u8>,
    #[serde(default)]
    pub second_bracket: Option<u8>,
    /// Payout per 100 yen stake
    #[serde(default)]
    pub dividend: Option<u32>,
    /// Horses withdrawn after betting closed (返還)
    #[serde(default)]
    pub refund_horses: Vec<u8>,
    /// Number of runners, used to derive brackets when they are not given
    #[serde(default)]
    pub field_size: Option<u8>,
}

impl RaceResult {
    pub fn new(first: u8, second: u8, third: Option<u8>) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
            third,
            ..Default::default()
        }
    }

    pub fn with_dividend(mut self, dividend: u32) -> Self {
        self.dividend = Some(dividend);
        self
    }

    pub fn with_refunds(mut self, horses: Vec<u8>) -> Self {
        self.refund_horses = horses;
        self
    }

    /// Input validation for the orchestration layer: 1st and 2nd are required
    /// and all given places must be distinct horses.
    pub fn validate(&self) -> Result<()> {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            bail!("1st and 2nd place are required");
        };
        if first == 0 || second == 0 || self.third == Some(0) {
            bail!("horse numbers start at 1");
        }
        if first == second || self.third == Some(first) || self.third == Some(second) {
            bail!("finishing positions must be different horses");
        }
        Ok(())
    }

    /// The first `n` finishers, or `None` when any of them is missing.
    pub fn top(&self, n: usize) -> Option<Vec<u8>> {
        [self.first, self.second, self.third]
            .into_iter()
            .take(n)
            .collect::<Option<Vec<_>>>()
            .filter(|v| v.len() == n)
    }

    /// Every finisher known, in order, up to 3rd.
    pub fn placed(&self) -> Vec<u8> {
        [self.first, self.second, self.third]
            .into_iter()
            .map_while(|p| p)
            .collect()
    }

    pub fn is_refunded(&self, horse: u8) -> bool {
        self.refund_horses.contains(&horse)
    }

    /// Brackets of the 1st and 2nd horse, explicit or derived from field size.
    pub fn top_brackets(&self) -> Option<(u8, u8)> {
        let derive = |horse: Option<u8>| {
            let size = self.field_size?;
            bracket_of(horse?, size)
        };
        let first = self.first_bracket.or_else(|| derive(self.first))?;
        let second = self.second_bracket.or_else(|| derive(self.second))?;
        Some((first, second))
    }
}

/// Whether a refund voids this combination.
///
/// Horse-number categories are voided by any refunded horse. For 枠連 a bracket
/// is voided only when every horse drawn into it was refunded, which needs the
/// field size.
pub fn is_voided(category: BetCategory, combination: &WagerCombination, result: &RaceResult) -> bool {
    if result.refund_horses.is_empty() {
        return false;
    }
    if !category.uses_bracket() {
        return combination.horses.iter().any(|h| result.is_refunded(*h));
    }

    let Some(field_size) = result.field_size else {
        return false;
    };
    combination.horses.iter().any(|bracket| {
        let members = horses_in_bracket(*bracket, field_size);
        !members.is_empty() && members.iter().all(|h| result.is_refunded(*h))
    })
}

/// Judge a combination against a race result.
///
/// Voided combinations and malformed combinations (wrong length, repeated
/// numbers) are never hits. Same-bracket 枠連 pairs such as 8-8 cannot be
/// represented, so a race whose 1st and 2nd share a bracket has no 枠連 hit.
pub fn check_hit(category: BetCategory, combination: &WagerCombination, result: &RaceResult) -> bool {
    let horses = &combination.horses;
    if horses.len() != category.arity() || !combination.is_distinct() {
        return false;
    }
    if is_voided(category, combination, result) {
        return false;
    }

    match category {
        BetCategory::Win => win_hit(horses[0], result),
        BetCategory::Place => place_hit(horses[0], result),
        BetCategory::SupportTicket => match combination.leg {
            Some(SupportLeg::Place) => place_hit(horses[0], result),
            Some(SupportLeg::Win) | None => win_hit(horses[0], result),
        },
        BetCategory::BracketQuinella => match result.top_brackets() {
            Some((a, b)) => same_set(horses, &[a, b]),
            None => false,
        },
        BetCategory::Quinella | BetCategory::Trio => match result.top(category.arity()) {
            Some(top) => same_set(horses, &top),
            None => false,
        },
        BetCategory::Exacta | BetCategory::Trifecta => {
            result.top(category.arity()).as_deref() == Some(horses.as_slice())
        }
        // Without a 3rd place only the 1st-2nd pair can be judged a hit
        BetCategory::QuinellaPlace => {
            let placed = result.placed();
            placed.len() >= 2 && horses.iter().all(|h| placed.contains(h))
        }
    }
}

fn win_hit(horse: u8, result: &RaceResult) -> bool {
    result.first == Some(horse)
}

fn place_hit(horse: u8, result: &RaceResult) -> bool {
    result.placed().contains(&horse)
}

fn same_set(a: &[u8], b: &[u8]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Expected return of a selection from attached odds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpectedPayout {
    pub combination_count: usize,
    /// Combinations carrying usable odds
    pub priced_count: usize,
    /// Payout per combination if it hits (`None` without odds)
    pub payouts: Vec<Option<f64>>,
    pub total_cost: u64,
    pub total_payout: f64,
    /// Percent of total cost, 0 when nothing is staked
    pub return_rate: f64,
}

/// Calculate expected payout.
///
/// # Arguments
/// * `combinations` - Combinations with optional odds (decimal, e.g. 15.3)
/// * `unit_stake` - Stake per combination in yen
///
/// # Returns
/// Payout per combination = odds × stake; totals summed over the combinations.
/// Non-finite or non-positive odds are ignored.
pub fn calculate_expected_payout(combinations: &[WagerCombination], unit_stake: u32) -> ExpectedPayout {
    let payouts: Vec<Option<f64>> = combinations
        .iter()
        .map(|c| {
            c.odds
                .filter(|o| o.is_finite() && *o > 0.0)
                .map(|o| o * unit_stake as f64)
        })
        .collect();

    let total_cost = (unit_stake as u64).saturating_mul(combinations.len() as u64);
    let total_payout: f64 = payouts.iter().flatten().sum();

    ExpectedPayout {
        combination_count: combinations.len(),
        priced_count: payouts.iter().flatten().count(),
        payouts,
        total_cost,
        total_payout,
        return_rate: return_rate(total_payout, total_cost),
    }
}

/// Settled outcome of one ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualResult {
    pub hit_count: usize,
    /// Combinations voided by a refund
    pub refunded_count: usize,
    /// Stake × every combination
    pub total_cost: u64,
    /// Stake × combinations still in play after refunds
    pub cost_basis: u64,
    /// Stake returned for voided combinations
    pub refund_amount: u64,
    pub actual_payout: u64,
    /// Percent of the cost basis
    pub return_rate: f64,
}

/// Calculate the actual payout of a ticket.
///
/// One dividend (per 100 yen) applies to every hit of the ticket, so
/// payout = dividend / 100 × stake × hits. Without a dividend the payout is 0
/// but hits are still counted.
pub fn calculate_actual_result(
    category: BetCategory,
    combinations: &[WagerCombination],
    unit_stake: u32,
    result: &RaceResult,
) -> ActualResult {
    let stake = unit_stake as u64;
    let refunded_count = combinations
        .iter()
        .filter(|c| is_voided(category, c, result))
        .count();
    let hit_count = combinations
        .iter()
        .filter(|c| check_hit(category, c, result))
        .count();

    let total_cost = stake.saturating_mul(combinations.len() as u64);
    let refund_amount = stake.saturating_mul(refunded_count as u64);
    let cost_basis = total_cost.saturating_sub(refund_amount);
    let actual_payout = result
        .dividend
        .map(|d| {
            (d as u64)
                .saturating_mul(stake)
                .saturating_mul(hit_count as u64)
                / 100
        })
        .unwrap_or(0);

    ActualResult {
        hit_count,
        refunded_count,
        total_cost,
        cost_basis,
        refund_amount,
        actual_payout,
        return_rate: return_rate(actual_payout as f64, cost_basis),
    }
}

/// Payout as a percentage of cost, 0 when cost is 0.
pub fn return_rate(payout: f64, cost: u64) -> f64 {
    if cost == 0 {
        0.0
    } else {
        payout / cost as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(horses: &[u8]) -> WagerCombination {
        WagerCombination::new(horses.to_vec())
    }

    #[test]
    fn test_win_and_place() {
        let result = RaceResult::new(5, 2, Some(9));
        assert!(check_hit(BetCategory::Win, &combo(&[5]), &result));
        assert!(!check_hit(BetCategory::Win, &combo(&[2]), &result));
        assert!(check_hit(BetCategory::Place, &combo(&[9]), &result));
        assert!(!check_hit(BetCategory::Place, &combo(&[1]), &result));
    }

    #[test]
    fn test_place_without_third() {
        let result = RaceResult::new(5, 2, None);
        assert!(check_hit(BetCategory::Place, &combo(&[2]), &result));
        assert!(!check_hit(BetCategory::Place, &combo(&[9]), &result));
    }

    #[test]
    fn test_support_ticket_legs() {
        let result = RaceResult::new(5, 2, Some(9));
        let win = WagerCombination::support_leg(2, SupportLeg::Win);
        let place = WagerCombination::support_leg(2, SupportLeg::Place);
        assert!(!check_hit(BetCategory::SupportTicket, &win, &result));
        assert!(check_hit(BetCategory::SupportTicket, &place, &result));
    }

    #[test]
    fn test_quinella_and_exacta() {
        let result = RaceResult::new(3, 7, Some(1));
        assert!(check_hit(BetCategory::Quinella, &combo(&[7, 3]), &result));
        assert!(!check_hit(BetCategory::Quinella, &combo(&[3, 1]), &result));
        assert!(check_hit(BetCategory::Exacta, &combo(&[3, 7]), &result));
        assert!(!check_hit(BetCategory::Exacta, &combo(&[7, 3]), &result));
    }

    #[test]
    fn test_trio_and_trifecta() {
        let result = RaceResult::new(3, 7, Some(1));
        assert!(check_hit(BetCategory::Trio, &combo(&[1, 3, 7]), &result));
        assert!(check_hit(BetCategory::Trifecta, &combo(&[3, 7, 1]), &result));
        assert!(!check_hit(BetCategory::Trifecta, &combo(&[1, 3, 7]), &result));

        // 3rd missing → cannot judge
        let partial = RaceResult::new(3, 7, None);
        assert!(!check_hit(BetCategory::Trio, &combo(&[1, 3, 7]), &partial));
    }

    #[test]
    fn test_quinella_place_any_two_of_top_three() {
        let result = RaceResult::new(3, 7, Some(1));
        assert!(check_hit(BetCategory::QuinellaPlace, &combo(&[1, 3]), &result));
        assert!(check_hit(BetCategory::QuinellaPlace, &combo(&[1, 7]), &result));
        assert!(!check_hit(BetCategory::QuinellaPlace, &combo(&[1, 8]), &result));
    }

    #[test]
    fn test_quinella_place_without_third() {
        let result = RaceResult::new(3, 7, None).with_dividend(240);
        assert!(check_hit(BetCategory::QuinellaPlace, &combo(&[3, 7]), &result));
        assert!(check_hit(BetCategory::QuinellaPlace, &combo(&[7, 3]), &result));
        assert!(!check_hit(BetCategory::QuinellaPlace, &combo(&[3, 1]), &result));

        let actual = calculate_actual_result(
            BetCategory::QuinellaPlace,
            &[combo(&[3, 7]), combo(&[1, 3])],
            100,
            &result,
        );
        assert_eq!(actual.hit_count, 1);
        assert_eq!(actual.actual_payout, 240);
    }

    #[test]
    fn test_bracket_quinella_explicit_brackets() {
        let mut result = RaceResult::new(3, 7, None);
        result.first_bracket = Some(2);
        result.second_bracket = Some(4);
        assert!(check_hit(BetCategory::BracketQuinella, &combo(&[4, 2]), &result));
        assert!(!check_hit(BetCategory::BracketQuinella, &combo(&[3, 7]), &result));
    }

    #[test]
    fn test_bracket_quinella_same_bracket_finish_has_no_hit() {
        let mut result = RaceResult::new(14, 15, None);
        result.first_bracket = Some(7);
        result.second_bracket = Some(7);
        assert!(!check_hit(BetCategory::BracketQuinella, &combo(&[7, 8]), &result));
        assert!(!check_hit(BetCategory::BracketQuinella, &combo(&[7, 7]), &result));
    }

    #[test]
    fn test_bracket_quinella_derived_from_field_size() {
        let mut result = RaceResult::new(13, 1, None);
        result.field_size = Some(18);
        assert!(check_hit(BetCategory::BracketQuinella, &combo(&[1, 7]), &result));

        // neither brackets nor field size
        let bare = RaceResult::new(13, 1, None);
        assert!(!check_hit(BetCategory::BracketQuinella, &combo(&[1, 7]), &bare));
    }

    #[test]
    fn test_refund_voids_combination() {
        let result = RaceResult::new(3, 7, Some(1)).with_refunds(vec![3]);
        assert!(!check_hit(BetCategory::Quinella, &combo(&[3, 7]), &result));
        assert!(is_voided(BetCategory::Quinella, &combo(&[3, 7]), &result));
        assert!(!is_voided(BetCategory::Quinella, &combo(&[1, 7]), &result));
    }

    #[test]
    fn test_bracket_refund_needs_whole_bracket() {
        let mut result = RaceResult::new(5, 6, None).with_refunds(vec![1]);
        result.field_size = Some(18);
        // bracket 1 = horses 1 and 2, only 1 refunded
        assert!(!is_voided(BetCategory::BracketQuinella, &combo(&[1, 3]), &result));

        result.refund_horses = vec![1, 2];
        assert!(is_voided(BetCategory::BracketQuinella, &combo(&[1, 3]), &result));
    }

    #[test]
    fn test_check_hit_idempotent() {
        let result = RaceResult::new(3, 7, Some(1));
        let c = combo(&[3, 7, 1]);
        let first = check_hit(BetCategory::Trifecta, &c, &result);
        let second = check_hit(BetCategory::Trifecta, &c, &result);
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_combination_never_hits() {
        let result = RaceResult::new(3, 7, Some(1));
        assert!(!check_hit(BetCategory::Quinella, &combo(&[3]), &result));
        assert!(!check_hit(BetCategory::Trio, &combo(&[3, 3, 7]), &result));
    }

    #[test]
    fn test_empty_result_never_hits() {
        let result = RaceResult::default();
        assert!(!check_hit(BetCategory::Win, &combo(&[1]), &result));
        assert!(!check_hit(BetCategory::Exacta, &combo(&[1, 2]), &result));
    }

    #[test]
    fn test_expected_payout() {
        let combos = vec![
            combo(&[1, 2]).with_odds(15.3),
            combo(&[1, 3]).with_odds(4.0),
            combo(&[2, 3]),
        ];
        let expected = calculate_expected_payout(&combos, 100);
        assert_eq!(expected.total_cost, 300);
        assert_eq!(expected.priced_count, 2);
        assert!((expected.total_payout - 1930.0).abs() < 1e-9);
        assert!((expected.return_rate - 643.333).abs() < 0.01);
        assert_eq!(expected.payouts[2], None);
    }

    #[test]
    fn test_expected_payout_ignores_bad_odds() {
        let combos = vec![combo(&[1]).with_odds(f64::NAN), combo(&[2]).with_odds(-1.0)];
        let expected = calculate_expected_payout(&combos, 100);
        assert_eq!(expected.priced_count, 0);
        assert_eq!(expected.total_payout, 0.0);
    }

    #[test]
    fn test_expected_payout_zero_cost() {
        let expected = calculate_expected_payout(&[], 100);
        assert_eq!(expected.total_cost, 0);
        assert_eq!(expected.return_rate, 0.0);
    }

    #[test]
    fn test_actual_result_single_dividend() {
        let combos = vec![combo(&[1, 3]), combo(&[1, 7]), combo(&[3, 7]), combo(&[2, 4])];
        let result = RaceResult::new(3, 7, Some(1)).with_dividend(350);

        let actual = calculate_actual_result(BetCategory::QuinellaPlace, &combos, 200, &result);
        assert_eq!(actual.hit_count, 3);
        assert_eq!(actual.actual_payout, 3 * 700);
        assert_eq!(actual.total_cost, 800);
        assert_eq!(actual.cost_basis, 800);
    }

    #[test]
    fn test_actual_result_refund_excluded_from_cost_basis() {
        let combos = vec![combo(&[1, 2]), combo(&[1, 3]), combo(&[2, 3])];
        let result = RaceResult::new(1, 2, None).with_dividend(1280).with_refunds(vec![3]);

        let actual = calculate_actual_result(BetCategory::Quinella, &combos, 100, &result);
        assert_eq!(actual.hit_count, 1);
        assert_eq!(actual.refunded_count, 2);
        assert_eq!(actual.refund_amount, 200);
        assert_eq!(actual.cost_basis, 100);
        assert_eq!(actual.actual_payout, 1280);
        assert!((actual.return_rate - 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_actual_result_without_dividend() {
        let combos = vec![combo(&[1, 2])];
        let actual = calculate_actual_result(BetCategory::Exacta, &combos, 100, &RaceResult::new(1, 2, None));
        assert_eq!(actual.hit_count, 1);
        assert_eq!(actual.actual_payout, 0);
    }

    #[test]
    fn test_actual_result_large_values_saturate() {
        let combos = vec![combo(&[1]), combo(&[1])];
        let result = RaceResult::new(1, 2, None).with_dividend(u32::MAX);

        let actual = calculate_actual_result(BetCategory::Win, &combos, u32::MAX, &result);
        assert_eq!(actual.hit_count, 2);
        assert_eq!(actual.total_cost, 2 * u32::MAX as u64);
        assert_eq!(actual.actual_payout, u64::MAX / 100);
        assert!(actual.return_rate.is_finite());
    }

    #[test]
    fn test_validate() {
        assert!(RaceResult::new(1, 2, Some(3)).validate().is_ok());
        assert!(RaceResult::new(1, 1, None).validate().is_err());
        assert!(RaceResult::new(1, 2, Some(2)).validate().is_err());
        assert!(RaceResult::default().validate().is_err());
    }
}
