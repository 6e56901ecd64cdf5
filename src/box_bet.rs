//! BOX purchase: every combination among a flat set of horses.

use crate::bet_type::BetCategory;
use crate::combination::{distinct_sorted, WagerCombination};
use crate::single::single_combinations;

/// Generate BOX combinations.
///
/// # Arguments
/// * `category` - Bet category (arity and order sensitivity)
/// * `horses` - Selected horse numbers (duplicates ignored)
///
/// # Returns
/// Unordered categories: each k-subset once, ascending.
/// Ordered categories: every k-permutation.
/// Empty when fewer distinct horses than the arity are selected.
pub fn box_combinations(category: BetCategory, horses: &[u8]) -> Vec<WagerCombination> {
    if category.is_single() {
        return single_combinations(category, horses);
    }

    let pool = distinct_sorted(horses);
    let k = category.arity();

    let tuples = if category.is_ordered() {
        permutations(&pool, k)
    } else {
        subsets(&pool, k)
    };

    tuples.into_iter().map(WagerCombination::new).collect()
}

/// Every k-subset of `pool`, in pool order.
pub(crate) fn subsets(pool: &[u8], k: usize) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if k == 0 || pool.len() < k {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    choose(pool, k, 0, &mut current, &mut out);
    out
}

/// Every k-permutation of `pool`, lexicographic in pool order.
pub(crate) fn permutations(pool: &[u8], k: usize) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if k == 0 || pool.len() < k {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    let mut used = vec![false; pool.len()];
    arrange(pool, k, &mut used, &mut current, &mut out);
    out
}

fn choose(pool: &[u8], k: usize, start: usize, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in start..pool.len() {
        current.push(pool[i]);
        choose(pool, k, i + 1, current, out);
        current.pop();
    }
}

fn arrange(
    pool: &[u8],
    k: usize,
    used: &mut [bool],
    current: &mut Vec<u8>,
    out: &mut Vec<Vec<u8>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(pool[i]);
        arrange(pool, k, used, current, out);
        current.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horses_of(combos: &[WagerCombination]) -> Vec<Vec<u8>> {
        combos.iter().map(|c| c.horses.clone()).collect()
    }

    #[test]
    fn test_quinella_box() {
        let combos = box_combinations(BetCategory::Quinella, &[3, 1, 2]);
        assert_eq!(horses_of(&combos), vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn test_trifecta_box() {
        let combos = box_combinations(BetCategory::Trifecta, &[1, 2, 3]);
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0].horses, vec![1, 2, 3]);
        assert_eq!(combos[1].horses, vec![1, 3, 2]);
        assert_eq!(combos[5].horses, vec![3, 2, 1]);
    }

    #[test]
    fn test_exacta_box_has_both_directions() {
        let combos = box_combinations(BetCategory::Exacta, &[1, 2]);
        assert_eq!(horses_of(&combos), vec![vec![1, 2], vec![2, 1]]);
    }

    #[test]
    fn test_counts_match_formula() {
        let horses: Vec<u8> = (1..=7).collect();
        assert_eq!(box_combinations(BetCategory::Win, &horses).len(), 7);
        assert_eq!(box_combinations(BetCategory::SupportTicket, &horses).len(), 14);
        assert_eq!(box_combinations(BetCategory::Quinella, &horses).len(), 21);
        assert_eq!(box_combinations(BetCategory::Exacta, &horses).len(), 42);
        assert_eq!(box_combinations(BetCategory::Trio, &horses).len(), 35);
        assert_eq!(box_combinations(BetCategory::Trifecta, &horses).len(), 210);

        // C(18,3) = 816, 18*17*16 = 4896
        let field: Vec<u8> = (1..=18).collect();
        assert_eq!(box_combinations(BetCategory::Trio, &field).len(), 816);
        assert_eq!(box_combinations(BetCategory::Trifecta, &field).len(), 4896);
    }

    #[test]
    fn test_insufficient_horses() {
        assert!(box_combinations(BetCategory::Trio, &[1, 2]).is_empty());
        assert!(box_combinations(BetCategory::Quinella, &[4, 4]).is_empty());
        assert!(box_combinations(BetCategory::Exacta, &[]).is_empty());
    }

    #[test]
    fn test_stable_output() {
        let a = box_combinations(BetCategory::Trio, &[5, 1, 9, 3]);
        let b = box_combinations(BetCategory::Trio, &[5, 1, 9, 3]);
        assert_eq!(a, b);
    }
}
