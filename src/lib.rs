//! Keiba Calc - JRA wager planner
//!
//! This library provides:
//! - Combination generation for every JRA bet type (通常, BOX, ながし, フォーメーション)
//! - Bracket (枠番) assignment
//! - Odds import from text pasted off betting sites
//! - Expected and actual payout, refunds and a purchase list with totals
//!
//! # Example
//!
//! ```
//! use keiba_calc::{recompute, BetCategory, Selection};
//!
//! let combos = recompute(BetCategory::Trio, &Selection::Box { horses: vec![1, 2, 3, 4] });
//! assert_eq!(combos.len(), 4);
//! ```

pub mod bet_type;
pub mod box_bet;
pub mod bracket;
pub mod calculator;
pub mod combination;
pub mod config;
pub mod formation;
pub mod nagashi;
pub mod odds;
pub mod parsers;
pub mod payout;
pub mod routes;
pub mod selection;
pub mod single;
pub mod ticket;
pub mod types;

// Re-export commonly used types
pub use bet_type::BetCategory;
pub use combination::{CombinationSet, SupportLeg, WagerCombination};
pub use parsers::{parse_odds_text, parse_odds_text_as, ParsedOdds, ParsedOddsRecord};
pub use payout::{
    calculate_actual_result, calculate_expected_payout, check_hit, ActualResult, ExpectedPayout,
    RaceResult,
};
pub use selection::{recompute, PurchaseMethod, Selection};
pub use ticket::{PurchaseList, PurchaseSummary, PurchaseTicket};
