//! Request and response types for the CLI and HTTP service.

use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::combination::WagerCombination;
use crate::parsers::{CategoryMismatch, ParsedOdds};
use crate::payout::{ExpectedPayout, RaceResult};
use crate::selection::{PurchaseMethod, Selection};
use crate::ticket::{PurchaseList, PurchaseSummary};

/// Horse on the race card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorseSelection {
    pub number: u8,
    #[serde(default)]
    pub bracket: Option<u8>,
    /// Current win odds
    #[serde(default)]
    pub odds: Option<f64>,
}

/// Combination request: category + selection state
#[derive(Debug, Clone, Deserialize)]
pub struct CombinationRequest {
    pub bet_type: BetCategory,
    pub selection: Selection,
    /// Stake per combination (default from config)
    #[serde(default)]
    pub unit_stake: Option<u32>,
    /// Number of runners (default from config)
    #[serde(default)]
    pub field_size: Option<u8>,
    /// Race card entries; win odds are attached to 単勝 combinations
    #[serde(default)]
    pub field: Vec<HorseSelection>,
    /// Pasted odds text to attach
    #[serde(default)]
    pub odds_text: Option<String>,
}

/// Combination response
#[derive(Debug, Serialize)]
pub struct CombinationResponse {
    pub bet_type: BetCategory,
    pub method: PurchaseMethod,
    pub unit_stake: u32,
    pub count: usize,
    pub combinations: Vec<WagerCombination>,
    pub expected: ExpectedPayout,
    /// Combinations that received odds from `odds_text`
    pub odds_matched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<CategoryMismatch>,
}

/// Odds text parse request
#[derive(Debug, Clone, Deserialize)]
pub struct OddsParseRequest {
    pub text: String,
    /// Category currently selected by the caller
    #[serde(default)]
    pub bet_type: Option<BetCategory>,
}

/// Odds text parse response
#[derive(Debug, Serialize)]
pub struct OddsParseResponse {
    #[serde(flatten)]
    pub parsed: ParsedOdds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<CategoryMismatch>,
}

/// One ticket to settle
#[derive(Debug, Clone, Deserialize)]
pub struct TicketRequest {
    pub bet_type: BetCategory,
    pub selection: Selection,
    #[serde(default)]
    pub unit_stake: Option<u32>,
    /// Result for this ticket; falls back to the request-level result
    #[serde(default)]
    pub result: Option<RaceResult>,
}

/// Settlement request: tickets of one race
#[derive(Debug, Clone, Deserialize)]
pub struct SettleRequest {
    pub tickets: Vec<TicketRequest>,
    #[serde(default)]
    pub result: Option<RaceResult>,
    #[serde(default)]
    pub field_size: Option<u8>,
}

/// Settlement response
#[derive(Debug, Serialize)]
pub struct SettleResponse {
    pub list: PurchaseList,
    pub summary: PurchaseSummary,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
