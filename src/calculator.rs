//! Request orchestration shared by the CLI and the HTTP handlers.
//!
//! Applies configuration defaults, recomputes combinations, attaches odds and
//! settles tickets. Validation failures surface as `anyhow` errors; the engine
//! modules below stay total.

use anyhow::{bail, Context, Result};

use crate::bet_type::BetCategory;
use crate::config::BettingConfig;
use crate::odds::{attach_leg_odds, attach_win_odds, count_matches, support_leg_for};
use crate::parsers::parse_odds_text_as;
use crate::payout::calculate_expected_payout;
use crate::selection::recompute;
use crate::ticket::PurchaseList;
use crate::types::{
    CombinationRequest, CombinationResponse, OddsParseRequest, OddsParseResponse, SettleRequest,
    SettleResponse,
};

/// Build the combination list, attach odds and compute the expected payout.
pub fn build_combinations(req: &CombinationRequest, config: &BettingConfig) -> CombinationResponse {
    let category = req.bet_type;
    let field_size = config.field_size_or(req.field_size);
    let unit_stake = config.normalize_stake(req.unit_stake);

    let selection = req.selection.sanitized(category.max_number(field_size));
    let mut combinations = recompute(category, &selection);

    if matches!(category, BetCategory::Win | BetCategory::SupportTicket) && !req.field.is_empty() {
        combinations = attach_win_odds(&combinations, &req.field);
    }

    let mut odds_matched = 0;
    let mut mismatch = None;
    if let Some(text) = req.odds_text.as_deref().filter(|t| !t.trim().is_empty()) {
        let parsed = parse_odds_text_as(text, Some(category));
        // 単勝 and 複勝 text both price a 応援馬券
        mismatch = parsed.mismatch(category).filter(|m| {
            !(category == BetCategory::SupportTicket
                && matches!(m.detected, BetCategory::Win | BetCategory::Place))
        });
        if let Some(m) = &mismatch {
            tracing::warn!(
                detected = m.detected.name(),
                current = m.current.name(),
                "odds text looks like a different bet type"
            );
        }
        let leg = support_leg_for(parsed.detected_category);
        odds_matched = count_matches(category, &combinations, &parsed.records, leg);
        combinations = attach_leg_odds(category, &combinations, &parsed.records, leg);
    }

    let expected = calculate_expected_payout(&combinations, unit_stake);
    tracing::debug!(
        bet_type = category.name(),
        method = ?selection.method(),
        count = combinations.len(),
        odds_matched,
        "combinations built"
    );

    CombinationResponse {
        bet_type: category,
        method: selection.method(),
        unit_stake,
        count: combinations.len(),
        combinations,
        expected,
        odds_matched,
        mismatch,
    }
}

/// Parse pasted odds text, keyed by the caller's category when given.
pub fn parse_odds(req: &OddsParseRequest) -> OddsParseResponse {
    let parsed = parse_odds_text_as(&req.text, req.bet_type);
    let mismatch = req.bet_type.and_then(|current| parsed.mismatch(current));

    tracing::debug!(
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        detected = ?parsed.detected_category,
        "odds text parsed"
    );

    OddsParseResponse { parsed, mismatch }
}

/// Add every ticket of a race to a fresh purchase list and settle it.
///
/// A ticket uses its own result, else the request-level one. Tickets with no
/// combinations are skipped; tickets with no result stay unsettled.
pub fn settle_tickets(req: &SettleRequest, config: &BettingConfig) -> Result<SettleResponse> {
    if req.tickets.is_empty() {
        bail!("no tickets provided");
    }

    let field_size = config.field_size_or(req.field_size);
    let mut list = PurchaseList::new();

    for (index, ticket) in req.tickets.iter().enumerate() {
        let category = ticket.bet_type;
        let selection = ticket.selection.sanitized(category.max_number(field_size));
        let combinations = recompute(category, &selection);
        let unit_stake = config.normalize_stake(ticket.unit_stake);

        let Some(id) = list.add(category, selection.method(), combinations, unit_stake) else {
            tracing::warn!(index, bet_type = category.name(), "ticket has no combinations, skipped");
            continue;
        };

        let Some(mut result) = ticket.result.clone().or_else(|| req.result.clone()) else {
            continue;
        };
        if result.field_size.is_none() {
            result.field_size = Some(field_size);
        }

        list.settle(&id, result)
            .with_context(|| format!("ticket {} ({})", index + 1, category.label()))?;
    }

    let summary = list.summary();
    Ok(SettleResponse { list, summary })
}
