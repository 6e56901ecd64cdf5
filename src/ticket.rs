//! Purchase list: tickets, settlement and aggregate totals.
//!
//! The list owns no storage. It is plain serde data so an external store can
//! persist it between sessions.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bet_type::BetCategory;
use crate::combination::WagerCombination;
use crate::payout::{calculate_actual_result, return_rate, ActualResult, RaceResult};
use crate::selection::PurchaseMethod;

/// Result attached to a settled ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSettlement {
    pub result: RaceResult,
    pub outcome: ActualResult,
    pub settled_at: DateTime<Utc>,
}

/// A purchased ticket (買い目 + stake).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTicket {
    pub id: String,
    pub bet_type: BetCategory,
    pub method: PurchaseMethod,
    pub combinations: Vec<WagerCombination>,
    pub unit_stake: u32,
    pub total_cost: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<TicketSettlement>,
}

impl PurchaseTicket {
    pub fn is_settled(&self) -> bool {
        self.settlement.is_some()
    }

    pub fn hit_count(&self) -> usize {
        self.settlement.as_ref().map_or(0, |s| s.outcome.hit_count)
    }

    pub fn actual_payout(&self) -> u64 {
        self.settlement.as_ref().map_or(0, |s| s.outcome.actual_payout)
    }

    /// Stake still in play: total cost until settled, then net of refunds.
    pub fn cost_basis(&self) -> u64 {
        self.settlement
            .as_ref()
            .map_or(self.total_cost, |s| s.outcome.cost_basis)
    }
}

/// Aggregate totals over a purchase list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PurchaseSummary {
    pub ticket_count: usize,
    pub settled_count: usize,
    /// Settled tickets with at least one hit
    pub hit_ticket_count: usize,
    pub total_investment: u64,
    pub total_payout: u64,
    pub profit: i64,
    /// Percent of investment, 0 when nothing is invested
    pub return_rate: f64,
}

/// Tickets added by the bettor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseList {
    tickets: Vec<PurchaseTicket>,
    #[serde(default)]
    next_seq: u64,
}

impl PurchaseList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tickets(&self) -> &[PurchaseTicket] {
        &self.tickets
    }

    pub fn get(&self, id: &str) -> Option<&PurchaseTicket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Add a ticket.
    ///
    /// Returns `None` (nothing added) when there are no combinations or the
    /// stake is 0, otherwise the new ticket id.
    pub fn add(
        &mut self,
        bet_type: BetCategory,
        method: PurchaseMethod,
        combinations: Vec<WagerCombination>,
        unit_stake: u32,
    ) -> Option<String> {
        if combinations.is_empty() || unit_stake == 0 {
            return None;
        }

        let created_at = Utc::now();
        self.next_seq += 1;
        let id = format!("{}-{}", created_at.timestamp_millis(), self.next_seq);
        let total_cost = (unit_stake as u64).saturating_mul(combinations.len() as u64);

        tracing::debug!(
            id = %id,
            bet_type = bet_type.name(),
            count = combinations.len(),
            total_cost,
            "ticket added"
        );

        self.tickets.push(PurchaseTicket {
            id: id.clone(),
            bet_type,
            method,
            combinations,
            unit_stake,
            total_cost,
            created_at,
            settlement: None,
        });
        Some(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);
        self.tickets.len() != before
    }

    pub fn clear(&mut self) {
        self.tickets.clear();
    }

    /// Settle a ticket against a race result.
    ///
    /// Fails when the result lacks 1st/2nd place, the ticket is unknown, or
    /// it was already settled (settled tickets are closed).
    pub fn settle(&mut self, id: &str, result: RaceResult) -> Result<&ActualResult> {
        result.validate().context("invalid race result")?;

        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) else {
            bail!("ticket not found: {}", id);
        };
        if ticket.is_settled() {
            bail!("ticket already settled: {}", id);
        }

        let outcome = calculate_actual_result(
            ticket.bet_type,
            &ticket.combinations,
            ticket.unit_stake,
            &result,
        );
        tracing::info!(
            id = %id,
            hits = outcome.hit_count,
            payout = outcome.actual_payout,
            refunded = outcome.refunded_count,
            "ticket settled"
        );

        let settlement = ticket.settlement.insert(TicketSettlement {
            result,
            outcome,
            settled_at: Utc::now(),
        });
        Ok(&settlement.outcome)
    }

    /// Investment, payout, profit and return rate over every ticket.
    pub fn summary(&self) -> PurchaseSummary {
        let total_investment = self
            .tickets
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.cost_basis()));
        let total_payout = self
            .tickets
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.actual_payout()));
        let profit = (total_payout as i128 - total_investment as i128)
            .clamp(i64::MIN as i128, i64::MAX as i128) as i64;

        PurchaseSummary {
            ticket_count: self.tickets.len(),
            settled_count: self.tickets.iter().filter(|t| t.is_settled()).count(),
            hit_ticket_count: self.tickets.iter().filter(|t| t.hit_count() > 0).count(),
            total_investment,
            total_payout,
            profit,
            return_rate: return_rate(total_payout as f64, total_investment),
        }
    }
}
