//! CLI commands for keiba-calc.
//!
//! Supports API server mode plus file based combination building, odds text
//! parsing and settlement.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use keiba_calc::bet_type::BetCategory;
use keiba_calc::calculator::{build_combinations, parse_odds, settle_tickets};
use keiba_calc::config::AppConfig;
use keiba_calc::types::{
    CombinationRequest, CombinationResponse, OddsParseRequest, OddsParseResponse, SettleRequest,
    SettleResponse,
};

#[derive(Parser)]
#[command(name = "keiba-calc")]
#[command(version, about = "Keiba bet calculator: combinations, odds import and settlement", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Build combinations from a selection JSON file
    Combos {
        /// Path to combination request JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Pasted odds text file to attach
        #[arg(short, long)]
        odds: Option<PathBuf>,
    },

    /// Parse pasted odds text (reads stdin when no file is given)
    ParseOdds {
        /// Path to odds text file
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Bet type used for keys (win, quinella, trifecta, 馬連, ...)
        #[arg(short, long)]
        bet_type: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Settle tickets against a race result
    Settle {
        /// Path to settlement request JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Build combinations from file.
pub fn run_combos(input: PathBuf, format: String, odds: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let input_json = std::fs::read_to_string(&input)?;
    let mut req: CombinationRequest = serde_json::from_str(&input_json)?;

    if let Some(path) = odds {
        eprintln!("Reading odds from: {}", path.display());
        req.odds_text = Some(std::fs::read_to_string(&path)?);
    }

    let response = build_combinations(&req, &config.betting);
    if let Some(m) = &response.mismatch {
        eprintln!(
            "Warning: odds text looks like {} but bet type is {}",
            m.detected, m.current
        );
    }

    match format.as_str() {
        "table" => print_combinations(&response),
        _ => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

/// Parse odds text from file or stdin.
pub fn run_parse_odds(
    input: Option<PathBuf>,
    bet_type: Option<String>,
    format: String,
) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let bet_type = bet_type
        .map(|s| BetCategory::from_str(&s).ok_or_else(|| anyhow::anyhow!("Unknown bet type: {}", s)))
        .transpose()?;

    let response = parse_odds(&OddsParseRequest { text, bet_type });

    match format.as_str() {
        "table" => print_odds(&response),
        _ => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

/// Settle tickets from file.
pub fn run_settle(input: PathBuf, format: String) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let input_json = std::fs::read_to_string(&input)?;
    let req: SettleRequest = serde_json::from_str(&input_json)?;

    eprintln!("Settling {} tickets", req.tickets.len());
    let response = settle_tickets(&req, &config.betting)?;

    match format.as_str() {
        "table" => print_settlement(&response),
        _ => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn format_odds(odds: Option<f64>) -> String {
    odds.map(|o| format!("{:.1}", o)).unwrap_or_else(|| "-".to_string())
}

fn print_combinations(response: &CombinationResponse) {
    println!(
        "{} / {} : {} combinations x {} yen",
        response.bet_type,
        response.method.label(),
        response.count,
        response.unit_stake
    );
    println!();

    for (i, c) in response.combinations.iter().enumerate() {
        let key = c.key(response.bet_type);
        let leg = match c.leg {
            Some(leg) => format!(" ({:?})", leg),
            None => String::new(),
        };
        let payout = response.expected.payouts.get(i).copied().flatten();
        println!(
            "  {:4}. {:<10}{:<9} odds {:>7}  payout {:>9}",
            i + 1,
            key,
            leg,
            format_odds(c.odds),
            payout.map(|p| format!("{:.0}", p)).unwrap_or_else(|| "-".to_string())
        );
    }
    println!();

    let e = &response.expected;
    println!("=== Expected ===");
    println!("  Cost:        {} yen", e.total_cost);
    println!("  Priced:      {}/{}", e.priced_count, e.combination_count);
    println!("  Payout:      {:.0} yen", e.total_payout);
    println!("  Return rate: {:.1}%", e.return_rate);
    if response.odds_matched > 0 {
        println!("  Odds matched from text: {}", response.odds_matched);
    }
}

fn print_odds(response: &OddsParseResponse) {
    let parsed = &response.parsed;
    match parsed.detected_category {
        Some(c) => println!("Detected bet type: {}", c),
        None => println!("Detected bet type: -"),
    }
    if let Some(m) = &response.mismatch {
        println!("Warning: text looks like {} but bet type is {}", m.detected, m.current);
    }
    println!();

    println!("=== Odds ({}) ===", parsed.records.len());
    for r in &parsed.records {
        let popularity = r
            .popularity
            .map(|p| format!("{}人気", p))
            .unwrap_or_default();
        println!("  {:<10} {:>8.1}  {}", r.key, r.odds, popularity);
    }

    if !parsed.skipped.is_empty() {
        println!();
        println!("=== Skipped ({}) ===", parsed.skipped.len());
        for line in &parsed.skipped {
            println!("  {}", line);
        }
    }
}

fn print_settlement(response: &SettleResponse) {
    println!("=== Tickets ===");
    for t in response.list.tickets() {
        let status = match &t.settlement {
            Some(s) => format!(
                "hits {} / refunded {} / payout {} yen",
                s.outcome.hit_count, s.outcome.refunded_count, s.outcome.actual_payout
            ),
            None => "unsettled".to_string(),
        };
        println!(
            "  {:<12} {:<10} {:>4} x {:>5} = {:>7} yen  {}",
            t.bet_type.label(),
            t.method.label(),
            t.combinations.len(),
            t.unit_stake,
            t.total_cost,
            status
        );
    }
    println!();

    let s = &response.summary;
    println!("=== Summary ===");
    println!("  Tickets:     {} ({} settled, {} hit)", s.ticket_count, s.settled_count, s.hit_ticket_count);
    println!("  Investment:  {} yen", s.total_investment);
    println!("  Payout:      {} yen", s.total_payout);
    println!("  Profit:      {:+} yen", s.profit);
    println!("  Return rate: {:.1}%", s.return_rate);
}
