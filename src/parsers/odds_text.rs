//! Parser for odds text copied from JRA pages and betting UIs.
//!
//! Supported line shapes:
//! - 馬連/枠連: "1 - 2  15.3" / "1-2\t15.3" / "1ー2 15.3"
//! - 馬単: "1 → 2  25.0"
//! - 3連複: "1 - 2 - 3  150.5"
//! - 3連単: "1 → 2 → 3  500.0"
//! - 単勝/複勝: "1  2.5", 複勝 ranges "1  1.5-2.0" (lower bound kept)
//! - ワイド ranges: "1 - 2  3.5 - 5.0" (lower bound kept)
//! - popularity prefix: "1人気 1-2 15.3"
//! - tab separated columns: "1\t2\t15.3"
//!
//! Unparseable lines are dropped, never fatal.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::bet_type::BetCategory;
use crate::combination::canonical_key;
use crate::parsers::normalize::{normalize_line, split_lines};

/// One odds entry extracted from a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedOddsRecord {
    /// Canonical combination key, e.g. "1-2"
    pub key: String,
    /// Horse numbers in the order they appeared
    pub horses: Vec<u8>,
    pub odds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

/// Result of parsing a block of pasted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedOdds {
    pub detected_category: Option<BetCategory>,
    pub records: Vec<ParsedOddsRecord>,
    /// Lines that matched no pattern (headers excluded)
    #[serde(default)]
    pub skipped: Vec<String>,
}

/// Advisory raised when the text names a different category than the caller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryMismatch {
    pub detected: BetCategory,
    pub current: BetCategory,
}

impl ParsedOdds {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Key → odds lookup. A key seen twice keeps the later value.
    pub fn to_map(&self) -> HashMap<String, f64> {
        self.records
            .iter()
            .map(|r| (r.key.clone(), r.odds))
            .collect()
    }

    /// Non-fatal advisory when the detected category differs from `current`.
    ///
    /// The caller's category stays authoritative.
    pub fn mismatch(&self, current: BetCategory) -> Option<CategoryMismatch> {
        match self.detected_category {
            Some(detected) if detected != current => Some(CategoryMismatch { detected, current }),
            _ => None,
        }
    }
}

/// Horse numbers, odds and popularity parsed from one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOdds {
    pub horses: Vec<u8>,
    pub odds: f64,
    pub popularity: Option<u32>,
}

/// Structural pattern: `horses` capture groups followed by the odds group.
struct LinePattern {
    name: &'static str,
    regex: Regex,
    horses: usize,
}

impl LinePattern {
    fn new(name: &'static str, pattern: &str, horses: usize) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            horses,
        }
    }

    fn apply(&self, line: &str) -> Option<(Vec<u8>, f64)> {
        let caps = self.regex.captures(line)?;
        let horses = (1..=self.horses)
            .map(|i| parse_horse(&caps[i]))
            .collect::<Option<Vec<_>>>()?;
        let odds = parse_number(&caps[self.horses + 1])?;
        Some((horses, odds))
    }
}

/// Tried in order, first match wins.
static PATTERNS: LazyLock<Vec<LinePattern>> = LazyLock::new(|| {
    vec![
        LinePattern::new(
            "ordered_triple",
            r"^([0-9]{1,2})\s*=>\s*([0-9]{1,2})\s*=>\s*([0-9]{1,2})\s+([0-9,]+\.?[0-9]*)",
            3,
        ),
        LinePattern::new(
            "unordered_triple",
            r"^([0-9]{1,2})\s*[-=]\s*([0-9]{1,2})\s*[-=]\s*([0-9]{1,2})\s+([0-9,]+\.?[0-9]*)",
            3,
        ),
        LinePattern::new(
            "ordered_pair",
            r"^([0-9]{1,2})\s*=>\s*([0-9]{1,2})\s+([0-9,]+\.?[0-9]*)",
            2,
        ),
        LinePattern::new(
            "unordered_pair",
            r"^([0-9]{1,2})\s*[-=]\s*([0-9]{1,2})\s+([0-9,]+\.?[0-9]*)(?:\s*[-~]\s*[0-9,]+\.?[0-9]*)?",
            2,
        ),
        LinePattern::new(
            "single",
            r"^([0-9]{1,2})\s+([0-9,]+\.?[0-9]*)(?:\s*[-~]\s*[0-9,]+\.?[0-9]*)?$",
            1,
        ),
    ]
});

static POPULARITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*人気").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-=─━]+$").unwrap());
static HORSE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{1,2}$").unwrap());

/// Column headers and labels that never carry odds.
const HEADER_PREFIXES: [&str; 26] = [
    "馬番", "組番", "枠番", "馬名", "人気", "オッズ", "No", "着順", "番号", "WIN", "PLACE", "QNL",
    "QNP", "EXA", "TRI", "TFC", "単勝", "複勝", "馬連", "馬単", "ワイド", "枠連", "3連複", "3連単",
    "三連複", "三連単",
];

/// Parse pasted odds text, detecting the bet category from its labels.
pub fn parse_odds_text(text: &str) -> ParsedOdds {
    parse_odds_text_as(text, None)
}

/// Parse pasted odds text.
///
/// # Arguments
/// * `text` - Raw pasted text, any line endings
/// * `category` - Category used to canonicalize keys; falls back to the
///   detected one, then to position-preserving keys
pub fn parse_odds_text_as(text: &str, category: Option<BetCategory>) -> ParsedOdds {
    let lines: Vec<String> = split_lines(text).map(normalize_line).collect();
    let detected_category = detect_category_in(&lines);
    let key_category = category.or(detected_category);

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for line in &lines {
        let (popularity, rest) = strip_popularity(line);
        if rest.is_empty() || is_header(&rest) {
            continue;
        }

        match match_line(&rest) {
            Some((horses, odds)) => {
                let key = match key_category {
                    Some(c) => canonical_key(c, &horses),
                    None => join_key(&horses),
                };
                records.push(ParsedOddsRecord {
                    key,
                    horses,
                    odds,
                    popularity,
                });
            }
            None => {
                tracing::debug!(line = %line, "odds line matched no pattern");
                skipped.push(line.clone());
            }
        }
    }

    tracing::debug!(
        records = records.len(),
        skipped = skipped.len(),
        category = ?detected_category,
        "parsed odds text"
    );

    ParsedOdds {
        detected_category,
        records,
        skipped,
    }
}

/// Parse a single line. Returns `None` for headers and unmatched lines.
pub fn parse_line(line: &str) -> Option<LineOdds> {
    let normalized = normalize_line(line.trim());
    let (popularity, rest) = strip_popularity(&normalized);
    if rest.is_empty() || is_header(&rest) {
        return None;
    }
    let (horses, odds) = match_line(&rest)?;
    Some(LineOdds {
        horses,
        odds,
        popularity,
    })
}

/// Detect the bet category named anywhere in the text.
pub fn detect_category(text: &str) -> Option<BetCategory> {
    let lines: Vec<String> = split_lines(text).map(normalize_line).collect();
    detect_category_in(&lines)
}

/// First line naming a category decides; within a line the longest keyword
/// wins so 3連単 is never read as 単勝.
fn detect_category_in(lines: &[String]) -> Option<BetCategory> {
    lines.iter().find_map(|line| {
        BetCategory::ALL
            .iter()
            .flat_map(|c| c.keywords().iter().map(move |k| (*c, *k)))
            .filter(|(_, keyword)| line.contains(keyword))
            .max_by_key(|(_, keyword)| keyword.chars().count())
            .map(|(category, _)| category)
    })
}

fn strip_popularity(line: &str) -> (Option<u32>, String) {
    match POPULARITY_RE.captures(line) {
        Some(caps) => {
            let popularity = caps[1].parse().ok();
            let rest = POPULARITY_RE.replace(line, "").trim().to_string();
            (popularity, rest)
        }
        None => (None, line.trim().to_string()),
    }
}

fn is_header(line: &str) -> bool {
    HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) || SEPARATOR_RE.is_match(line)
}

fn match_line(line: &str) -> Option<(Vec<u8>, f64)> {
    for pattern in PATTERNS.iter() {
        if let Some(found) = pattern.apply(line) {
            tracing::trace!(pattern = pattern.name, "odds line matched");
            return Some(found);
        }
    }
    match_tab_columns(line)
}

/// Fallback for tab separated rows: the last column is the odds, preceding
/// 1-2 digit columns are the horse numbers.
fn match_tab_columns(line: &str) -> Option<(Vec<u8>, f64)> {
    let parts: Vec<&str> = line
        .split('\t')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let (last, head) = parts.split_last()?;
    if head.is_empty() {
        return None;
    }

    let odds = parse_number(last)?;
    if odds < 1.0 {
        return None;
    }

    let horses = head
        .iter()
        .filter(|p| HORSE_TOKEN_RE.is_match(p))
        .map(|p| parse_horse(p))
        .collect::<Option<Vec<_>>>()?;
    if horses.is_empty() {
        return None;
    }
    Some((horses, odds))
}

/// Horse numbers start at 1; a 0 rejects the pattern and the line falls through.
fn parse_horse(s: &str) -> Option<u8> {
    s.parse::<u8>().ok().filter(|h| *h > 0)
}

/// Parse an odds value, ignoring thousands separators.
fn parse_number(s: &str) -> Option<f64> {
    s.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn join_key(horses: &[u8]) -> String {
    horses
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(parsed: &ParsedOdds) -> Vec<&str> {
        parsed.records.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_horse_zero_is_skipped() {
        assert_eq!(parse_line("0-2 15.3"), None);
        let parsed = parse_odds_text("0-2 15.3\n1-2 8.8");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].key, "1-2");
        assert_eq!(parsed.skipped, vec!["0-2 15.3".to_string()]);
    }

    #[test]
    fn test_mixed_formats() {
        let parsed = parse_odds_text("1 - 2  15.3\n1 → 2  25.0\n1-2-3  150.5");
        assert_eq!(keys(&parsed), vec!["1-2", "1-2", "1-2-3"]);
        assert_eq!(parsed.records[0].odds, 15.3);
        assert_eq!(parsed.records[1].odds, 25.0);
        assert_eq!(parsed.records[2].odds, 150.5);
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.detected_category, None);
    }

    #[test]
    fn test_ordered_triple() {
        let line = parse_line("1 → 2 → 3  500.0").unwrap();
        assert_eq!(line.horses, vec![1, 2, 3]);
        assert_eq!(line.odds, 500.0);
    }

    #[test]
    fn test_full_width_input() {
        let line = parse_line("１ー２　１５．３").unwrap();
        assert_eq!(line.horses, vec![1, 2]);
        assert_eq!(line.odds, 15.3);
    }

    #[test]
    fn test_range_keeps_lower_bound() {
        let wide = parse_line("1 - 2  3.5 - 5.0").unwrap();
        assert_eq!(wide.horses, vec![1, 2]);
        assert_eq!(wide.odds, 3.5);

        let place = parse_line("7  1.5-2.0").unwrap();
        assert_eq!(place.horses, vec![7]);
        assert_eq!(place.odds, 1.5);
    }

    #[test]
    fn test_popularity_prefix() {
        let line = parse_line("1人気 3-8 5.6").unwrap();
        assert_eq!(line.popularity, Some(1));
        assert_eq!(line.horses, vec![3, 8]);
        assert_eq!(line.odds, 5.6);
    }

    #[test]
    fn test_thousands_separator() {
        let line = parse_line("1→2→3  1,234.5").unwrap();
        assert_eq!(line.odds, 1234.5);
    }

    #[test]
    fn test_tab_columns() {
        let line = parse_line("4\t11\t\t88.0").unwrap();
        assert_eq!(line.horses, vec![4, 11]);
        assert_eq!(line.odds, 88.0);

        // odds below 1.0 are not odds
        assert!(parse_line("4\tabc\t0.5").is_none());
    }

    #[test]
    fn test_headers_and_separators_skipped() {
        let parsed = parse_odds_text("組番\tオッズ\n----\n馬連\n1-2 15.3\n=====");
        assert_eq!(keys(&parsed), vec!["1-2"]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_garbage_lines_recorded_as_skipped() {
        let parsed = parse_odds_text("hello world\n1-2 15.3\n取消");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, vec!["hello world".to_string(), "取消".to_string()]);
    }

    #[test]
    fn test_detect_longest_keyword() {
        assert_eq!(detect_category("3連単 オッズ"), Some(BetCategory::Trifecta));
        assert_eq!(detect_category("馬番単勝"), Some(BetCategory::Exacta));
        assert_eq!(detect_category("拡大馬番連勝"), Some(BetCategory::QuinellaPlace));
        assert_eq!(detect_category("単勝"), Some(BetCategory::Win));
        assert_eq!(detect_category("1-2 15.3"), None);
    }

    #[test]
    fn test_detect_first_line_wins() {
        assert_eq!(detect_category("馬連\n3連複"), Some(BetCategory::Quinella));
    }

    #[test]
    fn test_keys_canonicalized_by_detected_category() {
        let parsed = parse_odds_text("馬連\n5-2 15.3\n3-1 8.0");
        assert_eq!(parsed.detected_category, Some(BetCategory::Quinella));
        assert_eq!(keys(&parsed), vec!["2-5", "1-3"]);
        assert_eq!(parsed.records[0].horses, vec![5, 2]);
    }

    #[test]
    fn test_caller_category_overrides_detected() {
        let parsed = parse_odds_text_as("馬連\n5-2 15.3", Some(BetCategory::Exacta));
        assert_eq!(keys(&parsed), vec!["5-2"]);
        let mismatch = parsed.mismatch(BetCategory::Exacta).unwrap();
        assert_eq!(mismatch.detected, BetCategory::Quinella);
        assert!(parsed.mismatch(BetCategory::Quinella).is_none());
    }

    #[test]
    fn test_to_map_last_wins() {
        let parsed = parse_odds_text("1-2 15.3\n1-2 16.0");
        assert_eq!(parsed.to_map().get("1-2"), Some(&16.0));
    }

    #[test]
    fn test_empty_text() {
        let parsed = parse_odds_text("  \n\r\n");
        assert!(parsed.is_empty());
        assert!(parsed.skipped.is_empty());
    }
}
