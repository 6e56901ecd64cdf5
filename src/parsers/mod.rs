//! Parsers for pasted odds text.

pub mod normalize;
pub mod odds_text;

pub use normalize::normalize_line;
pub use odds_text::{
    detect_category, parse_line, parse_odds_text, parse_odds_text_as, CategoryMismatch, LineOdds,
    ParsedOdds, ParsedOddsRecord,
};
