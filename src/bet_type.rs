//! Bet category registry (馬券種).
//!
//! Every category carries a small immutable metadata record looked up with an
//! exhaustive `match`, so adding a category is a single compile-checked change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetCategory {
    Win,             // 単勝 - 1st place
    Place,           // 複勝 - top 3
    SupportTicket,   // 応援馬券 - win + place set on one horse
    BracketQuinella, // 枠連 - 1st and 2nd bracket any order
    Quinella,        // 馬連 - 1st and 2nd any order
    QuinellaPlace,   // ワイド - 2 horses in top 3
    Exacta,          // 馬単 - 1st and 2nd in order
    Trio,            // 三連複 - 1st, 2nd, 3rd any order
    Trifecta,        // 三連単 - 1st, 2nd, 3rd in order
}

/// Static metadata of a bet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    /// Numbers per combination
    pub arity: usize,
    /// Whether finishing order within the combination matters
    pub ordered: bool,
    /// Judged on bracket numbers instead of horse numbers
    pub uses_bracket: bool,
}

impl BetCategory {
    /// All categories in display order.
    pub const ALL: [BetCategory; 9] = [
        BetCategory::Win,
        BetCategory::Place,
        BetCategory::SupportTicket,
        BetCategory::BracketQuinella,
        BetCategory::Quinella,
        BetCategory::QuinellaPlace,
        BetCategory::Exacta,
        BetCategory::Trio,
        BetCategory::Trifecta,
    ];

    pub fn meta(&self) -> CategoryMeta {
        let (arity, ordered, uses_bracket) = match self {
            BetCategory::Win | BetCategory::Place | BetCategory::SupportTicket => (1, false, false),
            BetCategory::BracketQuinella => (2, false, true),
            BetCategory::Quinella | BetCategory::QuinellaPlace => (2, false, false),
            BetCategory::Exacta => (2, true, false),
            BetCategory::Trio => (3, false, false),
            BetCategory::Trifecta => (3, true, false),
        };
        CategoryMeta {
            arity,
            ordered,
            uses_bracket,
        }
    }

    pub fn arity(&self) -> usize {
        self.meta().arity
    }

    pub fn is_ordered(&self) -> bool {
        self.meta().ordered
    }

    pub fn uses_bracket(&self) -> bool {
        self.meta().uses_bracket
    }

    /// Whether a combination holds a single horse.
    pub fn is_single(&self) -> bool {
        self.arity() == 1
    }

    /// Highest number a combination may contain (brackets stop at 8).
    pub fn max_number(&self, field_size: u8) -> u8 {
        if self.uses_bracket() {
            field_size.min(8)
        } else {
            field_size
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "win" | "tansho" | "単勝" => Some(BetCategory::Win),
            "place" | "fukusho" | "複勝" => Some(BetCategory::Place),
            "support_ticket" | "support" | "ouen" | "応援馬券" => Some(BetCategory::SupportTicket),
            "bracket_quinella" | "wakuren" | "枠連" => Some(BetCategory::BracketQuinella),
            "quinella" | "umaren" | "馬連" => Some(BetCategory::Quinella),
            "quinella_place" | "wide" | "ワイド" => Some(BetCategory::QuinellaPlace),
            "exacta" | "umatan" | "馬単" => Some(BetCategory::Exacta),
            "trio" | "sanrenpuku" | "3連複" | "三連複" => Some(BetCategory::Trio),
            "trifecta" | "sanrentan" | "3連単" | "三連単" => Some(BetCategory::Trifecta),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BetCategory::Win => "win",
            BetCategory::Place => "place",
            BetCategory::SupportTicket => "support_ticket",
            BetCategory::BracketQuinella => "bracket_quinella",
            BetCategory::Quinella => "quinella",
            BetCategory::QuinellaPlace => "quinella_place",
            BetCategory::Exacta => "exacta",
            BetCategory::Trio => "trio",
            BetCategory::Trifecta => "trifecta",
        }
    }

    /// Japanese display name.
    pub fn label(&self) -> &'static str {
        match self {
            BetCategory::Win => "単勝",
            BetCategory::Place => "複勝",
            BetCategory::SupportTicket => "応援馬券",
            BetCategory::BracketQuinella => "枠連",
            BetCategory::Quinella => "馬連",
            BetCategory::QuinellaPlace => "ワイド",
            BetCategory::Exacta => "馬単",
            BetCategory::Trio => "3連複",
            BetCategory::Trifecta => "3連単",
        }
    }

    /// Keywords that identify this category in pasted odds text.
    ///
    /// Keywords overlap (単勝 is inside 馬番単勝), so callers must prefer the
    /// longest match.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            BetCategory::Win => &["単勝"],
            BetCategory::Place => &["複勝"],
            BetCategory::SupportTicket => &["応援馬券"],
            BetCategory::BracketQuinella => &["枠連", "枠番連勝"],
            BetCategory::Quinella => &["馬連", "馬番連勝"],
            BetCategory::QuinellaPlace => &["ワイド", "拡大馬番連勝"],
            BetCategory::Exacta => &["馬単", "馬番単勝"],
            BetCategory::Trio => &["三連複", "3連複", "三連勝複式"],
            BetCategory::Trifecta => &["三連単", "3連単", "三連勝単式"],
        }
    }
}

impl fmt::Display for BetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
