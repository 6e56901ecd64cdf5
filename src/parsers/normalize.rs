//! Text normalization for pasted odds.
//!
//! Odds pages mix full-width and half-width glyphs freely. Everything is folded
//! to ASCII markers here so the line patterns only deal with `0-9`, `-`, `=`,
//! `=>`, `~`, `,` and `.`.

/// Normalize one line of pasted text.
///
/// - Full-width digits → ASCII digits
/// - `，` `、` → `,` and `．` → `.`
/// - Full-width space → space
/// - `ー` `－` `―` → `-`, `＝` → `=`
/// - `→` `⇒` → `=>`
/// - `～` `〜` → `~`
pub fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '０'..='９' => {
                let digit = c as u32 - '０' as u32;
                out.push(char::from(b'0' + digit as u8));
            }
            '，' | '、' => out.push(','),
            '．' => out.push('.'),
            '\u{3000}' => out.push(' '),
            'ー' | '－' | '―' => out.push('-'),
            '＝' => out.push('='),
            '→' | '⇒' => out.push_str("=>"),
            '～' | '〜' => out.push('~'),
            _ => out.push(c),
        }
    }
    out
}

/// Split pasted text into trimmed, non-empty lines.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
}
