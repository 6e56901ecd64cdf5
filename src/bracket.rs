//! Bracket (枠番) assignment.
//!
//! JRA splits a field into 8 brackets. With more than 8 runners the extra
//! horses go to the highest brackets first, e.g. in an 18-horse field brackets
//! 1-6 hold two horses and brackets 7 and 8 hold three.

/// Number of brackets in a JRA race.
pub const NUM_BRACKETS: u8 = 8;

/// Bracket number of `horse` in a field of `field_size` runners.
///
/// Returns `None` when the horse number is outside the field.
pub fn bracket_of(horse: u8, field_size: u8) -> Option<u8> {
    if horse == 0 || horse > field_size {
        return None;
    }
    if field_size <= NUM_BRACKETS {
        return Some(horse);
    }

    let base = field_size / NUM_BRACKETS;
    let extra = field_size % NUM_BRACKETS;
    // Brackets 1..=small_brackets hold `base` horses, the rest `base + 1`
    let small_brackets = NUM_BRACKETS - extra;
    let small_span = small_brackets * base;

    if horse <= small_span {
        Some((horse - 1) / base + 1)
    } else {
        Some(small_brackets + (horse - small_span - 1) / (base + 1) + 1)
    }
}

/// Horse numbers drawn into `bracket` in a field of `field_size` runners.
pub fn horses_in_bracket(bracket: u8, field_size: u8) -> Vec<u8> {
    (1..=field_size)
        .filter(|h| bracket_of(*h, field_size) == Some(bracket))
        .collect()
}
