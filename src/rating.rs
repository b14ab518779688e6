use serde::{Deserialize, Serialize};

pub const STAR_COUNT: usize = 5;
const MAX_RATING: i64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Star {
    Filled,
    Empty,
}

/// Number of filled stars for a 0-10 rating. Ratings outside that range are clamped.
pub fn filled_stars(rating: i64) -> usize {
    (rating.clamp(0, MAX_RATING) / 2) as usize
}

/// Filled stars first, then empty ones
pub fn stars(rating: i64) -> [Star; STAR_COUNT] {
    let filled = filled_stars(rating);
    let mut ret = [Star::Empty; STAR_COUNT];
    for star in ret.iter_mut().take(filled) {
        *star = Star::Filled;
    }
    ret
}

/// Reads the integer part of a rating such as "7.8". Anything without leading digits,
/// e.g. "N/A", counts as 0.
pub fn parse_rating(rating: &str) -> i64 {
    let rating = rating.trim();
    let (sign, digits) = match rating.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, rating.strip_prefix('+').unwrap_or(rating)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}
