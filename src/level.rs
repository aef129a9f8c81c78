//! Conversion between human ratings such as `7.5` and level tokens such as `PV_LV_07_5`.
//!
//! The total functions [`numeric_to_token`] and [`token_to_numeric`] never fail: malformed input
//! maps to [`FALLBACK_TOKEN`] or to an empty string. Use [`parse_rating`] when the input must be
//! checked instead.

use thiserror::Error;

/// Token used when a rating cannot be read.
pub const FALLBACK_TOKEN: &str = "PV_LV_05_0";

/// A decoded level: an integer part and one decimal digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level {
    /// Integer part of the rating.
    pub integer: u32,
    /// First decimal digit of the rating, in `0..=9`.
    pub decimal: u8,
}

/// An error on reading a rating strictly.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The text is not a decimal number.
    #[error("`{0}` is not a number")]
    NotANumber(String),
    /// The number is negative, infinite or too large.
    #[error("`{0}` is out of the rating range")]
    OutOfRange(String),
}

impl Level {
    /// Rounds `value` to one decimal digit. A decimal digit rounding up to 10 carries into the
    /// integer part. Returns `None` for negative, non-finite or too large values.
    #[must_use]
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value >= f64::from(u32::MAX) {
            return None;
        }
        let integer = value.floor();
        let decimal = ((value - integer) * 10.0).round_ties_even();
        let (integer, decimal) = if decimal >= 10.0 {
            (integer + 1.0, 0.0)
        } else {
            (integer, decimal)
        };
        Some(Self {
            integer: integer as u32,
            decimal: decimal as u8,
        })
    }

    /// Decodes a token of the form `PV_LV_<int>_<digit>`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut segments = token.split('_');
        let (Some("PV"), Some("LV"), Some(integer), Some(decimal), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };
        if !is_digits(integer) || !is_digits(decimal) || decimal.len() != 1 {
            return None;
        }
        Some(Self {
            integer: integer.parse().ok()?,
            decimal: decimal.parse().ok()?,
        })
    }

    /// The engine token, such as `PV_LV_07_5`.
    #[must_use]
    pub fn to_token(self) -> String {
        format!("PV_LV_{:02}_{}", self.integer, self.decimal)
    }

    /// The human rating, such as `7.5`.
    #[must_use]
    pub fn to_rating(self) -> String {
        format!("{}.{}", self.integer, self.decimal)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PV_LV_{:02}_{}", self.integer, self.decimal)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Reads a rating such as `"7.5"`, failing on anything that is not a usable number.
///
/// # Errors
///
/// Returns [`LevelError`] when `rating` is not a number or is negative or not finite.
pub fn parse_rating(rating: &str) -> Result<Level, LevelError> {
    let trimmed = rating.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LevelError::NotANumber(rating.to_string()))?;
    Level::from_value(value).ok_or_else(|| LevelError::OutOfRange(rating.to_string()))
}

/// Converts a rating such as `"7.5"` into a level token such as `"PV_LV_07_5"`.
///
/// Returns [`FALLBACK_TOKEN`] when the rating cannot be read.
///
/// ```
/// use pvdb_rs::level::numeric_to_token;
///
/// assert_eq!(numeric_to_token("7.5"), "PV_LV_07_5");
/// assert_eq!(numeric_to_token("10"), "PV_LV_10_0");
/// assert_eq!(numeric_to_token("not-a-number"), "PV_LV_05_0");
/// ```
#[must_use]
pub fn numeric_to_token(rating: &str) -> String {
    parse_rating(rating).map_or_else(|_| FALLBACK_TOKEN.to_string(), Level::to_token)
}

/// Converts a level token such as `"PV_LV_07_5"` into a rating such as `"7.5"`.
///
/// Returns an empty string when the token is malformed.
///
/// ```
/// use pvdb_rs::level::token_to_numeric;
///
/// assert_eq!(token_to_numeric("PV_LV_07_5"), "7.5");
/// assert_eq!(token_to_numeric("PV_LV_07"), "");
/// ```
#[must_use]
pub fn token_to_numeric(token: &str) -> String {
    Level::from_token(token)
        .map(Level::to_rating)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DifficultyKind;

    #[test]
    fn option_sets_round_trip() {
        for kind in DifficultyKind::ALL {
            for &rating in kind.level_options() {
                assert_eq!(token_to_numeric(&numeric_to_token(rating)), rating);
            }
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(numeric_to_token("7.96"), "PV_LV_08_0");
        assert_eq!(numeric_to_token("7.04"), "PV_LV_07_0");
        assert_eq!(numeric_to_token(" 3 "), "PV_LV_03_0");
        assert_eq!(numeric_to_token("12.5"), "PV_LV_12_5");
    }

    #[test]
    fn fallbacks() {
        assert_eq!(numeric_to_token(""), FALLBACK_TOKEN);
        assert_eq!(numeric_to_token("-1"), FALLBACK_TOKEN);
        assert_eq!(numeric_to_token("inf"), FALLBACK_TOKEN);
        assert_eq!(numeric_to_token("NaN"), FALLBACK_TOKEN);
        assert_eq!(token_to_numeric(""), "");
        assert_eq!(token_to_numeric("PV_LV_07_5_1"), "");
        assert_eq!(token_to_numeric("XX_LV_07_5"), "");
        assert_eq!(token_to_numeric("PV_LV_x_5"), "");
    }

    #[test]
    fn strict() {
        assert_eq!(
            parse_rating("6.5"),
            Ok(Level {
                integer: 6,
                decimal: 5
            })
        );
        assert_eq!(
            parse_rating("six"),
            Err(LevelError::NotANumber("six".into()))
        );
        assert_eq!(parse_rating("-2"), Err(LevelError::OutOfRange("-2".into())));
        assert_eq!(
            Level::from_token("PV_LV_09_0").map(|level| level.to_string()),
            Some("PV_LV_09_0".into())
        );
    }
}
