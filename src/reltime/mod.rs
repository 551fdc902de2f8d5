//! Relative time resolution for Grafana-style tokens.
//!
//! Tokens are either `now` or `now-<amount><unit>` with unit one of
//! s, m, h, d, w, M, y. Days and larger use fixed approximations
//! (`d=24h`, `w=7d`, `M=30d`, `y=365d`); there is no calendar-aware
//! month or year arithmetic.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::ParseError;
use crate::ports::Clock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^now-(\d+)([smhdwMy])$").expect("valid relative time regex"));

/// Resolves a relative-time token to an absolute instant against `clock`.
///
/// Pure: the only input besides the token is the injected clock, so a fixed
/// clock makes resolution fully deterministic.
///
/// # Errors
///
/// Returns a [`ParseError`] for an empty token or any token that is neither
/// `now` nor `now-<amount><unit>`.
pub fn parse_relative_time(token: &str, clock: &dyn Clock) -> Result<DateTime<Utc>, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyTime);
    }

    let now = clock.now();
    if token == "now" {
        return Ok(now);
    }

    let captures = TOKEN_RE
        .captures(token)
        .ok_or_else(|| ParseError::InvalidTime(token.to_string()))?;

    let amount: i64 = captures[1]
        .parse()
        .map_err(|_| ParseError::InvalidTime(token.to_string()))?;
    let unit_seconds = match &captures[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 7 * 86_400,
        "M" => 30 * 86_400,
        "y" => 365 * 86_400,
        _ => return Err(ParseError::InvalidTime(token.to_string())),
    };

    let offset = amount
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ParseError::InvalidTime(token.to_string()))?;

    // A duration can fit in a TimeDelta yet still shoot past the DateTime
    // range, so the subtraction itself must be checked too.
    now.checked_sub_signed(offset)
        .ok_or_else(|| ParseError::InvalidTime(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;

    fn fixed_clock() -> FixedClock {
        FixedClock::new("2024-02-25T13:25:00Z".parse().unwrap())
    }

    fn resolve(token: &str) -> Result<DateTime<Utc>, ParseError> {
        parse_relative_time(token, &fixed_clock())
    }

    #[test]
    fn now_resolves_to_clock_instant() {
        assert_eq!(resolve("now").unwrap(), fixed_clock().now());
    }

    #[test]
    fn now_minus_one_hour() {
        let expected: DateTime<Utc> = "2024-02-25T12:25:00Z".parse().unwrap();
        assert_eq!(resolve("now-1h").unwrap(), expected);
    }

    #[test]
    fn now_minus_seven_days() {
        let expected: DateTime<Utc> = "2024-02-18T13:25:00Z".parse().unwrap();
        assert_eq!(resolve("now-7d").unwrap(), expected);
    }

    #[test]
    fn each_unit_uses_fixed_duration() {
        let now = fixed_clock().now();
        let cases = [
            ("now-30s", 30),
            ("now-5m", 5 * 60),
            ("now-2h", 2 * 3_600),
            ("now-1d", 86_400),
            ("now-2w", 2 * 7 * 86_400),
            ("now-1M", 30 * 86_400),
            ("now-1y", 365 * 86_400),
        ];
        for (token, seconds) in cases {
            let resolved = resolve(token).unwrap();
            assert_eq!(resolved, now - Duration::seconds(seconds), "token {token}");
        }
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(resolve(""), Err(ParseError::EmptyTime)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(resolve("invalid"), Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(matches!(resolve("now-5x"), Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn missing_amount_is_rejected() {
        assert!(matches!(resolve("now-h"), Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn plus_offsets_are_rejected() {
        assert!(matches!(resolve("now+1h"), Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn overlong_amount_is_rejected() {
        assert!(matches!(
            resolve("now-99999999999999999999s"),
            Err(ParseError::InvalidTime(_))
        ));
    }

    #[test]
    fn amount_beyond_datetime_range_is_rejected() {
        // Fits in an i64 second count but lands outside the representable
        // DateTime range; must error, not overflow.
        assert!(matches!(
            resolve("now-9000000000000000s"),
            Err(ParseError::InvalidTime(_))
        ));
        assert!(matches!(resolve("now-300000000000y"), Err(ParseError::InvalidTime(_))));
    }
}
