//! Best-effort publication date parsing.
//!
//! Feeds in the wild use a surprising spread of timestamp layouts.  The
//! parser tries a fixed, ordered list of known formats and returns the
//! first success; only if every format fails does the caller see an error
//! (and the unpacker then drops that one item).

use chrono::{DateTime, NaiveDateTime, Utc};

use super::FeedError;

/// Legacy layout seen on older feeds: single-digit day, named zone.
/// chrono cannot parse zone abbreviations, so the zone token is split off
/// and the rest is read as UTC.
const LEGACY_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Parses raw date strings, substituting a fixed default for empty input.
///
/// Construct one per unpacked feed so every dateless item in that feed gets
/// the same "now".
pub struct DateParser {
    default: DateTime<Utc>,
}

impl DateParser {
    pub fn new(default: DateTime<Utc>) -> Self {
        Self { default }
    }

    /// Try each known format in order, returning the first success.
    pub fn parse(&self, raw: &str) -> Result<DateTime<Utc>, FeedError> {
        if raw.is_empty() {
            return Ok(self.default);
        }

        // RFC 2822 covers RFC 1123 with both numeric and named zones, and
        // tolerates single-digit days.
        if let Ok(t) = DateTime::parse_from_rfc2822(raw) {
            return Ok(t.with_timezone(&Utc));
        }
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Ok(t.with_timezone(&Utc));
        }
        if let Some(t) = parse_legacy(raw) {
            return Ok(t);
        }
        Err(FeedError::DateParse(raw.to_string()))
    }
}

/// Handle `Mon, 2 Jan 2006 15:04:05 XYZ` where `XYZ` is a zone name RFC
/// 2822 does not know.  The zone is dropped and the timestamp read as UTC.
fn parse_legacy(raw: &str) -> Option<DateTime<Utc>> {
    let (rest, zone) = raw.rsplit_once(' ')?;
    if !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    NaiveDateTime::parse_from_str(rest.trim(), LEGACY_FORMAT)
        .ok()
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parser() -> DateParser {
        DateParser::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn parses_rfc1123_named_zone() {
        let t = parser().parse("Mon, 02 Jan 2006 15:04:05 GMT").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn parses_rfc1123_numeric_zone() {
        let t = parser().parse("Mon, 02 Jan 2006 15:04:05 +0200").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 13, 4, 5).unwrap());
    }

    #[test]
    fn parses_single_digit_day() {
        let t = parser().parse("Mon, 2 Jan 2006 15:04:05 GMT").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let t = parser().parse("2006-01-02T15:04:05Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn parses_legacy_unknown_zone_as_utc() {
        let t = parser().parse("Mon, 2 Jan 2006 15:04:05 NZDT").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn empty_input_yields_default() {
        let p = parser();
        assert_eq!(p.parse("").unwrap(), p.default);
    }

    #[test]
    fn garbage_is_an_error() {
        let err = parser().parse("not a date").unwrap_err();
        assert!(matches!(err, FeedError::DateParse(_)));
    }
}
