//! Calendar-day helpers.
//!
//! The rollover marker is stored in the `Date.toDateString()` shape
//! (`Tue Jan 02 2024`) so state written by earlier browser builds stays
//! readable. ISO dates are accepted on read as well.

use chrono::NaiveDate;

/// Format used for the persisted rollover marker.
pub const MARKER_FORMAT: &str = "%a %b %d %Y";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders a date as a rollover marker string.
pub fn format_marker(date: NaiveDate) -> String {
    date.format(MARKER_FORMAT).to_string()
}

/// Parses a stored rollover marker.
///
/// Returns `None` for anything that is not a recognizable calendar date, so
/// a corrupted marker simply re-arms the rollover.
pub fn parse_marker(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, MARKER_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .ok()
}

/// Whole calendar days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::{days_between, format_marker, parse_marker};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn format_marker_matches_date_string_shape() {
        assert_eq!(format_marker(date(2024, 1, 1)), "Mon Jan 01 2024");
        assert_eq!(format_marker(date(2024, 1, 2)), "Tue Jan 02 2024");
    }

    #[test]
    fn parse_marker_accepts_both_shapes() {
        assert_eq!(parse_marker("Tue Jan 02 2024"), Some(date(2024, 1, 2)));
        assert_eq!(parse_marker(" 2024-01-02 "), Some(date(2024, 1, 2)));
    }

    #[test]
    fn parse_marker_rejects_garbage() {
        assert_eq!(parse_marker(""), None);
        assert_eq!(parse_marker("yesterday"), None);
        assert_eq!(parse_marker("2024-13-40"), None);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 10)), 9);
        assert_eq!(days_between(date(2024, 1, 10), date(2024, 1, 10)), 0);
        assert_eq!(days_between(date(2024, 1, 11), date(2024, 1, 10)), -1);
    }
}
