use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::ApiError;

/// Wire format for calendar days. Meals and aggregates are keyed by day,
/// not timestamp, so the API only ever speaks `YYYY-MM-DD`.
pub const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_day(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DAY_FORMAT)
        .map_err(|_| ApiError::validation(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}

/// Serde adapter for `Date` fields on DTOs: `#[serde(with = "crate::dates::day")]`.
pub mod day {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DAY_FORMAT;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let s = date.format(DAY_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DAY_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_iso_day() {
        assert_eq!(parse_day("2024-01-01").unwrap(), date!(2024 - 01 - 01));
        assert_eq!(parse_day("1999-12-31").unwrap(), date!(1999 - 12 - 31));
    }

    #[test]
    fn rejects_malformed_days() {
        assert!(parse_day("01/02/2024").is_err());
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("2024-02-30").is_err());
        assert!(parse_day("not-a-date").is_err());
        assert!(parse_day("2024-01-01T10:00:00Z").is_err());
    }

    #[test]
    fn formats_roundtrip() {
        let d = date!(2024 - 03 - 09);
        assert_eq!(d.format(DAY_FORMAT).unwrap(), "2024-03-09");
    }
}
