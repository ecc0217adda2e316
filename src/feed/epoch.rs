use chrono::{DateTime, NaiveDateTime, Utc};

/// Day-of-year layout used by the OEM feed, e.g. `2023-058T12:00:00.000Z`.
const OEM_EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S%.fZ";
const OEM_EPOCH_OUTPUT: &str = "%Y-%jT%H:%M:%S%.3fZ";

pub fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, OEM_EPOCH_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn format_epoch(epoch: &DateTime<Utc>) -> String {
    epoch.format(OEM_EPOCH_OUTPUT).to_string()
}

/// Serializes epochs in the feed's own notation so clients can feed them back
/// into `/epochs/{epoch}` unchanged.
pub(crate) mod serde_epoch {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(epoch: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_epoch(epoch))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_epoch(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid epoch: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_day_of_year_epoch() {
        let epoch = parse_epoch("2023-058T12:00:00.000Z").unwrap();
        assert_eq!(epoch, Utc.with_ymd_and_hms(2023, 2, 27, 12, 0, 0).unwrap());
    }

    #[test]
    fn parses_leap_year_ordinal() {
        let epoch = parse_epoch("2024-366T23:59:30.500Z").unwrap();
        assert_eq!(
            epoch,
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 30).unwrap()
                + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn accepts_rfc3339() {
        let epoch = parse_epoch("2023-02-27T12:04:00Z").unwrap();
        assert_eq!(epoch, Utc.with_ymd_and_hms(2023, 2, 27, 12, 4, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_epoch("yesterday").is_none());
        assert!(parse_epoch("2023-400T12:00:00.000Z").is_none());
        assert!(parse_epoch("").is_none());
    }

    #[test]
    fn formats_in_feed_notation() {
        let epoch = Utc.with_ymd_and_hms(2023, 2, 27, 12, 4, 0).unwrap();
        assert_eq!(format_epoch(&epoch), "2023-058T12:04:00.000Z");
    }
}
