use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Renders a backend timestamp as a local calendar date, `-` when absent.
pub fn display_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return "-".to_string();
    };

    parse_local_date(value)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn parse_local_date(value: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Local).date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_is_dash() {
        assert_eq!(display_date(None), "-");
        assert_eq!(display_date(Some("  ")), "-");
    }

    #[test]
    fn plain_dates_pass_through() {
        assert_eq!(display_date(Some("2026-02-03")), "2026-02-03");
    }

    #[test]
    fn naive_timestamps_keep_their_date() {
        assert_eq!(display_date(Some("2026-02-03T08:15:00.123456")), "2026-02-03");
    }

    #[test]
    fn rfc3339_is_converted_to_local_date() {
        let value = "2026-02-03T12:00:00+00:00";
        let expected = DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Local)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(display_date(Some(value)), expected);
    }

    #[test]
    fn unparseable_values_are_shown_raw() {
        assert_eq!(display_date(Some("last tuesday")), "last tuesday");
    }
}
