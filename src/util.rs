use chrono::{DateTime, Local, NaiveDate, Utc};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// `MM:SS`, minutes are not wrapped into hours.
pub fn mmss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// `HH:MM`, seconds are truncated.
pub fn hhmm(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    format!("{h:02}:{m:02}")
}

/// Compact duration: `45m` below an hour, `2h 5m` above.
pub fn seconds_to_hm(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    match h {
        0 => format!("{m}m"),
        _ => format!("{h}h {m}m"),
    }
}

/// Calendar date of a timestamp in the local timezone.
pub fn date_key(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT).ok()
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Axis label in the `05 Jan` style.
pub fn format_dd_mon(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Whole minutes, rounded half away from zero.
pub fn round_minutes(secs: u64) -> u64 {
    (secs + 30) / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mmss() {
        assert_eq!(mmss(0), "00:00");
        assert_eq!(mmss(65), "01:05");
        assert_eq!(mmss(3600), "60:00");
    }

    #[test]
    fn test_hhmm() {
        assert_eq!(hhmm(0), "00:00");
        assert_eq!(hhmm(3659), "01:00");
        assert_eq!(hhmm(5400), "01:30");
    }

    #[test]
    fn test_seconds_to_hm() {
        assert_eq!(seconds_to_hm(59), "0m");
        assert_eq!(seconds_to_hm(45 * 60), "45m");
        assert_eq!(seconds_to_hm(2 * 3600 + 5 * 60), "2h 5m");
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(
            parse_date_key("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_date_key(" 2024-01-05 "), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date_key("2024-13-05"), None);
        assert_eq!(parse_date_key("05/01/2024"), None);
    }

    #[test]
    fn test_format_date_key_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date_key(d), "2024-03-09");
        assert_eq!(parse_date_key(&format_date_key(d)), Some(d));
    }

    #[test]
    fn test_format_dd_mon() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_dd_mon(d), "05 Jan");
    }

    #[test]
    fn test_date_key_uses_local_calendar() {
        let local = Local.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        let utc = local.with_timezone(&Utc);
        assert_eq!(date_key(utc), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_round_minutes() {
        assert_eq!(round_minutes(0), 0);
        assert_eq!(round_minutes(29), 0);
        assert_eq!(round_minutes(30), 1);
        assert_eq!(round_minutes(150), 3);
    }
}
