use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Current local date and time (browser clock on wasm)
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    now_local().date()
}

/// Parse a backend timestamp. Accepts `2024-05-03T14:30:00`, optional
/// fractional seconds, a `Z`/offset suffix, or a bare date.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .ok()
}

/// `03/05/2024`
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `03/05/2024 14:30`
pub fn format_datetime_br(dt: NaiveDateTime) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}

pub fn format_hour(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// ISO date used in query strings and path segments
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn iso_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Reformat a raw backend timestamp for display, falling back to the input
pub fn display_datetime(raw: &str) -> String {
    parse_datetime(raw)
        .map(format_datetime_br)
        .unwrap_or_else(|| raw.to_string())
}

pub fn display_date(raw: &str) -> String {
    parse_datetime(raw)
        .map(|dt| format_date_br(dt.date()))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-05-03T14:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-03T14:30:00.123456").map(|d| d.date()), Some(expected.date()));
        assert_eq!(parse_datetime("2024-05-03T14:30"), Some(expected));
        assert_eq!(parse_datetime("Fri, 03 May 2024 14:30:00 GMT"), Some(expected));
        assert_eq!(parse_datetime("2024-05-03").map(|d| d.date()), Some(expected.date()));
        assert_eq!(parse_datetime("amanhã"), None);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_datetime("2024-05-03T09:05:00"), "03/05/2024 09:05");
        assert_eq!(display_date("2024-12-31T23:59:00"), "31/12/2024");
        assert_eq!(display_date("?"), "?");
        let date = parse_date("2024-01-09").unwrap();
        assert_eq!(iso_date(date), "2024-01-09");
        assert_eq!(parse_time("08:15").unwrap().format("%H:%M").to_string(), "08:15");
    }
}
