/// Group digits in threes with `.` (pt-BR thousands separator), e.g. 1.234.567
pub fn format_thousands(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

/// Format as Brazilian currency: `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, format_thousands(cents / 100), cents % 100)
}

/// Percent with one decimal and comma separator: `12,5%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value).replace('.', ",")
}

/// `90` -> `1h 30min`, `45` -> `45min`
pub fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}min", h, m),
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Two-letter initials for avatar bubbles
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Parse a user-typed decimal accepting either `,` or `.`
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(93.5), "R$ 93,50");
        assert_eq!(format_brl(1234.567), "R$ 1.234,57");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn test_thousands_and_percent() {
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1234567), "1.234.567");
        assert_eq!(format_percent(12.345), "12,3%");
    }

    #[test]
    fn test_duration_and_text_helpers() {
        assert_eq!(format_duration(45), "45min");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(90), "1h 30min");
        assert_eq!(capitalize("pendente"), "Pendente");
        assert_eq!(capitalize(""), "");
        assert_eq!(initials("joão da silva"), "JD");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("10,50"), Some(10.5));
        assert_eq!(parse_decimal("1.234,50"), Some(1234.5));
        assert_eq!(parse_decimal("7.25"), Some(7.25));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
    }
}
