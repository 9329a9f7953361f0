use chrono::{DateTime, Local};

/// Format a raw base-unit amount string by a token's decimals.
/// Examples: ("1000000", 6) -> "1", ("1500000", 6) -> "1.5"
/// Non-numeric input is returned unchanged (amounts come off the wire as
/// strings and may exceed u64).
pub fn format_units(amount: &str, decimals: u32) -> String {
    let raw: u128 = match amount.trim().parse() {
        Ok(v) => v,
        Err(_) => return amount.to_string(),
    };
    if decimals == 0 {
        return raw.to_string();
    }
    let divisor = match 10u128.checked_pow(decimals) {
        Some(d) => d,
        None => return amount.to_string(),
    };
    let whole = raw / divisor;
    let frac = raw % divisor;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:0width$}", frac, width = decimals as usize);
        format!("{whole}.{}", frac_str.trim_end_matches('0'))
    }
}

/// Render an RFC 3339 timestamp in the user's local timezone.
/// Unparseable input is returned unchanged (next_access comes from the
/// backend and is display-only).
pub fn to_local_time(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%m/%d/%Y, %I:%M %p")
            .to_string(),
        Err(_) => rfc3339.to_string(),
    }
}

/// Shorten a 0x-hash/address for list display: 0x1234..abcd
pub fn short_hex(s: &str) -> String {
    if s.len() <= 12 {
        s.to_string()
    } else {
        format!("{}..{}", &s[..6], &s[s.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_units_whole() {
        assert_eq!(format_units("1000000", 6), "1");
        assert_eq!(format_units("0", 6), "0");
    }

    #[test]
    fn format_units_fractional() {
        assert_eq!(format_units("1500000", 6), "1.5");
        assert_eq!(format_units("1000001", 6), "1.000001");
        assert_eq!(format_units("123", 6), "0.000123");
    }

    #[test]
    fn format_units_zero_decimals() {
        assert_eq!(format_units("42", 0), "42");
    }

    #[test]
    fn format_units_large_supply() {
        // 1e24 base units at 18 decimals = 1,000,000 tokens
        assert_eq!(format_units("1000000000000000000000000", 18), "1000000");
    }

    #[test]
    fn format_units_passthrough_on_garbage() {
        assert_eq!(format_units("not-a-number", 6), "not-a-number");
    }

    #[test]
    fn short_hex_truncates() {
        assert_eq!(
            short_hex("0x1111111111111111111111111111111111111111"),
            "0x1111..1111"
        );
        assert_eq!(short_hex("0xABC"), "0xABC");
    }

    #[test]
    fn to_local_time_passthrough_on_garbage() {
        assert_eq!(to_local_time("soon"), "soon");
    }
}
