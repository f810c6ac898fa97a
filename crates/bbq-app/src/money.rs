// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Money is carried as `i64` cents. These helpers cover the two textual
//! shapes the UI needs: comma-grouped two-decimal text for display and
//! blur-time parsing of whatever the user typed.

/// `123456` -> `"1,234.56"`. No currency symbol; call sites add one.
pub fn format_grouped(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = absolute / 100;
    let fraction = absolute % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{fraction:02}")
}

/// `123456` -> `"$1,234.56"`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}${}", format_grouped(cents.abs()))
}

/// Parse user-typed currency text (commas allowed, optional fraction) into
/// cents. Fractions beyond two digits round half away from zero.
pub fn parse_input(text: &str) -> Option<i64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    let (sign, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, cleaned.as_str()),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|byte| byte.is_ascii_digit())
        || !fraction.bytes().all(|byte| byte.is_ascii_digit())
    {
        return None;
    }

    let whole_cents: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()?.checked_mul(100)?
    };

    let mut fraction_cents: i64 = 0;
    let mut fraction_bytes = fraction.bytes();
    for place in [10, 1] {
        if let Some(byte) = fraction_bytes.next() {
            fraction_cents += i64::from(byte - b'0') * place;
        }
    }
    if let Some(byte) = fraction_bytes.next()
        && byte >= b'5'
    {
        fraction_cents += 1;
    }

    Some(sign * (whole_cents + fraction_cents))
}

/// Blur-time coercion: malformed input silently becomes zero.
pub fn parse_or_zero(text: &str) -> i64 {
    parse_input(text).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_grouped, parse_input, parse_or_zero};

    #[test]
    fn grouping_inserts_commas_every_three_digits() {
        assert_eq!(format_grouped(0), "0.00");
        assert_eq!(format_grouped(99), "0.99");
        assert_eq!(format_grouped(123_456), "1,234.56");
        assert_eq!(format_grouped(1_130_398), "11,303.98");
        assert_eq!(format_grouped(123_456_789_00), "123,456,789.00");
        assert_eq!(format_grouped(-123_456), "-1,234.56");
    }

    #[test]
    fn currency_form_prefixes_a_dollar_sign() {
        assert_eq!(format_currency(1_021_978), "$10,219.78");
        assert_eq!(format_currency(-50), "-$0.50");
    }

    #[test]
    fn parse_accepts_grouped_and_plain_text() {
        assert_eq!(parse_input("11,303.98"), Some(1_130_398));
        assert_eq!(parse_input("11303.98"), Some(1_130_398));
        assert_eq!(parse_input("400"), Some(40_000));
        assert_eq!(parse_input(".5"), Some(50));
        assert_eq!(parse_input("-12.34"), Some(-1_234));
    }

    #[test]
    fn parse_rounds_excess_fraction_digits() {
        assert_eq!(parse_input("1.005"), Some(101));
        assert_eq!(parse_input("1.004"), Some(100));
    }

    #[test]
    fn malformed_input_coerces_to_zero_on_blur() {
        assert_eq!(parse_input("abc"), None);
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("1.2.3"), None);
        assert_eq!(parse_or_zero("abc"), 0);
        assert_eq!(parse_or_zero("7.50"), 750);
    }

    #[test]
    fn display_and_parse_round_trip() {
        for cents in [0, 1, 99, 100, 123_456, 1_021_978, 9_999_999_99] {
            assert_eq!(parse_input(&format_grouped(cents)), Some(cents));
        }
    }
}
