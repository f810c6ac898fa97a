// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Textual date handling for the two wire forms used across the app:
//! canonical `mm/dd/yyyy` (what records store) and short `mm/dd/yy` (what
//! inputs accept and cells display). Values that are not complete dates are
//! passed through verbatim so partially-typed input renders literally.

use time::{Date, Month, OffsetDateTime};

/// Canonical -> short form. `mm/dd/yyyy` becomes `mm/dd/yy`; anything else
/// (short form already, partial input, empty) is returned unchanged.
pub fn short_form(value: &str) -> String {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() == 3 && parts[2].len() == 4 {
        return format!("{}/{}/{}", parts[0], parts[1], &parts[2][2..]);
    }
    value.to_owned()
}

/// Short -> canonical form. A 2-digit final segment is mapped into the 20xx
/// range; a 4-digit final segment is kept; anything else passes through.
pub fn canonical_form(value: &str) -> String {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() == 3
        && parts[2].len() == 2
        && parts[2].bytes().all(|byte| byte.is_ascii_digit())
    {
        return format!("{}/{}/20{}", parts[0], parts[1], parts[2]);
    }
    value.to_owned()
}

/// Whether `value` is an acceptable keystroke state for a date field: empty,
/// or digit segments separated by at most two slashes, each segment at most
/// two digits except the final segment which may reach four.
pub fn accepts_partial(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if !value.bytes().all(|byte| byte.is_ascii_digit() || byte == b'/') {
        return false;
    }
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() > 3 {
        return false;
    }
    parts.iter().enumerate().all(|(index, part)| {
        let max = if index == 2 { 4 } else { 2 };
        part.len() <= max
    })
}

/// The value a draft should hold after a keystroke leaves the field at
/// `value`: `None` rejects the keystroke outright, otherwise a completed
/// short-form date is normalized to canonical form and everything else is
/// stored as typed.
pub fn normalize_input(value: &str) -> Option<String> {
    if !accepts_partial(value) {
        return None;
    }
    Some(canonical_form(value))
}

/// Parse a canonical `mm/dd/yyyy` value into a calendar date. Partial or
/// malformed values yield `None`.
pub fn parse_canonical(value: &str) -> Option<Date> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 || parts[2].len() != 4 {
        return None;
    }
    let month: u8 = parts[0].parse().ok()?;
    let day: u8 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    if !(1000..=9999).contains(&year) {
        return None;
    }
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Date-only "strictly after today" comparison used by the promise-to-pay
/// display rule. Unparseable values are never in the future.
pub fn is_future(value: &str, today: Date) -> bool {
    parse_canonical(value).is_some_and(|date| date > today)
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::{accepts_partial, canonical_form, is_future, normalize_input, parse_canonical, short_form};
    use time::{Date, Month};

    #[test]
    fn short_and_canonical_forms_round_trip() {
        for short in ["01/05/24", "12/31/99", "06/01/00"] {
            let canonical = canonical_form(short);
            assert_eq!(canonical.len(), 10, "got {canonical}");
            assert_eq!(short_form(&canonical), short);
        }
    }

    #[test]
    fn canonical_form_maps_two_digit_years_into_20xx() {
        assert_eq!(canonical_form("01/15/24"), "01/15/2024");
        assert_eq!(canonical_form("12/20/23"), "12/20/2023");
    }

    #[test]
    fn canonical_form_keeps_four_digit_years_and_partials() {
        assert_eq!(canonical_form("01/15/2024"), "01/15/2024");
        assert_eq!(canonical_form("01/1"), "01/1");
        assert_eq!(canonical_form(""), "");
    }

    #[test]
    fn short_form_leaves_short_and_partial_values_alone() {
        assert_eq!(short_form("01/15/24"), "01/15/24");
        assert_eq!(short_form("01/"), "01/");
        assert_eq!(short_form(""), "");
    }

    #[test]
    fn partial_acceptance_follows_segment_rules() {
        for ok in ["", "0", "01", "01/", "01/2", "01/23/", "01/23/4", "01/23/2045"] {
            assert!(accepts_partial(ok), "expected acceptance for {ok:?}");
        }
        for bad in ["a", "01-02", "011", "01/234", "01/23/45678", "1/2/3/4"] {
            assert!(!accepts_partial(bad), "expected rejection for {bad:?}");
        }
    }

    #[test]
    fn normalize_input_rejects_bad_keystrokes() {
        assert_eq!(normalize_input("01x"), None);
        assert_eq!(normalize_input("01/2"), Some("01/2".to_owned()));
        assert_eq!(normalize_input("01/23/45"), Some("01/23/2045".to_owned()));
        assert_eq!(normalize_input("01/23/2045"), Some("01/23/2045".to_owned()));
    }

    #[test]
    fn parse_canonical_requires_a_real_calendar_date() {
        assert_eq!(
            parse_canonical("02/29/2024"),
            Date::from_calendar_date(2024, Month::February, 29).ok()
        );
        assert_eq!(parse_canonical("02/30/2024"), None);
        assert_eq!(parse_canonical("13/01/2024"), None);
        assert_eq!(parse_canonical("01/15/24"), None);
        assert_eq!(parse_canonical(""), None);
    }

    #[test]
    fn future_comparison_is_date_only_and_strict() {
        let today = Date::from_calendar_date(2024, Month::June, 15).expect("valid date");
        assert!(is_future("06/16/2024", today));
        assert!(!is_future("06/15/2024", today));
        assert!(!is_future("06/14/2024", today));
        assert!(!is_future("not a date", today));
        assert!(!is_future("", today));
    }
}
