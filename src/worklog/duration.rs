//! Conversion between `1h 30m` style strings and whole seconds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// Hours (optionally fractional) followed by one or two digit minutes, either part optional.
pub const DURATION_PATTERN: &str = r"(?:\d*\.?\d+h)?\s*(?:\d{1,2}m)?";

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d*)(?:\.(\d+))?h)?\s*(?:(\d{1,2})m)?\s*$").expect("invalid duration regex")
});

// Fraction digits beyond this cannot change the truncated second count in practice.
const MAX_FRACTION_DIGITS: usize = 30;

pub fn parse_duration(text: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidDurationFormat(text.to_string());
    let captures = DURATION_REGEX.captures(text).ok_or_else(invalid)?;

    let whole = captures.get(1).map(|m| m.as_str());
    let fraction = captures.get(2).map(|m| m.as_str());
    let minutes = captures.get(3).map(|m| m.as_str());

    if whole.is_none() && minutes.is_none() {
        return Err(invalid());
    }
    if whole == Some("") && fraction.is_none() {
        return Err(invalid());
    }

    let mut seconds: u64 = 0;
    if let Some(whole) = whole.filter(|w| !w.is_empty()) {
        let hours: u64 = whole.parse().map_err(|_| invalid())?;
        seconds = hours.checked_mul(3600).ok_or_else(invalid)?;
    }
    if let Some(fraction) = fraction {
        let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        let numerator: u128 = digits.parse().map_err(|_| invalid())?;
        let denominator = 10u128.pow(digits.len() as u32);
        let extra = (numerator * 3600 / denominator) as u64;
        seconds = seconds.checked_add(extra).ok_or_else(invalid)?;
    }
    if let Some(minutes) = minutes {
        let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
        seconds = seconds.checked_add(minutes * 60).ok_or_else(invalid)?;
    }
    Ok(seconds)
}

/// `"<H>h <MM>m"`, or `"<H>h"` when `drop_minutes` is set.
pub fn format_duration(seconds: u64, drop_minutes: bool) -> String {
    let hours = seconds / 3600;
    if drop_minutes {
        return format!("{hours}h");
    }
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes:02}m")
}

/// Decimal hours with two places, as shown in statistics tables.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}
