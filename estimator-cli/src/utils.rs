use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a project size cannot be understood.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid project size '{input}': expected square feet, e.g. 1,200 or 1200 sq ft")]
pub struct ParseSizeError {
    input: String,
}

static SIZE_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([0-9][0-9,]*)\s*(?:sq\.?\s*ft\.?|sqft|square\s+feet|sf)?\s*$")
        .expect("size pattern is valid")
});

/// Normalizes a typed project size to bare digits.
///
/// Accepts thousands separators and a trailing unit (`1,200 sq ft`,
/// `800sqft`). Empty input stays empty so the wizard can report it.
pub fn normalize_size(s: &str) -> Result<String, ParseSizeError> {
    if s.trim().is_empty() {
        return Ok(String::new());
    }
    let caps = SIZE_INPUT.captures(s).ok_or_else(|| {
        tracing::debug!(input = %s, "rejected size input");
        ParseSizeError {
            input: s.to_string(),
        }
    })?;
    Ok(caps[1].replace(',', ""))
}

/// Formats a whole-currency amount as `$1,234,567`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Relative label for a multiplier: `+40%`, `Base`, `-20%`.
pub fn multiplier_badge(multiplier: Decimal) -> String {
    let percent = ((multiplier - Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if percent.is_zero() {
        "Base".to_string()
    } else if percent.is_sign_positive() {
        format!("+{percent}%")
    } else {
        format!("{percent}%")
    }
}

/// Parses a yes/no answer; empty input takes `default`.
pub fn parse_yes_no(
    s: &str,
    default: bool,
) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a list of 1-based menu numbers such as `1, 3 5`.
pub fn parse_selection(
    s: &str,
    max: usize,
) -> Option<Vec<usize>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .ok()
                .filter(|n| (1..=max).contains(n))
                .map(|n| n - 1)
        })
        .collect()
}
