//! Text formatting for amounts, quantities, dates and invoice numbers.

use chrono::NaiveDate;

const BADGE_DIGITS: usize = 6;
const BADGE_FALLBACK: &str = "000001";

/// Fixed-point currency text, e.g. `$330.00` or `330`.
///
/// Exact halves round away from zero (`12.5` at precision 0 is `13`), not to
/// the even neighbour the standard formatter picks.
pub fn currency(value: f64, precision: usize, symbol: &str) -> String {
    format!("{}{:.*}", symbol, precision, round_half_up(value, precision))
}

fn round_half_up(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Whole quantities print without a fraction.
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Number shown in the "NO." header and the circular badge.
///
/// The segment after the last `-` is left-padded with zeros to six digits
/// when it is purely numeric; anything else falls back to `000001`.
pub fn badge_number(invoice_number: &str) -> String {
    let suffix = invoice_number
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .trim();

    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return BADGE_FALLBACK.to_string();
    }
    format!("{:0>width$}", suffix, width = BADGE_DIGITS)
}

/// `15 January, 2024`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%d %B, %Y").to_string()
}

/// `January 15, 2024`
pub fn month_first_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
