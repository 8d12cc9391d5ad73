//! Subtotal, tax and grand total derived from the item list.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::invoice::InvoiceItem;

/// Whether a template adds tax on top of the item sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaxPolicy {
    /// "Total" is the raw item sum.
    None,
    /// Flat rate applied to the subtotal (0.10 is 10 %).
    Rate(f64),
}

impl TaxPolicy {
    pub const STANDARD: TaxPolicy = TaxPolicy::Rate(0.10);

    pub fn rate(&self) -> Option<f64> {
        match self {
            TaxPolicy::None => None,
            TaxPolicy::Rate(rate) => Some(*rate),
        }
    }
}

impl FromStr for TaxPolicy {
    type Err = ConfigError;

    /// `none`, or a decimal rate such as `0.1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(TaxPolicy::None);
        }
        match s.parse::<f64>() {
            Ok(rate) if rate.is_finite() && (0.0..=1.0).contains(&rate) => Ok(TaxPolicy::Rate(rate)),
            _ => Err(ConfigError::InvalidTax(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    /// `None` when the policy has no tax
    pub tax: Option<f64>,
    pub total: f64,
}

impl Totals {
    /// Recomputes everything from the items; nothing is cached.
    pub fn compute(items: &[InvoiceItem], policy: TaxPolicy) -> Self {
        let subtotal: f64 = items.iter().map(InvoiceItem::amount).sum();
        let tax = policy.rate().map(|rate| subtotal * rate);
        Totals {
            subtotal,
            tax,
            total: subtotal + tax.unwrap_or(0.0),
        }
    }
}
