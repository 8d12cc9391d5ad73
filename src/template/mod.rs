//! Invoice templates.
//!
//! A template turns an `InvoiceRecord` into a finished `Page`. Two layouts
//! exist: `minimal` (black on white, raw total, wave footer) and `badge`
//! (coloured header, circular number badge, 10 % tax).

use clap::ValueEnum;
use serde::Deserialize;

use crate::draw::{Canvas, Page, TextStyle};
use crate::format;
use crate::invoice::{InvoiceItem, InvoiceRecord, Party};
use crate::totals::{TaxPolicy, Totals};

pub mod badge;
pub mod minimal;

pub use badge::BadgeTemplate;
pub use minimal::MinimalTemplate;

/// A page layout for invoices.
pub trait InvoiceTemplate: Send + Sync {
    fn name(&self) -> &'static str;

    fn settings(&self) -> &TemplateSettings;

    /// Lays out the whole page. Layout itself cannot fail; problems with
    /// the resulting commands surface when the page is serialized.
    fn render(&self, record: &InvoiceRecord) -> Page;
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Money-related behaviour of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSettings {
    pub tax: TaxPolicy,
    /// Decimal places for every currency amount
    pub precision: usize,
    pub currency_symbol: &'static str,
}

impl TemplateSettings {
    pub fn money(&self, value: f64) -> String {
        format::currency(value, self.precision, self.currency_symbol)
    }

    pub fn totals(&self, items: &[InvoiceItem]) -> Totals {
        Totals::compute(items, self.tax)
    }

    fn apply(mut self, overrides: TemplateOverrides) -> Self {
        if let Some(tax) = overrides.tax {
            self.tax = tax;
        }
        self
    }
}

/// Configuration that replaces a template's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemplateOverrides {
    pub tax: Option<TaxPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Minimal,
    Badge,
}

impl TemplateKind {
    pub fn default_settings(self) -> TemplateSettings {
        match self {
            TemplateKind::Minimal => TemplateSettings {
                tax: TaxPolicy::None,
                precision: 0,
                currency_symbol: "",
            },
            TemplateKind::Badge => TemplateSettings {
                tax: TaxPolicy::STANDARD,
                precision: 2,
                currency_symbol: "$",
            },
        }
    }

    pub fn build(self, overrides: TemplateOverrides) -> Box<dyn InvoiceTemplate> {
        let settings = self.default_settings().apply(overrides);
        match self {
            TemplateKind::Minimal => Box::new(MinimalTemplate::new(settings)),
            TemplateKind::Badge => Box::new(BadgeTemplate::new(settings)),
        }
    }
}

// ============================================================================
// SHARED LAYOUT HELPERS
// ============================================================================

/// Where and how one side of the party block is drawn.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PartyLayout {
    pub label_x: f32,
    pub name_x: f32,
    pub detail_x: f32,
    pub label: TextStyle,
    pub name: TextStyle,
    pub detail: TextStyle,
    /// Label baseline to name baseline
    pub name_offset: f32,
    /// Space reserved for a one-line name
    pub name_row: f32,
    /// Space reserved for each one-line address line or email
    pub detail_row: f32,
}

/// Draws label, name, address lines and email. Absent fields take no
/// space. Returns the y below the block.
pub(crate) fn draw_party(
    canvas: &mut Canvas,
    label: &str,
    party: &Party<'_>,
    layout: &PartyLayout,
    y: f32,
) -> f32 {
    canvas.text(label, layout.label_x, y, &layout.label);

    let mut y = y + layout.name_offset;
    y = stack_text(canvas, party.name, layout.name_x, y, &layout.name, layout.name_row);

    for line in party.address_lines() {
        y = stack_text(canvas, line, layout.detail_x, y, &layout.detail, layout.detail_row);
    }
    if let Some(email) = party.email() {
        y = stack_text(canvas, email, layout.detail_x, y, &layout.detail, layout.detail_row);
    }
    y
}

/// Draws `text` and advances by a fixed row, plus whatever extra lines
/// wrapping produced.
pub(crate) fn stack_text(
    canvas: &mut Canvas,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    row: f32,
) -> f32 {
    let next = canvas.text(text, x, y, style);
    let wrapped = next - y - canvas.line_advance(style.size);
    y + row + wrapped.max(0.0)
}

/// Height of a table row whose description may wrap onto extra lines.
pub(crate) fn row_height(canvas: &Canvas, description: &str, style: &TextStyle, base: f32) -> f32 {
    let lines = canvas.wrap(description, style).len().max(1);
    base + (lines - 1) as f32 * canvas.line_advance(style.size)
}

/// `Tax (10%)`, keeping fractional rates such as `Tax (7.5%)`.
pub(crate) fn tax_label(rate: f64) -> String {
    let percent = format!("{:.4}", rate * 100.0);
    let percent = percent.trim_end_matches('0').trim_end_matches('.');
    format!("Tax ({}%)", percent)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::draw::{Color, DrawCommand, Page};
    use crate::invoice::{InvoiceItem, InvoiceRecord};

    pub fn acme() -> InvoiceRecord {
        InvoiceRecord {
            client_name: "Acme".to_string(),
            client_address: None,
            client_email: None,
            from_name: "Jane".to_string(),
            from_address: None,
            from_email: None,
            invoice_number: "INV-20240001-001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            items: vec![InvoiceItem::new("Consulting", 2.0, 150.0)],
        }
    }

    pub fn with_items(count: usize) -> InvoiceRecord {
        let mut record = acme();
        record.items = (0..count)
            .map(|i| InvoiceItem::new(format!("Item {i}"), (i + 1) as f64, 10.0 * (i + 1) as f64 + 0.5))
            .collect();
        record
    }

    /// Filled rectangles of exactly `width`, in paint order.
    pub fn rects_of_width(page: &Page, width: f32) -> Vec<(f32, f32, Color)> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { y, width: w, height, color, .. } if (w - width).abs() < 0.01 => {
                    Some((*y, *height, *color))
                }
                _ => None,
            })
            .collect()
    }

    /// Top-down baseline of the first text run equal to `text`.
    pub fn baseline_of(page: &Page, text: &str) -> Option<f32> {
        page.commands.iter().find_map(|c| match c {
            DrawCommand::Text { text: t, y, .. } if t == text => Some(page.height - y),
            _ => None,
        })
    }
}
