//! Invoice data model and form-level validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ITEMS
// ============================================================================

/// One line item. Its amount is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: f64, price: f64) -> Self {
        InvoiceItem {
            description: description.into(),
            quantity,
            price,
        }
    }

    /// The row a freshly added form line starts with.
    pub fn blank() -> Self {
        InvoiceItem::new("", 1.0, 0.0)
    }

    pub fn amount(&self) -> f64 {
        self.quantity * self.price
    }
}

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub client_name: String,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    pub from_name: String,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub items: Vec<InvoiceItem>,
}

/// One side of the party block ("billed to" or "from").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl<'a> Party<'a> {
    /// Non-blank address lines, trimmed, in order.
    pub fn address_lines(&self) -> impl Iterator<Item = &'a str> {
        self.address
            .into_iter()
            .flat_map(str::lines)
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// The email, unless it is absent or blank.
    pub fn email(&self) -> Option<&'a str> {
        non_blank(self.email)
    }
}

impl InvoiceRecord {
    /// Default record the form starts from: number `INV-<yyyyMMdd>-001`
    /// and a single blank item.
    pub fn draft(today: NaiveDate) -> Self {
        InvoiceRecord {
            client_name: String::new(),
            client_address: None,
            client_email: None,
            from_name: String::new(),
            from_address: None,
            from_email: None,
            invoice_number: format!("INV-{}-001", today.format("%Y%m%d")),
            date: today,
            items: vec![InvoiceItem::blank()],
        }
    }

    pub fn client(&self) -> Party<'_> {
        Party {
            name: &self.client_name,
            address: self.client_address.as_deref(),
            email: self.client_email.as_deref(),
        }
    }

    pub fn sender(&self) -> Party<'_> {
        Party {
            name: &self.from_name,
            address: self.from_address.as_deref(),
            email: self.from_email.as_deref(),
        }
    }

    pub fn push_item(&mut self, item: InvoiceItem) {
        self.items.push(item);
    }

    /// Removes the item at `index`. The last remaining item can't be
    /// removed; `None` is returned instead.
    pub fn remove_item(&mut self, index: usize) -> Option<InvoiceItem> {
        if self.items.len() <= 1 || index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: impl Into<String>, message: &'static str) -> Self {
        FieldError {
            field: field.into(),
            message,
        }
    }
}

/// Checks everything the invoice form enforces before a record may be
/// rendered. An empty result means the record is valid.
pub fn validate(record: &InvoiceRecord) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if record.client_name.trim().is_empty() {
        errors.push(FieldError::new("clientName", "Client name is required"));
    }
    if record.from_name.trim().is_empty() {
        errors.push(FieldError::new("fromName", "Your name is required"));
    }
    if record.invoice_number.trim().is_empty() {
        errors.push(FieldError::new("invoiceNumber", "Invoice number is required"));
    }

    for (field, email) in [
        ("clientEmail", record.client_email.as_deref()),
        ("fromEmail", record.from_email.as_deref()),
    ] {
        if let Some(email) = non_blank(email) {
            if !looks_like_email(email) {
                errors.push(FieldError::new(field, "Invalid email"));
            }
        }
    }

    if record.items.is_empty() {
        errors.push(FieldError::new("items", "At least one item is required"));
    }

    for (i, item) in record.items.iter().enumerate() {
        if item.description.trim().is_empty() {
            errors.push(FieldError::new(format!("items.{i}.description"), "Description is required"));
        }
        if !item.quantity.is_finite() || item.quantity < 1.0 {
            errors.push(FieldError::new(format!("items.{i}.quantity"), "Quantity must be at least 1"));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            errors.push(FieldError::new(format!("items.{i}.price"), "Price must be positive"));
        }
    }

    errors
}

/// `local@domain.tld` with no whitespace
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
