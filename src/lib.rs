//! Invoice PDF rendering.
//!
//! An `InvoiceRecord` is laid out by one of the invoice templates onto a
//! single A4 `Page` of draw commands, which the printpdf backend serializes.
//! The binary exposes this over HTTP (`serve`) and as a one-shot command
//! (`render`).

pub mod config;
pub mod delivery;
pub mod draw;
pub mod error;
pub mod font_metrics;
pub mod format;
pub mod invoice;
pub mod pdf;
pub mod server;
pub mod telemetry;
pub mod template;
pub mod totals;

pub use error::GenerationError;
pub use invoice::{InvoiceItem, InvoiceRecord};
pub use pdf::{render_pdf, RenderedInvoice};
pub use template::{InvoiceTemplate, TemplateKind};
