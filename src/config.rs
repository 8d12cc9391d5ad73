//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::template::{InvoiceTemplate, TemplateKind, TemplateOverrides};
use crate::totals::TaxPolicy;

#[derive(Debug, Parser)]
#[command(name = "inkwell-invoice", version, about = "Render invoices to PDF")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP render service
    Serve {
        #[arg(long, env = "INVOICE_ADDR", default_value = "127.0.0.1:3001")]
        addr: SocketAddr,

        /// Where /save-invoice writes files
        #[arg(long, env = "INVOICE_DIR", default_value = "public/invoices")]
        invoices_dir: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Render one invoice JSON file to `invoice-<number>.pdf`
    Render {
        input: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct LayoutArgs {
    /// Default template when a request doesn't name one
    #[arg(long, value_enum, env = "INVOICE_TEMPLATE", default_value = "minimal")]
    pub template: TemplateKind,

    /// `none` or a decimal rate such as `0.1`; replaces the template's tax
    #[arg(long, env = "INVOICE_TAX")]
    pub tax: Option<TaxPolicy>,
}

impl LayoutArgs {
    pub fn overrides(&self) -> TemplateOverrides {
        TemplateOverrides { tax: self.tax }
    }
}

/// Resolved settings shared with the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub template: TemplateKind,
    pub overrides: TemplateOverrides,
    pub invoices_dir: PathBuf,
}

impl AppConfig {
    pub fn new(layout: &LayoutArgs, invoices_dir: PathBuf) -> Self {
        AppConfig {
            template: layout.template,
            overrides: layout.overrides(),
            invoices_dir,
        }
    }

    /// The requested template, or the configured default.
    pub fn template(&self, requested: Option<TemplateKind>) -> Box<dyn InvoiceTemplate> {
        requested.unwrap_or(self.template).build(self.overrides)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            template: TemplateKind::default(),
            overrides: TemplateOverrides::default(),
            invoices_dir: PathBuf::from("public/invoices"),
        }
    }
}
