use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;

use inkwell_invoice::config::{AppConfig, Cli, Command, LayoutArgs};
use inkwell_invoice::error::AppError;
use inkwell_invoice::invoice::{validate, InvoiceRecord};
use inkwell_invoice::{delivery, pdf, server, telemetry};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    telemetry::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { addr, invoices_dir, layout } => serve(addr, invoices_dir, &layout).await,
        Command::Render { input, out_dir, layout } => render(&input, &out_dir, &layout),
    }
}

async fn serve(addr: SocketAddr, invoices_dir: PathBuf, layout: &LayoutArgs) -> Result<(), AppError> {
    let app = server::build_app(AppConfig::new(layout, invoices_dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(template = ?layout.template, "PDF engine listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

fn render(input: &Path, out_dir: &Path, layout: &LayoutArgs) -> Result<(), AppError> {
    let json = std::fs::read_to_string(input).map_err(|source| AppError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let record: InvoiceRecord = serde_json::from_str(&json)?;

    let errors = validate(&record);
    if !errors.is_empty() {
        let summary = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::Invalid(summary));
    }

    let template = layout.template.build(layout.overrides());
    let rendered = pdf::render_pdf(&record, template.as_ref())?;
    let path = delivery::write_to_dir(out_dir, &rendered.file_name, &rendered.bytes)?;

    tracing::info!(path = %path.display(), "wrote invoice");
    Ok(())
}
