//! Handing finished PDFs to their destination.

use std::path::{Path, PathBuf};

use crate::error::DeliveryError;

/// `invoice-<invoiceNumber>.pdf`
pub fn file_name(invoice_number: &str) -> String {
    format!("invoice-{}.pdf", invoice_number)
}

/// Rejects names that could escape the target directory or be hidden.
pub fn check_file_name(name: &str) -> Result<(), DeliveryError> {
    let unsafe_name = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if unsafe_name {
        return Err(DeliveryError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// Directory that saved invoices are written into.
#[derive(Debug, Clone)]
pub struct InvoiceStore {
    dir: PathBuf,
}

impl InvoiceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        InvoiceStore { dir: dir.into() }
    }

    /// Writes `bytes` to `<dir>/<file_name>`, creating the directory first.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        check_file_name(file_name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DeliveryError::Io { path: self.dir.clone(), source })?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| DeliveryError::Io { path: path.clone(), source })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "invoice saved");
        Ok(path)
    }
}

/// Blocking variant for the command line.
pub fn write_to_dir(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
    check_file_name(file_name)?;

    std::fs::create_dir_all(dir).map_err(|source| DeliveryError::Io { path: dir.to_path_buf(), source })?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|source| DeliveryError::Io { path: path.clone(), source })?;
    Ok(path)
}
