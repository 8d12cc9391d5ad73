//! Error types.
//!
//! Faults inside the PDF backend stay detailed (`BackendError`) so they can be
//! logged. Callers only ever see the single `GenerationError`.

use std::path::PathBuf;

use thiserror::Error;

use crate::font_metrics::FontFace;

/// Internal failures while turning a page into PDF bytes.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to embed font {face:?}: {message}")]
    FontEmbedding { face: FontFace, message: String },
    #[error("draw command {index} has a non-finite coordinate")]
    Drawing { index: usize },
    #[error("failed to serialize document: {0}")]
    Serialization(String),
}

/// The one error a caller of the renderer sees.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Failed to generate PDF. Please try again.")]
pub struct GenerationError;

/// Failures while handing a finished PDF to its destination.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid tax value {0:?}: expected \"none\" or a rate between 0 and 1")]
    InvalidTax(String),
}

/// Errors surfaced by the command-line entry point.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse invoice: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invoice is invalid: {0}")]
    Invalid(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
