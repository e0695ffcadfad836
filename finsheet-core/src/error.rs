//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Failures that halt processing of a workbook.
///
/// A keyword that matches nothing, or a cell that is not a number, is not an
/// error: those surface as [`crate::Extraction::NoMatch`] and absent points.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read sheet '{name}': {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },

    #[error("unknown company '{name}' (available: {available})")]
    UnknownCompany { name: String, available: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
