use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sort key '{0}' (expected one of: trust, auth, rel, res, roas)")]
    InvalidSortKey(String),

    #[error("invalid brief identifier '{0}'")]
    InvalidBriefId(String),

    #[error("brand must not be empty")]
    EmptyBrand,
}

/// Errors produced while exporting a report to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sorted view is empty; no document is produced.
    #[error("nothing to export")]
    NothingToExport,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
