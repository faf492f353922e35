//! Error types for the sensor panel service

/// Errors that can occur in the sensor panel service
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for sensor panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
