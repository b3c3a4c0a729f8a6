use thiserror::Error;

/// Reasons a `-p` probe specification is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("probe '{0}' is neither a port set nor in proto:port form")]
    MissingSeparator(String),

    #[error("probe '{spec}' has an invalid port '{port}'")]
    InvalidPort { spec: String, port: String },
}
