//! Domain error types.

/// Top-level error type for psarstop.
#[derive(Debug, thiserror::Error)]
pub enum PsarStopError {
    #[error("no period has been computed yet")]
    EmptyState,

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PsarStopError> for std::process::ExitCode {
    fn from(err: &PsarStopError) -> Self {
        let code: u8 = match err {
            PsarStopError::Io(_) | PsarStopError::Report { .. } => 1,
            PsarStopError::ConfigParse { .. }
            | PsarStopError::ConfigMissing { .. }
            | PsarStopError::ConfigInvalid { .. } => 2,
            PsarStopError::Data { .. } => 3,
            PsarStopError::NoData { .. } => 5,
            PsarStopError::EmptyState => 6,
        };
        std::process::ExitCode::from(code)
    }
}
