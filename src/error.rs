//! Error types and exit code mapping

use std::path::PathBuf;

/// Everything that can go wrong while analyzing a log and exporting results.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The log file is missing or unreadable. Fatal.
    #[error("could not read log file '{}': {source}", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The threshold override was not a non-negative integer.
    #[error("invalid threshold value {input:?}")]
    InvalidThreshold { input: String },

    /// No line produced an endpoint match.
    #[error("no data available")]
    EmptyResult,

    /// Menu input outside 1-5.
    #[error("invalid choice {0:?}")]
    InvalidMenuChoice(String),

    /// CSV export failure.
    #[error("csv export error: {0}")]
    Export(#[from] csv::Error),

    /// JSON summary serialisation failure.
    #[error("json export error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (stdin, stdout, export file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 1    | Export or console IO failure |
    /// | 2    | Log file unreadable          |
    ///
    /// Threshold, menu and empty-result errors are handled where they occur
    /// and never end the process; they fall under the general code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputFile { .. } => 2,
            Self::Export(_)
            | Self::Json(_)
            | Self::Io(_)
            | Self::InvalidThreshold { .. }
            | Self::InvalidMenuChoice(_)
            | Self::EmptyResult => 1,
        }
    }
}
