use crate::error::AnalyzerError;
use std::path::PathBuf;

pub const DEFAULT_FAILED_LOGIN_THRESHOLD: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "sample.log";
pub const DEFAULT_OUTPUT_FILE: &str = "log_analysis_results.csv";

/// Run-wide settings, built once in `main` and handed to every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub log_file: PathBuf,
    pub output_file: PathBuf,
    pub json_output: Option<PathBuf>,
    /// Addresses with strictly more failed logins than this are suspicious.
    pub failed_login_threshold: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            json_output: None,
            failed_login_threshold: DEFAULT_FAILED_LOGIN_THRESHOLD,
        }
    }
}

impl AnalyzerConfig {
    /// Override the threshold from raw user input.
    ///
    /// On error the configured threshold is left untouched.
    pub fn apply_threshold_input(&mut self, input: &str) -> Result<u64, AnalyzerError> {
        let threshold = parse_threshold(input)?;
        self.failed_login_threshold = threshold;
        Ok(threshold)
    }
}

/// Parse a threshold. Surrounding whitespace is ignored; negative or
/// non-numeric input is rejected.
pub fn parse_threshold(input: &str) -> Result<u64, AnalyzerError> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| AnalyzerError::InvalidThreshold {
            input: trimmed.to_string(),
        })
}
