//! Interactive console front-end: the startup threshold prompt and the
//! five-option menu loop.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::report::{self, Report};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

/// The actions offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RequestsPerAddress,
    MostAccessedEndpoint,
    SuspiciousActivity,
    ViewAllAndExport,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::RequestsPerAddress,
        MenuChoice::MostAccessedEndpoint,
        MenuChoice::SuspiciousActivity,
        MenuChoice::ViewAllAndExport,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuChoice::RequestsPerAddress => "1",
            MenuChoice::MostAccessedEndpoint => "2",
            MenuChoice::SuspiciousActivity => "3",
            MenuChoice::ViewAllAndExport => "4",
            MenuChoice::Exit => "5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::RequestsPerAddress => "View Requests per IP",
            MenuChoice::MostAccessedEndpoint => "View Most Accessed Endpoint",
            MenuChoice::SuspiciousActivity => "View Suspicious Activity",
            MenuChoice::ViewAllAndExport => "View All Results",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MenuChoice::ALL
            .into_iter()
            .find(|choice| choice.key() == trimmed)
            .ok_or_else(|| AnalyzerError::InvalidMenuChoice(trimmed.to_string()))
    }
}

/// Ask once for a failed-login threshold.
///
/// Invalid input leaves `config` untouched and prints a warning. End of input
/// is treated the same as an empty answer.
pub fn prompt_threshold(
    config: &mut AnalyzerConfig,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), AnalyzerError> {
    write!(output, "Enter the threshold value for failed login attempts: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    match config.apply_threshold_input(&line) {
        Ok(threshold) => tracing::debug!(threshold, "threshold overridden"),
        Err(err) => {
            tracing::warn!(error = %err, "keeping default threshold");
            writeln!(
                output,
                "{}",
                format!(
                    "Invalid threshold value. Using default value of {}.",
                    config.failed_login_threshold
                )
                .yellow()
            )?;
        }
    }
    Ok(())
}

/// One interactive menu session over a finished report.
pub struct Session<'a> {
    report: &'a Report,
    config: &'a AnalyzerConfig,
}

impl<'a> Session<'a> {
    pub fn new(report: &'a Report, config: &'a AnalyzerConfig) -> Self {
        Self { report, config }
    }

    /// Loop until the user exits, picks "view all", or input ends.
    pub fn run(
        &self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<(), AnalyzerError> {
        loop {
            writeln!(output, "\nSelect an option to view the analysis result:")?;
            for choice in MenuChoice::ALL {
                writeln!(output, "{}. {}", choice.key(), choice.label())?;
            }
            write!(output, "Enter the number of your choice: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                tracing::debug!("menu input closed");
                writeln!(output)?;
                return Ok(());
            }

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(err) => {
                    tracing::debug!(error = %err, "rejected menu input");
                    writeln!(output, "{}", "Invalid choice. Please try again.".yellow())?;
                    continue;
                }
            };

            if self.handle(choice, output)?.is_break() {
                return Ok(());
            }
        }
    }

    /// Run one menu action.
    pub fn handle(
        &self,
        choice: MenuChoice,
        output: &mut dyn Write,
    ) -> Result<ControlFlow<()>, AnalyzerError> {
        match choice {
            MenuChoice::RequestsPerAddress => report::render_requests(self.report, output)?,
            MenuChoice::MostAccessedEndpoint => report::render_most_accessed(self.report, output)?,
            MenuChoice::SuspiciousActivity => report::render_suspicious(self.report, output)?,
            MenuChoice::ViewAllAndExport => {
                report::render_all(self.report, output)?;
                self.export(output)?;
                return Ok(ControlFlow::Break(()));
            }
            MenuChoice::Exit => {
                writeln!(output, "Exiting the program.")?;
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn export(&self, output: &mut dyn Write) -> Result<(), AnalyzerError> {
        report::export_csv(self.report, &self.config.output_file)?;
        writeln!(
            output,
            "\n{} Results saved to {}",
            "✓".green(),
            self.config.output_file.display()
        )?;

        if let Some(json_path) = &self.config.json_output {
            report::export_json(self.report, json_path)?;
            writeln!(
                output,
                "{} JSON summary saved to {}",
                "✓".green(),
                json_path.display()
            )?;
        }
        Ok(())
    }
}
