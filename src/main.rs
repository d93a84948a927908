mod analyzer;
mod config;
mod error;
mod logging;
mod menu;
mod parser;
mod reader;
mod report;

use clap::Parser;
use colored::Colorize;
use config::AnalyzerConfig;
use error::AnalyzerError;
use std::io::{self, Write};
use std::path::PathBuf;

/// Summarize a web server access log and flag suspicious login activity
#[derive(Parser, Debug)]
#[command(
    name = "access_log_analyzer",
    author,
    version,
    about = "Counts requests per IP, finds the most accessed endpoint and flags repeated failed logins"
)]
struct Args {
    /// Path to the access log to analyze
    #[arg(value_name = "LOG_FILE", default_value = config::DEFAULT_LOG_FILE)]
    file: PathBuf,

    /// CSV file written by "View All Results"
    #[arg(short = 'o', long = "output", default_value = config::DEFAULT_OUTPUT_FILE, value_name = "CSV_FILE")]
    output: PathBuf,

    /// Failed-login threshold; skips the interactive prompt when given
    #[arg(short = 't', long = "threshold", value_name = "COUNT")]
    threshold: Option<u64>,

    /// Also export the results as JSON to this path
    #[arg(short = 'j', long = "json-output", value_name = "JSON_FILE")]
    json_output: Option<PathBuf>,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(short = 'l', long = "log-level", default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(&args.log_level);

    if let Err(err) = run(args) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(err.exit_code());
    }
}

fn run(args: Args) -> Result<(), AnalyzerError> {
    let mut config = AnalyzerConfig {
        log_file: args.file,
        output_file: args.output,
        json_output: args.json_output,
        ..AnalyzerConfig::default()
    };

    // The log is read before any interaction so a bad path fails fast.
    let lines = reader::read_log_lines(&config.log_file)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    match args.threshold {
        Some(threshold) => config.failed_login_threshold = threshold,
        None => menu::prompt_threshold(&mut config, &mut input, &mut output)?,
    }
    tracing::info!(threshold = config.failed_login_threshold, "failed-login threshold set");

    let analysis = analyzer::Analysis::from_lines(&lines);
    let report = report::Report::assemble(&analysis, config.failed_login_threshold);

    writeln!(output)?;
    report::render_banner(&report, &config.log_file, &mut output)?;

    menu::Session::new(&report, &config).run(&mut input, &mut output)?;
    output.flush()?;
    Ok(())
}
