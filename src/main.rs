//! marginalia - extract reviewer comments from .docx files
//!
//! Reads a Word document, pairs each comment with the text span it
//! annotates, and writes the result as CSV, JSON, or a Markdown table.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use marginalia::config::Config;
use marginalia::document::{self, ExtractOptions};
use marginalia::{ExportFormat, export};

/// Extract reviewer comments and the text they annotate from a .docx file
#[derive(Parser)]
#[command(name = "marginalia", version, about)]
struct Args {
    /// Path to the .docx file to read
    input: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (defaults to csv)
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Include the comment author column
    #[arg(long)]
    author: bool,

    /// Include the comment date column
    #[arg(long)]
    date: bool,

    /// Keep rows whose commented text is empty
    #[arg(long)]
    keep_empty: bool,

    /// Load configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Command-line flags win over the config file, which wins over defaults.
fn resolve_options(args: &Args, config: &Config) -> (ExtractOptions, ExportFormat) {
    let options = ExtractOptions {
        keep_empty: args.keep_empty || config.keep_empty.unwrap_or(false),
        include_author: args.author || config.include_author.unwrap_or(false),
        include_date: args.date || config.include_date.unwrap_or(false),
    };
    let format = args.format.or(config.format).unwrap_or(ExportFormat::Csv);
    (options, format)
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_path(path)?,
        None => Config::load()?,
    };

    let (options, format) = resolve_options(&args, &config);

    document::validate_docx_file(&args.input)?;
    let rows = document::extract_comments(&args.input, &options)
        .with_context(|| format!("failed to extract comments from {}", args.input.display()))?;

    let rendered = export::render(&format, &rows, &options)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> Args {
        Args {
            input: PathBuf::from("review.docx"),
            output: None,
            format: None,
            author: false,
            date: false,
            keep_empty: false,
            config: None,
        }
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let (options, format) = resolve_options(&bare_args(), &Config::default());
        assert!(!options.keep_empty);
        assert!(!options.include_author);
        assert!(!options.include_date);
        assert_eq!(format, ExportFormat::Csv);
    }

    #[test]
    fn config_fills_in_unset_flags() {
        let config = Config {
            format: Some(ExportFormat::Json),
            include_author: Some(true),
            include_date: None,
            keep_empty: Some(true),
        };
        let (options, format) = resolve_options(&bare_args(), &config);
        assert!(options.keep_empty);
        assert!(options.include_author);
        assert!(!options.include_date);
        assert_eq!(format, ExportFormat::Json);
    }

    #[test]
    fn command_line_wins_over_config() {
        let mut args = bare_args();
        args.format = Some(ExportFormat::Markdown);
        args.date = true;
        let config = Config {
            format: Some(ExportFormat::Json),
            include_author: None,
            include_date: None,
            keep_empty: None,
        };
        let (options, format) = resolve_options(&args, &config);
        assert!(options.include_date);
        assert_eq!(format, ExportFormat::Markdown);
    }
}
