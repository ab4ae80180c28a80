//! Command-line argument definitions for flavored-csv
//!
//! This module defines the CLI interface using the clap derive API.

use crate::flavor::{FlavorConfig, Preset};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the flavored CSV tool
///
/// Reads delimited text under a named dialect, validates it against a
/// descriptor of typed, constrained fields, and rewrites it in another
/// dialect.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flavored-csv",
    version,
    about = "Inspect, validate and convert CSV files using named dialects and column schemas"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the rows of a file, optionally filtered
    Show(ShowArgs),
    /// Validate a file against a JSON descriptor
    Validate(ValidateArgs),
    /// Rewrite a file from one dialect into another
    Convert(ConvertArgs),
}

/// Dialect selection shared by the reading commands
#[derive(Debug, Clone, Parser)]
pub struct DialectArgs {
    /// Dialect preset of the input
    #[arg(long = "preset", value_enum, default_value_t = Preset::Excel)]
    pub preset: Preset,

    /// Override the preset's delimiter
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Treat the first record as data rather than a header
    #[arg(long = "no-header")]
    pub no_header: bool,
}

impl DialectArgs {
    /// The flavor these arguments describe
    pub fn flavor(&self) -> FlavorConfig {
        let mut flavor = self.preset.flavor();
        if let Some(delimiter) = self.delimiter {
            flavor = flavor.with_delimiter(delimiter);
        }
        if self.no_header {
            flavor = flavor.with_header(false);
        }
        flavor
    }
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// Input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub dialect: DialectArgs,

    /// Only show rows with at least this many cells
    #[arg(long = "min-cells", value_name = "N")]
    pub min_cells: Option<usize>,

    /// Only show rows whose first cell is not empty
    #[arg(long = "non-empty-first")]
    pub non_empty_first: bool,

    /// Only show rows where COLUMN equals VALUE (repeatable)
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_condition)]
    pub conditions: Vec<(String, String)>,

    /// Stop after this many matching rows
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Print one JSON object per row instead of delimited text
    #[arg(long = "json")]
    pub json: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// JSON descriptor with the dialect and field declarations
    #[arg(short = 's', long = "descriptor", value_name = "PATH")]
    pub descriptor: PathBuf,

    /// Print the violation report as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Stop after this many violations
    #[arg(long = "max-violations", value_name = "N")]
    pub max_violations: Option<usize>,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file (standard output when omitted)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Dialect preset of the input
    #[arg(long = "from", value_enum, default_value_t = Preset::Excel)]
    pub from: Preset,

    /// Dialect preset of the output
    #[arg(long = "to", value_enum)]
    pub to: Preset,

    /// Treat the first input record as data rather than a header
    #[arg(long = "no-header")]
    pub no_header: bool,
}

impl ConvertArgs {
    pub fn source_flavor(&self) -> FlavorConfig {
        self.from.flavor().with_header(!self.no_header)
    }

    pub fn target_flavor(&self) -> FlavorConfig {
        self.to.flavor().with_header(!self.no_header)
    }
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check arguments clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        let input = match &self.command {
            Some(Commands::Show(args)) => {
                if args.limit == Some(0) {
                    return Err(Error::configuration("--limit must be greater than 0"));
                }
                &args.input
            }
            Some(Commands::Validate(args)) => {
                if !args.descriptor.is_file() {
                    return Err(Error::configuration(format!(
                        "Descriptor not found: {}",
                        args.descriptor.display()
                    )));
                }
                &args.input
            }
            Some(Commands::Convert(args)) => {
                if args.output.as_ref() == Some(&args.input) {
                    return Err(Error::configuration(
                        "Output must be a different file from the input",
                    ));
                }
                &args.input
            }
            None => return Ok(()),
        };

        if !input.is_file() {
            return Err(Error::configuration(format!(
                "Input file not found: {}",
                input.display()
            )));
        }

        Ok(())
    }
}

/// Parse a `COLUMN=VALUE` filter condition
pub fn parse_condition(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected COLUMN=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_with_filters() {
        let args = Args::try_parse_from([
            "flavored-csv",
            "show",
            "people.csv",
            "--preset",
            "excel-tab",
            "--min-cells",
            "2",
            "--non-empty-first",
            "--where",
            "name=Luke",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        match args.command {
            Some(Commands::Show(show)) => {
                assert_eq!(show.dialect.preset, Preset::ExcelTab);
                assert_eq!(show.dialect.flavor().delimiter(), '\t');
                assert_eq!(show.min_cells, Some(2));
                assert!(show.non_empty_first);
                assert_eq!(show.conditions, vec![("name".to_string(), "Luke".to_string())]);
            }
            other => panic!("expected show command, got {:?}", other),
        }
    }

    #[test]
    fn test_dialect_overrides() {
        let args = Args::try_parse_from([
            "flavored-csv",
            "show",
            "data.txt",
            "--preset",
            "unix",
            "-d",
            ";",
            "--no-header",
        ])
        .unwrap();

        let Some(Commands::Show(show)) = args.command else {
            panic!("expected show command");
        };
        let flavor = show.dialect.flavor();
        assert_eq!(flavor.delimiter(), ';');
        assert!(!flavor.has_header());
        assert_eq!(flavor.line_terminator(), "\n");
    }

    #[test]
    fn test_convert_requires_target() {
        assert!(Args::try_parse_from(["flavored-csv", "convert", "in.csv"]).is_err());

        let args =
            Args::try_parse_from(["flavored-csv", "convert", "in.csv", "--to", "unix-tab"]).unwrap();
        let Some(Commands::Convert(convert)) = args.command else {
            panic!("expected convert command");
        };
        assert_eq!(convert.from, Preset::Excel);
        assert_eq!(convert.target_flavor(), FlavorConfig::UNIX_TAB);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["flavored-csv", "-q", "-v", "show", "a.csv"]).is_err());

        let args = Args::try_parse_from(["flavored-csv", "show", "a.csv", "-q"]).unwrap();
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_parse_condition() {
        assert_eq!(
            parse_condition("id=7").unwrap(),
            ("id".to_string(), "7".to_string())
        );
        assert_eq!(
            parse_condition("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_condition("=7").is_err());
        assert!(parse_condition("id").is_err());
    }

    #[test]
    fn test_missing_input_fails_validation() {
        let args = Args::try_parse_from(["flavored-csv", "show", "/no/such/file.csv"]).unwrap();

        assert!(matches!(args.validate(), Err(Error::Configuration { .. })));
    }
}
