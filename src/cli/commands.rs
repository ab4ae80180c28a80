//! Command implementations for the flavored-csv CLI
//!
//! Each command streams rows from its input through a [`RowReader`], so
//! files are never loaded whole.

use crate::cli::args::{Args, Commands, ConvertArgs, ShowArgs, ValidateArgs};
use crate::config::Config;
use crate::io::{RowReader, RowWriter};
use crate::row::filter::{cell_equals, cell_non_empty, min_cells};
use crate::row::{HeaderRow, Row, RowIteratorExt, RowPredicate};
use crate::schema::ConstraintViolation;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What a command did, for the exit status and summary line
#[derive(Debug, Clone, Default)]
pub struct CommandSummary {
    /// Data rows read from the input
    pub rows_read: usize,
    /// Rows printed or written
    pub rows_emitted: usize,
    /// Constraint violations found
    pub violations: usize,
    pub elapsed: Duration,
}

impl CommandSummary {
    pub fn is_success(&self) -> bool {
        self.violations == 0
    }
}

/// Violations found in one data row
#[derive(Debug, Serialize)]
struct RowViolations {
    row: usize,
    violations: Vec<ConstraintViolation>,
}

/// Run the selected command
pub fn run(args: Args) -> Result<CommandSummary> {
    let start_time = Instant::now();

    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let mut summary = match &args.command {
        Some(Commands::Show(show)) => run_show(show)?,
        Some(Commands::Validate(validate)) => run_validate(validate, args.quiet)?,
        Some(Commands::Convert(convert)) => run_convert(convert)?,
        None => CommandSummary::default(),
    };

    summary.elapsed = start_time.elapsed();
    info!(
        "Read {} row(s), emitted {} in {:.2?}",
        summary.rows_read, summary.rows_emitted, summary.elapsed
    );

    Ok(summary)
}

/// Set up structured logging to stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flavored_csv={}", log_level)));

    // A subscriber may already be installed when commands run in-process
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    match installed {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing subscriber: {}", e),
    }
}

fn show_predicates(args: &ShowArgs) -> Vec<RowPredicate> {
    let mut predicates = Vec::new();

    if let Some(count) = args.min_cells {
        predicates.push(min_cells(count));
    }
    if args.non_empty_first {
        predicates.push(cell_non_empty(0));
    }
    for (column, value) in &args.conditions {
        predicates.push(cell_equals(column.as_str(), value.as_str()));
    }

    predicates
}

fn run_show(args: &ShowArgs) -> Result<CommandSummary> {
    let flavor = args.dialect.flavor();
    let reader = RowReader::from_path(&args.input, flavor.clone())
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let mut writer = if args.json {
        None
    } else {
        let mut writer = RowWriter::new(io::stdout().lock(), flavor)?;
        if let Some(header) = reader.header() {
            writer.write_header(header)?;
        }
        Some(writer)
    };

    let predicates = show_predicates(args);
    debug!("Filtering with {} predicate(s)", predicates.len());

    let mut rows_read = 0;
    let mut rows_emitted = 0;
    let mut read_error = None;
    let rows = reader
        .map_while(|result| result.map_err(|e| read_error = Some(e)).ok())
        .inspect(|_| rows_read += 1);

    for row in rows
        .filter_rows(predicates)
        .take(args.limit.unwrap_or(usize::MAX))
    {
        match writer.as_mut() {
            Some(writer) => writer.write_row(&row)?,
            None => {
                let line = serde_json::to_string(&row).context("Failed to serialize row")?;
                println!("{}", line);
            }
        }
        rows_emitted += 1;
    }

    if let Some(e) = read_error {
        return Err(e).with_context(|| format!("Failed to read {}", args.input.display()));
    }
    if let Some(mut writer) = writer {
        writer.flush()?;
    }

    Ok(CommandSummary {
        rows_read,
        rows_emitted,
        ..CommandSummary::default()
    })
}

fn run_validate(args: &ValidateArgs, quiet: bool) -> Result<CommandSummary> {
    let config = Config::from_file(&args.descriptor)
        .with_context(|| format!("Failed to load descriptor {}", args.descriptor.display()))?;
    let schema = config.schema()?;
    let converter = config.converter()?;
    let flavor = config.flavor();

    info!(
        "Validating {} against {} column(s) ({} dialect)",
        args.input.display(),
        schema.len(),
        config.preset
    );

    let reader = RowReader::from_path(&args.input, flavor.clone())
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    // Without a header row the declared fields name the columns in order
    let declared_header = match reader.header() {
        Some(_) => None,
        None => Some(Arc::new(HeaderRow::with_flavor(
            config.field_names(),
            Arc::new(flavor),
        ))),
    };
    if let Some(header) = reader.header() {
        for field in config.field_names() {
            if header.position_of(field).is_none() {
                warn!("Declared field '{}' is not in the header", field);
            }
        }
    }

    let max_violations = args.max_violations.unwrap_or(usize::MAX);
    let mut summary = CommandSummary::default();
    let mut failed_rows = Vec::new();

    for (index, result) in reader.enumerate() {
        let mut row: Row = result.with_context(|| format!("Failed to read data row {}", index + 1))?;
        if let Some(header) = &declared_header {
            row.attach_header(Arc::clone(header));
        }
        summary.rows_read += 1;

        let report = schema.validate_row(&row, &converter);
        if report.is_valid() {
            continue;
        }

        summary.violations += report.len();
        failed_rows.push(RowViolations {
            row: index + 1,
            violations: report.into_iter().collect(),
        });

        if summary.violations >= max_violations {
            warn!("Stopping after {} violation(s)", summary.violations);
            break;
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&failed_rows).context("Failed to serialize report")?;
        println!("{}", json);
    } else if !quiet {
        print_report(&failed_rows, &summary);
    }

    Ok(summary)
}

fn print_report(failed_rows: &[RowViolations], summary: &CommandSummary) {
    for failed in failed_rows {
        for violation in &failed.violations {
            println!(
                "{} {} {}: {}",
                format!("row {}", failed.row).bold(),
                format!("[{}]", violation.column).cyan(),
                violation.constraint.yellow(),
                violation.message
            );
        }
    }

    if summary.is_success() {
        println!(
            "{} {} row(s) valid",
            "✓".green().bold(),
            summary.rows_read
        );
    } else {
        println!(
            "{} {} violation(s) in {} of {} row(s)",
            "✗".red().bold(),
            summary.violations,
            failed_rows.len(),
            summary.rows_read
        );
    }
}

fn run_convert(args: &ConvertArgs) -> Result<CommandSummary> {
    let source = args.source_flavor();
    let target = args.target_flavor();
    debug!("Converting {} -> {}", args.from, args.to);

    let reader = RowReader::from_path(&args.input, source)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = RowWriter::new(sink, target)?;

    if let Some(header) = reader.header() {
        writer.write_header(header)?;
    }

    let mut summary = CommandSummary::default();
    for result in reader {
        let row = result.with_context(|| format!("Failed to read {}", args.input.display()))?;
        summary.rows_read += 1;
        writer.write_row(&row)?;
        summary.rows_emitted += 1;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Wrote {} row(s) to {}", summary.rows_emitted, path.display());
    }

    Ok(summary)
}
