use clap::Parser;
use colored::*;
use flavored_csv::cli::{args::Args, commands};
use std::process;

/// Exit status when the input was read but failed validation
const EXIT_VIOLATIONS: i32 = 2;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(summary) if summary.is_success() => process::exit(0),
        Ok(_) => process::exit(EXIT_VIOLATIONS),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("flavored-csv - CSV dialects, typed values and column schemas");
    println!("=============================================================");
    println!();
    println!("USAGE:");
    println!("    flavored-csv <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    show        Print the rows of a file, optionally filtered");
    println!("    validate    Validate a file against a JSON descriptor");
    println!("    convert     Rewrite a file from one dialect into another");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("PRESETS:");
    println!("    excel, excel-tab, unix, unix-tab");
    println!();
    println!("EXAMPLES:");
    println!("    # Show rows with at least two cells and a non-empty first cell:");
    println!("    flavored-csv show people.csv --min-cells 2 --non-empty-first");
    println!();
    println!("    # Validate against a descriptor, exit status 2 on violations:");
    println!("    flavored-csv validate people.csv --descriptor people.json");
    println!();
    println!("    # Convert an Excel CSV to tab-separated Unix style:");
    println!("    flavored-csv convert people.csv --to unix-tab -o people.tsv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    flavored-csv <COMMAND> --help");
}
