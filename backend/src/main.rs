//! Sheetload CLI - import SKU listing sheets as validated records
//!
//! # Commands
//!
//! ```bash
//! sheetload import listings.xlsx          # Validated records as JSON
//! sheetload check listings.csv            # Report every invalid cell
//! sheetload parse listings.xlsx           # Raw rows as JSON (debug)
//! sheetload columns                       # Expected columns
//! ```

use clap::{Args, Parser, Subcommand};
use sheetload::config::parse_delimiter;
use sheetload::logs::set_quiet;
use sheetload::pipeline::format_delimiter;
use sheetload::{
    check_rows, columns, import_sheet, read_sheet_file, ImportOptions, DATE_PATTERN_HUMAN,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetload")]
#[command(about = "Import SKU sales-channel settings from xlsx/CSV sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a sheet and output validated records as JSON (all or nothing)
    Import {
        #[command(flatten)]
        read: ReadArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Report every invalid cell of every row, without importing
    Check {
        #[command(flatten)]
        read: ReadArgs,
    },

    /// Read a sheet and output the raw rows as JSON
    Parse {
        #[command(flatten)]
        read: ReadArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the expected columns and date pattern
    Columns,
}

#[derive(Args)]
struct ReadArgs {
    /// Input sheet (.xlsx, .xlsm, .xlsb, .xls, .ods or CSV)
    input: PathBuf,

    /// Worksheet to read (default: Sheet1, or SHEETLOAD_SHEET)
    #[arg(short, long)]
    sheet: Option<String>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long, value_parser = delimiter_arg)]
    delimiter: Option<char>,

    /// Don't log progress to stderr
    #[arg(short, long)]
    quiet: bool,
}

impl ReadArgs {
    /// Environment options with command-line flags on top.
    fn options(&self) -> ImportOptions {
        let mut options = ImportOptions::from_env();
        if let Some(ref sheet) = self.sheet {
            options.sheet_name = sheet.clone();
        }
        if self.delimiter.is_some() {
            options.delimiter = self.delimiter;
        }
        options.quiet |= self.quiet;
        options
    }
}

fn delimiter_arg(value: &str) -> Result<char, String> {
    parse_delimiter(value).ok_or_else(|| format!("'{}' is not a single character", value))
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { read, output, compact } => {
            cmd_import(&read, output.as_deref(), compact)
        }
        Commands::Check { read } => cmd_check(&read),
        Commands::Parse { read, output } => cmd_parse(&read, output.as_deref()),
        Commands::Columns => cmd_columns(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_import(
    read: &ReadArgs,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = read.options();
    set_quiet(options.quiet);

    let sheet = read_sheet_file(&read.input, &options)?;
    let result = import_sheet(sheet)?;

    let json = if compact || !options.pretty {
        serde_json::to_string(&result.records)?
    } else {
        serde_json::to_string_pretty(&result.records)?
    };
    write_output(&json, output, options.quiet)?;

    Ok(())
}

fn cmd_check(read: &ReadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = read.options();
    set_quiet(options.quiet);

    if !options.quiet {
        eprintln!("✔️  Checking: {}", read.input.display());
    }
    let sheet = read_sheet_file(&read.input, &options)?;
    let report = check_rows(&sheet.rows)?;

    for failure in &report.failures {
        eprintln!("\n❌ Row {}:", failure.row);
        for err in &failure.errors {
            eprintln!("   - {}", err);
        }
    }

    eprintln!(
        "\n📊 Results: {} rows, {} invalid, {} errors",
        report.rows,
        report.failures.len(),
        report.error_count()
    );

    if !report.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_parse(read: &ReadArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = read.options();
    set_quiet(options.quiet);

    let sheet = read_sheet_file(&read.input, &options)?;
    if !options.quiet {
        eprintln!("📄 Parsed: {}", read.input.display());
        if let Some(ref encoding) = sheet.source.encoding {
            eprintln!("   Encoding: {}", encoding);
        }
        if let Some(delimiter) = sheet.source.delimiter {
            eprintln!("   Delimiter: '{}'", format_delimiter(delimiter));
        }
        if let Some(ref name) = sheet.source.sheet {
            eprintln!("   Sheet: {}", name);
        }
        eprintln!("   Columns: {}", sheet.headers.join(", "));
        eprintln!("✅ {} rows", sheet.rows.len());
    }

    let json = serde_json::to_string_pretty(&sheet.to_values())?;
    write_output(&json, output, options.quiet)?;
    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    println!("Required columns:");
    for col in columns::REQUIRED {
        println!("  {}", col);
    }
    println!("Optional columns:");
    for col in columns::OPTIONAL {
        println!("  {} ({})", col, DATE_PATTERN_HUMAN);
    }
    Ok(())
}

fn write_output(
    content: &str,
    path: Option<&Path>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            if !quiet {
                eprintln!("💾 Output written to: {}", p.display());
            }
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
