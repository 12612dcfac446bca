//! regex-extractor CLI - extract a regex capture group from a table column
//!
//! Reads a JSON table document, applies the extraction, and writes the
//! resulting table. Exits non-zero with the error message on failure.

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use regex_extractor::{read_table, write_table, ExtractParams, Extractor, NdjsonWriter};

#[derive(Parser)]
#[command(name = "regex-extractor")]
#[command(version, about = "Extract a regex capture group from a table column", long_about = None)]
struct Cli {
    /// Input table document (JSON); reads stdin when omitted or "-"
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// YAML or JSON file holding column/expression/newcolumn
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Source column name
    #[arg(long, env = "REGEX_EXTRACTOR_COLUMN")]
    column: Option<String>,

    /// Regular expression with exactly one capture group
    #[arg(long, env = "REGEX_EXTRACTOR_EXPRESSION")]
    expression: Option<String>,

    /// Destination column name
    #[arg(long, env = "REGEX_EXTRACTOR_NEWCOLUMN")]
    newcolumn: Option<String>,

    /// Product name shown in error messages
    #[arg(long, env = "REGEX_EXTRACTOR_HOST_NAME", default_value = regex_extractor::DEFAULT_HOST_NAME)]
    host_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Table document, same shape as the input
    Json,
    /// One JSON object per row
    Ndjson,
}

fn main() {
    // Load environment variables before clap reads its env fallbacks
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let params = match &cli.params {
        Some(path) => ExtractParams::load_from_file(path)
            .map_err(|e| format!("Failed to load params {}: {}", path.display(), e))?,
        None => ExtractParams::default(),
    }
    .with_overrides(cli.column, cli.expression, cli.newcolumn);

    let reader: Box<dyn Read> = match &cli.input {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };
    let table = read_table(reader).map_err(|e| format!("Failed to read table: {}", e))?;

    tracing::debug!(
        "Loaded table with {} columns, extracting with {:?}",
        table.column_count(),
        params
    );

    let table = Extractor::new()
        .with_host_name(cli.host_name)
        .extract(&table, &params)
        .map_err(|e| e.to_string())?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        Format::Json => write_table(writer, &table),
        Format::Ndjson => {
            let mut ndjson = NdjsonWriter::new(writer);
            ndjson.write_table(&table).and_then(|_| ndjson.flush())
        }
    }
    .map_err(|e| format!("Failed to write table: {}", e))
}
