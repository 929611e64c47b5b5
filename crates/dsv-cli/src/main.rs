//! DSV Table CLI
//!
//! Command-line tool for viewing and exporting delimiter-separated tables.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dsv_core::{tokenize, ParseOptions, Table};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dsv-cli")]
#[command(about = "Delimiter-separated table viewer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: OptionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Parse options shared by every command; flags override the config file
#[derive(Args)]
struct OptionArgs {
    /// JSON file with parse options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field separator (one character)
    #[arg(short, long, global = true)]
    separator: Option<String>,

    /// Quote character (one character)
    #[arg(short, long, global = true)]
    quote: Option<String>,

    /// Line terminator; accepts \n, \r, \t and \\ escapes
    #[arg(long, global = true)]
    line_terminator: Option<String>,

    /// Treat the first row as data and name columns col_0, col_1, ...
    #[arg(long, global = true)]
    no_header: bool,

    /// Keep lines starting with '#'
    #[arg(long, global = true)]
    keep_comments: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and display it
    Show {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Columns to display (comma-separated)
        #[arg(short, long)]
        columns: Option<String>,
    },

    /// Parse a file and export it as JSON
    Export {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Output shape
        #[arg(long, value_enum, default_value_t = ExportFormat::Records)]
        format: ExportFormat,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a single line into fields
    Tokenize {
        /// The line to split
        #[arg(long)]
        line: String,
    },

    /// Write the effective parse options as a JSON template
    CreateConfig {
        /// Output path for the options file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Header row followed by data rows
    Matrix,
    /// One object per row keyed by header name
    Records,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> dsv_core::Result<()> {
    let cli = Cli::parse();
    let options = resolve_options(&cli.options)?;

    match cli.command {
        Commands::Show {
            file,
            limit,
            columns,
        } => cmd_show(&options, &file, limit, columns),
        Commands::Export {
            file,
            format,
            output,
        } => cmd_export(&options, &file, format, output.as_deref()),
        Commands::Tokenize { line } => cmd_tokenize(&options, &line),
        Commands::CreateConfig { output } => cmd_create_config(&options, &output),
    }
}

fn resolve_options(args: &OptionArgs) -> dsv_core::Result<ParseOptions> {
    let mut options = match &args.config {
        Some(path) => ParseOptions::load(path)?,
        None => ParseOptions::default(),
    };

    if let Some(separator) = &args.separator {
        options = options.with_separator(unescape(separator));
    }
    if let Some(quote) = &args.quote {
        options = options.with_quote(unescape(quote));
    }
    if let Some(terminator) = &args.line_terminator {
        options = options.with_line_terminator(unescape(terminator));
    }
    if args.no_header {
        options = options.with_header(false);
    }
    if args.keep_comments {
        options = options.with_skip_comments(false);
    }

    Ok(options)
}

fn parse_file(options: &ParseOptions, file: &Path) -> dsv_core::Result<Table> {
    dsv_core::Parser::new(options)?.parse_file(file)
}

fn cmd_show(
    options: &ParseOptions,
    file: &Path,
    limit: Option<usize>,
    columns: Option<String>,
) -> dsv_core::Result<()> {
    let table = parse_file(options, file)?;

    // Filter columns if specified
    let col_filter: Option<Vec<&str>> = columns.as_ref().map(|c| c.split(',').collect());

    let display_cols: Vec<usize> = match &col_filter {
        Some(filter) => (0..table.column_count())
            .filter(|&i| filter.contains(&table.header()[i].as_str()))
            .collect(),
        None => (0..table.column_count()).collect(),
    };

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    // Print header
    let header: Vec<&str> = display_cols
        .iter()
        .map(|&i| table.header()[i].as_str())
        .collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    // Print rows
    let row_limit = limit.unwrap_or(table.row_count());
    for row in table.rows().iter().take(row_limit) {
        let values: Vec<&str> = display_cols.iter().map(|&i| row[i].as_str()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > row_limit {
        println!("... ({} more rows)", table.row_count() - row_limit);
    }

    Ok(())
}

fn cmd_export(
    options: &ParseOptions,
    file: &Path,
    format: ExportFormat,
    output: Option<&Path>,
) -> dsv_core::Result<()> {
    let table = parse_file(options, file)?;

    let json = match format {
        ExportFormat::Matrix => serde_json::to_string_pretty(&table.matrix())?,
        ExportFormat::Records => serde_json::to_string_pretty(&table.records())?,
    };

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{}", json)?;
            writer.flush()?;
            println!("Exported {} rows to {}", table.row_count(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writeln!(writer, "{}", json)?;
        }
    }

    Ok(())
}

fn cmd_tokenize(options: &ParseOptions, line: &str) -> dsv_core::Result<()> {
    let dialect = options.validate()?;
    let fields = tokenize(line, dialect.separator(), dialect.quote());

    println!("Fields: {}", fields.len());
    for (i, field) in fields.iter().enumerate() {
        println!("  {}: {:?}", i, field);
    }

    Ok(())
}

fn cmd_create_config(options: &ParseOptions, output: &Path) -> dsv_core::Result<()> {
    options.validate()?;
    options.save(output)?;

    println!("Created options file: {}", output.display());
    println!();
    println!("Edit the file to adjust the dialect, then run:");
    println!("  dsv-cli --config {} show --file <path>", output.display());

    Ok(())
}

/// Expand `\n`, `\r`, `\t` and `\\` escapes typed on the command line
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
