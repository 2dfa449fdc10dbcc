//! tgrid CLI - Reconstruct and inspect spanning HTML tables

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use tablegrid::{
    classify_title,
    diagnostics::{check_fragment, format_diagnostics, Diagnostic},
    normalize_fragment,
    render::{render_json, render_text, render_tsv},
    search_rows, GridOptions, RowQuery, Table, TableError,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tgrid")]
#[command(version)]
#[command(about = "tgrid - Reconstruct dense grids from spanning HTML tables", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// TOML file with grid options (decode_entities, collapse_whitespace)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Keep cell text verbatim (no entity decoding, no whitespace collapsing)
    #[arg(long, global = true)]
    verbatim: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print the reconstructed grid (default: linked rows as aligned text)
    Grid {
        /// Input file path (reads from stdin if not provided)
        input: Option<String>,

        /// Print the raw rows instead of the linked rows
        #[arg(long)]
        raw: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the normalized table markup
    Normalize {
        /// Input file path
        input: Option<String>,
    },

    /// Check a table for markup defects
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print rows containing keywords
    Search {
        /// Input file path
        input: Option<String>,

        /// Keywords that must all occur
        #[arg(long = "all", value_delimiter = ',')]
        all: Vec<String>,

        /// Keywords of which at least one must occur
        #[arg(long = "any", value_delimiter = ',')]
        any: Vec<String>,

        /// Keywords that must not occur
        #[arg(long = "none", value_delimiter = ',')]
        none: Vec<String>,
    },

    /// Classify statement titles
    Classify {
        /// Titles to classify
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Aligned columns; `^` marks a link, `<` a continuation
    Text,
    /// Tab-separated values, placeholders resolved to their owner's text
    Tsv,
    /// JSON document
    Json,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let options = load_options(cli.config.as_deref(), cli.verbatim)?;
    handle_subcommand(cli.command, &options)
}

#[cfg(feature = "cli")]
fn init_logger(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

/// Options from the config file, with flags taking precedence
#[cfg(feature = "cli")]
fn load_options(config: Option<&str>, verbatim: bool) -> io::Result<GridOptions> {
    if verbatim {
        return Ok(GridOptions::verbatim());
    }

    match config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let options = GridOptions::from_toml_str(&content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            log::debug!("loaded grid options from {}: {:?}", path, options);
            Ok(options)
        }
        None => Ok(GridOptions::default()),
    }
}

#[cfg(feature = "cli")]
fn read_input(input: Option<&str>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Report a table error on stderr and exit with status 1
#[cfg(feature = "cli")]
fn fail(err: &TableError) -> ! {
    eprintln!("{}", Diagnostic::from(err));
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn read_table(input: Option<&str>, options: &GridOptions, link: bool) -> io::Result<Table> {
    let content = read_input(input)?;
    let result = if link {
        Table::read_linked(&content, options)
    } else {
        Table::read_with_options(&content, options)
    };
    Ok(result.unwrap_or_else(|err| fail(&err)))
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands, options: &GridOptions) -> io::Result<()> {
    match cmd {
        Commands::Grid {
            input,
            raw,
            format,
            output,
        } => {
            let table = read_table(input.as_deref(), options, !raw)?;
            let linked = !raw;

            let result = match format {
                Format::Text => render_text(&table, linked),
                Format::Tsv => render_tsv(&table, linked),
                Format::Json => render_json(&table, linked)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?,
            };

            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)?;
                    write!(file, "{}", result)?;
                    eprintln!("✓ Output written to: {}", path);
                }
                None => {
                    print!("{}", result);
                }
            }
        }

        Commands::Normalize { input } => {
            let content = read_input(input.as_deref())?;
            let normalized = normalize_fragment(&content).unwrap_or_else(|err| fail(&err));
            println!("{}", normalized);
        }

        Commands::Check { input, no_color } => {
            let content = read_input(input.as_deref())?;
            let result = check_fragment(&content, options);
            let output = format_diagnostics(&result, !no_color);
            println!("{}", output);

            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Search {
            input,
            all,
            any,
            none,
        } => {
            let table = read_table(input.as_deref(), options, true)?;
            let query = RowQuery::new().all_of(all).any_of(any).none_of(none);
            let outcome = search_rows(&table, &query);

            for diag in &outcome.diagnostics {
                log::info!("{}", diag);
            }
            for hit in &outcome.matches {
                println!("{}\t{}", hit.row, hit.cells.join("\t"));
            }
        }

        Commands::Classify { titles } => {
            for title in titles {
                println!("{}\t{}", classify_title(&title), title);
            }
        }

        Commands::Info => {
            println!("tgrid - Reconstruct dense grids from spanning HTML tables");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ rowspan/colspan grid reconstruction");
            println!("  ✓ Raw HTML and normalized span attributes");
            println!("  ✓ Markup diagnostics");
            println!("  ✓ Keyword row search");
            println!("  ✓ Statement title classification");
            println!("  ✓ Text, TSV and JSON output");
            println!();
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tablegrid --features cli");
    eprintln!("  tgrid <COMMAND> [INPUT_FILE]");
}
