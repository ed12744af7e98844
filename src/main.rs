//! cbz2epub - merge CBZ archives and convert them to EPUB

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::LevelFilter;

use cbz2epub::{ConversionMode, ConverterConfig};

#[derive(Parser, Debug)]
#[command(name = "cbz2epub")]
#[command(version, about = "A tool for merging CBZ files and converting them to EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    cbz2epub --merge [--output merged.cbz] file1.cbz file2.cbz ...
    cbz2epub --convert [--output book.epub] file.cbz
    cbz2epub --convert --recursive [directory]")]
struct Cli {
    /// Merge multiple CBZ files into one
    #[arg(long, conflicts_with = "convert")]
    merge: bool,

    /// Convert CBZ files to EPUB
    #[arg(long)]
    convert: bool,

    /// Output file name
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Input CBZ files (or directories with --recursive)
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // Also installs the `log` bridge, which is what the library logs through
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = match (cli.merge, cli.convert) {
        (true, _) => ConversionMode::Merge,
        (false, true) => ConversionMode::Convert,
        (false, false) => {
            // Nothing to do: show usage
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let mut builder = ConverterConfig::builder();
    builder
        .mode(mode)
        .inputs(cli.inputs)
        .recursive(cli.recursive);
    if let Some(output) = cli.output {
        builder.output_path(output);
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            let _ = Cli::command().print_help();
            return ExitCode::FAILURE;
        }
    };

    match config.run().await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("Error: {}: {}", failure.path.display(), failure.message);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
