//! `mdproc` - converts inline markdown documents to HTML.

mod config;
mod error;

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use mdproc_core::{HtmlOptions, markdown_to_html_with_options};
use tracing_subscriber::EnvFilter;

use config::{CliSettings, Config, is_stdio};
use error::CliError;

#[derive(Parser)]
#[command(name = "mdproc", version, about = "Convert inline markdown to HTML")]
struct Cli {
    /// Markdown input file (`-` reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// HTML output file (`-` writes stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to ./mdproc.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Convert paragraphs in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable info-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = CliSettings {
        input: cli.input,
        output: cli.output,
        parallel: cli.parallel.then_some(true),
    };
    let working_dir = env::current_dir()?;
    let config = Config::load(cli.config.as_deref(), &working_dir, &settings)?;

    let source = read_input(&config.input)?;
    let options = HtmlOptions {
        parallel: config.parallel,
    };
    let html = markdown_to_html_with_options(&source, &options);
    write_output(&config.output, &html)?;

    tracing::info!(
        input = %config.input.display(),
        output = %config.output.display(),
        bytes = html.len(),
        "Converted document"
    );
    Ok(())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let read = || -> io::Result<String> {
        if is_stdio(path) {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            fs::read_to_string(path)
        }
    };
    read().map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, html: &str) -> Result<(), CliError> {
    let write = || -> io::Result<()> {
        if is_stdio(path) {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()
        } else {
            fs::write(path, html)
        }
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
