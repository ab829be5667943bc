//! Command-line interface implementation for statictron.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for statictron.
#[derive(Parser, Debug)]
#[command(author, version, about = "statictron: render a templated directory into a static site", long_about = None)]
pub struct Args {
    /// Source directory to render
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory to save the generated files to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Glob pattern of source paths to skip (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Scope variable passed to filenames and templates (repeatable)
    #[arg(short, long = "scope", value_name = "KEY=VALUE", value_parser = parse_scope_pair)]
    pub scope: Vec<(String, String)>,

    /// Built-in transform to run, in chain order (repeatable).
    /// ejs: render *.ejs pages; css: bundle index.css and drop other stylesheets
    #[arg(
        short = 't',
        long = "transform",
        visible_alias = "loader",
        short_alias = 'l',
        value_name = "NAME"
    )]
    pub transforms: Vec<String>,

    /// Keep existing files in the output directory
    #[arg(long)]
    pub no_clean: bool,

    /// Rename assets by content hash and rewrite references to them
    #[arg(long)]
    pub hash: bool,

    /// Build configuration file (defaults to statictron.json/.yml/.yaml in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Splits `key=value` at the first `=`.
pub fn parse_scope_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid scope '{s}', expected KEY=VALUE")),
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}
