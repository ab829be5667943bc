//! statictron's main application entry point.
//! Parses arguments, merges them with the configuration file and runs one build.

use statictron::{
    cli::{get_args, Args},
    config::BuildConfig,
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::build,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the configuration file, if any
/// 2. Merges it with the command line into build options
/// 3. Builds, printing progress for every directory and transform
fn run(args: Args) -> Result<()> {
    let options = BuildConfig::discover(&args)?
        .into_options(&args)?
        .with_logger(|phase, message| println!("{phase} {message}"));

    let report = build(&options)?;

    if !report.hashed.is_empty() {
        println!("hashed {} assets", report.hashed.len());
    }
    println!("Build completed successfully in {}.", report.output_root.display());
    Ok(())
}
