//! Error handling for statictron.
//! Defines the error type and result alias used throughout the build pipeline.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can abort a build.
///
/// Every variant is fatal: the build either materializes the whole output
/// tree or stops at the first error. A loop directive that resolves to
/// nothing is not an error and never reaches this type.
#[derive(Error, Debug)]
pub enum Error {
    /// A source file or directory could not be read
    #[error("Cannot read '{}': {source}.", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Something under the output root could not be written
    #[error("Cannot write '{}': {source}.", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Any other file system failure
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Invalid build configuration (paths, config file, CLI values)
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// A transform name that is not registered
    #[error("Configuration error: could not find transform named '{0}'.")]
    UnknownTransform(String),

    /// An ignore pattern that does not compile
    #[error("Ignore pattern error: {0}.")]
    IgnoreError(String),

    /// A `[variable]` in an entry name that has no usable value in scope
    #[error("Cannot expand '{entry}': '{variable}' is not a string or number in scope.")]
    UnresolvedVariable { entry: String, variable: String },

    /// A `[item of collection]` directive that cannot be iterated
    #[error("Cannot expand loop '{entry}': {reason}.")]
    InvalidLoop { entry: String, reason: String },

    /// Template rendering failed
    #[error("Template error: {0:#}")]
    MinijinjaError(#[from] minijinja::Error),

    /// A transform reported a failure of its own
    #[error("Transform '{transform}' failed on '{}': {message}.", path.display())]
    TransformError {
        transform: String,
        path: PathBuf,
        message: String,
    },
}

impl Error {
    pub fn read<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Read { path: path.as_ref().to_path_buf(), source }
    }

    pub fn write<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Write { path: path.as_ref().to_path_buf(), source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
