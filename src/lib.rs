//! statictron renders a directory tree of templated sources into a static
//! site. Directory and file names can loop over scope collections and
//! substitute scope values, files pass through a configurable chain of
//! transforms, and emitted assets can be renamed by content hash.

/// Command-line interface module
pub mod cli;

/// Build configuration files (statictron.json, statictron.yml, statictron.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Filename directives: `[item of items]` loops and `[variable]` substitution
pub mod expand;

/// Content hashing of emitted assets and reference rewriting
pub mod hash;

/// File and directory ignore patterns
pub mod ignore;

/// Logger initialisation for the binary
pub mod logger;

/// Build options and progress reporting
pub mod options;

/// Build orchestration: validation, staging, walking, hashing, publishing
pub mod processor;

/// Build-time scope
pub mod scope;

/// Transforms and the transform chain
pub mod transform;

/// Recursive tree walker
pub mod walker;

pub use error::{Error, Result};
pub use options::{Phase, RenderOptions};
pub use processor::{build, BuildReport};
pub use scope::Scope;
pub use transform::{Transform, TransformChain, TransformResult};
