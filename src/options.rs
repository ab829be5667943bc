//! Options for a single build invocation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::scope::Scope;
use crate::transform::TransformChain;

/// Stage a progress message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A directory is being listed
    Exploring,
    /// A transform was applied to a file
    Rendering,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Exploring => write!(f, "exploring"),
            Phase::Rendering => write!(f, "rendering"),
        }
    }
}

/// Progress sink, called with a phase and a human readable message.
pub type Logger = Arc<dyn Fn(Phase, &str) + Send + Sync>;

/// Everything a build needs, passed down the tree walk.
///
/// Only the scope changes on the way down (at loop boundaries); every other
/// field is shared, so clones are cheap.
#[derive(Clone)]
pub struct RenderOptions {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub scope: Scope,
    pub ignore: Vec<String>,
    pub transforms: TransformChain,
    /// Remove the previous output before building
    pub clean: bool,
    /// Run the content hashing pass after rendering
    pub hash_assets: bool,
    pub logger: Option<Logger>,
}

impl RenderOptions {
    pub fn new<S: Into<PathBuf>, O: Into<PathBuf>>(source_root: S, output_root: O) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            scope: Scope::default(),
            ignore: Vec::new(),
            transforms: TransformChain::default(),
            clean: true,
            hash_assets: false,
            logger: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transforms(mut self, transforms: TransformChain) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_hash_assets(mut self, hash_assets: bool) -> Self {
        self.hash_assets = hash_assets;
        self
    }

    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(Phase, &str) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Sends a progress message to the logger sink and to `log::debug!`.
    pub fn log(&self, phase: Phase, message: &str) {
        log::debug!("{phase}: {message}");
        if let Some(logger) = &self.logger {
            logger(phase, message);
        }
    }

    /// Formats a `"source" => "target"` pair relative to the build roots.
    pub fn describe(&self, source: &Path, target: &Path) -> String {
        let source = source.strip_prefix(&self.source_root).unwrap_or(source);
        let target = target.strip_prefix(&self.output_root).unwrap_or(target);
        format!("\"{}\" => \"{}\"", source.display(), target.display())
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("source_root", &self.source_root)
            .field("output_root", &self.output_root)
            .field("scope", &self.scope)
            .field("ignore", &self.ignore)
            .field("transforms", &self.transforms)
            .field("clean", &self.clean)
            .field("hash_assets", &self.hash_assets)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
