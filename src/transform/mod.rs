//! Pluggable file transforms and the chain that runs them.
//!
//! A transform looks at a source file and its candidate target path and
//! either declines, handles the file completely, or produces new files.
//! Produced files are offered again to the rest of the chain, skipping the
//! transform that produced them, so a rendered page can be post-processed
//! by a later link. A transform must change something about its output
//! (usually the extension) so that no other link hands it straight back.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::options::{Phase, RenderOptions};

pub mod stylesheet;
pub mod template;

pub use stylesheet::StylesheetTransform;
pub use template::TemplateTransform;

/// Outcome of offering one file to one transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformResult {
    /// Not handled, try the next transform
    NotApplied,
    /// Handled, no default copy and nothing further to process
    AppliedTerminal,
    /// Handled and wrote these files, which are offered to the remaining transforms
    AppliedProducing(Vec<PathBuf>),
}

/// A build step that may rewrite or replace a file.
pub trait Transform: Send + Sync {
    /// Name shown in progress messages.
    fn name(&self) -> &str {
        "custom"
    }

    /// Offers `source` to the transform.
    ///
    /// # Arguments
    /// * `source` - Absolute path of the file to process
    /// * `target` - Absolute candidate output path, with directives already expanded
    /// * `options` - Build options, including the scope for this part of the tree
    fn apply(&self, source: &Path, target: &Path, options: &RenderOptions)
        -> Result<TransformResult>;
}

impl<F> Transform for F
where
    F: Fn(&Path, &Path, &RenderOptions) -> Result<TransformResult> + Send + Sync,
{
    fn apply(
        &self,
        source: &Path,
        target: &Path,
        options: &RenderOptions,
    ) -> Result<TransformResult> {
        self(source, target, options)
    }
}

/// Names accepted by [`by_name`].
pub const BUILTIN_TRANSFORMS: [&str; 2] = ["ejs", "css"];

/// Looks up a built-in transform.
///
/// # Errors
/// * `Error::UnknownTransform` for any name not in [`BUILTIN_TRANSFORMS`]
pub fn by_name(name: &str) -> Result<Arc<dyn Transform>> {
    match name {
        "ejs" => Ok(Arc::new(TemplateTransform::new())),
        "css" => Ok(Arc::new(StylesheetTransform::new())),
        other => Err(Error::UnknownTransform(other.to_string())),
    }
}

/// Ordered list of transforms.
#[derive(Clone, Default)]
pub struct TransformChain {
    transforms: Arc<Vec<Arc<dyn Transform>>>,
}

struct Pending {
    source: PathBuf,
    target: PathBuf,
    excluding: Option<usize>,
}

impl TransformChain {
    pub fn new(transforms: Vec<Arc<dyn Transform>>) -> Self {
        Self {
            transforms: Arc::new(transforms),
        }
    }

    /// Builds a chain of built-in transforms, in the given order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let transforms = names
            .iter()
            .map(|name| by_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(transforms))
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Runs `source` through the chain.
    ///
    /// Each file is offered to the transforms in order until one applies.
    /// Files produced by that transform are queued and offered to every
    /// other transform in the chain. The queue is drained before returning.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether any transform applied. `false` means the
    ///   caller should fall back to a verbatim copy.
    pub fn run(&self, source: &Path, target: &Path, options: &RenderOptions) -> Result<bool> {
        let mut queue = VecDeque::from([Pending {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            excluding: None,
        }]);
        let mut applied = false;

        while let Some(pending) = queue.pop_front() {
            for (index, transform) in self.transforms.iter().enumerate() {
                if pending.excluding == Some(index) {
                    continue;
                }

                let result = transform.apply(&pending.source, &pending.target, options)?;
                if result == TransformResult::NotApplied {
                    continue;
                }

                applied = true;
                options.log(
                    Phase::Rendering,
                    &format!(
                        "{}: {}",
                        transform.name(),
                        options.describe(&pending.source, &pending.target)
                    ),
                );
                if let TransformResult::AppliedProducing(paths) = result {
                    queue.extend(paths.into_iter().map(|path| Pending {
                        source: path.clone(),
                        target: path,
                        excluding: Some(index),
                    }));
                }
                break;
            }
        }

        Ok(applied)
    }
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|t| t.name()))
            .finish()
    }
}

/// Writes `content` to `path`, creating parent directories.
pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::write(path, e))
}
