//! Build orchestration.
//! Validates the roots, renders the source tree, optionally hashes assets
//! and publishes the result.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    hash::{hash_assets, HashLookup},
    ignore::IgnoreFilter,
    options::RenderOptions,
    walker::TreeWalker,
};

/// What a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_root: PathBuf,
    /// Asset renames, empty unless asset hashing was enabled
    pub hashed: HashLookup,
}

/// Resolves the source root and makes sure it is a directory.
///
/// # Errors
/// * `Error::Read` if the source root does not exist
/// * `Error::ConfigError` if it is not a directory
pub fn resolve_source_root<P: AsRef<Path>>(source_root: P) -> Result<PathBuf> {
    let source_root = source_root.as_ref();
    let resolved = source_root
        .canonicalize()
        .map_err(|e| Error::read(source_root, e))?;
    if !resolved.is_dir() {
        return Err(Error::ConfigError(format!(
            "source '{}' is not a directory",
            source_root.display()
        )));
    }
    Ok(resolved)
}

/// Resolves the output root to an absolute path that does not contain the sources.
///
/// # Errors
/// * `Error::ConfigError` if the output root is, or contains, the source root
pub fn resolve_output_root<P: AsRef<Path>>(output_root: P, source_root: &Path) -> Result<PathBuf> {
    let output_root = output_root.as_ref();
    let mut resolved = std::path::absolute(output_root)?;
    if let (Some(parent), Some(name)) = (resolved.parent(), resolved.file_name()) {
        if let Ok(parent) = parent.canonicalize() {
            resolved = parent.join(name);
        }
    }

    if source_root.starts_with(&resolved) {
        return Err(Error::ConfigError(format!(
            "output '{}' must not contain the source directory",
            output_root.display()
        )));
    }
    Ok(resolved)
}

/// Sibling directory a clean build renders into before it is published.
pub fn staging_dir(output_root: &Path) -> PathBuf {
    let name = output_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_root.with_file_name(format!(".{name}.staging"))
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::write(dir, e)),
    }
}

/// Replaces `output_root` with the finished `staging` directory.
fn publish(staging: &Path, output_root: &Path) -> Result<()> {
    remove_dir_if_exists(output_root)?;
    fs::rename(staging, output_root).map_err(|e| Error::write(output_root, e))
}

/// Runs one build.
///
/// # Flow
/// 1. Resolves and validates the source and output roots
/// 2. Compiles the ignore patterns (defaults, ignore file, caller's patterns)
/// 3. Renders the tree, into a staging directory when `clean` is set,
///    otherwise straight into the output root
/// 4. Hashes assets when `hash_assets` is set
/// 5. Swaps the staging directory into place
///
/// A failed clean build removes its staging directory and leaves the
/// previous output untouched.
pub fn build(options: &RenderOptions) -> Result<BuildReport> {
    let source_root = resolve_source_root(&options.source_root)?;
    let output_root = resolve_output_root(&options.output_root, &source_root)?;
    let ignore = IgnoreFilter::for_source(&source_root, &options.ignore)?;

    let staging = options.clean.then(|| staging_dir(&output_root));
    let build_root = staging.clone().unwrap_or_else(|| output_root.clone());
    if let Some(staging) = &staging {
        remove_dir_if_exists(staging)?;
    }
    fs::create_dir_all(&build_root).map_err(|e| Error::write(&build_root, e))?;

    info!(
        "Building {} into {}",
        source_root.display(),
        output_root.display()
    );

    let walker = TreeWalker::new(ignore)
        .skipping([output_root.clone()].into_iter().chain(staging.clone()));
    let build_options = RenderOptions {
        source_root: source_root.clone(),
        output_root: build_root.clone(),
        ..options.clone()
    };

    let result = walker
        .render(&source_root, &build_root, &build_options)
        .and_then(|()| {
            if options.hash_assets {
                hash_assets(&build_root)
            } else {
                Ok(HashLookup::default())
            }
        });

    let hashed = match result {
        Ok(hashed) => hashed,
        Err(e) => {
            if let Some(staging) = &staging {
                if let Err(cleanup) = remove_dir_if_exists(staging) {
                    warn!("Could not remove {}: {}", staging.display(), cleanup);
                }
            }
            return Err(e);
        }
    };

    if let Some(staging) = &staging {
        debug!("Publishing {} to {}", staging.display(), output_root.display());
        publish(staging, &output_root)?;
    }

    info!("Build completed in {}", output_root.display());
    Ok(BuildReport {
        output_root,
        hashed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_dir_is_a_hidden_sibling() {
        assert_eq!(
            staging_dir(Path::new("/site/dist")),
            PathBuf::from("/site/.dist.staging")
        );
    }
}
