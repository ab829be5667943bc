//! Recursive tree walk that drives a build.
//!
//! Each directory is listed, its entries filtered and expanded, and the
//! results either recursed into, handed to the transform chain, or copied
//! verbatim. Siblings are processed concurrently on the rayon pool; a
//! directory call only returns once everything beneath it has finished.

use log::debug;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::expand::{expand, Directive, Expansion};
use crate::ignore::IgnoreFilter;
use crate::options::{Phase, RenderOptions};

/// One listed directory entry.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Lists `dir`, sorted by name.
///
/// # Errors
/// * `Error::Read` if the directory or an entry cannot be read, or a name is not UTF-8
pub fn list_directory(dir: &Path) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::read(dir, e))? {
        let entry = entry.map_err(|e| Error::read(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().into_string().map_err(|_| {
            Error::read(
                &path,
                io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
            )
        })?;
        let is_dir = fs::metadata(&path).map_err(|e| Error::read(&path, e))?.is_dir();
        entries.push(DirectoryEntry { name, path, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Walks a source tree into a destination tree.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    ignore: IgnoreFilter,
    skip: Vec<PathBuf>,
}

impl TreeWalker {
    pub fn new(ignore: IgnoreFilter) -> Self {
        Self {
            ignore,
            skip: Vec::new(),
        }
    }

    /// Never enter these absolute paths, e.g. an output root that lives
    /// inside the source tree.
    pub fn skipping<I: IntoIterator<Item = PathBuf>>(mut self, paths: I) -> Self {
        self.skip.extend(paths);
        self
    }

    /// Renders every entry of `source_dir` into `dest_dir`.
    ///
    /// # Errors
    /// Any read, write, expansion or transform error aborts the walk.
    pub fn render(&self, source_dir: &Path, dest_dir: &Path, options: &RenderOptions) -> Result<()> {
        options.log(Phase::Exploring, &options.describe(source_dir, dest_dir));

        list_directory(source_dir)?
            .par_iter()
            .try_for_each(|entry| self.visit(entry, dest_dir, options))
    }

    fn visit(&self, entry: &DirectoryEntry, dest_dir: &Path, options: &RenderOptions) -> Result<()> {
        if self.skip.contains(&entry.path) {
            debug!("Skipping {}: build output", entry.path.display());
            return Ok(());
        }

        let relative = entry
            .path
            .strip_prefix(&options.source_root)
            .unwrap_or(&entry.path);
        if self.ignore.is_match(relative) {
            debug!("Skipping {}: ignored", relative.display());
            return Ok(());
        }

        expand(&entry.name, &options.scope)?
            .into_par_iter()
            .try_for_each(|expansion| self.render_expansion(entry, expansion, dest_dir, options))
    }

    fn render_expansion(
        &self,
        entry: &DirectoryEntry,
        expansion: Expansion,
        dest_dir: &Path,
        options: &RenderOptions,
    ) -> Result<()> {
        let Expansion {
            directive,
            scope,
            name,
        } = expansion;
        let options = RenderOptions {
            scope,
            ..options.clone()
        };

        match (entry.is_dir, directive) {
            (true, Directive::Loop) => self.render(&entry.path, dest_dir, &options),
            (true, _) => self.render(&entry.path, &dest_dir.join(name), &options),
            (false, Directive::Loop) => Err(Error::InvalidLoop {
                entry: entry.name.clone(),
                reason: "loop directives only apply to directories".to_string(),
            }),
            (false, _) => self.render_file(&entry.path, &dest_dir.join(name), &options),
        }
    }

    fn render_file(&self, source: &Path, target: &Path, options: &RenderOptions) -> Result<()> {
        if options.transforms.run(source, target, options)? {
            return Ok(());
        }

        if target.exists() {
            debug!("Keeping existing {}", target.display());
            return Ok(());
        }

        copy_file(source, target)
    }
}

/// Copies `source` to `target` byte for byte, creating parent directories.
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    debug!("Copying file: {}", target.display());
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|e| Error::write(target, e))
}
