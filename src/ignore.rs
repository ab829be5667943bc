//! File and directory ignore pattern handling.
//! Ignored entries are skipped by the tree walker before any expansion,
//! recursion or copy, so nothing derived from them reaches the output.

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, io, path::Path};

/// Compiled ignore patterns.
///
/// Patterns containing a `/` match against the whole path relative to the
/// source root. Patterns without one also match against the entry's own
/// name, so `head.ejs` ignores that file at any depth.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    paths: GlobSet,
    names: GlobSet,
}

impl IgnoreFilter {
    /// Compiles `patterns` into a filter.
    ///
    /// # Errors
    /// * `Error::IgnoreError` if a pattern is not a valid glob
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = GlobSetBuilder::new();
        let mut names = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim().trim_end_matches('/');
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern)
                .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))?;
            if !pattern.contains('/') {
                names.add(glob.clone());
            }
            paths.add(glob);
        }

        Ok(Self {
            paths: paths.build().map_err(|e| Error::IgnoreError(e.to_string()))?,
            names: names.build().map_err(|e| Error::IgnoreError(e.to_string()))?,
        })
    }

    /// Builds the filter for a source tree: defaults, the ignore file in
    /// `source_root`, then the caller's patterns.
    pub fn for_source<P, S>(source_root: P, patterns: &[S]) -> Result<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let file_patterns = parse_ignore_file(source_root.as_ref().join(IGNORE_FILE))?;
        let all = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(file_patterns)
            .chain(patterns.iter().map(|p| p.as_ref().to_string()));
        Self::new(all)
    }

    /// Checks a path relative to the source root.
    pub fn is_match<P: AsRef<Path>>(&self, relative: P) -> bool {
        let relative = relative.as_ref();
        let slashed = relative.to_string_lossy().replace('\\', "/");
        if self.paths.is_match(&slashed) {
            return true;
        }
        relative.file_name().is_some_and(|name| self.names.is_match(name))
    }
}

/// Reads an ignore file, one glob per line.
///
/// A missing file yields no patterns. Blank lines and lines starting with
/// `#` are skipped.
///
/// # Example
/// ```ignore
/// # Contents of .statictronignore:
/// _partials/**
/// *.draft.ejs
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(ignore_path: P) -> Result<Vec<String>> {
    let ignore_path = ignore_path.as_ref();
    match read_to_string(ignore_path) {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{IGNORE_FILE} does not exist");
            Ok(Vec::new())
        }
        Err(e) => Err(Error::read(ignore_path, e)),
    }
}
