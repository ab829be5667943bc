//! Content addressed asset names.
//!
//! Runs over a finished output tree in two passes. The first renames every
//! non-page file to `<stem>-<hash8><.ext>` and records the renames; the
//! second rewrites quoted references to the old names in every text file.
//! Pages keep their names so their URLs stay stable.

use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::constants::PAGE_EXTENSION;
use crate::error::{Error, Result};
use crate::walker::list_directory;

/// Length of the hash suffix inserted into file names.
pub const HASH_LENGTH: usize = 8;

/// Renames recorded by [`hash_files`], keyed by old output-relative path.
///
/// Paths always use `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashLookup(IndexMap<String, String>);

impl HashLookup {
    pub fn get(&self, old: &str) -> Option<&str> {
        self.0.get(old).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for HashLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut renames: IndexMap<String, String> = iter.into_iter().collect();
        renames.sort_keys();
        Self(renames)
    }
}

/// First 8 hex characters of the SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hex = format!("{:x}", Sha256::digest(bytes));
    hex.truncate(HASH_LENGTH);
    hex
}

/// File name with `hash` inserted before the extension.
///
/// Returns `None` when the name already carries exactly this hash.
pub fn hashed_name(file_name: &str, hash: &str) -> Option<String> {
    let path = Path::new(file_name);
    let stem = path.file_stem()?.to_str()?;
    if stem
        .strip_suffix(hash)
        .is_some_and(|rest| rest.ends_with('-'))
    {
        return None;
    }

    Some(match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}-{hash}.{ext}"),
        None => format!("{stem}-{hash}"),
    })
}

fn is_page(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PAGE_EXTENSION)
}

fn relative_slashed(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Pass one: hashes and renames every asset under `root`.
///
/// Subdirectories are handled first, then the files of each directory
/// concurrently. The lookup is returned only once the whole tree is done.
///
/// # Errors
/// * `Error::Read` if a file cannot be read
/// * `Error::Write` if a rename fails
pub fn hash_files<P: AsRef<Path>>(root: P) -> Result<HashLookup> {
    let root = root.as_ref();
    let mut renames = Vec::new();
    hash_directory(root, root, &mut renames)?;
    Ok(renames.into_iter().collect())
}

fn hash_directory(root: &Path, dir: &Path, renames: &mut Vec<(String, String)>) -> Result<()> {
    let (dirs, files): (Vec<_>, Vec<_>) = list_directory(dir)?
        .into_iter()
        .partition(|entry| entry.is_dir);

    for sub in &dirs {
        hash_directory(root, &sub.path, renames)?;
    }

    let renamed = files
        .par_iter()
        .filter(|entry| !is_page(&entry.path))
        .map(|entry| hash_file(root, &entry.path, &entry.name))
        .collect::<Result<Vec<_>>>()?;
    renames.extend(renamed.into_iter().flatten());
    Ok(())
}

fn hash_file(root: &Path, path: &Path, name: &str) -> Result<Option<(String, String)>> {
    let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
    let hash = content_hash(&bytes);
    let Some(new_name) = hashed_name(name, &hash) else {
        debug!("{} is already hashed", path.display());
        return Ok(None);
    };

    let target = path.with_file_name(&new_name);
    fs::rename(path, &target).map_err(|e| Error::write(&target, e))?;
    debug!("Renamed {} to {}", path.display(), new_name);

    Ok(Some((
        relative_slashed(root, path),
        relative_slashed(root, &target),
    )))
}

/// A quoted string, optionally starting with `./` or `/`. The path is
/// captured without the prefix.
static QUOTED_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:\./|/)?([^"\n]*)"|'(?:\./|/)?([^'\n]*)'"#)
        .expect("quoted path pattern is valid")
});

/// Pass two: points quoted references to old paths at the hashed names.
///
/// `"p"`, `"./p"`, `"/p"` and their single quoted forms all become
/// `"./<new p>"`. Each file is rewritten in a single pass, so replaced text
/// is never matched again. Files that are not UTF-8 are left alone.
pub fn rewrite_references<P: AsRef<Path>>(root: P, lookup: &HashLookup) -> Result<()> {
    if lookup.is_empty() {
        return Ok(());
    }

    let root = root.as_ref();
    let files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(Ok(entry.into_path())),
            Err(e) => Some(Err(Error::IoError(e.into()))),
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    files
        .par_iter()
        .try_for_each(|path| rewrite_file(path, lookup))
}

/// Replaces every quoted old path in `content`.
///
/// A quoted string that is not an old path is stepped over by one
/// character only, so a stray apostrophe cannot swallow the reference
/// that follows it.
pub fn rewrite_content<'a>(content: &'a str, lookup: &HashLookup) -> Cow<'a, str> {
    let mut rewritten = String::new();
    let mut copied = 0;
    let mut position = 0;

    while let Some(captures) = QUOTED_PATH.captures_at(content, position) {
        let quoted = captures.get(0).map_or(position..position, |m| m.range());
        let old = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map_or("", |m| m.as_str());

        match lookup.get(old) {
            Some(new) => {
                rewritten.push_str(&content[copied..quoted.start]);
                rewritten.push_str(&format!("\"./{new}\""));
                copied = quoted.end;
                position = quoted.end;
            }
            // Both quote characters are one byte wide.
            None => position = quoted.start + 1,
        }
    }

    if copied == 0 {
        return Cow::Borrowed(content);
    }
    rewritten.push_str(&content[copied..]);
    Cow::Owned(rewritten)
}

fn rewrite_file(path: &Path, lookup: &HashLookup) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
    let Ok(content) = String::from_utf8(bytes) else {
        return Ok(());
    };

    if let Cow::Owned(rewritten) = rewrite_content(&content, lookup) {
        debug!("Rewriting references in {}", path.display());
        fs::write(path, rewritten).map_err(|e| Error::write(path, e))?;
    }
    Ok(())
}

/// Runs both passes over `root` and returns the renames.
pub fn hash_assets<P: AsRef<Path>>(root: P) -> Result<HashLookup> {
    let root = root.as_ref();
    let lookup = hash_files(root)?;
    rewrite_references(root, &lookup)?;
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_length() {
        let hash = content_hash(b"<svg/>");
        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, content_hash(b"<svg/>"));
    }

    #[test]
    fn test_hashed_name() {
        assert_eq!(
            hashed_name("plane.svg", "0123abcd").as_deref(),
            Some("plane-0123abcd.svg")
        );
        assert_eq!(
            hashed_name("app.min.js", "0123abcd").as_deref(),
            Some("app.min-0123abcd.js")
        );
        assert_eq!(
            hashed_name("LICENSE", "0123abcd").as_deref(),
            Some("LICENSE-0123abcd")
        );
        assert_eq!(hashed_name("plane-0123abcd.svg", "0123abcd"), None);
        assert_eq!(
            hashed_name("plane0123abcd.svg", "0123abcd").as_deref(),
            Some("plane0123abcd-0123abcd.svg")
        );
    }

    #[test]
    fn test_lookup_is_sorted() {
        let lookup: HashLookup = [
            ("b.css".to_string(), "b-1.css".to_string()),
            ("a.svg".to_string(), "a-2.svg".to_string()),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = lookup.iter().map(|(old, _)| old).collect();
        assert_eq!(keys, ["a.svg", "b.css"]);
    }

    #[test]
    fn test_stray_apostrophe_does_not_hide_a_reference() {
        let lookup: HashLookup = [("plane.svg".to_string(), "plane-0123abcd.svg".to_string())]
            .into_iter()
            .collect();

        assert_eq!(
            rewrite_content("It's here: <img src='plane.svg'>", &lookup),
            "It's here: <img src=\"./plane-0123abcd.svg\">"
        );
        assert!(matches!(
            rewrite_content("no 'references' here", &lookup),
            Cow::Borrowed(_)
        ));
    }
}
