//! Stylesheet bundling.
//!
//! Only `index.css` is emitted. Its local `@import` rules are replaced by
//! the imported files' contents, recursively; every other stylesheet is
//! treated as an import target and dropped from the output.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::{write_output, Transform, TransformResult};
use crate::constants::STYLESHEET_ENTRY;
use crate::error::{Error, Result};
use crate::options::RenderOptions;

static IMPORT_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*@import\s+(?:url\(\s*)?(?:"([^"]+)"|'([^']+)'|([^"'\s);]+))\s*\)?[^;\n]*;[ \t]*\r?\n?"#,
    )
    .expect("import rule pattern is valid")
});

/// Bundles `index.css` files and swallows the rest.
#[derive(Debug, Default)]
pub struct StylesheetTransform;

impl StylesheetTransform {
    pub fn new() -> Self {
        Self
    }

    /// Returns `entry` with its local imports inlined.
    ///
    /// # Errors
    /// * `Error::Read` if the entry or an imported file cannot be read
    pub fn bundle(&self, entry: &Path) -> Result<String> {
        let mut seen = HashSet::new();
        inline_imports(entry, &mut seen)
    }
}

fn is_remote(href: &str) -> bool {
    href.starts_with("//") || href.contains("://")
}

fn inline_imports(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<String> {
    let canonical = path.canonicalize().map_err(|e| Error::read(path, e))?;
    if !seen.insert(canonical) {
        log::debug!("Skipping repeated import of {}", path.display());
        return Ok(String::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut failure = None;
    let bundled = IMPORT_RULE.replace_all(&content, |captures: &Captures| {
        let href = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map_or("", |m| m.as_str());
        if is_remote(href) || failure.is_some() {
            return captures[0].to_string();
        }

        match inline_imports(&base.join(href), seen) {
            Ok(inlined) if inlined.is_empty() || inlined.ends_with('\n') => inlined,
            Ok(inlined) => inlined + "\n",
            Err(e) => {
                failure = Some(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(bundled.into_owned()),
    }
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "css")
}

impl Transform for StylesheetTransform {
    fn name(&self) -> &str {
        "css"
    }

    fn apply(
        &self,
        source: &Path,
        target: &Path,
        _options: &RenderOptions,
    ) -> Result<TransformResult> {
        if !is_stylesheet(source) {
            return Ok(TransformResult::NotApplied);
        }

        if !source.file_name().is_some_and(|name| name == STYLESHEET_ENTRY) {
            return Ok(TransformResult::AppliedTerminal);
        }

        let bundled = self.bundle(source)?;
        write_output(target, &bundled)?;

        Ok(TransformResult::AppliedProducing(vec![target.to_path_buf()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_inlines_nested_imports() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("parts")).unwrap();
        fs::write(
            dir.path().join("index.css"),
            "@import \"parts/header.css\";\n@import url(https://fonts.example/a.css);\nbody { margin: 0; }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("parts/header.css"),
            "@import './colors.css';\nheader { color: white; }\n",
        )
        .unwrap();
        fs::write(dir.path().join("parts/colors.css"), ":root { --fg: black; }").unwrap();

        let bundled = StylesheetTransform::new()
            .bundle(&dir.path().join("index.css"))
            .unwrap();

        assert_eq!(
            bundled,
            ":root { --fg: black; }\nheader { color: white; }\n@import url(https://fonts.example/a.css);\nbody { margin: 0; }\n"
        );
    }

    #[test]
    fn test_bundle_breaks_cycles() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.css"), "@import 'a.css';\nmain {}\n").unwrap();
        fs::write(dir.path().join("a.css"), "@import 'index.css';\na {}\n").unwrap();

        let bundled = StylesheetTransform::new()
            .bundle(&dir.path().join("index.css"))
            .unwrap();

        assert_eq!(bundled, "a {}\nmain {}\n");
    }

    #[test]
    fn test_missing_import_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.css"), "@import 'gone.css';\n").unwrap();

        let result = StylesheetTransform::new().bundle(&dir.path().join("index.css"));
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
