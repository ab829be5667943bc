//! Page templates rendered with MiniJinja.
//! `*.ejs` files use ERB-style delimiters (`<%= expr %>`, `<% stmt %>`,
//! `<%# comment %>`) and render to `index.html` pages with pretty URLs.
//! `<%= expr %>` output is always HTML-escaped; `<%= expr | safe %>` writes
//! it raw.
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, ErrorKind};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::{write_output, Transform, TransformResult};
use crate::constants::{PAGE_EXTENSION, TEMPLATE_EXTENSION};
use crate::error::{Error, Result};
use crate::options::RenderOptions;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:\r?\n|$)").expect("blank line pattern is valid"));

/// Renders `*.ejs` pages against the current scope.
#[derive(Debug, Default)]
pub struct TemplateTransform;

impl TemplateTransform {
    pub fn new() -> Self {
        Self
    }

    /// Creates the environment for one build, resolving includes against
    /// the working directory first and `source_root` second.
    fn environment(&self, source_root: &Path) -> Result<Environment<'static>> {
        let mut env = Environment::new();
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("<%", "%>")
                .variable_delimiters("<%=", "%>")
                .comment_delimiters("<%#", "%>")
                .build()?,
        );
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        let source_root = source_root.to_path_buf();
        env.set_loader(move |name: &str| load_include(name, &source_root));
        Ok(env)
    }

    /// Renders a single template file to a string.
    ///
    /// # Errors
    /// * `Error::Read` if the file cannot be read
    /// * `Error::MinijinjaError` if the template fails to parse or render,
    ///   including includes that cannot be found
    pub fn render(&self, source: &Path, options: &RenderOptions) -> Result<String> {
        let content = std::fs::read_to_string(source).map_err(|e| Error::read(source, e))?;
        let env = self.environment(&options.source_root)?;
        let name = source
            .strip_prefix(&options.source_root)
            .unwrap_or(source)
            .to_string_lossy();

        let rendered = env.render_named_str(&name, &content, options.scope.values())?;
        Ok(BLANK_LINES.replace_all(&rendered, "").into_owned())
    }
}

/// `index.ejs` renders next to itself, `about.ejs` renders to `about/index.html`.
pub fn page_path(target: &Path) -> PathBuf {
    let index = format!("index.{PAGE_EXTENSION}");
    match target.file_stem() {
        Some(stem) if stem == "index" => target.with_file_name(index),
        _ => target.with_extension("").join(index),
    }
}

fn is_template(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION)
}

fn load_include(name: &str, source_root: &Path) -> std::result::Result<Option<String>, minijinja::Error> {
    for candidate in [PathBuf::from(name), source_root.join(name)] {
        match std::fs::read_to_string(&candidate) {
            Ok(content) => return Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read include '{}'", candidate.display()),
                )
                .with_source(e))
            }
        }
    }
    Ok(None)
}

impl Transform for TemplateTransform {
    fn name(&self) -> &str {
        TEMPLATE_EXTENSION
    }

    fn apply(
        &self,
        source: &Path,
        target: &Path,
        options: &RenderOptions,
    ) -> Result<TransformResult> {
        if !is_template(source) {
            return Ok(TransformResult::NotApplied);
        }

        let rendered = self.render(source, options)?;
        let output = page_path(target);
        write_output(&output, &rendered)?;

        Ok(TransformResult::AppliedProducing(vec![output]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path() {
        assert_eq!(
            page_path(Path::new("/out/index.ejs")),
            PathBuf::from("/out/index.html")
        );
        assert_eq!(
            page_path(Path::new("/out/about.ejs")),
            PathBuf::from("/out/about/index.html")
        );
        assert_eq!(
            page_path(Path::new("/out/_partials/head.ejs")),
            PathBuf::from("/out/_partials/head/index.html")
        );
    }

    #[test]
    fn test_is_template() {
        assert!(is_template(Path::new("index.ejs")));
        assert!(!is_template(Path::new("index.html")));
        assert!(!is_template(Path::new("ejs")));
    }
}
