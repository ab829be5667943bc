//! Common constants used throughout statictron.

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["statictron.json", "statictron.yml", "statictron.yaml"];

/// Ignore file read from the source root
pub const IGNORE_FILE: &str = ".statictronignore";

/// Patterns that are always ignored, whatever the caller configures
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    IGNORE_FILE,
    "statictron.json",
    "statictron.yml",
    "statictron.yaml",
    ".git",
    ".DS_Store",
];

/// Extension of rendered pages. Pages keep stable URLs and are never hashed.
pub const PAGE_EXTENSION: &str = "html";

/// Extension of page templates handled by the `ejs` transform
pub const TEMPLATE_EXTENSION: &str = "ejs";

/// Stylesheet that the `css` transform bundles; every other stylesheet is an import target
pub const STYLESHEET_ENTRY: &str = "index.css";
