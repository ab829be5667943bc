//! Build configuration files.
//! A `statictron.json`, `statictron.yml` or `statictron.yaml` file holds the
//! same settings as the command line; command line values win.

use crate::cli::Args;
use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::options::RenderOptions;
use crate::scope::Scope;
use crate::transform::TransformChain;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Ignore patterns, written either as one string or a list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IgnorePatterns {
    One(String),
    Many(Vec<String>),
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        IgnorePatterns::Many(Vec::new())
    }
}

impl IgnorePatterns {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            IgnorePatterns::One(pattern) => vec![pattern],
            IgnorePatterns::Many(patterns) => patterns,
        }
    }
}

/// Contents of a build configuration file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub ignore: IgnorePatterns,
    #[serde(default)]
    pub scope: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub transforms: Vec<String>,
    pub clean: Option<bool>,
    pub hash: Option<bool>,
}

/// Loads the first configuration file found in `dir`.
///
/// # Returns
/// * `Result<Option<(PathBuf, String)>>` - Path and contents, or `None` if
///   no configuration file exists
pub fn load_config<P: AsRef<Path>>(dir: P, config_files: &[&str]) -> Result<Option<(PathBuf, String)>> {
    for file in config_files {
        let config_path = dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| Error::read(&config_path, e))?;
            return Ok(Some((config_path, content)));
        }
    }
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither, or has unknown keys
pub fn parse_config(content: &str) -> Result<BuildConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

impl BuildConfig {
    /// Reads the config file named by `--config`, or the one in the current directory.
    pub fn discover(args: &Args) -> Result<Self> {
        let loaded = match &args.config {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
                Some((path.clone(), content))
            }
            None => load_config(std::env::current_dir()?, &CONFIG_FILES)?,
        };

        match loaded {
            Some((path, content)) => {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(parse_config(&content)?.relative_to(base))
            }
            None => Ok(Self::default()),
        }
    }

    /// Interprets relative source and output paths against `base`.
    pub fn relative_to<P: AsRef<Path>>(mut self, base: P) -> Self {
        let base = base.as_ref();
        self.source = self.source.map(|source| base.join(source));
        self.output = self.output.map(|output| base.join(output));
        self
    }

    /// Combines the file settings with command line arguments.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no source or output directory is given
    /// * `Error::UnknownTransform` for an unregistered transform name
    pub fn into_options(self, args: &Args) -> Result<RenderOptions> {
        let source = args
            .source
            .clone()
            .or(self.source)
            .ok_or_else(|| Error::ConfigError("no source directory given".to_string()))?;
        let output = args
            .output
            .clone()
            .or(self.output)
            .ok_or_else(|| Error::ConfigError("no output directory given (--output)".to_string()))?;

        let mut ignore = self.ignore.into_vec();
        ignore.extend(args.ignore.iter().cloned());

        let mut scope: serde_json::Map<String, serde_json::Value> = self.scope.into_iter().collect();
        for (key, value) in &args.scope {
            scope.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        let transform_names = if args.transforms.is_empty() {
            self.transforms
        } else {
            args.transforms.clone()
        };

        Ok(RenderOptions::new(source, output)
            .with_scope(Scope::new(scope))
            .with_ignore(ignore)
            .with_transforms(TransformChain::from_names(&transform_names)?)
            .with_clean(!args.no_clean && self.clean.unwrap_or(true))
            .with_hash_assets(args.hash || self.hash.unwrap_or(false)))
    }
}
