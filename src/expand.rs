//! Filename directives.
//!
//! Directory and file names may carry control flow:
//!
//! - `[item of items]` renders the directory once per element of the scope
//!   collection `items`, binding each element to `item`. Every iteration
//!   writes into the parent's destination; the directive itself never
//!   appears in the output. The directive must be the whole name;
//!   `post-[p of posts]` is rejected.
//! - `[item.name]` anywhere in a name is replaced by the scope value at
//!   that dotted path.
//!
//! Everything else is a literal name.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::scope::{is_truthy, Scope};

static LOOP_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*([A-Za-z_$][\w$]*)\s+of\s+([\w$.\-]+)\s*\]$")
        .expect("loop directive pattern is valid")
});

static EMBEDDED_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*[A-Za-z_$][\w$]*\s+of\s+[\w$.\-]+\s*\]")
        .expect("embedded loop pattern is valid")
});

static VARIABLE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]+)\]").expect("variable directive pattern is valid")
});

/// Which of the three mutually exclusive forms an entry name takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Loop,
    Variable,
    Literal,
}

/// One way of rendering a directory entry.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub directive: Directive,
    pub scope: Scope,
    /// Output name. For loops this is the untouched entry name and is not
    /// used as an output path.
    pub name: String,
}

pub fn classify(name: &str) -> Directive {
    if LOOP_DIRECTIVE.is_match(name) {
        Directive::Loop
    } else if VARIABLE_DIRECTIVE.is_match(name) {
        Directive::Variable
    } else {
        Directive::Literal
    }
}

/// Splits a loop directive into its binding and collection path.
pub fn parse_loop(name: &str) -> Option<(&str, &str)> {
    let captures = LOOP_DIRECTIVE.captures(name)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

/// Expands an entry name against `scope`.
///
/// # Returns
/// * Loop directive - one expansion per collection item, or none when the
///   collection is absent or falsy
/// * Variable directive - exactly one expansion with every `[path]` replaced
/// * Literal - exactly one expansion, unchanged
///
/// # Errors
/// * `Error::InvalidLoop` if the collection is truthy but not an array, or
///   a loop directive is only part of the name
/// * `Error::UnresolvedVariable` if a variable is missing, null, or not a scalar
pub fn expand(name: &str, scope: &Scope) -> Result<Vec<Expansion>> {
    if let Some((binding, path)) = parse_loop(name) {
        return expand_loop(name, binding, path, scope);
    }
    if EMBEDDED_LOOP.is_match(name) {
        return Err(Error::InvalidLoop {
            entry: name.to_string(),
            reason: "a loop directive must be the whole name".to_string(),
        });
    }

    let directive = classify(name);
    let name = match directive {
        Directive::Variable => substitute(name, scope)?,
        _ => name.to_string(),
    };

    Ok(vec![Expansion {
        directive,
        scope: scope.clone(),
        name,
    }])
}

fn expand_loop(name: &str, binding: &str, path: &str, scope: &Scope) -> Result<Vec<Expansion>> {
    let items = match scope.lookup(path) {
        Some(value) if is_truthy(value) => value,
        _ => {
            log::debug!("Pruning '{name}': '{path}' is empty or not in scope");
            return Ok(Vec::new());
        }
    };

    let Value::Array(items) = items else {
        return Err(Error::InvalidLoop {
            entry: name.to_string(),
            reason: format!("'{path}' is not a list"),
        });
    };

    Ok(items
        .iter()
        .map(|item| Expansion {
            directive: Directive::Loop,
            scope: scope.extend(binding, item.clone()),
            name: name.to_string(),
        })
        .collect())
}

/// Replaces every `[dotted.path]` token in `name` with its scope value.
pub fn substitute(name: &str, scope: &Scope) -> Result<String> {
    let mut unresolved = None;
    let replaced = VARIABLE_DIRECTIVE.replace_all(name, |captures: &Captures| {
        let path = captures[1].trim();
        match scope.lookup(path).and_then(stringify) {
            Some(value) => value,
            None => {
                unresolved.get_or_insert_with(|| path.to_string());
                String::new()
            }
        }
    });

    match unresolved {
        Some(variable) => Err(Error::UnresolvedVariable {
            entry: name.to_string(),
            variable,
        }),
        None => Ok(replaced.into_owned()),
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
