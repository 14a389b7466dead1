//! Helper functions invocable from templates via `{{#name args}}`

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Failure raised by a helper; the render leaves the call untouched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HelperError {
    /// A required positional argument was not supplied
    #[error("helper '{helper}' requires argument #{position}")]
    MissingArgument { helper: String, position: usize },

    /// An argument could not be interpreted
    #[error("helper '{helper}' got invalid argument '{value}': {reason}")]
    InvalidArgument {
        helper: String,
        value: String,
        reason: String,
    },

    /// Any other failure reported by the helper body
    #[error("{0}")]
    Failed(String),
}

impl HelperError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn missing(helper: impl Into<String>, position: usize) -> Self {
        Self::MissingArgument {
            helper: helper.into(),
            position,
        }
    }

    pub fn invalid(
        helper: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            helper: helper.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Signature shared by every helper body
///
/// Arguments arrive as the literal whitespace-separated tokens of the call.
pub type HelperFn = dyn Fn(&[&str]) -> Result<String, HelperError> + Send + Sync;

/// A named, shareable helper function
#[derive(Clone)]
pub struct Helper {
    name: String,
    func: Arc<HelperFn>,
}

impl Helper {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[&str]) -> Result<String, HelperError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// A helper that ignores its arguments and produces nothing
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, |_| Ok(String::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the helper with literal arguments
    pub fn call(&self, args: &[&str]) -> Result<String, HelperError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper").field("name", &self.name).finish_non_exhaustive()
    }
}

impl PartialEq for Helper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Name to helper store; later registrations replace earlier ones
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<String, Helper>,
}

impl HelperRegistry {
    /// Create a registry seeded with the built-in helpers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        register_builtins(&mut registry);
        registry
    }

    /// Create a registry with no helpers at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a helper under `name`, replacing any existing entry
    pub fn register<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[&str]) -> Result<String, HelperError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.insert(Helper::new(name, func));
    }

    /// Register an already constructed helper under its own name
    pub fn insert(&mut self, helper: Helper) {
        self.helpers.insert(helper.name.clone(), helper);
    }

    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Registered helper names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.helpers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

fn register_builtins(registry: &mut HelperRegistry) {
    // Case transforms operate on all arguments joined by a single space
    registry.register("uppercase", |args| Ok(args.join(" ").to_uppercase()));
    registry.register("lowercase", |args| Ok(args.join(" ").to_lowercase()));
    registry.register("capitalize", |args| Ok(capitalize(&args.join(" "))));
    registry.register("camelCase", |args| Ok(camel_case(&args.join(" "))));
    registry.register("pascalCase", |args| Ok(pascal_case(&args.join(" "))));
    registry.register("kebabCase", |args| Ok(kebab_case(&args.join(" "))));

    // Array transforms take a comma-separated list as their first argument
    registry.register("join", |args| {
        let list = args.first().ok_or_else(|| HelperError::missing("join", 1))?;
        let separator = args.get(1).copied().unwrap_or(", ");
        Ok(split_list(list).join(separator))
    });
    registry.register("length", |args| {
        Ok(args.first().map_or(0, |list| split_list(list).len()).to_string())
    });

    registry.register("if", |args| {
        let condition = args.first().ok_or_else(|| HelperError::missing("if", 1))?;
        let branch = if literal_truthy(condition) { 1 } else { 2 };
        Ok(args.get(branch).copied().unwrap_or_default().to_string())
    });
    registry.register("unless", |args| {
        let condition = args.first().ok_or_else(|| HelperError::missing("unless", 1))?;
        let branch = if literal_truthy(condition) { 2 } else { 1 };
        Ok(args.get(branch).copied().unwrap_or_default().to_string())
    });

    registry.register("indent", |args| {
        let text = args.first().ok_or_else(|| HelperError::missing("indent", 1))?;
        let width = match args.get(1) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| HelperError::invalid("indent", *raw, e.to_string()))?,
            None => 2,
        };
        Ok(indent(text, width))
    });
    registry.register("comment", |args| {
        let text = args.join(" ");
        if text.is_empty() {
            Ok("//".to_string())
        } else {
            Ok(format!("// {}", text))
        }
    });
}

/// Literal truthiness for helper arguments, which are always text
fn literal_truthy(arg: &str) -> bool {
    !matches!(arg, "" | "false" | "0" | "null" | "undefined" | "NaN")
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an identifier-ish string into lowercase words
///
/// Word boundaries are non-alphanumeric characters and lower-to-upper case
/// transitions (`userProfile` -> `user`, `profile`).
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

fn camel_case(s: &str) -> String {
    words(s)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect()
}

fn kebab_case(s: &str) -> String {
    words(s).join("-")
}
