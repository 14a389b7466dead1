//! Static analysis of raw template text
//!
//! Parsing never fails: tokens that do not look like variables are simply
//! not reported, and identical input always yields an identical result.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::metadata::{parse_metadata, TemplateMetadata};
use super::syntax::{is_directive, TOKEN};
use crate::validation::ValidationRule;
use crate::value::{Value, VariableType};

/// `import ... from 'module'`, possibly spanning lines
static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+[^;'"]*?\bfrom\s*['"]([^'"]+)['"]"#)
        .expect("valid import pattern")
});

/// The contract a template places on one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub description: String,
    pub required: bool,
    pub default_value: Value,
    pub validation: Vec<ValidationRule>,
}

impl TemplateVariable {
    /// A required variable with the type's zero value as default
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            description: format!("Inferred {} variable", var_type),
            required: true,
            default_value: var_type.default_value(),
            validation: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }
}

/// Result of analysing a template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTemplate {
    pub content: String,
    /// One entry per distinct base variable, in order of first use
    pub variables: Vec<TemplateVariable>,
    /// External modules imported by the template
    pub dependencies: BTreeSet<String>,
    pub metadata: TemplateMetadata,
}

impl ParsedTemplate {
    pub fn variable(&self, name: &str) -> Option<&TemplateVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn required_variables(&self) -> impl Iterator<Item = &TemplateVariable> {
        self.variables.iter().filter(|v| v.required)
    }
}

/// Analyse template text: variable contracts, dependencies and metadata
pub fn parse_template(raw: &str) -> ParsedTemplate {
    ParsedTemplate {
        content: raw.to_string(),
        variables: extract_variables(raw),
        dependencies: extract_dependencies(raw),
        metadata: parse_metadata(raw),
    }
}

fn extract_variables(raw: &str) -> Vec<TemplateVariable> {
    let mut variables: Vec<TemplateVariable> = Vec::new();

    for caps in TOKEN.captures_iter(raw) {
        let inner = &caps[1];
        if is_directive(inner) {
            continue;
        }
        let expr = inner.trim();
        let Some(name) = base_name(expr) else {
            continue;
        };
        // The first occurrence decides the type
        if variables.iter().any(|v| v.name == name) {
            continue;
        }
        variables.push(TemplateVariable::new(name, infer_type(expr)));
    }

    variables
}

/// The variable an expression is rooted at
///
/// This is the text before the first `.`, `[`, `?` or `(`; for a comparison
/// (`count > 5 ? ...`) only its first word. The name must be a whole
/// identifier, so literals and object literals such as a JSX
/// `style={{ color: 'red' }}` are not variables.
fn base_name(expr: &str) -> Option<&str> {
    let end = expr
        .find(|c: char| matches!(c, '.' | '[' | '?' | '('))
        .unwrap_or(expr.len());
    let name = expr[..end].split_whitespace().next()?;
    let mut chars = name.chars();
    let first = chars.next()?;
    let starts_ident = first.is_alphabetic() || first == '_' || first == '$';
    if starts_ident && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        Some(name)
    } else {
        None
    }
}

/// Infer a variable's type from the shape of the expression using it
fn infer_type(expr: &str) -> VariableType {
    if expr.contains('[') {
        VariableType::Array
    } else if expr.contains('.') && !expr.contains('?') {
        VariableType::Object
    } else if expr.contains('?') && expr.contains(':') {
        VariableType::Boolean
    } else if expr.contains("()") {
        VariableType::Function
    } else {
        VariableType::String
    }
}

/// Non-relative modules named in `import ... from '...'` statements
fn extract_dependencies(raw: &str) -> BTreeSet<String> {
    IMPORT
        .captures_iter(raw)
        .map(|caps| caps[1].to_string())
        .filter(|module| !module.starts_with('.') && !module.starts_with('/'))
        .collect()
}
