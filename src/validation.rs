//! Advisory validation of a context against a parsed template's variables
//!
//! Validation never enforces anything. It reports what it finds and the
//! caller decides whether to render anyway.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::context::TemplateContext;
use crate::template::ParsedTemplate;
use crate::value::Value;

/// Signature of a custom rule predicate; `Err` counts as a failed rule
pub type PredicateFn = dyn Fn(&Value) -> Result<bool, String> + Send + Sync;

/// A shareable custom predicate
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    pub fn test(&self, value: &Value) -> Result<bool, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// What a rule checks
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// The value's string form matches the pattern
    Regex(String),
    /// A string has exactly this many characters, or an array this many items
    Length(usize),
    /// A number lies within the inclusive bounds
    Range { min: Option<f64>, max: Option<f64> },
    Custom(Predicate),
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Regex(_) => "regex",
            RuleKind::Length(_) => "length",
            RuleKind::Range { .. } => "range",
            RuleKind::Custom(_) => "custom",
        }
    }
}

/// A single check attached to a template variable
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub kind: RuleKind,
    /// Reported when the rule fails
    pub message: String,
}

impl ValidationRule {
    pub fn regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Regex(pattern.into()),
            message: message.into(),
        }
    }

    pub fn length(length: usize, message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Length(length),
            message: message.into(),
        }
    }

    pub fn range(min: Option<f64>, max: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Range { min, max },
            message: message.into(),
        }
    }

    pub fn custom<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            kind: RuleKind::Custom(Predicate::new(predicate)),
            message: message.into(),
        }
    }

    /// Evaluate the rule; the error holds the failure message
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let passed = match &self.kind {
            RuleKind::Regex(pattern) => match Regex::new(pattern) {
                Ok(re) => re.is_match(&value.coerce_to_string()),
                Err(e) => {
                    return Err(format!("{} (invalid pattern: {})", self.message, e));
                }
            },
            RuleKind::Length(expected) => match value {
                Value::String(s) => s.chars().count() == *expected,
                Value::Array(items) => items.len() == *expected,
                _ => false,
            },
            RuleKind::Range { min, max } => match numeric(value) {
                Some(n) => min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m),
                None => false,
            },
            RuleKind::Custom(predicate) => match predicate.test(value) {
                Ok(passed) => passed,
                Err(e) => {
                    tracing::debug!(error = %e, "Custom validation predicate failed");
                    false
                }
            },
        };

        if passed {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Serialize for ValidationRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            kind: &'static str,
            value: serde_json::Value,
            message: &'a str,
        }

        let value = match &self.kind {
            RuleKind::Regex(pattern) => serde_json::Value::String(pattern.clone()),
            RuleKind::Length(n) => serde_json::Value::from(*n),
            RuleKind::Range { min, max } => serde_json::json!({ "min": min, "max": max }),
            RuleKind::Custom(_) => serde_json::Value::Null,
        };

        Repr {
            kind: self.kind.name(),
            value,
            message: &self.message,
        }
        .serialize(serializer)
    }
}

/// Outcome of validating a context
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a context against the variables a template declares
///
/// Errors: missing required variables, values whose type differs from the
/// inferred tag, and failing rules (one error per rule). Warnings: optional
/// variables left unset and context variables the template never uses.
/// Null values count as missing.
pub fn validate_context(parsed: &ParsedTemplate, context: &TemplateContext) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for variable in &parsed.variables {
        let value = context
            .variables
            .get(&variable.name)
            .filter(|v| !v.is_null());

        let Some(value) = value else {
            if variable.required {
                errors.push(format!("Required variable '{}' is missing", variable.name));
            } else {
                warnings.push(format!(
                    "Optional variable '{}' is not set; its placeholder will be left unresolved",
                    variable.name
                ));
            }
            continue;
        };

        if !variable.var_type.matches(value) {
            errors.push(format!(
                "Variable '{}' should be {} but is {}",
                variable.name,
                variable.var_type,
                value.kind_name()
            ));
        }

        for rule in &variable.validation {
            if let Err(message) = rule.check(value) {
                errors.push(format!("Variable '{}': {}", variable.name, message));
            }
        }
    }

    for name in context.variables.keys() {
        if !parsed.variables.iter().any(|v| &v.name == name) {
            warnings.push(format!("Variable '{}' is not used by the template", name));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{parse_template, TemplateVariable};
    use crate::value::VariableType;
    use pretty_assertions::assert_eq;

    fn template_with(variables: Vec<TemplateVariable>) -> ParsedTemplate {
        let mut parsed = parse_template("");
        parsed.variables = variables;
        parsed
    }

    #[test]
    fn test_missing_required() {
        let parsed = parse_template("Hello {{name}}");
        let result = validate_context(&parsed, &TemplateContext::new());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("name"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let parsed = parse_template("Hello {{name}}");
        let ctx = TemplateContext::new().with_variable("name", Value::Null);
        assert!(!validate_context(&parsed, &ctx).valid);
    }

    #[test]
    fn test_optional_missing_is_warning() {
        let parsed = template_with(vec![
            TemplateVariable::new("title", VariableType::String).required(false)
        ]);
        let result = validate_context(&parsed, &TemplateContext::new());
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["Optional variable 'title' is not set; its placeholder will be left unresolved"
                .to_string()]
        );
    }

    #[test]
    fn test_number_for_string_variable_is_type_error() {
        // Numbers carry no variable type, even though they render as text
        let parsed = parse_template("{{count}}");
        let ctx = TemplateContext::new().with_variable("count", 3);
        let result = validate_context(&parsed, &ctx);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Variable 'count' should be string but is number".to_string()]
        );
    }

    #[test]
    fn test_jsx_style_object_needs_no_context() {
        let parsed = parse_template("<div style={{ color: 'red' }} />");
        let result = validate_context(&parsed, &TemplateContext::new());
        assert!(result.valid, "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_type_mismatch() {
        let parsed = parse_template("{{items[0]}}");
        let ctx = TemplateContext::new().with_variable("items", "not an array");
        let result = validate_context(&parsed, &ctx);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Variable 'items' should be array but is string".to_string()]
        );
    }

    #[test]
    fn test_unused_context_variable_warns() {
        let parsed = parse_template("{{name}}");
        let ctx = TemplateContext::new()
            .with_variable("name", "Sam")
            .with_variable("extra", 1i64);
        let result = validate_context(&parsed, &ctx);
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["Variable 'extra' is not used by the template".to_string()]
        );
    }

    #[test]
    fn test_each_failing_rule_is_one_error() {
        let parsed = template_with(vec![TemplateVariable::new("code", VariableType::String)
            .with_rule(ValidationRule::regex("^[A-Z]+$", "must be upper case"))
            .with_rule(ValidationRule::length(3, "must be 3 characters"))
            .with_rule(ValidationRule::custom(
                |_| Ok(true),
                "never fails",
            ))]);
        let ctx = TemplateContext::new().with_variable("code", "abcd");
        let result = validate_context(&parsed, &ctx);
        assert_eq!(
            result.errors,
            vec![
                "Variable 'code': must be upper case".to_string(),
                "Variable 'code': must be 3 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_custom_predicate_error_is_failure() {
        let rule = ValidationRule::custom(|_| Err("boom".to_string()), "custom check failed");
        assert_eq!(
            rule.check(&Value::from("x")),
            Err("custom check failed".to_string())
        );
    }

    #[test]
    fn test_range_rule() {
        let rule = ValidationRule::range(Some(1.0), Some(10.0), "out of range");
        assert!(rule.check(&Value::from(5)).is_ok());
        assert!(rule.check(&Value::from("7")).is_ok());
        assert!(rule.check(&Value::from(11)).is_err());
        assert!(rule.check(&Value::Bool(true)).is_err());
        let open = ValidationRule::range(None, Some(0.0), "not negative");
        assert!(open.check(&Value::from(-3)).is_ok());
    }

    #[test]
    fn test_length_rule_on_arrays() {
        let rule = ValidationRule::length(2, "two items");
        assert!(rule.check(&Value::strings(["a", "b"])).is_ok());
        assert!(rule.check(&Value::strings(["a"])).is_err());
    }

    #[test]
    fn test_invalid_regex_fails_rule() {
        let rule = ValidationRule::regex("([", "bad");
        let err = rule.check(&Value::from("x")).unwrap_err();
        assert!(err.starts_with("bad (invalid pattern"));
    }

    #[test]
    fn test_rule_serializes() {
        let rule = ValidationRule::range(Some(1.0), None, "too small");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            serde_json::json!({"kind": "range", "value": {"min": 1.0, "max": null}, "message": "too small"})
        );
    }
}
