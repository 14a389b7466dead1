//! Expression resolution against a variable map
//!
//! Strategies are tried in a fixed order and the first match wins:
//!
//! 1. the expression text is itself a key in the map
//! 2. dot path (`a.b.c`), walking nested objects
//! 3. array index (`name[i]`)
//! 4. ternary (`cond ? a : b`), yielding the chosen branch text verbatim
//!
//! Anything else is [`Resolution::Unresolved`], which the renderer reports
//! by leaving the original `{{expr}}` in its output.

use std::cmp::Ordering;

use crate::context::Variables;
use crate::expression::{parse_expression, CompareOp, Comparison, Condition, Expr, Operand};
use crate::value::Value;

/// Outcome of resolving one expression
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Value(Value),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Value(_))
    }

    /// The resolved value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolution::Value(v) => Some(v),
            Resolution::Unresolved => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::Value(v) => Some(v),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolve expression text against `variables`
pub fn resolve(expr: &str, variables: &Variables) -> Resolution {
    if let Some(value) = variables.get(expr) {
        return Resolution::Value(value.clone());
    }

    match parse_expression(expr) {
        Ok(parsed) => resolve_expr(&parsed, variables),
        Err(errors) => {
            tracing::trace!(expr, errors = errors.len(), "Expression does not parse");
            Resolution::Unresolved
        }
    }
}

/// Resolve an already parsed expression
///
/// Exact-key lookup is not repeated here; callers holding raw text should
/// use [`resolve`].
pub fn resolve_expr(expr: &Expr, variables: &Variables) -> Resolution {
    let resolved = match expr {
        Expr::Path(segments) => resolve_path(segments, variables),
        Expr::Index { name, index } => resolve_index(name, *index, variables),
        Expr::Ternary(ternary) => {
            evaluate_condition(&ternary.condition, variables).map(|holds| {
                let branch = if holds {
                    &ternary.then_branch
                } else {
                    &ternary.else_branch
                };
                Value::String(branch.clone())
            })
        }
        // A bare identifier only resolves through exact-key lookup
        Expr::Identifier(name) => variables.get(name).cloned(),
        Expr::Literal(_) => None,
    };

    resolved.map_or(Resolution::Unresolved, Resolution::Value)
}

fn resolve_path(segments: &[String], variables: &Variables) -> Option<Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = variables.get(first)?;
    for segment in rest {
        current = current.get(segment)?;
    }
    Some(current.clone())
}

fn resolve_index(name: &str, index: i64, variables: &Variables) -> Option<Value> {
    match variables.get(name)? {
        Value::Array(items) => usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned(),
        _ => None,
    }
}

/// Evaluate a ternary condition
///
/// A condition that is itself a variable key tests that value's truthiness.
/// Otherwise only `left OP right` comparisons are understood. Any other
/// condition (an absent key, a path, an index) is `None`, which leaves the
/// whole ternary unresolved.
fn evaluate_condition(condition: &Condition, variables: &Variables) -> Option<bool> {
    if let Some(value) = variables.get(&condition.text) {
        return Some(value.is_truthy());
    }
    condition
        .comparison
        .as_ref()
        .map(|comparison| evaluate_comparison(comparison, variables))
}

fn evaluate_comparison(comparison: &Comparison, variables: &Variables) -> bool {
    let left = operand_value(&comparison.left, variables);
    let right = operand_value(&comparison.right, variables);
    compare(&left, comparison.op, &right)
}

/// Value of one comparison side: a variable when one matches, else its literal text
///
/// Literal fallbacks are always strings, so `"5" > "10"` compares as text.
fn operand_value(operand: &Operand, variables: &Variables) -> Value {
    if operand.is_reference {
        if let Some(value) = resolve(&operand.text, variables).into_value() {
            return value;
        }
    } else if let Some(value) = variables.get(&operand.text) {
        return value.clone();
    }
    Value::String(operand.literal.clone())
}

/// Compare two values with loose scripting-language semantics
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    match op {
        CompareOp::LooseEq => loose_equals(left, right),
        CompareOp::LooseNotEq => !loose_equals(left, right),
        CompareOp::StrictEq => strict_equals(left, right),
        CompareOp::StrictNotEq => !strict_equals(left, right),
        CompareOp::Greater => relational(left, right) == Some(Ordering::Greater),
        CompareOp::Less => relational(left, right) == Some(Ordering::Less),
        CompareOp::GreaterOrEqual => matches!(
            relational(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::LessOrEqual => matches!(
            relational(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Primitive {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

fn to_primitive(value: &Value) -> Primitive {
    match value {
        Value::Null => Primitive::Null,
        Value::Bool(b) => Primitive::Bool(*b),
        Value::Number(n) => Primitive::Number(*n),
        Value::String(s) => Primitive::String(s.clone()),
        other => Primitive::String(other.coerce_to_string()),
    }
}

fn to_number(primitive: &Primitive) -> f64 {
    match primitive {
        Primitive::Null => 0.0,
        Primitive::Bool(b) => f64::from(u8::from(*b)),
        Primitive::Number(n) => *n,
        Primitive::String(s) => string_to_number(s),
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust's float parser accepts spellings like "inf" and "nan"
        _ if trimmed
            .chars()
            .any(|c| c.is_alphabetic() && c != 'e' && c != 'E') =>
        {
            f64::NAN
        }
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn is_compound(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_) | Value::Function(_))
}

fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        _ => std::mem::discriminant(left) == std::mem::discriminant(right) && left == right,
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    if is_compound(left) && is_compound(right) {
        return left == right;
    }
    match (to_primitive(left), to_primitive(right)) {
        (Primitive::Null, Primitive::Null) => true,
        (Primitive::Null, _) | (_, Primitive::Null) => false,
        (Primitive::String(a), Primitive::String(b)) => a == b,
        (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
        (a, b) => to_number(&a) == to_number(&b),
    }
}

/// Ordering for `<`, `>`, `<=`, `>=`; `None` when either side is NaN
fn relational(left: &Value, right: &Value) -> Option<Ordering> {
    match (to_primitive(left), to_primitive(right)) {
        (Primitive::String(a), Primitive::String(b)) => Some(a.cmp(&b)),
        (a, b) => to_number(&a).partial_cmp(&to_number(&b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(entries: Vec<(&str, Value)>) -> Variables {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn resolved(expr: &str, variables: &Variables) -> Option<Value> {
        resolve(expr, variables).into_value()
    }

    #[test]
    fn test_exact_key_wins() {
        let variables = vars(vec![
            ("user.name", Value::from("literal key")),
            ("user", Value::object([("name", Value::from("nested"))])),
        ]);
        assert_eq!(
            resolved("user.name", &variables),
            Some(Value::from("literal key"))
        );
    }

    #[test]
    fn test_exact_key_with_odd_characters() {
        let variables = vars(vec![("my-var", Value::from("ok"))]);
        assert_eq!(resolved("my-var", &variables), Some(Value::from("ok")));
    }

    #[test]
    fn test_dot_path() {
        let variables = vars(vec![(
            "user",
            Value::object([(
                "address",
                Value::object([("city", Value::from("Oslo"))]),
            )]),
        )]);
        assert_eq!(
            resolved("user.address.city", &variables),
            Some(Value::from("Oslo"))
        );
        assert_eq!(resolve("user.missing", &variables), Resolution::Unresolved);
        assert_eq!(
            resolve("user.address.city.zip", &variables),
            Resolution::Unresolved
        );
        assert_eq!(resolve("nobody.name", &variables), Resolution::Unresolved);
    }

    #[test]
    fn test_array_index() {
        let variables = vars(vec![
            ("items", Value::strings(["a", "b", "c"])),
            ("name", Value::from("abc")),
        ]);
        assert_eq!(resolved("items[1]", &variables), Some(Value::from("b")));
        assert_eq!(resolve("items[9]", &variables), Resolution::Unresolved);
        assert_eq!(resolve("items[-1]", &variables), Resolution::Unresolved);
        assert_eq!(resolve("name[0]", &variables), Resolution::Unresolved);
    }

    #[test]
    fn test_ternary_bare_key() {
        let variables = vars(vec![
            ("isAdmin", Value::Bool(true)),
            ("empty", Value::from("")),
        ]);
        assert_eq!(
            resolved(r#"isAdmin ? "yes" : "no""#, &variables),
            Some(Value::from("yes"))
        );
        assert_eq!(
            resolved(r#"empty ? "yes" : "no""#, &variables),
            Some(Value::from("no"))
        );
        // unknown condition names leave the ternary unresolved
        assert_eq!(resolve("missing ? a : b", &variables), Resolution::Unresolved);
    }

    #[test]
    fn test_ternary_branch_is_not_resolved_again() {
        let variables = vars(vec![
            ("flag", Value::Bool(true)),
            ("name", Value::from("Sam")),
        ]);
        assert_eq!(
            resolved("flag ? name : other", &variables),
            Some(Value::from("name"))
        );
    }

    #[test]
    fn test_ternary_comparison_with_variable() {
        let variables = vars(vec![
            ("count", Value::from(12)),
            ("status", Value::from("active")),
        ]);
        assert_eq!(
            resolved("count > 5 ? many : few", &variables),
            Some(Value::from("many"))
        );
        assert_eq!(
            resolved(r#"status === "active" ? on : off"#, &variables),
            Some(Value::from("on"))
        );
        assert_eq!(
            resolved("status != active ? on : off", &variables),
            Some(Value::from("off"))
        );
    }

    #[test]
    fn test_ternary_literal_comparison_is_textual() {
        // Both sides fall back to text, so "5" > "10" holds
        let variables = Variables::new();
        assert_eq!(
            resolved("5 > 10 ? bigger : smaller", &variables),
            Some(Value::from("bigger"))
        );
    }

    #[test]
    fn test_ternary_number_against_literal_is_numeric() {
        let variables = vars(vec![("n", Value::from(5))]);
        assert_eq!(
            resolved("n > 10 ? bigger : smaller", &variables),
            Some(Value::from("smaller"))
        );
    }

    #[test]
    fn test_ternary_path_condition_without_comparison_is_unresolved() {
        let variables = vars(vec![(
            "user",
            Value::object([("admin", Value::Bool(true))]),
        )]);
        assert_eq!(resolve("user.admin ? yes : no", &variables), Resolution::Unresolved);
        assert_eq!(resolve("items[0] ? yes : no", &variables), Resolution::Unresolved);
        // a comparison is still evaluated; `true` is not a key, so it is compared as text
        assert_eq!(
            resolved("user.admin == true ? yes : no", &variables),
            Some(Value::from("no"))
        );
    }

    #[test]
    fn test_unparseable_is_unresolved() {
        let variables = vars(vec![("a", Value::from(1))]);
        assert_eq!(resolve("a +", &variables), Resolution::Unresolved);
        assert_eq!(resolve("'literal'", &variables), Resolution::Unresolved);
        assert_eq!(resolve("", &variables), Resolution::Unresolved);
    }

    #[test]
    fn test_loose_equality_rules() {
        assert!(loose_equals(&Value::from(1), &Value::from("1")));
        assert!(loose_equals(&Value::Bool(true), &Value::from(1)));
        assert!(!loose_equals(&Value::Bool(true), &Value::from("true")));
        assert!(!loose_equals(&Value::Null, &Value::from(0)));
        assert!(loose_equals(&Value::Null, &Value::Null));
        assert!(loose_equals(&Value::strings(["a", "b"]), &Value::from("a,b")));
    }

    #[test]
    fn test_strict_equality_rules() {
        assert!(strict_equals(&Value::from(1), &Value::from(1)));
        assert!(!strict_equals(&Value::from(1), &Value::from("1")));
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn test_relational_rules() {
        assert!(compare(&Value::from("5"), CompareOp::Greater, &Value::from("10")));
        assert!(!compare(&Value::from(5), CompareOp::Greater, &Value::from("10")));
        assert!(compare(&Value::from(3), CompareOp::LessOrEqual, &Value::from(3)));
        assert!(!compare(&Value::from("abc"), CompareOp::Less, &Value::from(1)));
        assert!(!compare(&Value::from("abc"), CompareOp::GreaterOrEqual, &Value::from(1)));
    }
}
