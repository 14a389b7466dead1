//! Non-fatal findings collected while rendering

use thiserror::Error;

/// Something the renderer could not resolve
///
/// Each diagnostic corresponds to a token left verbatim in the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("unresolved expression '{{{{{expr}}}}}'")]
    UnresolvedExpression { expr: String },

    #[error("unknown helper '{name}'")]
    UnknownHelper { name: String },

    #[error("helper '{name}' failed: {message}")]
    HelperFailed { name: String, message: String },

    #[error("unknown partial '{name}'")]
    UnknownPartial { name: String },
}

/// Rendered text together with what went wrong producing it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutput {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutput {
    /// True when every token was resolved
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Unresolved expressions, in order of appearance
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnresolvedExpression { expr } => Some(expr.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let d = Diagnostic::UnresolvedExpression {
            expr: "user.missing".to_string(),
        };
        assert_eq!(d.to_string(), "unresolved expression '{{user.missing}}'");

        let d = Diagnostic::HelperFailed {
            name: "indent".to_string(),
            message: "bad width".to_string(),
        };
        assert_eq!(d.to_string(), "helper 'indent' failed: bad width");
    }

    #[test]
    fn test_is_clean() {
        let mut out = RenderOutput::default();
        assert!(out.is_clean());
        out.diagnostics.push(Diagnostic::UnknownPartial {
            name: "footer".to_string(),
        });
        assert!(!out.is_clean());
        assert_eq!(out.unresolved().count(), 0);
    }
}
