//! Codegen Templates - a rendering engine for source-code templates
//!
//! Templates embed `{{expr}}` substitutions, `{{#helper args}}` calls and
//! `{{> partial}}` inclusions in ordinary source text. The engine infers the
//! variables a template needs, validates a context against them, and renders
//! the final text. Nothing here fails hard: unresolvable tokens stay in the
//! output and are reported as diagnostics.
//!
//! # Example
//!
//! ```rust
//! use codegen_templates::{render, Registry, TemplateContext};
//!
//! let registry = Registry::new();
//! let context = TemplateContext::new().with_variable("name", "Sam");
//!
//! let out = render("Hi {{name}}, {{#uppercase done}}", &context, &registry);
//! assert_eq!(out.output, "Hi Sam, DONE\n");
//! assert!(out.is_clean());
//! ```

pub mod context;
pub mod error;
pub mod expression;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod template;
pub mod validation;
pub mod value;

pub use context::{ContextError, TemplateContext, Variables};
pub use error::ExpressionError;
pub use expression::{parse_expression, Expr};
pub use registry::{Helper, HelperError, PartialSet, PartialSetError, Registry};
pub use renderer::{Diagnostic, RenderOutput, Renderer};
pub use resolver::{resolve, Resolution};
pub use template::{check_expressions, parse_template, ParsedTemplate, TemplateVariable};
pub use validation::{validate_context, ValidationResult, ValidationRule};
pub use value::{Value, VariableType};

/// Configuration for the render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Normalise blank lines and the trailing newline after substitution
    pub cleanup: bool,
    /// Log the full text after each phase at debug level
    pub trace_phases: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cleanup: true,
            trace_phases: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the cleanup phase
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Enable or disable logging of intermediate text
    pub fn with_trace_phases(mut self, trace: bool) -> Self {
        self.trace_phases = trace;
        self
    }
}

/// Render a template with default configuration
///
/// Helpers and partials are looked up in `context` first, then in
/// `registry`.
pub fn render(template: &str, context: &TemplateContext, registry: &Registry) -> RenderOutput {
    render_with_config(template, context, registry, RenderConfig::default())
}

/// Render a template with custom configuration
///
/// # Example
///
/// ```rust
/// use codegen_templates::{render_with_config, RenderConfig, Registry, TemplateContext};
///
/// let config = RenderConfig::new().with_cleanup(false);
/// let out = render_with_config("{{missing}}", &TemplateContext::new(), &Registry::new(), config);
///
/// assert_eq!(out.output, "{{missing}}");
/// assert_eq!(out.diagnostics.len(), 1);
/// ```
pub fn render_with_config(
    template: &str,
    context: &TemplateContext,
    registry: &Registry,
    config: RenderConfig,
) -> RenderOutput {
    Renderer::new(registry)
        .with_config(config)
        .render(template, context)
}
