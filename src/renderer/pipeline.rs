//! The four rendering phases
//!
//! Phases run once each, in order, over the whole text:
//!
//! 1. partial expansion (`{{> name}}`)
//! 2. helper expansion (`{{#name args}}`)
//! 3. variable substitution (`{{expr}}`)
//! 4. whitespace cleanup
//!
//! Nothing is re-scanned. A partial that includes another partial leaves the
//! inner `{{> ...}}` in place, while expressions inside partials and helper
//! output are still substituted by the later phases. Anything that cannot be
//! resolved stays in the output verbatim and is reported as a [`Diagnostic`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::diagnostics::{Diagnostic, RenderOutput};
use crate::context::TemplateContext;
use crate::registry::{Helper, Registry};
use crate::resolver::resolve;
use crate::template::syntax::{is_directive, HELPER, PARTIAL, TOKEN};
use crate::RenderConfig;

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank run pattern"));

/// Renders templates against one registry
///
/// Per-call overrides in the [`TemplateContext`] take precedence over the
/// registry for both helpers and partials.
#[derive(Debug, Clone)]
pub struct Renderer<'r> {
    registry: &'r Registry,
    config: RenderConfig,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run the full pipeline
    pub fn render(&self, template: &str, context: &TemplateContext) -> RenderOutput {
        let mut diagnostics = Vec::new();

        let text = self.expand_partials(template, context, &mut diagnostics);
        self.trace_phase("partials", &text);

        let text = self.expand_helpers(&text, context, &mut diagnostics);
        self.trace_phase("helpers", &text);

        let text = substitute_variables(&text, context, &mut diagnostics);
        self.trace_phase("variables", &text);

        let output = if self.config.cleanup {
            cleanup(&text)
        } else {
            text
        };

        tracing::debug!(
            diagnostics = diagnostics.len(),
            bytes = output.len(),
            "Rendered template"
        );

        RenderOutput {
            output,
            diagnostics,
        }
    }

    /// Phase 1: replace `{{> name}}` with the partial's raw text
    pub fn expand_partials(
        &self,
        text: &str,
        context: &TemplateContext,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        PARTIAL
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                let partial = context
                    .partials
                    .get(name)
                    .map(String::as_str)
                    .or_else(|| self.registry.partial(name));

                match partial {
                    Some(body) => body.to_string(),
                    None => {
                        tracing::debug!(partial = name, "Unknown partial");
                        diagnostics.push(Diagnostic::UnknownPartial {
                            name: name.to_string(),
                        });
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Phase 2: replace `{{#name args}}` with the helper's result
    ///
    /// Arguments are the whitespace-separated words after the name, passed
    /// as written.
    pub fn expand_helpers(
        &self,
        text: &str,
        context: &TemplateContext,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        HELPER
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                let args: Vec<&str> = caps[2].split_whitespace().collect();

                let Some(helper) = self.lookup_helper(name, context) else {
                    tracing::debug!(helper = name, "Unknown helper");
                    diagnostics.push(Diagnostic::UnknownHelper {
                        name: name.to_string(),
                    });
                    return caps[0].to_string();
                };

                match helper.call(&args) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::debug!(helper = name, error = %e, "Helper failed");
                        diagnostics.push(Diagnostic::HelperFailed {
                            name: name.to_string(),
                            message: e.to_string(),
                        });
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    fn lookup_helper<'a>(
        &'a self,
        name: &str,
        context: &'a TemplateContext,
    ) -> Option<&'a Helper> {
        context
            .helpers
            .get(name)
            .or_else(|| self.registry.helper(name))
    }

    fn trace_phase(&self, phase: &str, text: &str) {
        if self.config.trace_phases {
            tracing::debug!(phase, text, "Render phase complete");
        } else {
            tracing::debug!(phase, "Render phase complete");
        }
    }
}

/// Phase 3: replace each remaining `{{expr}}` with its resolved value
///
/// Helper and partial tokens that survived the earlier phases are skipped;
/// they were already reported.
pub fn substitute_variables(
    text: &str,
    context: &TemplateContext,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures| {
            let inner = &caps[1];
            if is_directive(inner) {
                return caps[0].to_string();
            }

            let expr = inner.trim();
            match resolve(expr, &context.variables)
                .into_value()
                .and_then(|v| v.render())
            {
                Some(rendered) => rendered,
                None => {
                    tracing::trace!(expr, "Unresolved expression");
                    diagnostics.push(Diagnostic::UnresolvedExpression {
                        expr: expr.to_string(),
                    });
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Phase 4: normalise blank lines
///
/// Runs of three or more newlines become two, one leading newline is
/// dropped, and the text ends with exactly one newline.
pub fn cleanup(text: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(text, "\n\n");
    let body = collapsed.strip_prefix('\n').unwrap_or(&collapsed);
    let mut out = body.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}
