//! Template renderer
//!
//! Turns template text plus a context into output text, collecting
//! diagnostics for every token it had to leave unresolved.

pub mod diagnostics;
pub mod pipeline;

pub use diagnostics::{Diagnostic, RenderOutput};
pub use pipeline::{cleanup, substitute_variables, Renderer};
