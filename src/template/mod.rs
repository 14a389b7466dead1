//! Template analysis
//!
//! [`parse_template`] derives the static contract of a template: the
//! variables it uses (with types inferred from how they are used), the
//! external modules it imports, and the metadata in its leading doc comment.
//!
//! # Example
//!
//! ```text
//! /** @version 1.2.0 @tags react */
//! import React from 'react';
//!
//! export const {{componentName}} = () => <div>{{props.title}}</div>;
//! ```

mod check;
mod metadata;
mod parser;
pub(crate) mod syntax;

pub use check::check_expressions;
pub use metadata::{parse_metadata, Complexity, TemplateMetadata};
pub use parser::{parse_template, ParsedTemplate, TemplateVariable};
