//! End-to-end tests: parse, validate and render realistic templates

use codegen_templates::{
    check_expressions, parse_template, render, validate_context, PartialSet, Registry,
    TemplateContext, Value, VariableType,
};
use pretty_assertions::assert_eq;

const COMPONENT: &str = r#"/**
 * React component scaffold
 * @version 2.1.0
 * @author Design Systems
 * @tags react, component
 * @complexity intermediate
 */
{{> license}}
{{#comment Generated by codegen-templates}}
import React from 'react';
import { clsx } from 'clsx';
import styles from './{{fileName}}.module.css';



export interface {{componentName}}Props {
  label: string;
}

export const {{componentName}} = ({ label }: {{componentName}}Props) => (
  <button className={clsx(styles.root, "{{variant}}")} disabled={ {{disabled ? "true" : "false"}} }>
    {label} {{theme.accent}} {{sizes[1]}}
  </button>
);
"#;

const PARTIALS: &str = r#"
[metadata]
name = "react"
description = "Shared React snippets"

[partials]
license = "// SPDX-License-Identifier: MIT"
"#;

fn registry() -> Registry {
    let mut registry = Registry::new();
    let set = PartialSet::from_toml_str(PARTIALS).expect("valid partial set");
    registry.load_partials(&set);
    registry
}

fn component_context() -> TemplateContext {
    TemplateContext::from_json(serde_json::json!({
        "fileName": "primary-button",
        "componentName": "PrimaryButton",
        "variant": "solid",
        "disabled": false,
        "theme": {"accent": "blue"},
        "sizes": ["sm", "md", "lg"],
    }))
    .expect("object context")
}

#[test]
fn test_component_analysis() {
    let parsed = parse_template(COMPONENT);

    let variables: Vec<(&str, VariableType)> = parsed
        .variables
        .iter()
        .map(|v| (v.name.as_str(), v.var_type))
        .collect();
    assert_eq!(
        variables,
        vec![
            ("fileName", VariableType::String),
            ("componentName", VariableType::String),
            ("variant", VariableType::String),
            ("disabled", VariableType::Boolean),
            ("theme", VariableType::Object),
            ("sizes", VariableType::Array),
        ]
    );

    let deps: Vec<&str> = parsed.dependencies.iter().map(String::as_str).collect();
    assert_eq!(deps, vec!["clsx", "react"]);

    assert_eq!(parsed.metadata.version, "2.1.0");
    assert_eq!(parsed.metadata.author, "Design Systems");
    assert_eq!(parsed.metadata.tags, vec!["react".to_string(), "component".to_string()]);
    assert_eq!(parsed.metadata.estimated_lines, COMPONENT.split('\n').count());
}

#[test]
fn test_component_render() {
    let ctx = component_context();
    assert!(validate_context(&parse_template(COMPONENT), &ctx).valid);

    let out = render(COMPONENT, &ctx, &registry());
    assert!(out.is_clean(), "diagnostics: {:?}", out.diagnostics);

    let body = out
        .output
        .split_once("*/\n")
        .map(|(_, body)| body)
        .unwrap_or_default();
    insta::assert_snapshot!(body.trim_end(), @r###"
    // SPDX-License-Identifier: MIT
    // Generated by codegen-templates
    import React from 'react';
    import { clsx } from 'clsx';
    import styles from './primary-button.module.css';

    export interface PrimaryButtonProps {
      label: string;
    }

    export const PrimaryButton = ({ label }: PrimaryButtonProps) => (
      <button className={clsx(styles.root, "solid")} disabled={ false }>
        {label} blue md
      </button>
    );
    "###);
}

#[test]
fn test_partial_context_is_shared() {
    let mut registry = Registry::new();
    registry.register_partial("greeting", "Hello {{who}}");

    let ctx = TemplateContext::new().with_variable("who", "world");
    let out = render("{{> greeting}}!", &ctx, &registry);
    assert_eq!(out.output, "Hello world!\n");
}

#[test]
fn test_degraded_render_lists_every_problem() {
    let ctx = TemplateContext::new().with_variable("user", Value::object([("id", Value::from(7))]));
    let out = render(
        "{{user.id}} {{user.name}} {{#indent text wide}} {{items[0].name}}",
        &ctx,
        &Registry::new(),
    );

    assert_eq!(
        out.output,
        "7 {{user.name}} {{#indent text wide}} {{items[0].name}}\n"
    );
    let messages: Vec<String> = out.diagnostics.iter().map(|d| d.to_string()).collect();
    insta::assert_debug_snapshot!(messages, @r###"
    [
        "helper 'indent' failed: helper 'indent' got invalid argument 'wide': invalid digit found in string",
        "unresolved expression '{{user.name}}'",
        "unresolved expression '{{items[0].name}}'",
    ]
    "###);
}

#[test]
fn test_validation_reports_and_warns() {
    let parsed = parse_template("{{items[0]}} {{title}}");
    let ctx = TemplateContext::new()
        .with_variable("items", "nope")
        .with_variable("unused", true);

    let result = validate_context(&parsed, &ctx);
    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec![
            "Variable 'items' should be array but is string".to_string(),
            "Required variable 'title' is missing".to_string(),
        ]
    );
    assert_eq!(
        result.warnings,
        vec!["Variable 'unused' is not used by the template".to_string()]
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], false);
}

#[test]
fn test_expression_lint_points_into_template() {
    let template = "ok {{name}}\nbad {{user.}}\n";
    let errors = check_expressions(template);
    assert_eq!(errors.len(), 1);

    let span = errors[0].span().clone();
    assert!(template[..span.start].contains("bad {{"));

    let report = errors[0].format(template, "component.tsx");
    assert!(report.contains("component.tsx"));
}

#[test]
fn test_toml_context() {
    let ctx = TemplateContext::from_toml_str(
        r#"
name = "api"
[server]
port = 8080
"#,
    )
    .unwrap();
    let out = render("{{name}}:{{server.port}}", &ctx, &Registry::new());
    assert_eq!(out.output, "api:8080\n");
}
