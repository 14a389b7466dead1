//! Token patterns of the template syntax
//!
//! - `{{expr}}` variable or expression substitution
//! - `{{#helper arg1 arg2}}` helper invocation
//! - `{{> partial}}` partial inclusion

use once_cell::sync::Lazy;
use regex::Regex;

/// Any `{{...}}` token; group 1 is the raw inner text
pub(crate) static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid token pattern"));

/// `{{#name args}}`; group 1 is the helper name, group 2 the raw arguments
pub(crate) static HELPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{#(\w+)([^}]*)\}\}").expect("valid helper pattern"));

/// `{{> name}}`; group 1 is the partial name
pub(crate) static PARTIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{>\s*([\w./-]+)\s*\}\}").expect("valid partial pattern"));

/// Whether a token's inner text is a helper call or partial inclusion
pub(crate) fn is_directive(inner: &str) -> bool {
    let trimmed = inner.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pattern() {
        let inners: Vec<_> = TOKEN
            .captures_iter("a {{x}} b {{ user.name }} {{#h 1}}")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(inners, vec!["x", " user.name ", "#h 1"]);
    }

    #[test]
    fn test_helper_pattern() {
        let caps = HELPER.captures("{{#join a,b,c |}}").unwrap();
        assert_eq!(&caps[1], "join");
        assert_eq!(caps[2].split_whitespace().collect::<Vec<_>>(), vec!["a,b,c", "|"]);
    }

    #[test]
    fn test_partial_pattern() {
        assert_eq!(&PARTIAL.captures("{{> header}}").unwrap()[1], "header");
        assert_eq!(&PARTIAL.captures("{{>react/props}}").unwrap()[1], "react/props");
        assert!(PARTIAL.captures("{{> two words}}").is_none());
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("#upper x"));
        assert!(is_directive(" > header"));
        assert!(!is_directive("name"));
    }
}
