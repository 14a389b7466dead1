//! Template metadata read from a leading `/** ... */` doc comment
//!
//! ```text
//! /**
//!  * @version 2.1.0
//!  * @author Platform Team
//!  * @description React function component
//!  * @tags react, component
//!  * @complexity intermediate
//!  */
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DOC_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*/\*\*([\s\S]*?)\*/").expect("valid doc comment pattern"));

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s*])@([A-Za-z]+)").expect("valid tag pattern"));

pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_AUTHOR: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Intermediate,
    Advanced,
}

impl Complexity {
    /// Parse a complexity name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Complexity::Simple),
            "intermediate" => Some(Complexity::Intermediate),
            "advanced" => Some(Complexity::Advanced),
            _ => None,
        }
    }
}

/// Descriptive information about a template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub version: String,
    pub author: String,
    pub description: String,
    pub tags: Vec<String>,
    pub complexity: Complexity,
    /// Line count of the raw template
    pub estimated_lines: usize,
}

impl TemplateMetadata {
    /// Metadata for a template without a doc comment
    pub fn defaults(estimated_lines: usize) -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            description: String::new(),
            tags: Vec::new(),
            complexity: Complexity::Simple,
            estimated_lines,
        }
    }
}

/// Extract metadata from the template's leading doc comment
///
/// Unknown tags and unparseable complexity values are ignored, leaving the
/// default in place.
pub fn parse_metadata(raw: &str) -> TemplateMetadata {
    let mut metadata = TemplateMetadata::defaults(raw.split('\n').count());

    let Some(body) = DOC_COMMENT.captures(raw).and_then(|c| c.get(1)) else {
        return metadata;
    };
    let body = body.as_str();

    let tags: Vec<_> = TAG.captures_iter(body).collect();
    for (i, caps) in tags.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = tags
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(body.len(), |m| m.start());
        let value = tag_value(&body[whole.end()..end]);

        match name.as_str() {
            "version" if !value.is_empty() => metadata.version = value,
            "author" if !value.is_empty() => metadata.author = value,
            "description" => metadata.description = value,
            "tags" => {
                metadata.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "complexity" => {
                if let Some(c) = Complexity::parse(&value) {
                    metadata.complexity = c;
                }
            }
            _ => {}
        }
    }

    metadata
}

/// First line of a tag's text without comment decoration
fn tag_value(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches('*')
        .trim()
        .to_string()
}
