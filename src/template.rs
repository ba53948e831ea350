//! # Cluster Templates
//!
//! A template is Liquid text that renders to a YAML mapping with two
//! sections:
//!
//! - `defaults`: template-specific default configuration. It may itself
//!   refer to configuration values, e.g. a worker count that depends on the
//!   chosen instance type.
//! - `options`: the options passed to `create-cluster`.
//!
//! Variables that the context does not provide render as the empty string.
//!
//! [`resolve_template`] renders a template three times with progressively
//! more complete context, so `defaults` can depend on user values without
//! a separate expression language:
//!
//! 1. render with an empty context to learn the shape of `defaults`;
//! 2. render with those raw defaults overlaid by the user configuration and
//!    keep the resolved `defaults`;
//! 3. overlay the user configuration on the resolved defaults and render a
//!    last time to obtain `options`.

use std::borrow::Cow;
use std::path::Path;

use log::{debug, trace};
use regex::Regex;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::defaults::SPOT_CLUSTER_TEMPLATE;
use crate::error::{Error, Result};
use crate::merge::yaml::merge;
use crate::merge::Document;

/// Words inside blocks that are never variables.
const KEYWORDS: &[&str] = &[
    "if", "elsif", "else", "endif", "unless", "endunless", "case", "when", "endcase", "for",
    "endfor", "in", "and", "or", "contains", "assign", "capture", "endcapture", "comment",
    "endcomment", "raw", "endraw", "true", "false", "nil", "null", "empty", "blank", "break",
    "continue",
];

/// Renders Liquid templates against configuration documents.
pub struct TemplateRenderer {
    parser: liquid::Parser,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| Error::Template {
                message: format!("Failed to build Liquid parser: {}", e),
                variable: None,
            })?;
        Ok(Self { parser })
    }

    /// Render `template` to text.
    pub fn render_text(&self, template: &str, context: &Document) -> Result<String> {
        let mut context = context.clone();
        let mut shadowed = None;
        for variable in extract_template_variables(template)? {
            if fill_missing(&mut context, &variable) {
                debug!("`{}` passes through a non-mapping value and renders empty", variable);
                if shadowed.is_none() {
                    shadowed = Some(variable);
                }
            }
        }

        let parsed = self.parser.parse(template).map_err(|e| Error::Template {
            message: format!("Template parse error: {}", e),
            variable: None,
        })?;
        let globals = to_liquid_object(&context);
        let rendered = parsed.render(&globals).map_err(|e| Error::Template {
            message: format!("Template render error: {}", e),
            variable: shadowed,
        })?;

        trace!("Rendered template:\n{}", rendered);
        Ok(rendered)
    }

    /// Render `template` and parse the result as a YAML mapping.
    pub fn render(&self, template: &str, context: &Document) -> Result<Document> {
        let rendered = self.render_text(template, context)?;
        let value: YamlValue = serde_yaml::from_str(&rendered).map_err(|e| Error::Template {
            message: format!("Rendered template is not valid YAML: {}", e),
            variable: None,
        })?;
        match value {
            YamlValue::Null => Ok(Document::new()),
            YamlValue::Mapping(doc) => Ok(doc),
            _ => Err(Error::Template {
                message: "Rendered template is not a YAML mapping".to_string(),
                variable: None,
            }),
        }
    }
}

/// Result of resolving a template against a user configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    /// Template defaults overlaid with the user configuration.
    pub config: Document,
    /// The `options` section rendered against `config`.
    pub options: Document,
}

/// Resolve `template` against `user_config` with the three-pass protocol.
pub fn resolve_template(
    renderer: &TemplateRenderer,
    template: &str,
    user_config: &Document,
) -> Result<ResolvedTemplate> {
    let unresolved_defaults = section(&renderer.render(template, &Document::new())?, "defaults")?
        .unwrap_or_default();
    trace!("Unresolved defaults: {:?}", unresolved_defaults);

    let bootstrap = merge(&unresolved_defaults, user_config);
    let defaults = section(&renderer.render(template, &bootstrap)?, "defaults")?.unwrap_or_default();
    debug!("Template defaults: {:?}", defaults);

    let config = merge(&defaults, user_config);
    let rendered = renderer.render(template, &config)?;
    debug!("Cluster configuration: {:?}", rendered);

    let options = section(&rendered, "options")?.ok_or(Error::MissingSection { section: "options" })?;
    Ok(ResolvedTemplate { config, options })
}

/// Read a top-level mapping section; a missing or null section is `None`.
fn section(doc: &Document, name: &'static str) -> Result<Option<Document>> {
    match doc.get(name) {
        None | Some(YamlValue::Null) => Ok(None),
        Some(YamlValue::Mapping(map)) => Ok(Some(map.clone())),
        Some(_) => Err(Error::Template {
            message: format!("`{}` section must be a mapping", name),
            variable: None,
        }),
    }
}

/// Load template text from `path`, or the built-in spot cluster template.
pub fn load_template(path: Option<&Path>) -> Result<Cow<'static, str>> {
    match path {
        None => Ok(Cow::Borrowed(SPOT_CLUSTER_TEMPLATE)),
        Some(path) if !path.exists() => Err(Error::FileNotFound {
            kind: "Template",
            path: path.to_path_buf(),
        }),
        Some(path) => Ok(Cow::Owned(std::fs::read_to_string(path)?)),
    }
}

/// Collect the dotted variable paths referenced by `template`.
fn extract_template_variables(template: &str) -> Result<Vec<String>> {
    let regex = |pattern: &str| {
        Regex::new(pattern).map_err(|e| Error::Template {
            message: format!("Invalid variable pattern: {}", e),
            variable: None,
        })
    };
    let blocks = regex(r"(?s)\{\{(.*?)\}\}|\{%(.*?)%\}")?;
    let strings = regex(r#""[^"]*"|'[^']*'"#)?;
    let names = regex(r"[A-Za-z_][A-Za-z0-9_-]*(?:\.[A-Za-z_][A-Za-z0-9_-]*)*")?;

    let mut variables: Vec<String> = Vec::new();
    for block in blocks.captures_iter(template) {
        let Some(body) = block.get(1).or_else(|| block.get(2)) else {
            continue;
        };
        let body = strings.replace_all(body.as_str(), " ");
        for found in names.find_iter(&body) {
            let variable = found.as_str();
            if KEYWORDS.contains(&variable) || variables.iter().any(|v| v == variable) {
                continue;
            }
            variables.push(variable.to_string());
        }
    }
    Ok(variables)
}

/// Insert nil at `path` unless something is already there.
///
/// Missing or null intermediate segments become mappings. A scalar or
/// sequence in the way is replaced by an empty mapping, so the reference
/// renders empty; only the render context is touched. Returns `true` when
/// a value had to be shadowed.
fn fill_missing(context: &mut Document, path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return false;
    };

    let mut shadowed = false;
    let mut current = context;
    for segment in parents {
        let entry = current
            .entry(YamlValue::from(*segment))
            .or_insert(YamlValue::Null);
        if !entry.is_mapping() {
            shadowed |= !entry.is_null();
            *entry = YamlValue::Mapping(Mapping::new());
        }
        current = match entry {
            YamlValue::Mapping(map) => map,
            _ => return shadowed,
        };
    }
    current.entry(YamlValue::from(*leaf)).or_insert(YamlValue::Null);
    shadowed
}

fn to_liquid_object(doc: &Document) -> liquid::Object {
    let mut object = liquid::Object::new();
    for (key, value) in doc {
        if let Some(key) = key_text(key) {
            object.insert(key.into(), to_liquid_value(value));
        }
    }
    object
}

fn to_liquid_value(value: &YamlValue) -> liquid::model::Value {
    use liquid::model::Value;

    match value {
        YamlValue::Null => Value::Nil,
        YamlValue::Bool(b) => Value::scalar(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::scalar(i)
            } else {
                Value::scalar(n.as_f64().unwrap_or_default())
            }
        }
        YamlValue::String(s) => Value::scalar(s.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(to_liquid_value).collect()),
        YamlValue::Mapping(map) => Value::Object(to_liquid_object(map)),
        YamlValue::Tagged(tagged) => to_liquid_value(&tagged.value),
    }
}

fn key_text(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
