//! URI template registry and component extraction.
//!
//! Templates use the subset of RFC 6570 needed for schema URLs:
//! simple variables (`{host}`), path segments (`{/segments}`, `{/segments*}`)
//! and fragments (`{#fragment}`, `{#fragments*}`). Extraction runs the
//! template in reverse, turning a concrete URL back into its variables.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::SchemaError;
use crate::types::VERSION_TEMPLATE;

/// One `{...}` expression of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Expression {
    operator: Option<char>,
    name: String,
    explode: bool,
}

/// A compiled URI template.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    pattern: String,
    expressions: Vec<Expression>,
    matcher: Regex,
}

impl UriTemplate {
    /// Compile a template pattern.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidTemplate` for unbalanced braces,
    /// unsupported operators, or malformed variable names.
    pub fn parse(name: &str, pattern: &str) -> Result<Self, SchemaError> {
        let invalid = |message: &str| SchemaError::InvalidTemplate {
            name: name.to_string(),
            pattern: pattern.to_string(),
            message: message.to_string(),
        };

        let mut expressions = Vec::new();
        let mut source = String::from("^");
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            if literal.contains('}') {
                return Err(invalid("unexpected '}'"));
            }
            source.push_str(&regex::escape(literal));

            let close = tail.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let expression = parse_expression(&tail[1..close]).map_err(|m| invalid(&m))?;
            source.push_str(&expression_regex(expressions.len(), &expression));
            expressions.push(expression);
            rest = &tail[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unexpected '}'"));
        }
        source.push_str(&regex::escape(rest));
        source.push('$');

        let matcher = Regex::new(&source).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            expressions,
            matcher,
        })
    }

    /// The template as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match `url` against the template and collect its variables.
    ///
    /// Returns `None` when the URL does not fit the template grammar, or when
    /// no path or fragment component could be captured (e.g. `http://host/`
    /// or `http://host/#`).
    pub fn extract(&self, url: &str) -> Option<UriMatch> {
        let captures = self.matcher.captures(url)?;
        let mut variables = IndexMap::new();
        let mut has_component = false;

        for (i, expression) in self.expressions.iter().enumerate() {
            let Some(raw) = captures.name(&group_name(i)) else {
                continue;
            };
            let values = split_values(expression, raw.as_str());
            if values.is_empty() {
                continue;
            }
            if expression.operator.is_some() {
                has_component = true;
            }
            variables.insert(expression.name.clone(), values);
        }

        if !has_component {
            return None;
        }
        Some(UriMatch { variables })
    }
}

/// Variables extracted from a URL, each as an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UriMatch {
    variables: IndexMap<String, Vec<String>>,
}

impl UriMatch {
    /// Values captured for `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.variables.get(name).map(Vec::as_slice)
    }

    /// Path components, if the template captured any.
    pub fn segments(&self) -> Option<&[String]> {
        self.get("segments")
    }

    /// Fragment components (`fragments*` or `fragment`), if captured.
    pub fn fragments(&self) -> Option<&[String]> {
        self.get("fragments").or_else(|| self.get("fragment"))
    }
}

/// Named URI templates, compiled once per engine.
#[derive(Debug, Clone)]
pub struct UrlTemplates {
    templates: IndexMap<String, UriTemplate>,
    fallback: UriTemplate,
}

impl UrlTemplates {
    /// Compile every named pattern.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidTemplate` if a pattern does not parse, or
    /// if no `version` template (the fallback) is present.
    pub fn new(patterns: &IndexMap<String, String>) -> Result<Self, SchemaError> {
        let templates = patterns
            .iter()
            .map(|(name, pattern)| Ok((name.clone(), UriTemplate::parse(name, pattern)?)))
            .collect::<Result<IndexMap<_, _>, SchemaError>>()?;

        let fallback = templates
            .get(VERSION_TEMPLATE)
            .cloned()
            .ok_or_else(|| SchemaError::InvalidTemplate {
                name: VERSION_TEMPLATE.to_string(),
                pattern: String::new(),
                message: "fallback template is missing".to_string(),
            })?;

        Ok(Self {
            templates,
            fallback,
        })
    }

    /// Template registered under `name`, or the `version` template.
    pub fn template(&self, name: &str) -> &UriTemplate {
        self.templates.get(name).unwrap_or(&self.fallback)
    }

    /// Extract URL components using the template registered under `name`.
    pub fn extract(&self, url: &str, name: &str) -> Option<UriMatch> {
        self.template(name).extract(url)
    }
}

fn parse_expression(body: &str) -> Result<Expression, String> {
    let (operator, spec) = match body.chars().next() {
        Some(op @ ('/' | '#')) => (Some(op), &body[1..]),
        Some(op @ ('+' | '.' | ';' | '?' | '&')) => {
            return Err(format!("unsupported operator '{}'", op));
        }
        Some(_) => (None, body),
        None => return Err("empty expression".to_string()),
    };

    let (name, explode) = match spec.strip_suffix('*') {
        Some(name) => (name, true),
        None => (spec, false),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid variable name '{}'", name));
    }

    Ok(Expression {
        operator,
        name: name.to_string(),
        explode,
    })
}

fn group_name(index: usize) -> String {
    format!("v{}", index)
}

// Group names are positional so a variable may appear more than once.
fn expression_regex(index: usize, expression: &Expression) -> String {
    let group = group_name(index);
    match (expression.operator, expression.explode) {
        (None, _) => format!("(?P<{}>[^/?#]*)", group),
        (Some('/'), true) => format!("(?P<{}>(?:/[^/?#]*)*)", group),
        (Some('/'), false) => format!("(?:/(?P<{}>[^/?#]*))?", group),
        _ => format!("(?:#(?P<{}>.*))?", group),
    }
}

fn split_values(expression: &Expression, raw: &str) -> Vec<String> {
    let parts: Vec<&str> = match (expression.operator, expression.explode) {
        (Some('/'), true) => raw.trim_start_matches('/').split('/').collect(),
        (Some('#'), true) => raw.split(',').collect(),
        _ => vec![raw],
    };
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
