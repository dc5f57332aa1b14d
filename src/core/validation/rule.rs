//! Field rules and tag-string parsing

use thiserror::Error;

/// A single check applied to a field value
///
/// Rules on a field are evaluated in declaration order and evaluation stops
/// at the first failure, so the order of a field's rule list decides which
/// message is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Fails on the zero value: null, `""`, `0`, `false`, `[]`, `{}`
    Required,

    /// Skips the remaining rules when the value is the zero value
    OmitEmpty,

    /// Lower bound: code points for strings, elements for arrays, value for numbers
    Min(usize),

    /// Upper bound, measured like [`Rule::Min`]
    Max(usize),

    /// Exact size, measured like [`Rule::Min`]
    Len(usize),

    Email,

    Url,

    /// Value must equal one of the listed options
    OneOf(Vec<String>),

    /// String must begin with the prefix
    StartsWith(String),

    /// A rule registered by name in the [`RuleRegistry`](super::RuleRegistry)
    Custom { name: String, param: Option<String> },
}

impl Rule {
    pub fn required() -> Self {
        Rule::Required
    }

    pub fn omit_empty() -> Self {
        Rule::OmitEmpty
    }

    pub fn min(n: usize) -> Self {
        Rule::Min(n)
    }

    pub fn max(n: usize) -> Self {
        Rule::Max(n)
    }

    pub fn len(n: usize) -> Self {
        Rule::Len(n)
    }

    pub fn email() -> Self {
        Rule::Email
    }

    pub fn url() -> Self {
        Rule::Url
    }

    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(options.into_iter().map(Into::into).collect())
    }

    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Rule::StartsWith(prefix.into())
    }

    /// Uppercase letter plus digit check registered by default
    pub fn password() -> Self {
        Rule::custom(super::registry::PASSWORD_RULE)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Rule::Custom {
            name: name.into(),
            param: None,
        }
    }

    pub fn custom_with(name: impl Into<String>, param: impl Into<String>) -> Self {
        Rule::Custom {
            name: name.into(),
            param: Some(param.into()),
        }
    }

    /// The tag name used for message lookup
    pub fn tag(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::OmitEmpty => "omitempty",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Len(_) => "len",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::OneOf(_) => "oneof",
            Rule::StartsWith(_) => "startswith",
            Rule::Custom { name, .. } => name,
        }
    }

    /// The configured parameter, rendered as it appears in messages
    pub fn param(&self) -> Option<String> {
        match self {
            Rule::Min(n) | Rule::Max(n) | Rule::Len(n) => Some(n.to_string()),
            Rule::OneOf(options) => Some(options.join(" ")),
            Rule::StartsWith(prefix) => Some(prefix.clone()),
            Rule::Custom { param, .. } => param.clone(),
            _ => None,
        }
    }

    /// Parse a single `name` or `name=param` tag
    pub fn parse(tag: &str) -> Result<Self, SchemaError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(SchemaError::EmptyTag);
        }

        let (name, param) = match tag.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (tag, None),
        };

        let rule = match name {
            "required" => Rule::Required,
            "omitempty" => Rule::OmitEmpty,
            "min" => Rule::Min(parse_size(name, param)?),
            "max" => Rule::Max(parse_size(name, param)?),
            "len" => Rule::Len(parse_size(name, param)?),
            "email" => Rule::Email,
            "url" => Rule::Url,
            "oneof" => {
                let options = require_param(name, param)?;
                Rule::one_of(options.split_whitespace())
            }
            "startswith" => Rule::StartsWith(require_param(name, param)?.to_string()),
            custom => Rule::Custom {
                name: custom.to_string(),
                param: param.map(str::to_string),
            },
        };

        Ok(rule)
    }

    /// Parse a comma-separated tag list such as `required,min=3,max=16`
    ///
    /// The returned rules keep the order of the tag string.
    pub fn parse_list(tags: &str) -> Result<Vec<Self>, SchemaError> {
        if tags.trim().is_empty() {
            return Ok(Vec::new());
        }
        tags.split(',').map(Rule::parse).collect()
    }
}

/// Errors raised while building a schema from tag strings
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("empty rule tag")]
    EmptyTag,

    #[error("rule '{tag}' requires a parameter")]
    MissingParam { tag: String },

    #[error("rule '{tag}' has an invalid parameter '{param}'")]
    InvalidParam { tag: String, param: String },

    #[error("rule '{tag}' is not registered")]
    UnknownRule { tag: String },
}

fn require_param<'a>(tag: &str, param: Option<&'a str>) -> Result<&'a str, SchemaError> {
    match param.map(str::trim) {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(SchemaError::MissingParam {
            tag: tag.to_string(),
        }),
    }
}

fn parse_size(tag: &str, param: Option<&str>) -> Result<usize, SchemaError> {
    let raw = require_param(tag, param)?;
    raw.parse().map_err(|_| SchemaError::InvalidParam {
        tag: tag.to_string(),
        param: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_keeps_order() {
        let rules = Rule::parse_list("required,min=3,max=16").unwrap();
        assert_eq!(rules, vec![Rule::Required, Rule::Min(3), Rule::Max(16)]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(Rule::parse_list("").unwrap().is_empty());
        assert!(Rule::parse_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_oneof_splits_on_whitespace() {
        let rule = Rule::parse("oneof=asc desc").unwrap();
        assert_eq!(rule, Rule::one_of(["asc", "desc"]));
        assert_eq!(rule.param().as_deref(), Some("asc desc"));
    }

    #[test]
    fn test_parse_startswith_keeps_prefix() {
        let rule = Rule::parse("startswith=acc_").unwrap();
        assert_eq!(rule, Rule::starts_with("acc_"));
        assert_eq!(rule.tag(), "startswith");
    }

    #[test]
    fn test_parse_unknown_becomes_custom() {
        assert_eq!(Rule::parse("password").unwrap(), Rule::password());
        assert_eq!(
            Rule::parse("divisible=3").unwrap(),
            Rule::custom_with("divisible", "3")
        );
    }

    #[test]
    fn test_parse_min_without_param_fails() {
        assert_eq!(
            Rule::parse("min"),
            Err(SchemaError::MissingParam {
                tag: "min".to_string()
            })
        );
    }

    #[test]
    fn test_parse_min_with_bad_param_fails() {
        assert_eq!(
            Rule::parse("max=ten"),
            Err(SchemaError::InvalidParam {
                tag: "max".to_string(),
                param: "ten".to_string()
            })
        );
    }

    #[test]
    fn test_parse_empty_tag_in_list_fails() {
        assert_eq!(Rule::parse_list("required,,min=3"), Err(SchemaError::EmptyTag));
    }

    #[test]
    fn test_params() {
        assert_eq!(Rule::Min(8).param().as_deref(), Some("8"));
        assert_eq!(Rule::Required.param(), None);
        assert_eq!(Rule::password().param(), None);
    }
}
