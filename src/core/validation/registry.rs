//! Rule definitions and message templates
//!
//! A [`RuleRegistry`] is assembled once at startup and is read-only
//! afterwards. It owns the custom rule checks (such as `password`) and the
//! English message templates used to translate failures.
//!
//! Templates use `{0}` for the field name and `{1}` for the rule parameter.

use super::rule::{Rule, SchemaError};
use crate::core::case::to_camel_case;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use validator::{ValidateEmail, ValidateUrl};

/// Name under which the password strength rule is registered
pub const PASSWORD_RULE: &str = "password";

/// Message reported by the password strength rule
pub const PASSWORD_MESSAGE: &str = "Password must contain an uppercase letter and a number";

/// Message template for `startswith`
pub const STARTS_WITH_MESSAGE: &str = "{0} must start with '{1}'";

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Nd}").expect("static pattern compiles"));

/// A custom rule check: receives the field value and the rule parameter
pub type RuleCheck = Arc<dyn Fn(&Value, Option<&str>) -> bool + Send + Sync>;

#[derive(Clone)]
struct CustomRule {
    check: RuleCheck,
    template: String,
}

/// Immutable set of custom rules and message overrides
#[derive(Clone)]
pub struct RuleRegistry {
    custom: HashMap<String, CustomRule>,
    messages: HashMap<String, String>,
}

impl RuleRegistry {
    /// Builder pre-loaded with the default custom rules
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new().register_rule(PASSWORD_RULE, PASSWORD_MESSAGE, |value, _| {
            value.as_str().is_some_and(is_strong_password)
        })
    }

    /// True when the rule's checks are known to this registry
    pub fn supports(&self, rule: &Rule) -> bool {
        match rule {
            Rule::Custom { name, .. } => self.custom.contains_key(name),
            _ => true,
        }
    }

    /// Names of the registered custom rules
    pub fn custom_rules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check `rule` against `value`, returning the translated message on failure
    ///
    /// `field` is the wire name. Every occurrence of it in the rendered
    /// message is replaced with its camelCase form.
    pub fn evaluate(&self, rule: &Rule, field: &str, value: &Value) -> Option<String> {
        if self.passes(rule, value) {
            None
        } else {
            Some(self.message(rule, field, value))
        }
    }

    /// Translate a failure of `rule` on `field`
    pub fn message(&self, rule: &Rule, field: &str, value: &Value) -> String {
        let param = rule.param().unwrap_or_default();
        let rendered = match self.template(rule, value) {
            Some(template) => render(&template, field, &param),
            None => format!(
                "Field validation for '{}' failed on the '{}' tag",
                field,
                rule.tag()
            ),
        };

        if field.is_empty() {
            rendered
        } else {
            rendered.replace(field, &to_camel_case(field))
        }
    }

    fn passes(&self, rule: &Rule, value: &Value) -> bool {
        match rule {
            Rule::Required => !is_zero(value),
            Rule::OmitEmpty => true,
            Rule::Min(n) => measure(value).is_none_or(|size| size >= *n as f64),
            Rule::Max(n) => measure(value).is_none_or(|size| size <= *n as f64),
            Rule::Len(n) => measure(value).is_none_or(|size| size == *n as f64),
            Rule::Email => value
                .as_str()
                .is_none_or(|s| s.to_string().validate_email()),
            Rule::Url => value.as_str().is_none_or(|s| s.to_string().validate_url()),
            Rule::OneOf(options) => match scalar_text(value) {
                Some(text) => options.iter().any(|o| *o == text),
                None => true,
            },
            Rule::StartsWith(prefix) => value.as_str().is_none_or(|s| s.starts_with(prefix.as_str())),
            Rule::Custom { name, param } => self
                .custom
                .get(name)
                .is_some_and(|rule| (rule.check)(value, param.as_deref())),
        }
    }

    fn template(&self, rule: &Rule, value: &Value) -> Option<String> {
        if let Some(template) = self.messages.get(rule.tag()) {
            return Some(template.clone());
        }
        if let Rule::Custom { name, .. } = rule {
            return self.custom.get(name).map(|c| c.template.clone());
        }
        default_template(rule, value)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("custom", &self.custom_rules())
            .field("messages", &self.messages)
            .finish()
    }
}

/// Collects rules and templates before the registry is frozen
///
/// # Example
///
/// ```
/// use restkit::core::validation::{RuleRegistry, Rule};
/// use serde_json::json;
///
/// let registry = RuleRegistry::builder()
///     .register_rule("even", "{0} must be even", |value, _| {
///         value.as_i64().is_some_and(|n| n % 2 == 0)
///     })
///     .override_message("required", "{0} cannot be blank")
///     .build();
///
/// let msg = registry.evaluate(&Rule::custom("even"), "page_size", &json!(3));
/// assert_eq!(msg.as_deref(), Some("pageSize must be even"));
/// ```
#[derive(Default)]
pub struct RuleRegistryBuilder {
    custom: HashMap<String, CustomRule>,
    messages: HashMap<String, String>,
}

impl RuleRegistryBuilder {
    /// Empty builder without the default custom rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a custom rule with its message template
    pub fn register_rule<F>(
        mut self,
        name: impl Into<String>,
        template: impl Into<String>,
        check: F,
    ) -> Self
    where
        F: Fn(&Value, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.custom.insert(
            name.into(),
            CustomRule {
                check: Arc::new(check),
                template: template.into(),
            },
        );
        self
    }

    /// Replace the template used for a tag, built-in or custom
    pub fn override_message(mut self, tag: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(tag.into(), template.into());
        self
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry {
            custom: self.custom,
            messages: self.messages,
        }
    }
}

/// Parse a tag list and reject custom rules the registry does not know
pub fn parse_rules(registry: &RuleRegistry, tags: &str) -> Result<Vec<Rule>, SchemaError> {
    let rules = Rule::parse_list(tags)?;
    if let Some(unknown) = rules.iter().find(|r| !registry.supports(r)) {
        return Err(SchemaError::UnknownRule {
            tag: unknown.tag().to_string(),
        });
    }
    Ok(rules)
}

/// True when the string has an uppercase letter and a decimal digit (`Nd`)
///
/// Other numeric characters such as `²`, `Ⅷ` or `½` do not count.
pub fn is_strong_password(password: &str) -> bool {
    let has_number = DECIMAL_DIGIT.is_match(password);
    let has_upper = password.chars().any(char::is_uppercase);
    has_number && has_upper
}

/// Zero value test used by `required` and `omitempty`
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

enum Kind {
    Text,
    Number,
    Items,
}

fn kind(value: &Value) -> Option<Kind> {
    match value {
        Value::String(_) => Some(Kind::Text),
        Value::Number(_) => Some(Kind::Number),
        Value::Array(_) => Some(Kind::Items),
        _ => None,
    }
}

fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Number(n) => n.as_f64(),
        Value::Array(items) => Some(items.len() as f64),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 { one.to_string() } else { many.to_string() }
}

fn default_template(rule: &Rule, value: &Value) -> Option<String> {
    let template = match (rule, kind(value)) {
        (Rule::Required, _) => "{0} is a required field".to_string(),
        (Rule::Min(n), Some(Kind::Text)) => {
            format!("{{0}} must be at least {{1}} {}", plural(*n, "character", "characters"))
        }
        (Rule::Min(_), Some(Kind::Number)) => "{0} must be {1} or greater".to_string(),
        (Rule::Min(n), Some(Kind::Items)) => {
            format!("{{0}} must contain at least {{1}} {}", plural(*n, "item", "items"))
        }
        (Rule::Max(n), Some(Kind::Text)) => {
            format!("{{0}} must be a maximum of {{1}} {}", plural(*n, "character", "characters"))
        }
        (Rule::Max(_), Some(Kind::Number)) => "{0} must be {1} or less".to_string(),
        (Rule::Max(n), Some(Kind::Items)) => {
            format!("{{0}} must contain at maximum {{1}} {}", plural(*n, "item", "items"))
        }
        (Rule::Len(n), Some(Kind::Text)) => {
            format!("{{0}} must be {{1}} {} in length", plural(*n, "character", "characters"))
        }
        (Rule::Len(_), Some(Kind::Number)) => "{0} must be equal to {1}".to_string(),
        (Rule::Len(n), Some(Kind::Items)) => {
            format!("{{0}} must contain {{1}} {}", plural(*n, "item", "items"))
        }
        (Rule::Email, _) => "{0} must be a valid email address".to_string(),
        (Rule::Url, _) => "{0} must be a valid URL".to_string(),
        (Rule::OneOf(_), _) => "{0} must be one of [{1}]".to_string(),
        (Rule::StartsWith(_), _) => STARTS_WITH_MESSAGE.to_string(),
        _ => return None,
    };
    Some(template)
}

fn render(template: &str, field: &str, param: &str) -> String {
    template.replace("{0}", field).replace("{1}", param)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> RuleRegistry {
        RuleRegistry::default()
    }

    #[test]
    fn test_required_zero_values_fail() {
        let r = registry();
        for zero in [json!(null), json!(""), json!(0), json!(false), json!([]), json!({})] {
            assert!(r.evaluate(&Rule::Required, "name", &zero).is_some(), "{zero}");
        }
        assert!(r.evaluate(&Rule::Required, "name", &json!("x")).is_none());
        assert!(r.evaluate(&Rule::Required, "age", &json!(7)).is_none());
    }

    #[test]
    fn test_required_message() {
        let msg = registry().evaluate(&Rule::Required, "username", &json!(""));
        assert_eq!(msg.as_deref(), Some("username is a required field"));
    }

    #[test]
    fn test_min_counts_code_points() {
        let r = registry();
        // three code points, nine bytes
        assert!(r.evaluate(&Rule::Min(3), "name", &json!("日本語")).is_none());
        assert!(r.evaluate(&Rule::Max(3), "name", &json!("日本語")).is_none());
        assert!(r.evaluate(&Rule::Min(4), "name", &json!("日本語")).is_some());
    }

    #[test]
    fn test_min_max_inclusive_bounds() {
        let r = registry();
        assert!(r.evaluate(&Rule::Min(3), "u", &json!("abc")).is_none());
        assert!(r.evaluate(&Rule::Max(16), "u", &json!("a".repeat(16))).is_none());
        assert!(r.evaluate(&Rule::Max(16), "u", &json!("a".repeat(17))).is_some());
    }

    #[test]
    fn test_min_message_by_kind() {
        let r = registry();
        assert_eq!(
            r.evaluate(&Rule::Min(3), "username", &json!("ad")).as_deref(),
            Some("username must be at least 3 characters")
        );
        assert_eq!(
            r.evaluate(&Rule::Min(1), "nickname", &json!("")).as_deref(),
            Some("nickname must be at least 1 character")
        );
        assert_eq!(
            r.evaluate(&Rule::Min(18), "age", &json!(12)).as_deref(),
            Some("age must be 18 or greater")
        );
        assert_eq!(
            r.evaluate(&Rule::Min(2), "tags", &json!(["a"])).as_deref(),
            Some("tags must contain at least 2 items")
        );
    }

    #[test]
    fn test_max_message() {
        let msg = registry().evaluate(&Rule::Max(32), "password", &json!("x".repeat(33)));
        assert_eq!(
            msg.as_deref(),
            Some("password must be a maximum of 32 characters")
        );
    }

    #[test]
    fn test_len_rule() {
        let r = registry();
        assert!(r.evaluate(&Rule::Len(4), "pin", &json!("1234")).is_none());
        assert_eq!(
            r.evaluate(&Rule::Len(4), "pin", &json!("123")).as_deref(),
            Some("pin must be 4 characters in length")
        );
    }

    #[test]
    fn test_message_embeds_camel_case_name() {
        let msg = registry().evaluate(&Rule::Required, "first_name", &json!(""));
        assert_eq!(msg.as_deref(), Some("firstName is a required field"));
    }

    #[test]
    fn test_password_rule() {
        let r = registry();
        let rule = Rule::password();
        assert_eq!(
            r.evaluate(&rule, "password", &json!("alllowercase123")).as_deref(),
            Some(PASSWORD_MESSAGE)
        );
        assert_eq!(
            r.evaluate(&rule, "password", &json!("NoDigitsHere")).as_deref(),
            Some(PASSWORD_MESSAGE)
        );
        assert!(r.evaluate(&rule, "password", &json!("Valid123")).is_none());
    }

    #[test]
    fn test_password_unicode_classes() {
        assert!(is_strong_password("Ünïcode٣"));
        assert!(!is_strong_password("ünïcode٣"));
    }

    #[test]
    fn test_password_needs_decimal_digit() {
        for weak in ["Password²", "PasswordⅧ", "Password½"] {
            assert!(!is_strong_password(weak), "{weak}");
            assert_eq!(
                registry()
                    .evaluate(&Rule::password(), "password", &json!(weak))
                    .as_deref(),
                Some(PASSWORD_MESSAGE)
            );
        }
        assert!(is_strong_password("Password7"));
    }

    #[test]
    fn test_starts_with_message() {
        let msg = registry().evaluate(&Rule::starts_with("acc_"), "account_ref", &json!("x_1"));
        assert_eq!(msg.as_deref(), Some("accountRef must start with 'acc_'"));
        assert!(
            registry()
                .evaluate(&Rule::starts_with("acc_"), "account_ref", &json!("acc_1"))
                .is_none()
        );
    }

    #[test]
    fn test_one_of() {
        let r = registry();
        let rule = Rule::one_of(["asc", "desc"]);
        assert!(r.evaluate(&rule, "dir", &json!("asc")).is_none());
        assert_eq!(
            r.evaluate(&rule, "dir", &json!("ASC")).as_deref(),
            Some("dir must be one of [asc desc]")
        );
        assert!(r.evaluate(&Rule::one_of(["1", "2"]), "n", &json!(2)).is_none());
    }

    #[test]
    fn test_email_and_url() {
        let r = registry();
        assert!(r.evaluate(&Rule::Email, "email", &json!("a@example.com")).is_none());
        assert_eq!(
            r.evaluate(&Rule::Email, "email", &json!("nope")).as_deref(),
            Some("email must be a valid email address")
        );
        assert!(r.evaluate(&Rule::Url, "site", &json!("https://example.com")).is_none());
        assert!(r.evaluate(&Rule::Url, "site", &json!("not a url")).is_some());
    }

    #[test]
    fn test_unregistered_custom_rule_fails_with_fallback() {
        let msg = registry().evaluate(&Rule::custom("mystery"), "code", &json!("x"));
        assert_eq!(
            msg.as_deref(),
            Some("Field validation for 'code' failed on the 'mystery' tag")
        );
    }

    #[test]
    fn test_override_message() {
        let r = RuleRegistry::builder()
            .override_message("required", "{0} cannot be blank")
            .build();
        assert_eq!(
            r.evaluate(&Rule::Required, "user_name", &json!("")).as_deref(),
            Some("userName cannot be blank")
        );
    }

    #[test]
    fn test_custom_rule_receives_param() {
        let r = RuleRegistryBuilder::new()
            .register_rule("divisible", "{0} must be divisible by {1}", |value, param| {
                let divisor = param.and_then(|p| p.parse::<i64>().ok()).unwrap_or(1);
                value.as_i64().is_some_and(|n| n % divisor == 0)
            })
            .build();
        let rule = Rule::custom_with("divisible", "5");
        assert!(r.evaluate(&rule, "step", &json!(10)).is_none());
        assert_eq!(
            r.evaluate(&rule, "step", &json!(7)).as_deref(),
            Some("step must be divisible by 5")
        );
    }

    #[test]
    fn test_parse_rules_rejects_unknown_custom() {
        let r = registry();
        assert!(parse_rules(&r, "required,password").is_ok());
        assert_eq!(
            parse_rules(&r, "required,sparkly"),
            Err(SchemaError::UnknownRule {
                tag: "sparkly".to_string()
            })
        );
    }

    #[test]
    fn test_bare_builder_has_no_password_rule() {
        let r = RuleRegistryBuilder::new().build();
        assert!(!r.supports(&Rule::password()));
        assert_eq!(registry().custom_rules(), vec![PASSWORD_RULE]);
    }
}
