//! Declared field schemas for validation targets

use super::registry::{RuleRegistry, parse_rules};
use super::rule::{Rule, SchemaError};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Wire name that excludes a field from validation and error reporting
pub const SKIP_WIRE_NAME: &str = "-";

/// A request type that can be populated from a payload and checked
///
/// Field values are read from the target's serialized form, so wire names
/// are the serde names. Targets usually carry `#[serde(default)]` so that
/// missing keys populate as zero values and are reported by `required`
/// rather than failing to decode.
///
/// Prefer [`impl_validate!`](crate::impl_validate) over implementing this by
/// hand.
pub trait Validate: DeserializeOwned + Serialize {
    fn schema() -> Schema;
}

/// One field of a schema: identifier, wire name and ordered rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub ident: String,
    pub wire_name: String,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(
        ident: impl Into<String>,
        wire_name: impl Into<String>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        Self {
            ident: ident.into(),
            wire_name: wire_name.into(),
            rules: rules.into_iter().collect(),
        }
    }

    /// True when the field is excluded from validation
    pub fn is_skipped(&self) -> bool {
        self.wire_name == SKIP_WIRE_NAME || self.wire_name.is_empty()
    }
}

/// Ordered list of field specs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; fields are evaluated in the order they are added
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Append a field whose identifier equals its wire name
    pub fn rule(self, wire_name: &str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(FieldSpec::new(wire_name, wire_name, rules))
    }

    /// Build a schema from `(ident, wire_name, tags)` triples
    ///
    /// ```
    /// use restkit::core::validation::{RuleRegistry, Schema};
    ///
    /// let schema = Schema::from_tags(
    ///     &RuleRegistry::default(),
    ///     &[
    ///         ("user_name", "username", "required,min=3,max=16"),
    ///         ("password", "password", "required,min=8,max=32,password"),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn from_tags(
        registry: &RuleRegistry,
        fields: &[(&str, &str, &str)],
    ) -> Result<Self, SchemaError> {
        fields
            .iter()
            .try_fold(Schema::new(), |schema, (ident, wire, tags)| {
                let rules = parse_rules(registry, tags)?;
                Ok(schema.field(FieldSpec::new(*ident, *wire, rules)))
            })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, wire_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = Schema::new()
            .rule("b", [Rule::Required])
            .rule("a", [Rule::Required])
            .rule("c", []);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.wire_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_skip_wire_name() {
        assert!(FieldSpec::new("secret", "-", [Rule::Required]).is_skipped());
        assert!(!FieldSpec::new("name", "name", [Rule::Required]).is_skipped());
    }

    #[test]
    fn test_from_tags_rejects_unknown_rule() {
        let err = Schema::from_tags(&RuleRegistry::default(), &[("code", "code", "shiny")]);
        assert_eq!(
            err,
            Err(SchemaError::UnknownRule {
                tag: "shiny".to_string()
            })
        );
    }

    #[test]
    fn test_from_tags_maps_ident_and_wire() {
        let schema = Schema::from_tags(
            &RuleRegistry::default(),
            &[("first_name", "firstName", "required")],
        )
        .unwrap();
        let spec = schema.get("firstName").unwrap();
        assert_eq!(spec.ident, "first_name");
        assert_eq!(spec.rules, vec![Rule::Required]);
    }
}
