//! # Input Validation Gate
//!
//! Per-route rule sets over raw request input. Execution collects every
//! violated rule's message in declaration order (it never stops at the
//! first failure); a non-empty collection becomes a `BadRequest` whose
//! detail is the full ordered list. A clean pass normalizes the input
//! (numeric strings to numbers, boolean-like strings to booleans), applies
//! defaults, and attaches the whitelisted field set to the context.
//!
//! A field that is required and absent reports its type message followed by
//! its required message, in that order.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::core::{ApiError, ApiResult};

use super::{Gate, RequestContext};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

// Strict numeric syntax: an optional sign, then digits with at most one
// decimal point. No exponents, no whitespace, no NaN/inf spellings.
fn numeric_regex() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d+)?|\.\d+)$").expect("numeric pattern is valid")
    })
}

/// Where a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body,
    Path,
}

/// Type/format predicate applied to a present value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Any string.
    Text,
    /// A number, or a string that parses as one (coerced to a number).
    Number,
    /// A boolean, or `"true"`/`"false"` (coerced to a boolean).
    Boolean,
    /// A string with email syntax.
    Email,
    /// A string whose content is numeric. Stays a string: used for path
    /// ids, which address documents by their textual form.
    NumericText,
}

impl Check {
    /// Validate and normalize a present value. `None` means the check
    /// failed.
    fn normalize(self, value: &Value) -> Option<Value> {
        match self {
            Self::Text => value.as_str().map(|s| Value::String(s.to_string())),
            Self::Number => match value {
                Value::Number(_) => Some(value.clone()),
                Value::String(raw) => parse_number(raw),
                _ => None,
            },
            Self::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::String(raw) if raw == "true" => Some(Value::Bool(true)),
                Value::String(raw) if raw == "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Self::Email => value
                .as_str()
                .filter(|s| email_regex().is_match(s))
                .map(|s| Value::String(s.to_string())),
            Self::NumericText => value
                .as_str()
                .filter(|s| numeric_regex().is_match(s))
                .map(|s| Value::String(s.to_string())),
        }
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if !numeric_regex().is_match(raw) {
        return None;
    }
    let parsed: f64 = raw.parse().ok()?;
    Number::from_f64(parsed).map(Value::Number)
}

/// A single field rule: location, requiredness, predicate, and the human
/// messages for each way it can be violated.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    source: Source,
    required: bool,
    check: Check,
    /// Violation message for the type/format predicate.
    check_message: &'static str,
    /// Violation message for emptiness, when the rule forbids it.
    empty_message: Option<&'static str>,
}

/// An ordered list of field rules plus the defaults applied after a clean
/// pass.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<FieldRule>,
    defaults: Vec<(&'static str, Value)>,
}

impl RuleSet {
    /// Login credentials: email syntax plus a non-empty password.
    pub fn login() -> Self {
        Self {
            name: "login",
            rules: vec![
                FieldRule {
                    field: "email",
                    source: Source::Body,
                    required: true,
                    check: Check::Email,
                    check_message: "Debe proporcionar un email válido.",
                    empty_message: Some("El email es requerido."),
                },
                FieldRule {
                    field: "password",
                    source: Source::Body,
                    required: true,
                    check: Check::Text,
                    check_message: "La contraseña debe ser un texto.",
                    empty_message: Some("La contraseña es requerida."),
                },
            ],
            defaults: Vec::new(),
        }
    }

    /// Product creation: name, price, and quantity required; availability
    /// optional, defaulting to true.
    pub fn create_product() -> Self {
        Self {
            name: "create_product",
            rules: vec![
                FieldRule {
                    field: "nombre",
                    source: Source::Body,
                    required: true,
                    check: Check::Text,
                    check_message: "El nombre debe ser un texto.",
                    empty_message: Some("El nombre es requerido."),
                },
                FieldRule {
                    field: "precio",
                    source: Source::Body,
                    required: true,
                    check: Check::Number,
                    check_message: "El precio debe ser un número.",
                    empty_message: Some("El precio es requerido."),
                },
                FieldRule {
                    field: "disponible",
                    source: Source::Body,
                    required: false,
                    check: Check::Boolean,
                    check_message: "Disponible debe ser un valor booleano.",
                    empty_message: None,
                },
                FieldRule {
                    field: "cantidad",
                    source: Source::Body,
                    required: true,
                    check: Check::Number,
                    check_message: "La cantidad debe ser un número.",
                    empty_message: Some("La cantidad es requerida."),
                },
            ],
            defaults: vec![("disponible", Value::Bool(true))],
        }
    }

    /// Strict id policy: the path id must be numeric. Used by the get and
    /// delete routes.
    pub fn product_id() -> Self {
        Self {
            name: "product_id",
            rules: vec![FieldRule {
                field: "id",
                source: Source::Path,
                required: true,
                check: Check::NumericText,
                check_message: "El ID debe ser un número.",
                empty_message: None,
            }],
            defaults: Vec::new(),
        }
    }

    /// Update: the path id may be any string (the permissive id policy);
    /// every body field is optional but validated when present.
    pub fn update_product() -> Self {
        Self {
            name: "update_product",
            rules: vec![
                FieldRule {
                    field: "id",
                    source: Source::Path,
                    required: true,
                    check: Check::Text,
                    check_message: "El ID debe ser un texto.",
                    empty_message: None,
                },
                FieldRule {
                    field: "nombre",
                    source: Source::Body,
                    required: false,
                    check: Check::Text,
                    check_message: "El nombre debe ser un texto.",
                    empty_message: Some("El nombre no puede estar vacío."),
                },
                FieldRule {
                    field: "precio",
                    source: Source::Body,
                    required: false,
                    check: Check::Number,
                    check_message: "El precio debe ser un número.",
                    empty_message: Some("El precio no puede estar vacío."),
                },
                FieldRule {
                    field: "disponible",
                    source: Source::Body,
                    required: false,
                    check: Check::Boolean,
                    check_message: "Disponible debe ser un valor booleano.",
                    empty_message: None,
                },
                FieldRule {
                    field: "cantidad",
                    source: Source::Body,
                    required: false,
                    check: Check::Number,
                    check_message: "La cantidad debe ser un número.",
                    empty_message: None,
                },
            ],
            defaults: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run every rule against the context's raw input. Returns the
    /// normalized, whitelisted field map, or the ordered list of every
    /// violation.
    pub fn check(&self, ctx: &RequestContext) -> Result<Map<String, Value>, Vec<String>> {
        let mut violations = Vec::new();
        let mut data = Map::new();

        for rule in &self.rules {
            let value = match rule.source {
                Source::Body => ctx.body_field(rule.field),
                Source::Path => ctx.param(rule.field),
            };

            match value {
                None | Some(Value::Null) => {
                    if rule.required {
                        violations.push(rule.check_message.to_string());
                        if let Some(message) = rule.empty_message {
                            violations.push(message.to_string());
                        }
                    }
                }
                Some(present) => {
                    // The type predicate and the emptiness check accumulate
                    // independently; an empty string can violate both.
                    let mut clean = true;
                    let normalized = rule.check.normalize(present);
                    if normalized.is_none() {
                        violations.push(rule.check_message.to_string());
                        clean = false;
                    }
                    if present.as_str().map_or(false, str::is_empty) {
                        if let Some(message) = rule.empty_message {
                            violations.push(message.to_string());
                            clean = false;
                        }
                    }
                    if clean {
                        if let Some(normalized) = normalized {
                            data.insert(rule.field.to_string(), normalized);
                        }
                    }
                }
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        for (field, default) in &self.defaults {
            data.entry(field.to_string()).or_insert_with(|| default.clone());
        }

        Ok(data)
    }
}

/// Gate wrapping a rule set.
pub struct ValidateGate {
    rules: RuleSet,
}

impl ValidateGate {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl Gate for ValidateGate {
    fn name(&self) -> &'static str {
        self.rules.name()
    }

    fn apply(&self, ctx: &mut RequestContext) -> ApiResult<()> {
        match self.rules.check(ctx) {
            Ok(data) => {
                ctx.set_data(data);
                Ok(())
            }
            Err(violations) => Err(ApiError::bad_request(violations)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_ctx(body: Value) -> RequestContext {
        RequestContext::new().with_body(body)
    }

    #[test]
    fn missing_required_field_reports_type_then_required_message() {
        let ctx = body_ctx(json!({ "precio": 10.0, "cantidad": 1.0 }));
        let violations = RuleSet::create_product().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec![
                "El nombre debe ser un texto.".to_string(),
                "El nombre es requerido.".to_string(),
            ]
        );
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let ctx = body_ctx(json!({}));
        let violations = RuleSet::create_product().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec![
                "El nombre debe ser un texto.".to_string(),
                "El nombre es requerido.".to_string(),
                "El precio debe ser un número.".to_string(),
                "El precio es requerido.".to_string(),
                "La cantidad debe ser un número.".to_string(),
                "La cantidad es requerida.".to_string(),
            ]
        );
    }

    #[test]
    fn wrong_type_reports_only_the_type_message() {
        let ctx = body_ctx(json!({ "nombre": 7, "precio": 10.0, "cantidad": 1.0 }));
        let violations = RuleSet::create_product().check(&ctx).unwrap_err();
        assert_eq!(violations, vec!["El nombre debe ser un texto.".to_string()]);
    }

    #[test]
    fn empty_name_reports_the_required_message() {
        let ctx = body_ctx(json!({ "nombre": "", "precio": 10.0, "cantidad": 1.0 }));
        let violations = RuleSet::create_product().check(&ctx).unwrap_err();
        assert_eq!(violations, vec!["El nombre es requerido.".to_string()]);
    }

    #[test]
    fn clean_create_input_is_normalized_with_defaults() {
        let ctx = body_ctx(json!({
            "nombre": "Teclado",
            "precio": "99.5",
            "cantidad": 3,
            "extra": "dropped",
        }));
        let data = RuleSet::create_product().check(&ctx).unwrap();
        assert_eq!(data["nombre"], json!("Teclado"));
        assert_eq!(data["precio"], json!(99.5));
        assert_eq!(data["cantidad"], json!(3));
        // absent availability defaults to true
        assert_eq!(data["disponible"], json!(true));
        // unknown fields never pass the whitelist
        assert!(!data.contains_key("extra"));
    }

    #[test]
    fn boolean_like_strings_are_coerced() {
        let ctx = body_ctx(json!({
            "nombre": "Teclado",
            "precio": 1.0,
            "cantidad": 1.0,
            "disponible": "false",
        }));
        let data = RuleSet::create_product().check(&ctx).unwrap();
        assert_eq!(data["disponible"], json!(false));

        let ctx = body_ctx(json!({
            "nombre": "Teclado",
            "precio": 1.0,
            "cantidad": 1.0,
            "disponible": "yes",
        }));
        let violations = RuleSet::create_product().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec!["Disponible debe ser un valor booleano.".to_string()]
        );
    }

    #[test]
    fn login_rules_pin_their_messages() {
        let ctx = body_ctx(json!({}));
        let violations = RuleSet::login().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec![
                "Debe proporcionar un email válido.".to_string(),
                "El email es requerido.".to_string(),
                "La contraseña debe ser un texto.".to_string(),
                "La contraseña es requerida.".to_string(),
            ]
        );

        let ctx = body_ctx(json!({ "email": "not-an-email", "password": "x" }));
        let violations = RuleSet::login().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec!["Debe proporcionar un email válido.".to_string()]
        );
    }

    #[test]
    fn numeric_id_policy_keeps_the_string_form() {
        let ctx = RequestContext::new().with_param("id", "42");
        let data = RuleSet::product_id().check(&ctx).unwrap();
        assert_eq!(data["id"], json!("42"));

        let ctx = RequestContext::new().with_param("id", "abc");
        let violations = RuleSet::product_id().check(&ctx).unwrap_err();
        assert_eq!(violations, vec!["El ID debe ser un número.".to_string()]);
    }

    #[test]
    fn update_rules_accept_any_string_id_and_partial_bodies() {
        let ctx = RequestContext::new()
            .with_param("id", "abc-123")
            .with_body(json!({ "cantidad": 9 }));
        let data = RuleSet::update_product().check(&ctx).unwrap();
        assert_eq!(data["id"], json!("abc-123"));
        assert_eq!(data["cantidad"], json!(9));
        assert!(!data.contains_key("nombre"));
    }

    #[test]
    fn update_rejects_empty_optional_name() {
        let ctx = RequestContext::new()
            .with_param("id", "1")
            .with_body(json!({ "nombre": "" }));
        let violations = RuleSet::update_product().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec!["El nombre no puede estar vacío.".to_string()]
        );
    }

    #[test]
    fn update_with_empty_price_reports_both_violations() {
        let ctx = RequestContext::new()
            .with_param("id", "1")
            .with_body(json!({ "precio": "" }));
        let violations = RuleSet::update_product().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec![
                "El precio debe ser un número.".to_string(),
                "El precio no puede estar vacío.".to_string(),
            ]
        );
    }

    #[test]
    fn empty_email_reports_both_violations() {
        let ctx = body_ctx(json!({ "email": "", "password": "x" }));
        let violations = RuleSet::login().check(&ctx).unwrap_err();
        assert_eq!(
            violations,
            vec![
                "Debe proporcionar un email válido.".to_string(),
                "El email es requerido.".to_string(),
            ]
        );
    }

    #[test]
    fn numeric_id_policy_rejects_float_parser_extras() {
        for id in ["NaN", "inf", "1e3", " 5 ", ""] {
            let ctx = RequestContext::new().with_param("id", id);
            let violations = RuleSet::product_id().check(&ctx).unwrap_err();
            assert_eq!(
                violations,
                vec!["El ID debe ser un número.".to_string()],
                "id {id:?} should be rejected"
            );
        }

        for id in ["42", "-3", "0.5", "+7"] {
            let ctx = RequestContext::new().with_param("id", id);
            assert!(RuleSet::product_id().check(&ctx).is_ok(), "id {id:?} should pass");
        }
    }

    #[test]
    fn numeric_body_strings_must_be_strictly_numeric() {
        for precio in [" 5 ", "1e3", "NaN"] {
            let ctx = body_ctx(json!({
                "nombre": "Teclado",
                "precio": precio,
                "cantidad": 1.0,
            }));
            let violations = RuleSet::create_product().check(&ctx).unwrap_err();
            assert_eq!(
                violations,
                vec!["El precio debe ser un número.".to_string()],
                "precio {precio:?} should be rejected"
            );
        }
    }
}
