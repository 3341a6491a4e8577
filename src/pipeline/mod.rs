//! # Request Pipeline
//!
//! Each endpoint declares an explicit, ordered list of gates. A gate is a
//! pure function over the request context: it either continues (possibly
//! after updating the context) or short-circuits the whole chain with a
//! typed failure. Gates are synchronous; only the domain service behind
//! them suspends.

pub mod auth_gate;
pub mod validate;

use serde_json::{Map, Value};

pub use auth_gate::AuthenticateGate;
pub use validate::{RuleSet, ValidateGate};

use crate::auth::Principal;
use crate::core::ApiResult;

/// Per-request state threaded through the gate chain: the raw inputs a
/// request arrived with, plus whatever the gates attach (the authenticated
/// principal, the normalized field set).
#[derive(Debug, Default)]
pub struct RequestContext {
    authorization: Option<String>,
    params: Map<String, Value>,
    body: Value,
    principal: Option<Principal>,
    data: Map<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the raw `Authorization` header value.
    pub fn with_authorization(mut self, header: Option<&str>) -> Self {
        self.authorization = header.map(str::to_string);
        self
    }

    /// Attach a path parameter.
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params
            .insert(name.to_string(), Value::String(value.into()));
        self
    }

    /// Attach the raw request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Replace the normalized, whitelisted field set.
    pub fn set_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Take the normalized field set out of the context.
    pub fn take_data(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.data)
    }

    /// Deserialize the normalized field set into a typed value.
    pub fn validated<T: serde::de::DeserializeOwned>(&mut self) -> ApiResult<T> {
        let data = self.take_data();
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// A pipeline stage: inspect/transform the context, or short-circuit with
/// a typed failure.
pub trait Gate: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut RequestContext) -> ApiResult<()>;
}

/// An ordered gate chain for one endpoint. The first failing gate stops
/// the chain; later gates never run.
#[derive(Default)]
pub struct Pipeline {
    gates: Vec<Box<dyn Gate>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gate. Declaration order is execution order.
    pub fn gate(mut self, gate: impl Gate + 'static) -> Self {
        self.gates.push(Box::new(gate));
        self
    }

    /// Run every gate in order against the context.
    pub fn run(&self, ctx: &mut RequestContext) -> ApiResult<()> {
        for gate in &self.gates {
            if let Err(err) = gate.apply(ctx) {
                tracing::debug!(
                    gate = gate.name(),
                    kind = err.kind(),
                    "gate short-circuited the request"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}
