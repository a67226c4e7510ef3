//! Domain models for the authz PEP.
//!
//! A request is always the composition of exactly one subject, one action and
//! one resource attribute set. The three set types can only be built by the
//! wrappers in [`crate::pep::wrappers`], so an engine never sees an attribute
//! outside the documented id set.

use std::fmt;
use std::sync::Arc;

use pep_security::RequestContext;
use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeSet, attribute_ids};

/// Outcome of evaluating one request.
///
/// `Unrecognized` keeps the raw code of anything the engine reported that is
/// not one of the four XACML decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Permit,
    Deny,
    Indeterminate,
    NotApplicable,
    Unrecognized(i32),
}

impl Decision {
    /// Map an XACML decision code (`0..=3`) to a decision.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Permit,
            1 => Self::Deny,
            2 => Self::Indeterminate,
            3 => Self::NotApplicable,
            other => Self::Unrecognized(other),
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Permit => 0,
            Self::Deny => 1,
            Self::Indeterminate => 2,
            Self::NotApplicable => 3,
            Self::Unrecognized(code) => code,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permit => f.write_str("Permit"),
            Self::Deny => f.write_str("Deny"),
            Self::Indeterminate => f.write_str("Indeterminate"),
            Self::NotApplicable => f.write_str("NotApplicable"),
            Self::Unrecognized(code) => write!(f, "Unrecognized({code})"),
        }
    }
}

/// Result of evaluating one [`EvaluationRequest`]. Produced by engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub decision: Decision,
    /// Resource the engine evaluated, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Engine status detail (e.g. why the result is indeterminate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl EvaluationResult {
    #[must_use]
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            resource_id: None,
            status_message: None,
        }
    }

    #[must_use]
    pub fn for_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }
}

/// Subject attribute set: default marker plus optional login id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectAttributes(AttributeSet);

impl SubjectAttributes {
    pub(crate) fn new(set: AttributeSet) -> Self {
        Self(set)
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.0
    }

    /// Login id, `None` for an anonymous subject.
    #[must_use]
    pub fn login_id(&self) -> Option<&str> {
        self.0.value(attribute_ids::SUBJECT_LOGIN_ID)
    }
}

/// Action attribute set: default marker, id, api and context index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionAttributes(AttributeSet);

impl ActionAttributes {
    pub(crate) fn new(set: AttributeSet) -> Self {
        Self(set)
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.0
    }

    #[must_use]
    pub fn action_id(&self) -> &str {
        self.0.value(attribute_ids::ACTION_ID).unwrap_or_default()
    }

    #[must_use]
    pub fn action_api(&self) -> &str {
        self.0.value(attribute_ids::ACTION_API).unwrap_or_default()
    }

    #[must_use]
    pub fn context_index(&self) -> &str {
        self.0
            .value(attribute_ids::ACTION_CONTEXT_INDEX)
            .unwrap_or_default()
    }
}

/// Resource attribute set: default marker, resource id and namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceAttributes(AttributeSet);

impl ResourceAttributes {
    pub(crate) fn new(set: AttributeSet) -> Self {
        Self(set)
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.0
    }

    /// Resource id; empty means "unscoped".
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.0.value(attribute_ids::RESOURCE_ID).unwrap_or_default()
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0
            .value(attribute_ids::RESOURCE_NAMESPACE)
            .unwrap_or_default()
    }
}

/// One request submitted to the decision engine.
///
/// Subject and action sets are shared by every request of a batch.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub subject: Arc<SubjectAttributes>,
    pub action: Arc<ActionAttributes>,
    pub resource: ResourceAttributes,
}

/// Target of an enforcement call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(default)]
    pub namespace: String,
}

impl ResourceRef {
    #[must_use]
    pub fn new(id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
        }
    }

    /// The empty-id sentinel for operations that are not scoped to an object.
    #[must_use]
    pub fn unscoped() -> Self {
        Self::default()
    }
}

/// Inputs of one enforcement call.
///
/// # Examples
///
/// ```
/// use authz_pep_sdk::EnforcementRequest;
///
/// let request = EnforcementRequest::new("getDatastream", "API-A")
///     .subject("fedoraAdmin")
///     .context_index("ctx-1")
///     .resource("obj:42", "example-ns");
///
/// assert_eq!(request.resources.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnforcementRequest {
    /// `None` or empty means anonymous.
    pub subject_login_id: Option<String>,
    pub action_id: String,
    pub action_api: String,
    pub context_index: String,
    /// Evaluated as one batch; allowed only if every entry is.
    pub resources: Vec<ResourceRef>,
}

impl EnforcementRequest {
    /// Create a request for an action, with an anonymous subject and no resources.
    #[must_use]
    pub fn new(action_id: impl Into<String>, action_api: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            action_api: action_api.into(),
            ..Self::default()
        }
    }

    /// Create a request whose subject is the login id asserted by `ctx`.
    #[must_use]
    pub fn for_context(
        ctx: &dyn RequestContext,
        action_id: impl Into<String>,
        action_api: impl Into<String>,
    ) -> Self {
        Self::new(action_id, action_api).subject_login_id(ctx.subject_login_id().map(str::to_owned))
    }

    #[must_use]
    pub fn subject(mut self, login_id: impl Into<String>) -> Self {
        self.subject_login_id = Some(login_id.into());
        self
    }

    /// Set or clear the subject login id.
    #[must_use]
    pub fn subject_login_id(mut self, login_id: Option<String>) -> Self {
        self.subject_login_id = login_id;
        self
    }

    #[must_use]
    pub fn context_index(mut self, context_index: impl Into<String>) -> Self {
        self.context_index = context_index.into();
        self
    }

    /// Append one resource to the batch.
    #[must_use]
    pub fn resource(mut self, id: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.resources.push(ResourceRef::new(id, namespace));
        self
    }

    /// Replace the whole resource batch.
    #[must_use]
    pub fn resources(mut self, resources: Vec<ResourceRef>) -> Self {
        self.resources = resources;
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn decision_codes_follow_xacml() {
        assert_eq!(Decision::from_code(0), Decision::Permit);
        assert_eq!(Decision::from_code(1), Decision::Deny);
        assert_eq!(Decision::from_code(2), Decision::Indeterminate);
        assert_eq!(Decision::from_code(3), Decision::NotApplicable);
        assert_eq!(Decision::from_code(7), Decision::Unrecognized(7));
        assert_eq!(Decision::from_code(-1).code(), -1);
    }

    #[test]
    fn decision_serializes_snake_case() {
        let json = serde_json::to_string(&Decision::NotApplicable).unwrap();
        assert_eq!(json, r#""not_applicable""#);

        let back: Decision = serde_json::from_str(r#""permit""#).unwrap();
        assert_eq!(back, Decision::Permit);
    }

    #[test]
    fn enforcement_request_builder_chain() {
        let request = EnforcementRequest::new("getDatastream", "API-A")
            .subject("fedoraAdmin")
            .context_index("ctx-9")
            .resource("obj:42", "example-ns")
            .resource("", "");

        assert_eq!(request.subject_login_id.as_deref(), Some("fedoraAdmin"));
        assert_eq!(request.action_id, "getDatastream");
        assert_eq!(request.action_api, "API-A");
        assert_eq!(request.context_index, "ctx-9");
        assert_eq!(
            request.resources,
            vec![ResourceRef::new("obj:42", "example-ns"), ResourceRef::unscoped()]
        );
    }

    #[test]
    fn for_context_takes_the_login_id() {
        use pep_security::{SecurityContext, StaticContext};

        let request = EnforcementRequest::for_context(&StaticContext::new(), "listObjects", "API-A");
        assert_eq!(request.subject_login_id.as_deref(), Some("fedoraAdmin"));

        let request =
            EnforcementRequest::for_context(&SecurityContext::anonymous(), "listObjects", "API-A");
        assert_eq!(request.subject_login_id, None);
        assert_eq!(request.action_id, "listObjects");
    }

    #[test]
    fn subject_can_be_cleared() {
        let request = EnforcementRequest::new("ingest", "API-M")
            .subject("alice")
            .subject_login_id(None);

        assert_eq!(request.subject_login_id, None);
    }
}
