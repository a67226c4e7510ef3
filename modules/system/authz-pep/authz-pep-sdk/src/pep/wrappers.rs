//! Attribute wrappers.
//!
//! Package subject, action and resource descriptors into the attribute sets
//! the engine expects. Every set carries its default marker attribute with an
//! empty value, so policies can target "any subject/action/resource" without
//! the wrappers knowing which policies exist.

use tracing::debug;

use crate::attributes::{Attribute, AttributeSet, attribute_ids};
use crate::models::{ActionAttributes, ResourceAttributes, SubjectAttributes};

/// Resource descriptor that cannot be turned into attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("authorization operational error: {reason}")]
pub struct OperationalError {
    pub reason: String,
}

impl OperationalError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

fn push(op: &'static str, set: &mut AttributeSet, attribute: Attribute) {
    debug!(
        op,
        id = attribute.id,
        data_type = attribute.data_type.uri(),
        value = %attribute.value,
        "wrapped attribute"
    );
    set.insert(attribute);
}

/// Wrap the subject identity.
///
/// The login id attribute is added only for a non-empty login id; `None` and
/// `""` both describe an anonymous subject.
#[must_use]
pub fn wrap_subject(login_id: Option<&str>) -> SubjectAttributes {
    let mut set = AttributeSet::default();
    push(
        "wrap_subject",
        &mut set,
        Attribute::string(attribute_ids::SUBJECT_MARKER, ""),
    );
    if let Some(login_id) = login_id.filter(|id| !id.is_empty()) {
        push(
            "wrap_subject",
            &mut set,
            Attribute::string(attribute_ids::SUBJECT_LOGIN_ID, login_id),
        );
    }
    SubjectAttributes::new(set)
}

/// Wrap the action descriptor. Always yields four attributes, empty inputs included.
#[must_use]
pub fn wrap_action(action_id: &str, action_api: &str, context_index: &str) -> ActionAttributes {
    let mut set = AttributeSet::default();
    for attribute in [
        Attribute::string(attribute_ids::ACTION_MARKER, ""),
        Attribute::string(attribute_ids::ACTION_ID, action_id),
        Attribute::string(attribute_ids::ACTION_API, action_api),
        Attribute::string(attribute_ids::ACTION_CONTEXT_INDEX, context_index),
    ] {
        push("wrap_action", &mut set, attribute);
    }
    ActionAttributes::new(set)
}

/// Wrap a resource descriptor. An empty `resource_id` is the "unscoped" sentinel.
///
/// # Errors
///
/// Returns [`OperationalError`] if either value contains a control character.
pub fn wrap_resource(
    resource_id: &str,
    namespace: &str,
) -> Result<ResourceAttributes, OperationalError> {
    ensure_printable("resource id", resource_id)?;
    ensure_printable("namespace", namespace)?;

    let mut set = AttributeSet::default();
    for attribute in [
        Attribute::string(attribute_ids::RESOURCE_MARKER, ""),
        Attribute::string(attribute_ids::RESOURCE_ID, resource_id),
        Attribute::string(attribute_ids::RESOURCE_NAMESPACE, namespace),
    ] {
        push("wrap_resource", &mut set, attribute);
    }
    Ok(ResourceAttributes::new(set))
}

fn ensure_printable(field: &str, value: &str) -> Result<(), OperationalError> {
    if value.chars().any(char::is_control) {
        return Err(OperationalError::new(format!(
            "{field} {value:?} contains a control character"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn anonymous_subject_has_only_the_marker() {
        for subject in [wrap_subject(None), wrap_subject(Some(""))] {
            let attrs = subject.attributes();
            assert_eq!(attrs.len(), 1);
            assert_eq!(attrs.value(attribute_ids::SUBJECT_MARKER), Some(""));
            assert!(!attrs.contains(attribute_ids::SUBJECT_LOGIN_ID));
            assert_eq!(subject.login_id(), None);
        }
    }

    #[test]
    fn named_subject_has_marker_and_login_id() {
        let subject = wrap_subject(Some("alice"));
        let attrs = subject.attributes();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.value(attribute_ids::SUBJECT_MARKER), Some(""));
        assert_eq!(attrs.value(attribute_ids::SUBJECT_LOGIN_ID), Some("alice"));
    }

    #[test]
    fn action_always_has_four_attributes() {
        let action = wrap_action("ingest", "API-M", "ctx-1");
        let attrs = action.attributes();

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.value(attribute_ids::ACTION_MARKER), Some(""));
        assert_eq!(attrs.value(attribute_ids::ACTION_ID), Some("ingest"));
        assert_eq!(attrs.value(attribute_ids::ACTION_API), Some("API-M"));
        assert_eq!(attrs.value(attribute_ids::ACTION_CONTEXT_INDEX), Some("ctx-1"));
    }

    #[test]
    fn empty_action_inputs_are_kept_as_empty_values() {
        let action = wrap_action("", "", "");
        let attrs = action.attributes();

        assert_eq!(attrs.len(), 4);
        assert!(attrs.iter().all(|a| a.value.is_empty()));
    }

    #[test]
    fn resource_has_marker_id_and_namespace() {
        let resource = wrap_resource("obj:42", "example-ns").unwrap();

        assert_eq!(resource.attributes().len(), 3);
        assert_eq!(resource.resource_id(), "obj:42");
        assert_eq!(resource.namespace(), "example-ns");
        assert_eq!(
            resource.attributes().value(attribute_ids::RESOURCE_MARKER),
            Some("")
        );
    }

    #[test]
    fn unscoped_resource_is_valid() {
        let resource = wrap_resource("", "").unwrap();

        assert_eq!(resource.attributes().len(), 3);
        assert_eq!(resource.resource_id(), "");
        assert_eq!(resource.namespace(), "");
    }

    #[test]
    fn malformed_resource_is_an_operational_error() {
        let err = wrap_resource("obj:\u{0}42", "ns").unwrap_err();
        assert!(err.reason.contains("resource id"));

        let err = wrap_resource("obj:42", "ns\n").unwrap_err();
        assert!(err.reason.contains("namespace"));
    }
}
