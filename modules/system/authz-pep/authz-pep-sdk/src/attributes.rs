//! Attribute representation handed to the decision engine.
//!
//! Attribute ids form a closed set: every id a request can carry is listed in
//! [`attribute_ids`]. Values are always strings; emptiness, not absence,
//! signals "don't care".

use serde::Serialize;

/// Well-known attribute ids (XACML 1.0 markers and Fedora 2.1 names).
pub mod attribute_ids {
    /// Default subject marker, always present with an empty value.
    pub const SUBJECT_MARKER: &str = "urn:oasis:names:tc:xacml:1.0:subject:subject-id";
    pub const SUBJECT_LOGIN_ID: &str = "urn:fedora:names:fedora:2.1:subject:loginId";

    /// Default action marker, always present with an empty value.
    pub const ACTION_MARKER: &str = "urn:oasis:names:tc:xacml:1.0:action:action-id";
    pub const ACTION_ID: &str = "urn:fedora:names:fedora:2.1:action:id";
    pub const ACTION_API: &str = "urn:fedora:names:fedora:2.1:action:api";
    pub const ACTION_CONTEXT_INDEX: &str = "urn:fedora:names:fedora:2.1:action:contextId";

    /// Default resource marker, always present with an empty value.
    pub const RESOURCE_MARKER: &str = "urn:oasis:names:tc:xacml:1.0:resource:resource-id";
    pub const RESOURCE_ID: &str = "urn:fedora:names:fedora:2.1:resource:object:pid";
    pub const RESOURCE_NAMESPACE: &str = "urn:fedora:names:fedora:2.1:resource:object:namespace";
}

/// Attribute value data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#string")]
    String,
}

impl DataType {
    /// Type URI as understood by XACML engines.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::String => "http://www.w3.org/2001/XMLSchema#string",
        }
    }
}

/// A single `(id, type, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Attribute {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub value: String,
}

impl Attribute {
    /// String-typed attribute.
    #[must_use]
    pub fn string(id: &'static str, value: impl Into<String>) -> Self {
        Self {
            id,
            data_type: DataType::String,
            value: value.into(),
        }
    }
}

/// Insertion-ordered attribute collection with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    /// Insert an attribute, replacing any earlier attribute with the same id.
    pub(crate) fn insert(&mut self, attribute: Attribute) {
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.id == attribute.id) {
            *existing = attribute;
        } else {
            self.attributes.push(attribute);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Value of the attribute with `id`, if present.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
