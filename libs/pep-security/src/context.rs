use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::constants::LOGIN_ID_ATTRIBUTE;

/// Attribute category of a request context lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Subject,
    Action,
    Resource,
    Environment,
}

/// Read-only view of the attributes asserted for one request.
///
/// The enforcement point consumes this to learn who is calling and when.
/// Implementations must not panic on unknown names: lookups that have no
/// value return `None` or an empty slice.
pub trait RequestContext: Send + Sync {
    /// First value of the named attribute, if any.
    fn value(&self, category: AttributeCategory, name: &str) -> Option<&str>;

    /// All values of the named attribute.
    fn values(&self, category: AttributeCategory, name: &str) -> &[String];

    /// Number of values bound to the named attribute.
    fn value_count(&self, category: AttributeCategory, name: &str) -> usize {
        self.values(category, name).len()
    }

    /// Caller password, when the transport supplied one.
    fn password(&self) -> Option<&SecretString>;

    /// Whether the operation is a dry run that must not change state.
    fn no_op(&self) -> bool;

    /// Request time.
    fn now(&self) -> OffsetDateTime;

    /// Login id of the subject. `None` means anonymous.
    fn subject_login_id(&self) -> Option<&str> {
        self.value(AttributeCategory::Subject, LOGIN_ID_ATTRIBUTE)
            .filter(|id| !id.is_empty())
    }
}

/// `SecurityContext` carries the attributes gathered for a request by the
/// authentication layer and passed to the enforcement point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    #[serde(default)]
    attributes: HashMap<AttributeCategory, HashMap<String, Vec<String>>>,
    #[serde(default)]
    no_op: bool,
    /// Pinned request time. `None` reads the system clock on every call.
    #[serde(default, with = "time::serde::rfc3339::option")]
    fixed_now: Option<OffsetDateTime>,
    /// Never serialized. `SecretString` redacts it in `Debug`.
    #[serde(skip)]
    password: Option<SecretString>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no attributes
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }
}

impl RequestContext for SecurityContext {
    fn value(&self, category: AttributeCategory, name: &str) -> Option<&str> {
        self.values(category, name).first().map(String::as_str)
    }

    fn values(&self, category: AttributeCategory, name: &str) -> &[String] {
        self.attributes
            .get(&category)
            .and_then(|by_name| by_name.get(name))
            .map_or(&[], Vec::as_slice)
    }

    fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    fn no_op(&self) -> bool {
        self.no_op
    }

    fn now(&self) -> OffsetDateTime {
        self.fixed_now.unwrap_or_else(OffsetDateTime::now_utc)
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    attributes: HashMap<AttributeCategory, HashMap<String, Vec<String>>>,
    no_op: bool,
    fixed_now: Option<OffsetDateTime>,
    password: Option<SecretString>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn login_id(self, login_id: &str) -> Self {
        self.attribute(AttributeCategory::Subject, LOGIN_ID_ATTRIBUTE, login_id)
    }

    /// Append a value to the named attribute. Repeated calls accumulate values.
    #[must_use]
    pub fn attribute(mut self, category: AttributeCategory, name: &str, value: &str) -> Self {
        self.attributes
            .entry(category)
            .or_default()
            .entry(name.to_owned())
            .or_default()
            .push(value.to_owned());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<SecretString>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn no_op(mut self, no_op: bool) -> Self {
        self.no_op = no_op;
        self
    }

    /// Pin the request time instead of reading the clock.
    #[must_use]
    pub fn now(mut self, now: OffsetDateTime) -> Self {
        self.fixed_now = Some(now);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            attributes: self.attributes,
            no_op: self.no_op,
            fixed_now: self.fixed_now,
            password: self.password,
        }
    }
}
