use secrecy::SecretString;
use time::OffsetDateTime;

use crate::constants::DEFAULT_LOGIN_ID;
use crate::context::{AttributeCategory, RequestContext};

/// Context stand-in with a fixed identity.
///
/// Every subject lookup answers [`DEFAULT_LOGIN_ID`] and [`RequestContext::now`]
/// reads the real clock. All other accessors report "nothing asserted".
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContext;

impl StaticContext {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RequestContext for StaticContext {
    fn value(&self, category: AttributeCategory, _name: &str) -> Option<&str> {
        match category {
            AttributeCategory::Subject => Some(DEFAULT_LOGIN_ID),
            AttributeCategory::Action
            | AttributeCategory::Resource
            | AttributeCategory::Environment => None,
        }
    }

    fn values(&self, _category: AttributeCategory, _name: &str) -> &[String] {
        &[]
    }

    fn password(&self) -> Option<&SecretString> {
        None
    }

    fn no_op(&self) -> bool {
        false
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
