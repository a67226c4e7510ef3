//! Well-known identities.

/// Login id reported by [`crate::StaticContext`] for every subject lookup.
pub const DEFAULT_LOGIN_ID: &str = "fedoraAdmin";

/// Subject attribute name under which the login id is stored.
pub const LOGIN_ID_ATTRIBUTE: &str = "loginId";
