//! Configuration for the authz PEP.

use std::time::Duration;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

/// Config section the PEP reads from the application config.
pub const CONFIG_SECTION: &str = "authz_pep";

/// Prefix of environment overrides, e.g. `AUTHZ_PEP__EVALUATION_TIMEOUT=1s`.
pub const ENV_PREFIX: &str = "AUTHZ_PEP__";

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzPepConfig {
    /// Name of the decision engine to build.
    pub engine: String,

    /// Per-evaluation deadline. A missed deadline yields `Indeterminate`.
    #[serde(deserialize_with = "humantime_serde::deserialize")]
    pub evaluation_timeout: Option<Duration>,
}

impl Default for AuthzPepConfig {
    fn default() -> Self {
        Self {
            engine: "static".to_owned(),
            evaluation_timeout: None,
        }
    }
}

impl AuthzPepConfig {
    /// Extract the `authz_pep` section, then apply `AUTHZ_PEP__*` overrides.
    ///
    /// A missing section yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns a figment error on unknown keys or unparsable values.
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        figment
            .focus(CONFIG_SECTION)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }
}

mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| humantime::parse_duration(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
