//! Configuration for the static PDP plugin.

use std::path::PathBuf;

use authz_pep_sdk::Decision;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticPdpPluginConfig {
    /// Decision for requests no rule matches.
    pub default_decision: StaticDecision,

    /// Inline rule table, matched top to bottom.
    pub rules: Vec<StaticRule>,

    /// YAML policy file that replaces the inline rule table.
    ///
    /// Re-read on every engine build.
    pub policy_file: Option<PathBuf>,
}

/// Contents of a policy file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyDocument {
    /// Overrides the configured default decision when present.
    pub default_decision: Option<StaticDecision>,
    pub rules: Vec<StaticRule>,
}

/// A single rule. Absent matchers match anything.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticRule {
    /// Subject login id; `""` matches the anonymous subject.
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub action_api: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,

    pub decision: StaticDecision,
}

/// Decision a rule yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticDecision {
    Permit,
    Deny,
    Indeterminate,
    #[default]
    NotApplicable,
}

impl From<StaticDecision> for Decision {
    fn from(d: StaticDecision) -> Self {
        match d {
            StaticDecision::Permit => Self::Permit,
            StaticDecision::Deny => Self::Deny,
            StaticDecision::Indeterminate => Self::Indeterminate,
            StaticDecision::NotApplicable => Self::NotApplicable,
        }
    }
}
