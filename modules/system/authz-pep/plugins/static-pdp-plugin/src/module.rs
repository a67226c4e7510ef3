//! Static PDP plugin factory.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use authz_pep_sdk::{Decision, PdpError, PdpFactory, PolicyDecisionPoint};
use figment::Figment;
use figment::providers::{Format, Yaml};
use tracing::info;

use crate::config::{PolicyDocument, StaticPdpPluginConfig};
use crate::domain::Service;

/// Builds rule-table engines from the plugin configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticPdpFactory {
    cfg: StaticPdpPluginConfig,
}

impl StaticPdpFactory {
    #[must_use]
    pub fn new(cfg: StaticPdpPluginConfig) -> Self {
        Self { cfg }
    }

    /// Build the rule-table service without erasing its type.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the policy file cannot be read or parsed.
    pub async fn build_service(&self) -> Result<Service, PdpError> {
        let Some(path) = &self.cfg.policy_file else {
            return Ok(Service::new(
                self.cfg.rules.clone(),
                self.cfg.default_decision.into(),
            ));
        };

        let doc = load_policy_document(path).await?;
        let default_decision: Decision = doc
            .default_decision
            .unwrap_or(self.cfg.default_decision)
            .into();
        Ok(Service::new(doc.rules, default_decision))
    }
}

async fn load_policy_document(path: &Path) -> Result<PolicyDocument, PdpError> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        PdpError::InvalidConfiguration(format!(
            "cannot read policy file '{}': {e}",
            path.display()
        ))
    })?;

    Figment::from(Yaml::string(&contents))
        .extract()
        .map_err(|e| {
            PdpError::InvalidConfiguration(format!(
                "invalid policy file '{}': {e}",
                path.display()
            ))
        })
}

#[async_trait]
impl PdpFactory for StaticPdpFactory {
    fn name(&self) -> &'static str {
        "static"
    }

    #[tracing::instrument(skip_all, fields(engine = "static"))]
    async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError> {
        let service = self.build_service().await?;
        info!(
            rule_count = service.rule_count(),
            from_file = self.cfg.policy_file.is_some(),
            "Static decision engine built"
        );
        Ok(Arc::new(service))
    }
}
