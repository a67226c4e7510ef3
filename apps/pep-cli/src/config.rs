//! Application config: the PEP section plus the static engine section.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use authz_pep::AuthzPepConfig;
use authz_pep_sdk::PdpFactory;
use figment::Figment;
use figment::providers::{Format, Yaml};
use static_pdp_plugin::{StaticPdpFactory, StaticPdpPluginConfig};

const PLUGIN_SECTION: &str = "static_pdp_plugin";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub pep: AuthzPepConfig,
    pub static_pdp: StaticPdpPluginConfig,
}

impl AppConfig {
    /// Load both sections from an optional YAML file.
    ///
    /// A relative `policy_file` is resolved against the config file's directory.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let figment = match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file '{}' not found", path.display());
                }
                Figment::from(Yaml::file(path))
            }
            None => Figment::new(),
        };

        let pep = AuthzPepConfig::from_figment(&figment).context("invalid authz_pep config")?;
        let mut static_pdp: StaticPdpPluginConfig = figment
            .focus(PLUGIN_SECTION)
            .extract()
            .context("invalid static_pdp_plugin config")?;

        if let (Some(policy), Some(dir)) = (
            static_pdp.policy_file.as_mut(),
            path.and_then(Path::parent),
        ) && policy.is_relative()
        {
            *policy = dir.join(&*policy);
        }

        Ok(Self { pep, static_pdp })
    }

    /// Factory for the engine named in the PEP section.
    pub fn engine_factory(&self) -> anyhow::Result<Arc<dyn PdpFactory>> {
        match self.pep.engine.as_str() {
            "static" => Ok(Arc::new(StaticPdpFactory::new(self.static_pdp.clone()))),
            other => bail!("unknown decision engine '{other}'"),
        }
    }
}
