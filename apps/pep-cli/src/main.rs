mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use authz_pep::PolicyEnforcementPoint;
use authz_pep_sdk::{EnforcementRequest, ResourceRef, Verdict};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use config::AppConfig;

/// Enforce one authorization request against the configured decision engine.
///
/// Exits with 0 when the request is allowed, 1 when it is denied and 2 on any
/// error (bad config, engine unavailable, malformed resource).
#[derive(Parser, Debug)]
#[command(name = "pep-cli", version, about)]
struct Args {
    /// YAML file with `authz_pep` and `static_pdp_plugin` sections.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Subject login id. Omit for an anonymous subject.
    #[arg(long)]
    subject: Option<String>,

    /// Action id, e.g. `getDatastream`.
    #[arg(long)]
    action: String,

    /// Action API, e.g. `API-A`.
    #[arg(long, default_value = "")]
    api: String,

    /// Context index of the action.
    #[arg(long, default_value = "")]
    context: String,

    /// Resource as `pid[@namespace]`. Repeat for a batch.
    #[arg(long = "resource", value_parser = parse_resource)]
    resources: Vec<ResourceRef>,

    /// Print the full verdict as JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn request(&self) -> EnforcementRequest {
        EnforcementRequest::new(&self.action, &self.api)
            .subject_login_id(self.subject.clone())
            .context_index(&self.context)
            .resources(self.resources.clone())
    }
}

fn parse_resource(raw: &str) -> Result<ResourceRef, String> {
    let (id, namespace) = raw.split_once('@').unwrap_or((raw, ""));
    if id.is_empty() && !namespace.is_empty() {
        return Err(format!("resource '{raw}' has a namespace but no id"));
    }
    Ok(ResourceRef::new(id, namespace))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(verdict) => {
            if let Err(e) = print_verdict(&verdict, args.json) {
                error!(error = %e, "failed to print verdict");
                return ExitCode::from(2);
            }
            if verdict.allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("enforcement failed: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<Verdict> {
    let cfg = AppConfig::load(args.config.as_deref())?;
    let pep = PolicyEnforcementPoint::new(cfg.pep.clone(), cfg.engine_factory()?);
    pep.activate().await?;

    let verdict = pep.enforce_verdict(args.request()).await?;
    pep.deactivate().await;
    Ok(verdict)
}

fn print_verdict(verdict: &Verdict, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
        return Ok(());
    }

    let t = &verdict.tally;
    let counts = format!(
        "permits={} denies={} indeterminates={} not_applicables={} unrecognized={}",
        t.permits, t.denies, t.indeterminates, t.not_applicables, t.unrecognized
    );
    match verdict.deny_cause() {
        None => println!("PERMIT ({counts})"),
        Some(cause) => println!("DENY {cause} ({counts})"),
    }
    Ok(())
}
