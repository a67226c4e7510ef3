#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authz_pep::{AuthzPepConfig, EngineState, PolicyEnforcementPoint};
use authz_pep_sdk::{
    Decision, DenyCause, EnforcementError, EnforcementRequest, EvaluationRequest, EvaluationResult,
    PdpError, PdpFactory, PolicyDecisionPoint,
};
use static_pdp_plugin::{StaticDecision, StaticPdpFactory, StaticPdpPluginConfig, StaticRule};

fn admin_rule(resource_id: &str, namespace: &str, decision: StaticDecision) -> StaticRule {
    StaticRule {
        subject: Some("fedoraAdmin".to_owned()),
        action_id: Some("getDatastream".to_owned()),
        action_api: Some("API-A".to_owned()),
        resource_id: Some(resource_id.to_owned()),
        namespace: Some(namespace.to_owned()),
        decision,
    }
}

async fn active_pep(rules: Vec<StaticRule>) -> PolicyEnforcementPoint {
    let factory = StaticPdpFactory::new(StaticPdpPluginConfig {
        rules,
        ..StaticPdpPluginConfig::default()
    });
    let pep = PolicyEnforcementPoint::new(AuthzPepConfig::default(), Arc::new(factory));
    pep.activate().await.unwrap();
    pep
}

fn get_datastream() -> EnforcementRequest {
    EnforcementRequest::new("getDatastream", "API-A").subject("fedoraAdmin")
}

#[tokio::test]
async fn permitted_triple_is_allowed() {
    let pep = active_pep(vec![admin_rule("obj:42", "example-ns", StaticDecision::Permit)]).await;

    let allowed = pep
        .enforce(get_datastream().resource("obj:42", "example-ns"))
        .await
        .unwrap();

    assert!(allowed);
}

#[tokio::test]
async fn not_applicable_resource_blocks_the_batch() {
    let pep = active_pep(vec![admin_rule("obj:42", "example-ns", StaticDecision::Permit)]).await;

    let request = get_datastream()
        .resource("obj:42", "example-ns")
        .resource("obj:43", "other-ns");

    assert!(!pep.enforce(request.clone()).await.unwrap());

    let verdict = pep.enforce_verdict(request).await.unwrap();
    assert_eq!(verdict.results[0].decision, Decision::Permit);
    assert_eq!(verdict.results[1].decision, Decision::NotApplicable);
    assert_eq!(verdict.deny_cause(), Some(DenyCause::NoPermit));
}

#[tokio::test]
async fn explicit_deny_is_distinguished() {
    let pep = active_pep(vec![
        admin_rule("obj:42", "example-ns", StaticDecision::Permit),
        admin_rule("obj:43", "other-ns", StaticDecision::Deny),
    ])
    .await;

    let verdict = pep
        .enforce_verdict(
            get_datastream()
                .resource("obj:42", "example-ns")
                .resource("obj:43", "other-ns"),
        )
        .await
        .unwrap();

    assert!(!verdict.allowed);
    assert_eq!(verdict.deny_cause(), Some(DenyCause::ExplicitDeny));
    assert_eq!(verdict.tally.permits, 1);
    assert_eq!(verdict.tally.denies, 1);
}

#[tokio::test]
async fn empty_batch_is_denied() {
    let pep = active_pep(vec![admin_rule("obj:42", "example-ns", StaticDecision::Permit)]).await;

    assert!(!pep.enforce(get_datastream()).await.unwrap());
}

#[tokio::test]
async fn malformed_resource_is_operational_error() {
    let pep = active_pep(Vec::new()).await;

    let err = pep
        .enforce(get_datastream().resource("obj:\u{1b}42", "example-ns"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnforcementError::Operational { .. }));
}

#[tokio::test]
async fn enforce_before_activate_is_engine_unavailable() {
    let pep = PolicyEnforcementPoint::new(
        AuthzPepConfig::default(),
        Arc::new(StaticPdpFactory::default()),
    );

    let err = pep
        .enforce(get_datastream().resource("obj:42", "example-ns"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnforcementError::EngineUnavailable(_)));
}

struct Unreachable;

#[async_trait]
impl PolicyDecisionPoint for Unreachable {
    async fn evaluate(&self, _req: &EvaluationRequest) -> Result<EvaluationResult, PdpError> {
        Err(PdpError::ServiceUnavailable("connection refused".to_owned()))
    }
}

struct UnreachableFactory;

#[async_trait]
impl PdpFactory for UnreachableFactory {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError> {
        Ok(Arc::new(Unreachable))
    }
}

#[tokio::test]
async fn unreachable_engine_is_engine_unavailable() {
    let pep = PolicyEnforcementPoint::new(AuthzPepConfig::default(), Arc::new(UnreachableFactory));
    pep.activate().await.unwrap();

    let err = pep
        .enforce(get_datastream().resource("obj:42", "example-ns"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, EnforcementError::EngineUnavailable(msg) if msg.contains("connection refused"))
    );
}

struct Stalled;

#[async_trait]
impl PolicyDecisionPoint for Stalled {
    async fn evaluate(&self, _req: &EvaluationRequest) -> Result<EvaluationResult, PdpError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(EvaluationResult::new(Decision::Permit))
    }
}

struct StalledFactory;

#[async_trait]
impl PdpFactory for StalledFactory {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError> {
        Ok(Arc::new(Stalled))
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_engine_fails_safe_after_timeout() {
    let cfg = AuthzPepConfig {
        evaluation_timeout: Some(Duration::from_millis(100)),
        ..AuthzPepConfig::default()
    };
    let pep = PolicyEnforcementPoint::new(cfg, Arc::new(StalledFactory));
    pep.activate().await.unwrap();

    let verdict = pep
        .enforce_verdict(get_datastream().resource("obj:42", "example-ns"))
        .await
        .unwrap();

    assert!(!verdict.allowed);
    assert_eq!(verdict.deny_cause(), Some(DenyCause::Indeterminate));
}

#[tokio::test]
async fn policy_reload_picks_up_new_rules() {
    let dir = tempfile::tempdir().unwrap();
    let policy = dir.path().join("policy.yaml");
    std::fs::write(
        &policy,
        "rules:\n  - resource_id: \"obj:42\"\n    decision: permit\n",
    )
    .unwrap();

    let factory = StaticPdpFactory::new(StaticPdpPluginConfig {
        policy_file: Some(policy.clone()),
        ..StaticPdpPluginConfig::default()
    });
    let pep = PolicyEnforcementPoint::new(AuthzPepConfig::default(), Arc::new(factory));
    assert_eq!(pep.activate().await.unwrap(), 1);

    let request = get_datastream().resource("obj:42", "example-ns");
    assert!(pep.enforce(request.clone()).await.unwrap());

    std::fs::write(&policy, "rules:\n  - decision: deny\n").unwrap();
    assert_eq!(pep.reload_policy().await.unwrap(), 2);
    assert!(!pep.enforce(request.clone()).await.unwrap());

    // A broken policy file keeps the engine from the last good reload.
    std::fs::write(&policy, "rules: [").unwrap();
    assert!(pep.reload_policy().await.is_err());
    assert_eq!(pep.state(), EngineState::Active { generation: 2 });
    assert!(!pep.enforce(request).await.unwrap());
}
