//! Service implementation for the static PDP plugin.

use authz_pep_sdk::{Decision, EvaluationRequest, EvaluationResult};

use crate::config::StaticRule;

/// Rule-table decision engine.
///
/// The first rule whose matchers all fit the request decides. Requests no
/// rule matches get the default decision.
#[derive(Debug, Clone)]
pub struct Service {
    rules: Vec<StaticRule>,
    default_decision: Decision,
}

impl Service {
    #[must_use]
    pub fn new(rules: Vec<StaticRule>, default_decision: Decision) -> Self {
        Self {
            rules,
            default_decision,
        }
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate one request against the rule table.
    #[must_use]
    pub fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        let resource_id = request.resource.resource_id();
        let decision = self
            .rules
            .iter()
            .position(|rule| rule_matches(rule, request))
            .map_or(self.default_decision, |index| {
                tracing::trace!(rule = index, resource_id, "static rule matched");
                self.rules[index].decision.into()
            });

        EvaluationResult::new(decision).for_resource(resource_id)
    }
}

fn rule_matches(rule: &StaticRule, request: &EvaluationRequest) -> bool {
    let subject = request.subject.login_id().unwrap_or_default();
    matcher_fits(rule.subject.as_deref(), subject)
        && matcher_fits(rule.action_id.as_deref(), request.action.action_id())
        && matcher_fits(rule.action_api.as_deref(), request.action.action_api())
        && matcher_fits(rule.resource_id.as_deref(), request.resource.resource_id())
        && matcher_fits(rule.namespace.as_deref(), request.resource.namespace())
}

fn matcher_fits(matcher: Option<&str>, value: &str) -> bool {
    matcher.is_none_or(|expected| expected == value)
}
