//! Deny-biased decision combiner.
//!
//! A result set is allowed only when at least one result permits and no
//! result denies, is indeterminate, or is unrecognized. `NotApplicable` neither
//! grants nor blocks. An empty set is denied: "nothing evaluated" is never
//! read as "nothing to deny".
//!
//! An enforcement batch holds one result per resource and is allowed only when
//! every resource is allowed on its own, see [`combine_batch`].

use serde::Serialize;
use tracing::debug;

use crate::models::{Decision, EvaluationResult};

/// Why a batch was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCause {
    /// At least one result was an explicit deny.
    ExplicitDeny,
    /// At least one result was indeterminate.
    Indeterminate,
    /// The engine reported a decision outside the known set.
    Unrecognized,
    /// No result permitted: empty batch or every result was not-applicable.
    NoPermit,
}

impl DenyCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitDeny => "explicit_deny",
            Self::Indeterminate => "indeterminate",
            Self::Unrecognized => "unrecognized",
            Self::NoPermit => "no_permit",
        }
    }
}

impl std::fmt::Display for DenyCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-decision counts over a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionTally {
    pub permits: usize,
    pub denies: usize,
    pub indeterminates: usize,
    pub not_applicables: usize,
    pub unrecognized: usize,
}

impl DecisionTally {
    #[must_use]
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a EvaluationResult>) -> Self {
        let mut tally = Self::default();
        for result in results {
            tally.record(result.decision);
        }
        tally
    }

    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Permit => self.permits += 1,
            Decision::Deny => self.denies += 1,
            Decision::Indeterminate => self.indeterminates += 1,
            Decision::NotApplicable => self.not_applicables += 1,
            Decision::Unrecognized(_) => self.unrecognized += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.permits + self.denies + self.indeterminates + self.not_applicables + self.unrecognized
    }

    #[must_use]
    pub fn is_permitted(&self) -> bool {
        self.deny_cause().is_none()
    }

    /// `None` when the batch is allowed. Otherwise the strongest reason it is
    /// not: explicit deny, then indeterminate, then unrecognized, then no permit.
    #[must_use]
    pub fn deny_cause(&self) -> Option<DenyCause> {
        if self.denies > 0 {
            Some(DenyCause::ExplicitDeny)
        } else if self.indeterminates > 0 {
            Some(DenyCause::Indeterminate)
        } else if self.unrecognized > 0 {
            Some(DenyCause::Unrecognized)
        } else if self.permits == 0 {
            Some(DenyCause::NoPermit)
        } else {
            None
        }
    }
}

/// Reduce a batch of results to one allow/deny outcome.
#[must_use]
pub fn combine(results: &[EvaluationResult]) -> bool {
    tally(results).is_permitted()
}

/// Decide a batch with one result per resource.
///
/// Each resource must be allowed by its own result, so a `NotApplicable`
/// resource blocks the batch even when other resources permit.
#[must_use]
pub fn combine_batch(per_resource: &[EvaluationResult]) -> bool {
    !per_resource.is_empty()
        && per_resource
            .iter()
            .all(|result| DecisionTally::from_results([result]).is_permitted())
}

/// Count a batch of results and log the counts.
#[must_use]
pub fn tally(results: &[EvaluationResult]) -> DecisionTally {
    let tally = DecisionTally::from_results(results);
    debug!(
        permits = tally.permits,
        denies = tally.denies,
        indeterminates = tally.indeterminates,
        not_applicables = tally.not_applicables,
        unrecognized = tally.unrecognized,
        "combined decisions"
    );
    tally
}
