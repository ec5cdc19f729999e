use chrono::{ DateTime, Utc };
use serde::Serialize;

use crate::models::common::Verdict;

/// One requirement paired with its verdict for the current pass.
/// Lives only as long as the dispatch walk that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub requirement: String,
    pub verdict: Verdict,
}

/// Clarification produced for the first ambiguous requirement of a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Escalation {
    /// The requirement that was classified as ambiguous
    pub requirement: String,
    /// Answer returned by the search service
    pub clarification: String,
    /// Requirements marked satisfied before the walk stopped
    pub satisfied: Vec<String>,
    /// Subset of `satisfied` whose status write matched no stored row
    pub unrecorded: Vec<String>,
}

impl Escalation {
    /// Flat rendering: the clarification, a space, then the satisfied
    /// requirements joined by ", ".
    pub fn summary(&self) -> String {
        format!("{} {}", self.clarification, self.satisfied.join(", "))
    }
}

/// Terminal result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComplianceOutcome {
    /// The store holds no requirements; nothing was classified
    NoRequirements,
    /// Every verdict was dispatched without hitting an ambiguous one
    Completed {
        satisfied: Vec<String>,
        unrecorded: Vec<String>,
    },
    /// The walk stopped at the first ambiguous requirement
    Escalated(Escalation),
}

impl ComplianceOutcome {
    /// Requirements judged satisfied in this pass
    pub fn satisfied(&self) -> &[String] {
        match self {
            ComplianceOutcome::NoRequirements => &[],
            ComplianceOutcome::Completed { satisfied, .. } => satisfied,
            ComplianceOutcome::Escalated(escalation) => &escalation.satisfied,
        }
    }

    pub fn escalation(&self) -> Option<&Escalation> {
        match self {
            ComplianceOutcome::Escalated(escalation) => Some(escalation),
            _ => None,
        }
    }
}

/// A processed transcript
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceRun {
    pub outcome: ComplianceOutcome,
    /// Number of requirements sent to the classifier
    pub requirements_evaluated: usize,
    pub evaluated_at: DateTime<Utc>,
}
