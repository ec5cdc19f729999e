use serde::{ Deserialize, Serialize };

use crate::models::common::Phase;

/// A compliance check as stored in the requirement table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Row identifier assigned by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Natural-language description, e.g. "Has the patient stated their name?"
    #[serde(rename = "requirement")]
    pub text: String,
    pub phase: Phase,
    /// Position within the phase
    pub order: i32,
    /// Starts false and is only ever set to true
    #[serde(default)]
    pub completion_status: bool,
}

impl Requirement {
    /// Evaluation key; requirement lists are sorted by this
    pub fn sort_key(&self) -> (Phase, i32) {
        (self.phase, self.order)
    }
}

/// Sort requirements into evaluation order
pub fn sort_requirements(requirements: &mut [Requirement]) {
    requirements.sort_by_key(Requirement::sort_key);
}

/// A requirement row to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequirement {
    #[serde(rename = "requirement")]
    pub text: String,
    pub phase: Phase,
    pub order: i32,
}

impl NewRequirement {
    pub fn new(text: impl Into<String>, phase: Phase, order: i32) -> Self {
        Self {
            text: text.into(),
            phase,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_store_row() {
        let row = r#"{"id": 7, "requirement": "Confirm patient's identity.", "phase": "pre-op", "order": 1, "completion_status": false, "created_at": "2025-02-15T10:00:00Z"}"#;
        let requirement: Requirement = serde_json::from_str(row).unwrap();

        assert_eq!(requirement.id, Some(7));
        assert_eq!(requirement.text, "Confirm patient's identity.");
        assert_eq!(requirement.phase, Phase::PreOp);
        assert!(!requirement.completion_status);
    }

    #[test]
    fn rejects_unknown_phase() {
        let row = r#"{"requirement": "x", "phase": "recovery", "order": 1}"#;
        assert!(serde_json::from_str::<Requirement>(row).is_err());
    }

    #[test]
    fn sorts_by_phase_then_order() {
        let make = |phase, order| Requirement {
            id: None,
            text: format!("{}-{}", phase, order),
            phase,
            order,
            completion_status: false,
        };
        let mut requirements = vec![
            make(Phase::PostOp, 1),
            make(Phase::PreOp, 2),
            make(Phase::IntraOp, 1),
            make(Phase::PreOp, 1),
        ];

        sort_requirements(&mut requirements);

        let texts: Vec<_> = requirements.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["pre-op-1", "pre-op-2", "intra-op-1", "post-op-1"]);
    }

    #[test]
    fn new_requirement_serializes_with_store_column_names() {
        let row = serde_json::to_value(NewRequirement::new("Apply sterile dressing", Phase::PostOp, 2)).unwrap();
        assert_eq!(
            row,
            serde_json::json!({"requirement": "Apply sterile dressing", "phase": "post-op", "order": 2})
        );
    }
}
