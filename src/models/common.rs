use serde::{ Deserialize, Serialize };

/// Surgical phase a requirement belongs to.
///
/// Declaration order is evaluation order, so the derived `Ord` sorts
/// pre-op before intra-op before post-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Phase {
    PreOp,
    IntraOp,
    PostOp,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::PreOp, Phase::IntraOp, Phase::PostOp];

    /// Label as stored in the requirement table
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreOp => "pre-op",
            Phase::IntraOp => "intra-op",
            Phase::PostOp => "post-op",
        }
    }

    /// Parse a phase label, tolerating the spellings models and people use
    /// ("Pre-operative", "preop", "Intra op", ...).
    pub fn from_label(label: &str) -> Option<Phase> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        match normalized.as_str() {
            "preop" | "preoperative" => Some(Phase::PreOp),
            "intraop" | "intraoperative" => Some(Phase::IntraOp),
            "postop" | "postoperative" => Some(Phase::PostOp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Phase {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Phase::from_label(&value).ok_or_else(|| format!("unknown phase '{}'", value))
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        phase.as_str().to_string()
    }
}

/// Outcome of classifying one requirement against a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The transcript explicitly and directly satisfies the requirement
    Satisfied,
    /// The transcript raises the topic without resolving it
    Ambiguous,
    /// The transcript has no bearing on the requirement
    Unrelated,
}

impl Verdict {
    /// Single-letter symbol used on the wire with the classification model
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Satisfied => "A",
            Verdict::Ambiguous => "B",
            Verdict::Unrelated => "C",
        }
    }

    /// Exact symbol match only; anything else is not a verdict.
    pub fn from_symbol(symbol: &str) -> Option<Verdict> {
        match symbol {
            "A" => Some(Verdict::Satisfied),
            "B" => Some(Verdict::Ambiguous),
            "C" => Some(Verdict::Unrelated),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "SATISFIED"),
            Verdict::Ambiguous => write!(f, "AMBIGUOUS"),
            Verdict::Unrelated => write!(f, "UNRELATED"),
        }
    }
}

/// Where the compliance pipeline is in a single invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    FetchingRequirements,
    Classifying,
    Dispatching,
    Done,
    Escalated,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::FetchingRequirements => "FETCHING_REQUIREMENTS",
            PipelineStage::Classifying => "CLASSIFYING",
            PipelineStage::Dispatching => "DISPATCHING",
            PipelineStage::Done => "DONE",
            PipelineStage::Escalated => "ESCALATED",
        };
        write!(f, "{}", name)
    }
}
