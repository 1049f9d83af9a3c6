use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Verdict and signal enums ---

/// Final four-way veracity classification for a whole claim.
///
/// The serde renames are the exact literals the judge model must emit.
/// Deserialization is lenient: an unrecognized literal degrades to
/// `NotEnoughEvidence` instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum VeracityVerdict {
    #[serde(rename = "Supported")]
    Supported,
    #[serde(rename = "Refuted")]
    Refuted,
    #[serde(rename = "Not Enough Evidence")]
    NotEnoughEvidence,
    #[serde(rename = "Conflicting Evidence/Cherrypicking")]
    Conflicting,
}

impl VeracityVerdict {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            "Supported" => VeracityVerdict::Supported,
            "Refuted" => VeracityVerdict::Refuted,
            "Conflicting Evidence/Cherrypicking" => VeracityVerdict::Conflicting,
            _ => VeracityVerdict::NotEnoughEvidence,
        }
    }
}

impl<'de> Deserialize<'de> for VeracityVerdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(VeracityVerdict::from_label(&raw))
    }
}

impl std::fmt::Display for VeracityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VeracityVerdict::Supported => write!(f, "Supported"),
            VeracityVerdict::Refuted => write!(f, "Refuted"),
            VeracityVerdict::NotEnoughEvidence => write!(f, "Not Enough Evidence"),
            VeracityVerdict::Conflicting => write!(f, "Conflicting Evidence/Cherrypicking"),
        }
    }
}

/// Categorical evidence direction for one researched check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSignal {
    Supports,
    Refutes,
    Mixed,
    Insufficient,
}

impl EvidenceSignal {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, EvidenceSignal::Insufficient)
    }
}

impl std::fmt::Display for EvidenceSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceSignal::Supports => write!(f, "supports"),
            EvidenceSignal::Refutes => write!(f, "refutes"),
            EvidenceSignal::Mixed => write!(f, "mixed"),
            EvidenceSignal::Insufficient => write!(f, "insufficient"),
        }
    }
}

// --- Evidence and plan types ---

/// One web source backing (or undermining) a finding.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceEvidence {
    /// Human-readable title of the source.
    pub title: String,
    /// URL used during fact-checking.
    pub url: String,
    /// Short text span from the source backing the claim.
    pub snippet: String,
    pub publisher: Option<String>,
    pub published_at: Option<String>,
}

/// One independently-researchable sub-question derived from the claim.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VerificationCheck {
    /// Stable check identifier, e.g. "timeline_1".
    pub aspect_id: String,
    /// Precise verification question for one claim aspect.
    pub question: String,
    /// Why this question matters for claim validation.
    pub rationale: String,
    /// Targeted web queries for the researcher, in priority order.
    #[serde(default)]
    pub search_queries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvestigationPlan {
    pub claim: String,
    #[serde(default)]
    pub checks: Vec<VerificationCheck>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// The evidence-backed result of researching one check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AspectFinding {
    pub aspect_id: String,
    pub question: String,
    pub signal: EvidenceSignal,
    /// What the collected evidence says for this aspect.
    pub summary: String,
    /// 0 to 1 confidence score for this aspect.
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<SourceEvidence>,
    #[serde(default)]
    pub caveats: Vec<String>,
}

impl AspectFinding {
    /// Synthetic finding for a check whose research could not be completed.
    pub fn insufficient(check: &VerificationCheck, summary: impl Into<String>) -> Self {
        Self {
            aspect_id: check.aspect_id.clone(),
            question: check.question.clone(),
            signal: EvidenceSignal::Insufficient,
            summary: summary.into(),
            confidence: 0.0,
            sources: Vec::new(),
            caveats: vec![
                "This check failed and was downgraded to insufficient evidence.".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactCheckReport {
    pub claim: String,
    pub verdict: VeracityVerdict,
    /// 0 to 1 confidence in the final verdict.
    pub verdict_confidence: f64,
    /// Tight synthesis of why the verdict is assigned.
    pub justification: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub findings: Vec<AspectFinding>,
    #[serde(default)]
    pub sources: Vec<SourceEvidence>,
}

// --- Claim extraction ---

/// One atomic, decontextualized check-worthy claim lifted from input text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedClaim {
    pub claim_id: String,
    pub claim_text: String,
    /// Short topic label, e.g. "economy" or "public health".
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClaimExtractionResult {
    pub input_text: String,
    #[serde(default)]
    pub claims: Vec<ExtractedClaim>,
}
