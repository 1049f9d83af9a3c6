// Trait seams for the pipeline's external collaborators.
//
// Planner/Researcher/Judge are the three model-backed stages.
// SearchRetriever is consumed by researcher adapters only — the engine
// itself never searches. ArtifactSink receives the finished run log.
//
// All of these are mocked by hand in tests: no network, no API keys,
// `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use factlens_common::{
    AspectFinding, ClaimExtractionResult, FactCheckReport, InvestigationPlan, SourceEvidence,
    VerificationCheck,
};

use crate::artifacts::RunArtifacts;

#[async_trait]
pub trait Planner: Send + Sync {
    /// Decompose a claim into at most `max_checks` verification checks.
    /// The draft is repaired by the normalizer before use.
    async fn plan(&self, claim: &str, max_checks: usize) -> Result<InvestigationPlan>;
}

#[async_trait]
pub trait Researcher: Send + Sync {
    /// Investigate one check and return an evidence-backed finding.
    /// Errors here are retried and then degraded, never fatal to a run.
    async fn research(&self, claim: &str, check: &VerificationCheck) -> Result<AspectFinding>;
}

#[async_trait]
pub trait Judge: Send + Sync {
    /// Synthesize all findings into a final report draft. `sources_hint`
    /// is the deduplicated merge of every finding's sources, supplied as
    /// grounding context independent of what the judge echoes back.
    async fn judge(
        &self,
        claim: &str,
        plan: &InvestigationPlan,
        findings: &[AspectFinding],
        sources_hint: &[SourceEvidence],
    ) -> Result<FactCheckReport>;
}

#[async_trait]
pub trait SearchRetriever: Send + Sync {
    /// Run one web search query, returning up to `count` ranked results.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SourceEvidence>>;
}

#[async_trait]
impl SearchRetriever for factlens_retrieval::BraveSearch {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SourceEvidence>> {
        self.search(query, count).await
    }
}

#[async_trait]
pub trait ClaimExtractionBackend: Send + Sync {
    /// Extract at most `max_claims` atomic check-worthy claims from text.
    async fn extract(&self, input_text: &str, max_claims: usize) -> Result<ClaimExtractionResult>;
}

/// Receives the run log once, after the run settles. Fire-and-forget:
/// a sink error is logged and never fails the run.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn record(&self, artifacts: &RunArtifacts) -> Result<()>;
}
