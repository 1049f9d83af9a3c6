//! The orchestration services. `FactCheckService` drives one claim
//! through plan, research and judge; `ClaimExtractionService` lifts
//! check-worthy claims out of free text so each can be run separately.

use std::sync::Arc;

use tracing::{info, warn};

use factlens_common::{
    AspectFinding, ClaimExtractionResult, FactCheckReport, FactLensError, InvestigationPlan,
};

use crate::artifacts::{RunArtifacts, StageDetail};
use crate::stages::{JudgeStage, PlanStage, ResearchStage};
use crate::traits::{ArtifactSink, ClaimExtractionBackend};

/// Everything one fact-check run produced, including the intermediate
/// stage outputs a caller may want to render or persist.
#[derive(Debug, Clone)]
pub struct FactCheckRun {
    pub claim: String,
    pub plan: InvestigationPlan,
    pub findings: Vec<AspectFinding>,
    pub report: FactCheckReport,
    pub artifacts: RunArtifacts,
}

pub struct FactCheckService {
    pub(crate) plan_stage: PlanStage,
    pub(crate) research_stage: ResearchStage,
    pub(crate) judge_stage: JudgeStage,
    pub(crate) sink: Option<Arc<dyn ArtifactSink>>,
}

impl FactCheckService {
    pub fn new(
        plan_stage: PlanStage,
        research_stage: ResearchStage,
        judge_stage: JudgeStage,
        sink: Option<Arc<dyn ArtifactSink>>,
    ) -> Self {
        Self {
            plan_stage,
            research_stage,
            judge_stage,
            sink,
        }
    }

    /// Run the full pipeline on one claim.
    ///
    /// The artifacts are handed to the sink exactly once, whether the
    /// run succeeds or fails at a fatal stage.
    pub async fn check_claim(&self, claim: &str) -> Result<FactCheckRun, FactLensError> {
        let normalized_claim = claim.trim();
        if normalized_claim.is_empty() {
            return Err(FactLensError::EmptyClaim);
        }

        let mut artifacts = RunArtifacts::new(claim, normalized_claim);
        info!(run_id = %artifacts.run_id, claim = normalized_claim, "Fact-check run started");

        let plan = match self.plan_stage.execute(normalized_claim, &mut artifacts).await {
            Ok(plan) => plan,
            Err(error) => {
                artifacts.log(StageDetail::RunFailed {
                    at: "planning".to_string(),
                    error: error.to_string(),
                });
                self.hand_off(&artifacts).await;
                return Err(error);
            }
        };

        let findings = self
            .research_stage
            .execute(normalized_claim, &plan, &mut artifacts)
            .await;

        let report = match self
            .judge_stage
            .execute(normalized_claim, &plan, &findings, &mut artifacts)
            .await
        {
            Ok(report) => report,
            Err(error) => {
                artifacts.log(StageDetail::RunFailed {
                    at: "judging".to_string(),
                    error: error.to_string(),
                });
                self.hand_off(&artifacts).await;
                return Err(error);
            }
        };

        self.hand_off(&artifacts).await;
        Ok(FactCheckRun {
            claim: normalized_claim.to_string(),
            plan,
            findings,
            report,
            artifacts,
        })
    }

    async fn hand_off(&self, artifacts: &RunArtifacts) {
        if let Some(sink) = &self.sink {
            if let Err(error) = sink.record(artifacts).await {
                warn!(run_id = %artifacts.run_id, error = %error, "Artifact sink failed");
            }
        }
    }
}

pub struct ClaimExtractionService {
    backend: Arc<dyn ClaimExtractionBackend>,
    max_claims: usize,
}

impl ClaimExtractionService {
    pub fn new(backend: Arc<dyn ClaimExtractionBackend>, max_claims: usize) -> Self {
        Self {
            backend,
            max_claims: max_claims.max(1),
        }
    }

    pub async fn extract_claims(
        &self,
        input_text: &str,
    ) -> Result<ClaimExtractionResult, FactLensError> {
        let input_text = input_text.trim();
        if input_text.is_empty() {
            return Err(FactLensError::EmptyInput);
        }

        let mut result = self
            .backend
            .extract(input_text, self.max_claims)
            .await
            .map_err(|e| FactLensError::Extraction(format!("{e:#}")))?;

        result.input_text = input_text.to_string();
        result.claims.truncate(self.max_claims);
        repair_claim_ids(&mut result);

        info!(claims = result.claims.len(), "Claim extraction complete");
        Ok(result)
    }
}

/// Backfill blank claim ids positionally and de-duplicate collisions
/// with a numeric suffix, mirroring what the plan normalizer does for
/// aspect ids.
fn repair_claim_ids(result: &mut ClaimExtractionResult) {
    let mut seen = std::collections::HashSet::new();
    for (index, claim) in result.claims.iter_mut().enumerate() {
        let mut id = claim.claim_id.trim().to_string();
        if id.is_empty() {
            id = format!("claim_{}", index + 1);
        }
        if seen.contains(&id) {
            let mut n = 2;
            while seen.contains(&format!("{id}_{n}")) {
                n += 1;
            }
            id = format!("{id}_{n}");
        }
        seen.insert(id.clone());
        claim.claim_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factlens_common::ExtractedClaim;

    fn extraction(ids: &[&str]) -> ClaimExtractionResult {
        ClaimExtractionResult {
            input_text: "text".to_string(),
            claims: ids
                .iter()
                .map(|id| ExtractedClaim {
                    claim_id: id.to_string(),
                    claim_text: "something happened".to_string(),
                    topic: None,
                })
                .collect(),
        }
    }

    #[test]
    fn blank_ids_are_backfilled_positionally() {
        let mut result = extraction(&["", "economy", "  "]);
        repair_claim_ids(&mut result);
        let ids: Vec<&str> = result.claims.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["claim_1", "economy", "claim_3"]);
    }

    #[test]
    fn duplicate_ids_get_numeric_suffixes() {
        let mut result = extraction(&["economy", "economy", "economy"]);
        repair_claim_ids(&mut result);
        let ids: Vec<&str> = result.claims.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["economy", "economy_2", "economy_3"]);
    }

    struct OverlyEagerBackend;

    #[async_trait::async_trait]
    impl ClaimExtractionBackend for OverlyEagerBackend {
        async fn extract(
            &self,
            input_text: &str,
            _max_claims: usize,
        ) -> anyhow::Result<ClaimExtractionResult> {
            // Returns more claims than asked for, with broken ids.
            let mut result = extraction(&["a", "", "a", "b", "c"]);
            result.input_text = input_text.to_string();
            Ok(result)
        }
    }

    #[tokio::test]
    async fn extraction_caps_claims_and_repairs_ids() {
        let service = ClaimExtractionService::new(Arc::new(OverlyEagerBackend), 3);
        let result = service.extract_claims("  some text  ").await.unwrap();

        assert_eq!(result.input_text, "some text");
        assert_eq!(result.claims.len(), 3);
        let ids: Vec<&str> = result.claims.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "claim_2", "a_2"]);
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let service = ClaimExtractionService::new(Arc::new(OverlyEagerBackend), 3);
        let result = service.extract_claims("   \n ").await;
        assert!(matches!(result, Err(FactLensError::EmptyInput)));
    }
}
