//! Gemini-backed pipeline adapters. Gemini has no hosted search tool,
//! so the researcher always requires an explicit retriever.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use llm_client::Gemini;

use factlens_common::{
    AspectFinding, ClaimExtractionResult, FactCheckReport, InvestigationPlan, SourceEvidence,
    VerificationCheck,
};

use super::skills::{EXTRACT_CLAIMS_PROMPT, JUDGE_PROMPT, PLAN_PROMPT, RESEARCH_PROMPT};
use super::{
    backfill_finding, extraction_payload, gather_search_results, judge_payload, plan_payload,
    research_payload,
};
use crate::traits::{ClaimExtractionBackend, Judge, Planner, Researcher, SearchRetriever};

pub struct GeminiPlanner {
    client: Gemini,
}

impl GeminiPlanner {
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Planner for GeminiPlanner {
    async fn plan(&self, claim: &str, max_checks: usize) -> Result<InvestigationPlan> {
        self.client
            .extract(PLAN_PROMPT, &plan_payload(claim, max_checks))
            .await
    }
}

pub struct GeminiResearcher {
    client: Gemini,
    retriever: Arc<dyn SearchRetriever>,
    max_search_queries_per_check: usize,
    results_per_query: usize,
}

impl GeminiResearcher {
    pub fn new(
        client: Gemini,
        retriever: Arc<dyn SearchRetriever>,
        max_search_queries_per_check: usize,
        results_per_query: usize,
    ) -> Self {
        Self {
            client,
            retriever,
            max_search_queries_per_check,
            results_per_query,
        }
    }
}

#[async_trait]
impl Researcher for GeminiResearcher {
    async fn research(&self, claim: &str, check: &VerificationCheck) -> Result<AspectFinding> {
        let results = gather_search_results(
            &self.retriever,
            claim,
            check,
            self.max_search_queries_per_check,
            self.results_per_query,
        )
        .await;

        let finding: AspectFinding = self
            .client
            .extract(RESEARCH_PROMPT, &research_payload(claim, check, Some(&results)))
            .await?;
        Ok(backfill_finding(finding, check))
    }
}

pub struct GeminiJudge {
    client: Gemini,
}

impl GeminiJudge {
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Judge for GeminiJudge {
    async fn judge(
        &self,
        claim: &str,
        plan: &InvestigationPlan,
        findings: &[AspectFinding],
        sources_hint: &[SourceEvidence],
    ) -> Result<FactCheckReport> {
        self.client
            .extract(JUDGE_PROMPT, &judge_payload(claim, plan, findings, sources_hint))
            .await
    }
}

pub struct GeminiClaimExtractor {
    client: Gemini,
}

impl GeminiClaimExtractor {
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClaimExtractionBackend for GeminiClaimExtractor {
    async fn extract(&self, input_text: &str, max_claims: usize) -> Result<ClaimExtractionResult> {
        self.client
            .extract(EXTRACT_CLAIMS_PROMPT, &extraction_payload(input_text, max_claims))
            .await
    }
}
