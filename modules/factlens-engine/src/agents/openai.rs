//! OpenAI-backed pipeline adapters. The researcher runs in one of two
//! modes: hosted web search (the model searches itself) or an explicit
//! retriever whose pooled results are embedded in the payload.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use llm_client::OpenAi;

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

pub struct OpenAiPlanner {
    client: OpenAi,
}

impl OpenAiPlanner {
    pub fn new(client: OpenAi) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Planner for OpenAiPlanner {
    async fn plan(&self, claim: &str, max_checks: usize) -> Result<InvestigationPlan> {
        let payload = serde_json::to_string_pretty(&plan_payload(claim, max_checks))?;
        self.client.extract(PLAN_PROMPT, payload).await
    }
}

pub struct OpenAiResearcher {
    client: OpenAi,
    /// None means the hosted web search tool; Some means explicit
    /// retrieval with results embedded in the payload.
    retriever: Option<Arc<dyn SearchRetriever>>,
    search_context_size: String,
    max_search_queries_per_check: usize,
    results_per_query: usize,
}

impl OpenAiResearcher {
    pub fn with_hosted_search(client: OpenAi, search_context_size: impl Into<String>) -> Self {
        Self {
            client,
            retriever: None,
            search_context_size: search_context_size.into(),
            max_search_queries_per_check: 0,
            results_per_query: 0,
        }
    }

    pub fn with_retriever(
        client: OpenAi,
        retriever: Arc<dyn SearchRetriever>,
        max_search_queries_per_check: usize,
        results_per_query: usize,
    ) -> Self {
        Self {
            client,
            retriever: Some(retriever),
            search_context_size: String::new(),
            max_search_queries_per_check,
            results_per_query,
        }
    }
}

#[async_trait]
impl Researcher for OpenAiResearcher {
    async fn research(&self, claim: &str, check: &VerificationCheck) -> Result<AspectFinding> {
        let finding: AspectFinding = match &self.retriever {
            Some(retriever) => {
                let results = gather_search_results(
                    retriever,
                    claim,
                    check,
                    self.max_search_queries_per_check,
                    self.results_per_query,
                )
                .await;
                let payload =
                    serde_json::to_string_pretty(&research_payload(claim, check, Some(&results)))?;
                self.client.extract(RESEARCH_PROMPT, payload).await?
            }
            None => {
                let payload =
                    serde_json::to_string_pretty(&research_payload(claim, check, None))?;
                self.client
                    .extract_with_web_search(RESEARCH_PROMPT, payload, &self.search_context_size)
                    .await?
            }
        };
        Ok(backfill_finding(finding, check))
    }
}

pub struct OpenAiJudge {
    client: OpenAi,
}

impl OpenAiJudge {
    pub fn new(client: OpenAi) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn judge(
        &self,
        claim: &str,
        plan: &InvestigationPlan,
        findings: &[AspectFinding],
        sources_hint: &[SourceEvidence],
    ) -> Result<FactCheckReport> {
        let payload =
            serde_json::to_string_pretty(&judge_payload(claim, plan, findings, sources_hint))?;
        self.client.extract(JUDGE_PROMPT, payload).await
    }
}

pub struct OpenAiClaimExtractor {
    client: OpenAi,
}

impl OpenAiClaimExtractor {
    pub fn new(client: OpenAi) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClaimExtractionBackend for OpenAiClaimExtractor {
    async fn extract(&self, input_text: &str, max_claims: usize) -> Result<ClaimExtractionResult> {
        let payload = serde_json::to_string_pretty(&extraction_payload(input_text, max_claims))?;
        self.client.extract(EXTRACT_CLAIMS_PROMPT, payload).await
    }
}
