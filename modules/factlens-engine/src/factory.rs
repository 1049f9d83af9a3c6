//! Service composition. Provider and retriever selection happens here,
//! once, so the rest of the engine only ever sees trait objects.

use std::sync::Arc;
use std::time::Duration;

use llm_client::{Gemini, OpenAi};

use factlens_common::{Config, FactLensError, InferenceProvider, RunConfig, SearchProvider};
use factlens_retrieval::BraveSearch;

use crate::agents::{
    GeminiClaimExtractor, GeminiJudge, GeminiPlanner, GeminiResearcher, OpenAiClaimExtractor,
    OpenAiJudge, OpenAiPlanner, OpenAiResearcher,
};
use crate::service::{ClaimExtractionService, FactCheckService};
use crate::stages::{JudgeStage, PlanStage, ResearchStage};
use crate::traits::{ArtifactSink, ClaimExtractionBackend, Judge, Planner, Researcher};

/// Wire a fact-check service for the configured providers.
///
/// Gemini has no hosted search tool, so `inference_provider = gemini`
/// is only valid with `search_provider = brave`. The mismatch is
/// rejected here, before any network client is built.
pub fn build_fact_check_service(
    config: &RunConfig,
    credentials: &Config,
    sink: Option<Arc<dyn ArtifactSink>>,
) -> Result<FactCheckService, FactLensError> {
    let (planner, researcher, judge): (Arc<dyn Planner>, Arc<dyn Researcher>, Arc<dyn Judge>) =
        match config.inference_provider {
            InferenceProvider::OpenAi => {
                let client = OpenAi::new(&credentials.openai_api_key, &config.model);
                let researcher: Arc<dyn Researcher> = match config.search_provider {
                    SearchProvider::OpenAi => Arc::new(OpenAiResearcher::with_hosted_search(
                        client.clone(),
                        &config.search_context_size,
                    )),
                    SearchProvider::Brave => Arc::new(OpenAiResearcher::with_retriever(
                        client.clone(),
                        Arc::new(BraveSearch::new(&credentials.brave_api_key)),
                        config.max_search_queries_per_check,
                        config.search_results_per_query,
                    )),
                };
                (
                    Arc::new(OpenAiPlanner::new(client.clone())),
                    researcher,
                    Arc::new(OpenAiJudge::new(client)),
                )
            }
            InferenceProvider::Gemini => {
                if config.search_provider != SearchProvider::Brave {
                    return Err(FactLensError::Unsupported(
                        "Gemini inference supports search_provider=brave only".to_string(),
                    ));
                }
                let client = Gemini::new(&credentials.gemini_api_key, &config.model);
                (
                    Arc::new(GeminiPlanner::new(client.clone())),
                    Arc::new(GeminiResearcher::new(
                        client.clone(),
                        Arc::new(BraveSearch::new(&credentials.brave_api_key)),
                        config.max_search_queries_per_check,
                        config.search_results_per_query,
                    )),
                    Arc::new(GeminiJudge::new(client)),
                )
            }
        };

    Ok(FactCheckService::new(
        PlanStage {
            planner,
            max_checks: config.max_checks,
            max_search_queries_per_check: config.max_search_queries_per_check,
        },
        ResearchStage {
            researcher,
            max_parallel: config.max_parallel_research,
            retry_attempts: config.research_retry_attempts,
            attempt_timeout: research_timeout(config),
        },
        JudgeStage { judge },
        sink,
    ))
}

pub fn build_claim_extraction_service(
    config: &RunConfig,
    credentials: &Config,
) -> ClaimExtractionService {
    let backend: Arc<dyn ClaimExtractionBackend> = match config.inference_provider {
        InferenceProvider::OpenAi => Arc::new(OpenAiClaimExtractor::new(OpenAi::new(
            &credentials.openai_api_key,
            &config.model,
        ))),
        InferenceProvider::Gemini => Arc::new(GeminiClaimExtractor::new(Gemini::new(
            &credentials.gemini_api_key,
            &config.model,
        ))),
    };
    ClaimExtractionService::new(backend, config.max_claims)
}

fn research_timeout(config: &RunConfig) -> Option<Duration> {
    if config.research_timeout_seconds == 0 {
        None
    } else {
        Some(Duration::from_secs(config.research_timeout_seconds))
    }
}
