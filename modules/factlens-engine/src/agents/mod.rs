//! Model-backed adapters for the pipeline traits, one set per
//! inference provider. Payload construction is shared so both
//! providers present identical context to their models.

pub mod gemini;
pub mod openai;
pub mod skills;

pub use gemini::{GeminiClaimExtractor, GeminiJudge, GeminiPlanner, GeminiResearcher};
pub use openai::{OpenAiClaimExtractor, OpenAiJudge, OpenAiPlanner, OpenAiResearcher};
pub use skills::{SkillSpec, SKILLS};

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use factlens_common::normalize::normalize_query_list;
use factlens_common::{
    AspectFinding, InvestigationPlan, SourceEvidence, VerificationCheck,
};

use crate::traits::SearchRetriever;

fn plan_payload(claim: &str, max_checks: usize) -> serde_json::Value {
    json!({
        "claim": claim,
        "max_checks": max_checks,
    })
}

fn research_payload(
    claim: &str,
    check: &VerificationCheck,
    search_results: Option<&[SourceEvidence]>,
) -> serde_json::Value {
    let mut payload = json!({
        "claim": claim,
        "check": check,
        "requirements": {
            "min_sources": 2,
            "must_use_search_tool": search_results.is_none(),
        },
    });
    if let Some(results) = search_results {
        payload["search_results"] = json!(results);
    }
    payload
}

fn judge_payload(
    claim: &str,
    plan: &InvestigationPlan,
    findings: &[AspectFinding],
    sources_hint: &[SourceEvidence],
) -> serde_json::Value {
    json!({
        "claim": claim,
        "plan": plan,
        "findings": findings,
        "sources": sources_hint,
    })
}

fn extraction_payload(input_text: &str, max_claims: usize) -> serde_json::Value {
    json!({
        "input_text": input_text,
        "requirements": {
            "max_claims": max_claims,
            "decontextualized": true,
            "atomic_claims": true,
            "maximize_checkworthy_coverage": true,
            "only_directly_mentioned_facts": true,
        },
    })
}

/// Run the check's queries through the retriever and pool the results.
/// A failed query is logged and contributes nothing; research proceeds
/// on whatever the remaining queries returned.
async fn gather_search_results(
    retriever: &Arc<dyn SearchRetriever>,
    claim: &str,
    check: &VerificationCheck,
    max_queries: usize,
    results_per_query: usize,
) -> Vec<SourceEvidence> {
    let queries = normalize_query_list(
        &check.search_queries,
        &[check.question.clone(), claim.to_string()],
        max_queries,
    );

    let mut pooled = Vec::new();
    for query in &queries {
        match retriever.search(query, results_per_query).await {
            Ok(results) => pooled.extend(results),
            Err(error) => {
                warn!(aspect_id = %check.aspect_id, query, error = %error, "Search query failed");
            }
        }
    }
    pooled
}

/// Models occasionally blank out the identifying fields; pin them back
/// to the check so findings stay joinable to the plan.
fn backfill_finding(mut finding: AspectFinding, check: &VerificationCheck) -> AspectFinding {
    if finding.aspect_id.trim().is_empty() {
        finding.aspect_id = check.aspect_id.clone();
    }
    if finding.question.trim().is_empty() {
        finding.question = check.question.clone();
    }
    finding
}
