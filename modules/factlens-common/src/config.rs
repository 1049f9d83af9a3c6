use std::env;
use std::str::FromStr;

/// Which structured-output inference backend runs the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceProvider {
    OpenAi,
    Gemini,
}

impl FromStr for InferenceProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(InferenceProvider::OpenAi),
            "gemini" => Ok(InferenceProvider::Gemini),
            other => Err(format!("Unknown inference provider: {other}")),
        }
    }
}

/// Which web search backend the researcher uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    /// OpenAI-hosted web search tool (no separate retriever call).
    OpenAi,
    /// Brave Search API, called explicitly per query.
    Brave,
}

impl FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(SearchProvider::OpenAi),
            "brave" => Ok(SearchProvider::Brave),
            other => Err(format!("Unknown search provider: {other}")),
        }
    }
}

/// API credentials loaded from environment variables.
/// Only the keys the selected providers need are required.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub gemini_api_key: String,
    pub brave_api_key: String,
}

impl Config {
    /// Load credentials for the selected providers.
    /// Panics with a clear message if a required var is missing.
    pub fn from_env(inference: InferenceProvider, search: SearchProvider) -> Self {
        let openai_api_key = match inference {
            InferenceProvider::OpenAi => required_env("OPENAI_API_KEY"),
            InferenceProvider::Gemini => env::var("OPENAI_API_KEY").unwrap_or_default(),
        };
        let gemini_api_key = match inference {
            InferenceProvider::Gemini => required_env("GEMINI_API_KEY"),
            InferenceProvider::OpenAi => env::var("GEMINI_API_KEY").unwrap_or_default(),
        };
        let brave_api_key = match search {
            SearchProvider::Brave => required_env("BRAVE_SEARCH_API_KEY"),
            SearchProvider::OpenAi => env::var("BRAVE_SEARCH_API_KEY").unwrap_or_default(),
        };

        Self {
            openai_api_key,
            gemini_api_key,
            brave_api_key,
        }
    }
}

/// Per-run knobs consumed by the engine. Constructed once at process
/// start and passed by value — the engine never reads the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub inference_provider: InferenceProvider,
    pub model: String,
    pub search_provider: SearchProvider,
    /// Context size hint for the OpenAI-hosted web search tool
    /// ("low" | "medium" | "high"). Ignored by the Brave retriever.
    pub search_context_size: String,
    pub max_checks: usize,
    pub max_parallel_research: usize,
    pub max_search_queries_per_check: usize,
    pub search_results_per_query: usize,
    pub research_timeout_seconds: u64,
    pub research_retry_attempts: usize,
    pub max_claims: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inference_provider: InferenceProvider::OpenAi,
            model: "gpt-4.1-mini".to_string(),
            search_provider: SearchProvider::OpenAi,
            search_context_size: "high".to_string(),
            max_checks: 4,
            max_parallel_research: 4,
            max_search_queries_per_check: 5,
            search_results_per_query: 5,
            research_timeout_seconds: 120,
            research_retry_attempts: 1,
            max_claims: 12,
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
