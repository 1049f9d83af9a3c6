mod render;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use factlens_common::{Config, InferenceProvider, RunConfig, SearchProvider};
use factlens_engine::{build_claim_extraction_service, build_fact_check_service, SKILLS};

use render::{format_extraction_text, format_run_text};

#[derive(Parser)]
#[command(name = "factlens", about = "Agentic fact-checking pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fact-check a claim.
    Check {
        /// Claim text to verify.
        claim: String,

        /// Model name passed to the inference provider.
        #[arg(long, env = "FACTLENS_MODEL", default_value = "gpt-4.1-mini")]
        model: String,

        /// Inference provider: openai | gemini.
        #[arg(long, env = "FACTLENS_INFERENCE_PROVIDER", default_value = "openai")]
        inference_provider: String,

        /// Search provider: openai | brave.
        #[arg(long, env = "FACTLENS_SEARCH_PROVIDER", default_value = "openai")]
        search_provider: String,

        /// Maximum number of verification sub-checks.
        #[arg(long, default_value_t = 4)]
        max_checks: usize,

        /// Maximum parallel research workers.
        #[arg(long, default_value_t = 4)]
        parallel: usize,

        /// Web search context size for the hosted web search tool.
        #[arg(long, default_value = "high")]
        search_context_size: String,

        /// Print the generated verification plan in text mode.
        #[arg(long)]
        show_plan: bool,

        /// Return machine-readable JSON output.
        #[arg(long)]
        json: bool,

        /// With --json, include the plan, findings and run artifacts.
        #[arg(long)]
        include_artifacts: bool,
    },

    /// Extract check-worthy claims from input text.
    Extract {
        /// Text to mine for atomic, check-worthy claims.
        text: String,

        /// Model name passed to the inference provider.
        #[arg(long, env = "FACTLENS_MODEL", default_value = "gpt-4.1-mini")]
        model: String,

        /// Inference provider: openai | gemini.
        #[arg(long, env = "FACTLENS_INFERENCE_PROVIDER", default_value = "openai")]
        inference_provider: String,

        /// Maximum number of claims to extract.
        #[arg(long, default_value_t = 12)]
        max_claims: usize,

        /// Return machine-readable JSON output.
        #[arg(long)]
        json: bool,
    },

    /// List the built-in model skills.
    Skills,
}

/// Default to info for our own crates; RUST_LOG still overrides.
/// Crate targets use underscores, so "factlens=info" would match nothing.
fn log_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for directive in [
        "factlens_cli=info",
        "factlens_engine=info",
        "factlens_retrieval=info",
        "llm_client=info",
    ] {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check {
            claim,
            model,
            inference_provider,
            search_provider,
            max_checks,
            parallel,
            search_context_size,
            show_plan,
            json,
            include_artifacts,
        } => {
            let inference = parse_inference(&inference_provider)?;
            let search = parse_search(&search_provider)?;
            let credentials = Config::from_env(inference, search);
            let config = RunConfig {
                inference_provider: inference,
                model,
                search_provider: search,
                search_context_size,
                max_checks: max_checks.max(1),
                max_parallel_research: parallel.max(1),
                ..RunConfig::default()
            };

            let service = build_fact_check_service(&config, &credentials, None)?;
            info!(max_checks = config.max_checks, parallel = config.max_parallel_research, "Checking claim");
            let run = service.check_claim(&claim).await?;

            if json {
                let mut payload = json!({ "report": run.report });
                if include_artifacts {
                    payload["plan"] = json!(run.plan);
                    payload["findings"] = json!(run.findings);
                    payload["artifacts"] = json!(run.artifacts);
                }
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", format_run_text(&run, show_plan));
            }
        }

        Command::Extract {
            text,
            model,
            inference_provider,
            max_claims,
            json,
        } => {
            let inference = parse_inference(&inference_provider)?;
            // Extraction never searches, so no search credential is required.
            let credentials = Config::from_env(inference, SearchProvider::OpenAi);
            let config = RunConfig {
                inference_provider: inference,
                model,
                max_claims: max_claims.max(1),
                ..RunConfig::default()
            };

            let service = build_claim_extraction_service(&config, &credentials);
            let result = service.extract_claims(&text).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format_extraction_text(&result));
            }
        }

        Command::Skills => {
            for skill in SKILLS {
                let web = if skill.uses_web_search { "yes" } else { "no" };
                println!("- {}: {} | web_search={web}", skill.name, skill.description);
            }
        }
    }

    Ok(())
}

fn parse_inference(raw: &str) -> Result<InferenceProvider> {
    raw.parse::<InferenceProvider>().map_err(|e| anyhow!(e))
}

fn parse_search(raw: &str) -> Result<SearchProvider> {
    raw.parse::<SearchProvider>().map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_workspace_crates() {
        let rendered = log_filter().unwrap().to_string();
        for target in ["factlens_cli", "factlens_engine", "factlens_retrieval", "llm_client"] {
            assert!(
                rendered.contains(&format!("{target}=info")),
                "missing directive for {target}"
            );
        }
    }

    #[test]
    fn provider_flags_parse() {
        assert!(parse_inference("openai").is_ok());
        assert!(parse_inference("Gemini").is_ok());
        assert!(parse_inference("claude").is_err());
        assert!(parse_search("brave").is_ok());
        assert!(parse_search("bing").is_err());
    }
}
