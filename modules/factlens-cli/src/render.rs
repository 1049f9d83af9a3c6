//! Plain-text rendering for terminal output. JSON mode bypasses this
//! entirely and serializes the run types directly.

use factlens_common::ClaimExtractionResult;
use factlens_engine::FactCheckRun;

pub fn format_run_text(run: &FactCheckRun, show_plan: bool) -> String {
    let report = &run.report;

    let mut lines: Vec<String> = Vec::new();
    lines.push("Claim".to_string());
    lines.push(format!("  {}", run.claim));
    lines.push(String::new());
    lines.push("Verdict".to_string());
    lines.push(format!(
        "  {} (confidence: {:.2})",
        report.verdict, report.verdict_confidence
    ));
    lines.push(String::new());
    lines.push("Justification".to_string());
    lines.push(format!("  {}", report.justification));

    if !report.key_points.is_empty() {
        lines.push(String::new());
        lines.push("Key Points".to_string());
        for point in &report.key_points {
            lines.push(format!("  - {point}"));
        }
    }

    if show_plan {
        lines.push(String::new());
        lines.push("Plan".to_string());
        for check in &run.plan.checks {
            lines.push(format!("  - [{}] {}", check.aspect_id, check.question));
            lines.push(format!("    rationale: {}", check.rationale));
            if !check.search_queries.is_empty() {
                lines.push(format!("    queries: {}", check.search_queries.join(", ")));
            }
        }
    }

    lines.push(String::new());
    lines.push("Findings".to_string());
    if report.findings.is_empty() {
        lines.push("  - no findings returned".to_string());
    }
    for finding in &report.findings {
        lines.push(format!(
            "  - [{}] {} | confidence {:.2}",
            finding.aspect_id, finding.signal, finding.confidence
        ));
        lines.push(format!("    question: {}", finding.question));
        lines.push(format!("    summary: {}", finding.summary));
        if !finding.caveats.is_empty() {
            lines.push(format!("    caveats: {}", finding.caveats.join("; ")));
        }
    }

    lines.push(String::new());
    lines.push("Sources".to_string());
    if report.sources.is_empty() {
        lines.push("  - no sources returned".to_string());
    }
    for (idx, source) in report.sources.iter().enumerate() {
        lines.push(format!("  [{}] {}", idx + 1, source.title));
        lines.push(format!("      {}", source.url));
        lines.push(format!("      {}", source.snippet));
    }

    lines.join("\n")
}

pub fn format_extraction_text(result: &ClaimExtractionResult) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("Claims".to_string());
    if result.claims.is_empty() {
        lines.push("  - no check-worthy claims found".to_string());
    }
    for claim in &result.claims {
        let topic = claim.topic.as_deref().unwrap_or("general");
        lines.push(format!("  - [{}] ({topic}) {}", claim.claim_id, claim.claim_text));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use factlens_common::{
        AspectFinding, EvidenceSignal, ExtractedClaim, FactCheckReport, InvestigationPlan,
        SourceEvidence, VeracityVerdict, VerificationCheck,
    };
    use factlens_engine::RunArtifacts;

    fn sample_run() -> FactCheckRun {
        let check = VerificationCheck {
            aspect_id: "completion_date".to_string(),
            question: "When was the Eiffel Tower completed?".to_string(),
            rationale: "dates the claim".to_string(),
            search_queries: vec!["eiffel tower 1889".to_string()],
        };
        let finding = AspectFinding {
            aspect_id: "completion_date".to_string(),
            question: check.question.clone(),
            signal: EvidenceSignal::Supports,
            summary: "Completed March 1889.".to_string(),
            confidence: 0.92,
            sources: vec![],
            caveats: vec!["single source".to_string()],
        };
        FactCheckRun {
            claim: "The Eiffel Tower was completed in 1889".to_string(),
            plan: InvestigationPlan {
                claim: "The Eiffel Tower was completed in 1889".to_string(),
                checks: vec![check],
                assumptions: vec![],
            },
            findings: vec![finding.clone()],
            report: FactCheckReport {
                claim: "The Eiffel Tower was completed in 1889".to_string(),
                verdict: VeracityVerdict::Supported,
                verdict_confidence: 0.9,
                justification: "The completion date checks out.".to_string(),
                key_points: vec!["Completed March 1889".to_string()],
                findings: vec![finding],
                sources: vec![SourceEvidence {
                    title: "Eiffel Tower history".to_string(),
                    url: "https://example.com/eiffel".to_string(),
                    snippet: "Completed in 1889.".to_string(),
                    publisher: None,
                    published_at: None,
                }],
            },
            artifacts: RunArtifacts::new(
                "The Eiffel Tower was completed in 1889",
                "The Eiffel Tower was completed in 1889",
            ),
        }
    }

    #[test]
    fn text_report_has_all_sections() {
        let text = format_run_text(&sample_run(), true);
        for section in ["Claim", "Verdict", "Justification", "Key Points", "Plan", "Findings", "Sources"] {
            assert!(text.contains(section), "missing section {section}");
        }
        assert!(text.contains("Supported (confidence: 0.90)"));
        assert!(text.contains("caveats: single source"));
    }

    #[test]
    fn plan_section_is_opt_in() {
        let text = format_run_text(&sample_run(), false);
        assert!(!text.contains("\nPlan\n"));
    }

    #[test]
    fn extraction_text_lists_claims() {
        let result = ClaimExtractionResult {
            input_text: "text".to_string(),
            claims: vec![ExtractedClaim {
                claim_id: "gdp_growth".to_string(),
                claim_text: "GDP grew 3% in 2024.".to_string(),
                topic: Some("economy".to_string()),
            }],
        };
        let text = format_extraction_text(&result);
        assert!(text.contains("[gdp_growth] (economy) GDP grew 3% in 2024."));
    }
}
