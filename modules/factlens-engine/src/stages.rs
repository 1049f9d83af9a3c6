//! The three pipeline stages. Each stage snapshots its raw and final
//! outputs into the run artifacts; only plan and judge failures are
//! fatal, research failures are absorbed by the fan-out.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use factlens_common::normalize::normalize_plan;
use factlens_common::{AspectFinding, FactCheckReport, FactLensError, InvestigationPlan};

use crate::artifacts::{RunArtifacts, StageDetail};
use crate::merge::{merge_report_sources, merge_sources};
use crate::research::{research_checks, ResearchOptions};
use crate::traits::{Judge, Planner, Researcher};

// ---------------------------------------------------------------------------
// PlanStage
// ---------------------------------------------------------------------------

pub struct PlanStage {
    pub planner: Arc<dyn Planner>,
    pub max_checks: usize,
    pub max_search_queries_per_check: usize,
}

impl PlanStage {
    pub async fn execute(
        &self,
        claim: &str,
        artifacts: &mut RunArtifacts,
    ) -> Result<InvestigationPlan, FactLensError> {
        let draft = self
            .planner
            .plan(claim, self.max_checks)
            .await
            .map_err(|e| FactLensError::Planning(format!("{e:#}")))?;
        artifacts.log(StageDetail::PlanDraft {
            plan: draft.clone(),
        });

        let plan = normalize_plan(claim, draft, self.max_checks, self.max_search_queries_per_check);
        artifacts.log(StageDetail::PlanNormalized { plan: plan.clone() });

        info!(checks = plan.checks.len(), "Plan normalized");
        Ok(plan)
    }
}

// ---------------------------------------------------------------------------
// ResearchStage
// ---------------------------------------------------------------------------

pub struct ResearchStage {
    pub researcher: Arc<dyn Researcher>,
    pub max_parallel: usize,
    pub retry_attempts: usize,
    pub attempt_timeout: Option<Duration>,
}

impl ResearchStage {
    /// Total: always returns one finding per planned check, in order.
    pub async fn execute(
        &self,
        claim: &str,
        plan: &InvestigationPlan,
        artifacts: &mut RunArtifacts,
    ) -> Vec<AspectFinding> {
        let options = ResearchOptions {
            max_parallel: self.max_parallel,
            retry_attempts: self.retry_attempts,
            attempt_timeout: self.attempt_timeout,
        };
        let outcomes =
            research_checks(claim, &plan.checks, self.researcher.clone(), options).await;

        let mut findings = Vec::with_capacity(outcomes.len());
        for (check, outcome) in plan.checks.iter().zip(outcomes) {
            for (index, error) in outcome.errors.iter().enumerate() {
                artifacts.log(StageDetail::ResearchAttemptFailed {
                    aspect_id: check.aspect_id.clone(),
                    attempt: index + 1,
                    error: error.clone(),
                });
            }
            artifacts.log(StageDetail::FindingRecorded {
                finding: outcome.finding.clone(),
            });
            findings.push(outcome.finding);
        }

        let insufficient = findings.iter().filter(|f| f.signal.is_insufficient()).count();
        info!(
            findings = findings.len(),
            insufficient, "Research fan-out complete"
        );
        findings
    }
}

// ---------------------------------------------------------------------------
// JudgeStage
// ---------------------------------------------------------------------------

pub struct JudgeStage {
    pub judge: Arc<dyn Judge>,
}

impl JudgeStage {
    pub async fn execute(
        &self,
        claim: &str,
        plan: &InvestigationPlan,
        findings: &[AspectFinding],
        artifacts: &mut RunArtifacts,
    ) -> Result<FactCheckReport, FactLensError> {
        let sources_hint = merge_sources(findings);

        let draft = self
            .judge
            .judge(claim, plan, findings, &sources_hint)
            .await
            .map_err(|e| FactLensError::Judging(format!("{e:#}")))?;
        artifacts.log(StageDetail::ReportDraft {
            report: draft.clone(),
        });

        let report = finalize_report(claim, draft, findings);
        artifacts.log(StageDetail::ReportFinal {
            report: report.clone(),
        });

        info!(verdict = %report.verdict, confidence = report.verdict_confidence, "Verdict assigned");
        Ok(report)
    }
}

/// Enforce the report contract on the judge's draft: pin the claim,
/// clamp confidences into [0,1] (NaN becomes 0), backfill findings the
/// judge omitted from the researched set, and merge the final source
/// list with the judge's echoes first.
fn finalize_report(
    claim: &str,
    draft: FactCheckReport,
    findings: &[AspectFinding],
) -> FactCheckReport {
    let mut report = draft;

    report.claim = claim.to_string();
    report.verdict_confidence = clamp_confidence(report.verdict_confidence);

    if report.findings.is_empty() {
        report.findings = findings.to_vec();
    }
    for finding in &mut report.findings {
        finding.confidence = clamp_confidence(finding.confidence);
    }

    report.sources = merge_report_sources(&report.sources, &report.findings);
    report
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factlens_common::{EvidenceSignal, VeracityVerdict};

    fn report(confidence: f64) -> FactCheckReport {
        FactCheckReport {
            claim: String::new(),
            verdict: VeracityVerdict::Supported,
            verdict_confidence: confidence,
            justification: "because".to_string(),
            key_points: vec![],
            findings: vec![],
            sources: vec![],
        }
    }

    fn finding(confidence: f64) -> AspectFinding {
        AspectFinding {
            aspect_id: "a".to_string(),
            question: "q".to_string(),
            signal: EvidenceSignal::Supports,
            summary: "s".to_string(),
            confidence,
            sources: vec![],
            caveats: vec![],
        }
    }

    #[test]
    fn confidences_are_clamped() {
        let out = finalize_report("c", report(1.7), &[finding(-0.5)]);
        assert_eq!(out.verdict_confidence, 1.0);
        assert_eq!(out.findings[0].confidence, 0.0);
    }

    #[test]
    fn nan_confidence_defaults_to_zero() {
        let out = finalize_report("c", report(f64::NAN), &[]);
        assert_eq!(out.verdict_confidence, 0.0);
    }

    #[test]
    fn omitted_findings_are_backfilled() {
        let researched = vec![finding(0.8), finding(0.6)];
        let out = finalize_report("c", report(0.9), &researched);
        assert_eq!(out.findings.len(), 2);
    }

    #[test]
    fn claim_is_pinned() {
        let out = finalize_report("the claim", report(0.5), &[]);
        assert_eq!(out.claim, "the claim");
    }
}
