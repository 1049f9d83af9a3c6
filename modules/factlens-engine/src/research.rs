//! Bounded-parallel research fan-out.
//!
//! One task per check, admission-gated by a counting semaphore so no
//! more than `max_parallel` researcher calls are ever in flight, retries
//! included. The fan-out is total: it always returns exactly one finding
//! per check, in check-declaration order, regardless of completion
//! order or failures. A check that cannot be researched degrades to an
//! `insufficient` finding carrying the failure reason — it never aborts
//! the run or its siblings.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::Semaphore;
use tracing::warn;

use factlens_common::{AspectFinding, VerificationCheck};

use crate::traits::Researcher;

#[derive(Debug, Clone)]
pub struct ResearchOptions {
    /// Semaphore capacity; clamped to at least 1.
    pub max_parallel: usize,
    /// Additional attempts after the first failure. No inter-attempt
    /// delay beyond re-acquiring the semaphore slot.
    pub retry_attempts: usize,
    /// Per-attempt deadline. None disables the timeout.
    pub attempt_timeout: Option<Duration>,
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self {
            max_parallel: 4,
            retry_attempts: 1,
            attempt_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// The result of researching one check, with the attempt history the
/// research stage writes into the run artifacts.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub finding: AspectFinding,
    pub attempts: usize,
    pub errors: Vec<String>,
}

/// Research every check and return findings in check order.
pub async fn research_all(
    claim: &str,
    checks: &[VerificationCheck],
    researcher: Arc<dyn Researcher>,
    options: ResearchOptions,
) -> Vec<AspectFinding> {
    research_checks(claim, checks, researcher, options)
        .await
        .into_iter()
        .map(|outcome| outcome.finding)
        .collect()
}

/// Like [`research_all`] but keeps per-check attempt history.
pub async fn research_checks(
    claim: &str,
    checks: &[VerificationCheck],
    researcher: Arc<dyn Researcher>,
    options: ResearchOptions,
) -> Vec<CheckOutcome> {
    let semaphore = Arc::new(Semaphore::new(options.max_parallel.max(1)));
    let max_attempts = 1 + options.retry_attempts;

    // Spawn in check order, join in check order. Each task owns its own
    // result slot, so ordering never depends on completion order.
    let mut handles = Vec::with_capacity(checks.len());
    for check in checks {
        let semaphore = semaphore.clone();
        let researcher = researcher.clone();
        let claim = claim.to_string();
        let check = check.clone();
        let attempt_timeout = options.attempt_timeout;

        handles.push((
            check.clone(),
            tokio::spawn(async move {
                run_check(
                    &claim,
                    &check,
                    researcher.as_ref(),
                    semaphore,
                    max_attempts,
                    attempt_timeout,
                )
                .await
            }),
        ));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (check, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_error) => {
                // A task that never produced a result still gets a slot.
                let reason = if join_error.is_cancelled() {
                    "cancelled"
                } else {
                    "panicked"
                };
                warn!(aspect_id = %check.aspect_id, reason, "Research task did not complete");
                outcomes.push(CheckOutcome {
                    finding: AspectFinding::insufficient(
                        &check,
                        format!("Research task {reason} before completing any attempt."),
                    ),
                    attempts: 0,
                    errors: vec![reason.to_string()],
                });
            }
        }
    }

    outcomes
}

async fn run_check(
    claim: &str,
    check: &VerificationCheck,
    researcher: &dyn Researcher,
    semaphore: Arc<Semaphore>,
    max_attempts: usize,
    attempt_timeout: Option<Duration>,
) -> CheckOutcome {
    let mut errors = Vec::new();

    for attempt in 1..=max_attempts {
        // The slot is held for exactly one attempt, so retries queue
        // behind other checks instead of monopolizing capacity.
        let permit = match semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let result = match attempt_timeout {
            Some(deadline) => {
                match tokio::time::timeout(deadline, researcher.research(claim, check)).await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow!(
                        "research attempt timed out after {}s",
                        deadline.as_secs()
                    )),
                }
            }
            None => researcher.research(claim, check).await,
        };
        drop(permit);

        match result {
            Ok(finding) => {
                return CheckOutcome {
                    finding,
                    attempts: attempt,
                    errors,
                };
            }
            Err(error) => {
                warn!(
                    aspect_id = %check.aspect_id,
                    attempt,
                    max_attempts,
                    error = %error,
                    "Research attempt failed"
                );
                errors.push(format!("attempt {attempt}: {error:#}"));
            }
        }
    }

    let last_error = errors
        .last()
        .cloned()
        .unwrap_or_else(|| "cancelled".to_string());
    let summary =
        format!("Research failed after {max_attempts} attempt(s). Last error: {last_error}");

    CheckOutcome {
        finding: AspectFinding::insufficient(check, summary),
        attempts: max_attempts,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use factlens_common::EvidenceSignal;

    struct EvenAspectsFail;

    #[async_trait]
    impl Researcher for EvenAspectsFail {
        async fn research(
            &self,
            _claim: &str,
            check: &VerificationCheck,
        ) -> Result<AspectFinding> {
            let index: usize = check
                .aspect_id
                .trim_start_matches("check_")
                .parse()
                .unwrap();
            if index % 2 == 0 {
                anyhow::bail!("no evidence for {}", check.aspect_id);
            }
            Ok(AspectFinding {
                aspect_id: check.aspect_id.clone(),
                question: check.question.clone(),
                signal: EvidenceSignal::Supports,
                summary: "ok".to_string(),
                confidence: 0.8,
                sources: vec![],
                caveats: vec![],
            })
        }
    }

    fn checks(n: usize) -> Vec<VerificationCheck> {
        (1..=n)
            .map(|i| VerificationCheck {
                aspect_id: format!("check_{i}"),
                question: format!("q{i}"),
                rationale: String::new(),
                search_queries: vec![],
            })
            .collect()
    }

    #[tokio::test]
    async fn fan_out_is_total_and_ordered() {
        let checks = checks(5);
        let findings = research_all(
            "claim",
            &checks,
            Arc::new(EvenAspectsFail),
            ResearchOptions {
                max_parallel: 2,
                retry_attempts: 1,
                attempt_timeout: None,
            },
        )
        .await;

        assert_eq!(findings.len(), 5);
        for (check, finding) in checks.iter().zip(&findings) {
            assert_eq!(finding.aspect_id, check.aspect_id);
        }
        assert!(findings[1].signal.is_insufficient());
        assert!(findings[3].signal.is_insufficient());
        assert!(!findings[0].signal.is_insufficient());
    }

    struct PanicsOnSecond;

    #[async_trait]
    impl Researcher for PanicsOnSecond {
        async fn research(
            &self,
            _claim: &str,
            check: &VerificationCheck,
        ) -> Result<AspectFinding> {
            if check.aspect_id == "check_2" {
                panic!("researcher blew up");
            }
            Ok(AspectFinding {
                aspect_id: check.aspect_id.clone(),
                question: check.question.clone(),
                signal: EvidenceSignal::Supports,
                summary: "ok".to_string(),
                confidence: 0.8,
                sources: vec![],
                caveats: vec![],
            })
        }
    }

    #[tokio::test]
    async fn panicking_task_degrades_without_aborting_siblings() {
        let checks = checks(3);
        let findings = research_all(
            "claim",
            &checks,
            Arc::new(PanicsOnSecond),
            ResearchOptions {
                max_parallel: 4,
                retry_attempts: 0,
                attempt_timeout: None,
            },
        )
        .await;

        assert_eq!(findings.len(), 3);
        assert_eq!(findings[1].aspect_id, "check_2");
        assert!(findings[1].signal.is_insufficient());
        assert!(findings[1].summary.contains("panicked"));
        assert!(!findings[0].signal.is_insufficient());
        assert!(!findings[2].signal.is_insufficient());
    }

    struct StallsForever;

    #[async_trait]
    impl Researcher for StallsForever {
        async fn research(
            &self,
            _claim: &str,
            _check: &VerificationCheck,
        ) -> Result<AspectFinding> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("the attempt deadline fires first");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_attempt_hits_the_deadline_and_degrades() {
        let checks = checks(1);
        let outcomes = research_checks(
            "claim",
            &checks,
            Arc::new(StallsForever),
            ResearchOptions {
                max_parallel: 1,
                retry_attempts: 1,
                attempt_timeout: Some(Duration::from_secs(5)),
            },
        )
        .await;

        assert!(outcomes[0].finding.signal.is_insufficient());
        assert_eq!(outcomes[0].attempts, 2);
        assert_eq!(outcomes[0].errors.len(), 2);
        assert!(outcomes[0].errors[0].contains("timed out after 5s"));
    }

    #[tokio::test]
    async fn failed_check_keeps_attempt_history() {
        let checks = checks(2);
        let outcomes = research_checks(
            "claim",
            &checks,
            Arc::new(EvenAspectsFail),
            ResearchOptions {
                max_parallel: 4,
                retry_attempts: 2,
                attempt_timeout: None,
            },
        )
        .await;

        assert_eq!(outcomes[0].attempts, 1);
        assert!(outcomes[0].errors.is_empty());

        assert_eq!(outcomes[1].attempts, 3);
        assert_eq!(outcomes[1].errors.len(), 3);
        assert!(outcomes[1].finding.summary.contains("after 3 attempt(s)"));
    }
}
