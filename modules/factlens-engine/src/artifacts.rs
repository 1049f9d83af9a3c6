//! Run artifacts — append-only timeline of one fact-check run.
//!
//! Owned exclusively by the service for the lifetime of a run, handed
//! to the `ArtifactSink` at the end, never read back by control flow.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use factlens_common::{AspectFinding, FactCheckReport, InvestigationPlan};

use crate::traits::ArtifactSink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub run_id: String,
    pub claim: String,
    pub normalized_claim: String,
    pub started_at: DateTime<Utc>,
    pub records: Vec<StageRecord>,
    #[serde(skip)]
    seq: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub seq: u32,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub detail: StageDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageDetail {
    RunStarted {
        claim: String,
    },
    PlanDraft {
        plan: InvestigationPlan,
    },
    PlanNormalized {
        plan: InvestigationPlan,
    },
    ResearchAttemptFailed {
        aspect_id: String,
        attempt: usize,
        error: String,
    },
    FindingRecorded {
        finding: AspectFinding,
    },
    ReportDraft {
        report: FactCheckReport,
    },
    ReportFinal {
        report: FactCheckReport,
    },
    RunFailed {
        at: String,
        error: String,
    },
}

impl RunArtifacts {
    pub fn new(claim: impl Into<String>, normalized_claim: impl Into<String>) -> Self {
        let normalized_claim = normalized_claim.into();
        let mut artifacts = Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            claim: claim.into(),
            normalized_claim: normalized_claim.clone(),
            started_at: Utc::now(),
            records: Vec::new(),
            seq: 0,
        };
        artifacts.log(StageDetail::RunStarted {
            claim: normalized_claim,
        });
        artifacts
    }

    pub fn log(&mut self, detail: StageDetail) {
        self.records.push(StageRecord {
            seq: self.seq,
            ts: Utc::now(),
            detail,
        });
        self.seq += 1;
    }
}

/// Sink that keeps recorded runs in memory, mainly for asserting on
/// the run timeline in tests.
#[derive(Default)]
pub struct InMemoryArtifactSink {
    runs: Mutex<Vec<RunArtifacts>>,
}

impl InMemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn runs(&self) -> Vec<RunArtifacts> {
        self.runs.lock().await.clone()
    }

    pub async fn latest(&self) -> Option<RunArtifacts> {
        self.runs.lock().await.last().cloned()
    }
}

#[async_trait]
impl ArtifactSink for InMemoryArtifactSink {
    async fn record(&self, artifacts: &RunArtifacts) -> Result<()> {
        self.runs.lock().await.push(artifacts.clone());
        Ok(())
    }
}
