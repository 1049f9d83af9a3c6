pub mod agents;
pub mod artifacts;
pub mod factory;
pub mod merge;
pub mod research;
pub mod service;
pub mod stages;
pub mod traits;

pub use agents::{SkillSpec, SKILLS};
pub use artifacts::{InMemoryArtifactSink, RunArtifacts, StageDetail, StageRecord};
pub use factory::{build_claim_extraction_service, build_fact_check_service};
pub use merge::{merge_report_sources, merge_sources};
pub use research::{research_all, research_checks, CheckOutcome, ResearchOptions};
pub use service::{ClaimExtractionService, FactCheckRun, FactCheckService};
pub use traits::{
    ArtifactSink, ClaimExtractionBackend, Judge, Planner, Researcher, SearchRetriever,
};
