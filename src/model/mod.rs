pub mod analytics;
pub mod checklist;
pub mod config;
pub mod eligibility;
pub mod extracted;
pub mod route;

pub use analytics::{AnalyticsSummary, RecentCheck, VerdictCount, VolumeCount};
pub use checklist::{ChecklistEntry, ChecklistResult};
pub use config::{Config, EngineConfig};
pub use eligibility::{
    ApplicantProfile, AssessmentVerdict, EligibilityCheckRecord, EligibilityResult,
    TrackingMetadata, Verdict,
};
pub use extracted::{ExtractedVerdict, ExtractedVerdictKind};
pub use route::{
    FinancialThreshold, OfficialSource, ProcessingTimeEstimate, RequirementItem,
    UrgencyLevel, VisaRequirementRoute,
};
