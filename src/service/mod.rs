pub mod analytics;
pub mod checklist;
pub mod eligibility;
pub mod knowledge;
pub mod llm;
pub mod seed;
pub mod tracking;

pub use analytics::AnalyticsService;
pub use checklist::ChecklistService;
pub use eligibility::{EligibilityError, EligibilityService};
pub use knowledge::{KnowledgeError, KnowledgeStoreService};
pub use llm::{GenerativeClient, OpenAiGenerativeClient};
pub use seed::{SeedFailure, SeedOutcome};
