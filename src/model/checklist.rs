//! Derived checklist types
//!
//! A checklist is computed from a route (or the default rule set) and cached
//! in the relational store until explicitly invalidated.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::route::UrgencyLevel;

/// Resolved document checklist for a (country, visa type) pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResult {
    pub visa_type: String,
    pub destination: String,
    /// Documents the applicant must source and upload themselves, in order
    pub client_uploads: Vec<ChecklistEntry>,
    /// Documents the assistant can draft on the applicant's behalf, in order
    pub system_generated: Vec<ChecklistEntry>,
    pub processing_time: String,
    /// Names of the mandatory requirements, for the summary view
    pub key_requirements: Vec<String>,
}

/// One entry on a resolved checklist
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    pub name: String,
    pub description: String,
    pub is_mandatory: bool,
    pub urgency: UrgencyLevel,
}
