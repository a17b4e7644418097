//! HTTP DTOs for saved session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::ReplaceReport;
use crate::domain::saved_session::SavedSessionSummary;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to save the current screen set.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveSessionRequest {
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryResponse {
    pub id: String,
    pub name: String,
    pub screen_count: usize,
    pub created_at: String,
}

impl From<SavedSessionSummary> for SessionSummaryResponse {
    fn from(summary: SavedSessionSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            screen_count: summary.screen_count,
            created_at: summary.created_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummaryResponse>,
    pub total: usize,
}

impl From<Vec<SavedSessionSummary>> for SessionListResponse {
    fn from(summaries: Vec<SavedSessionSummary>) -> Self {
        let sessions: Vec<SessionSummaryResponse> =
            summaries.into_iter().map(SessionSummaryResponse::from).collect();
        Self {
            total: sessions.len(),
            sessions,
        }
    }
}

/// Outcome of loading a session or starting a new one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSessionResponse {
    pub screens: usize,
    pub republished: usize,
    pub failed_broadcasts: usize,
}

impl From<ReplaceReport> for LoadSessionResponse {
    fn from(report: ReplaceReport) -> Self {
        Self {
            screens: report.screens,
            republished: report.republished,
            failed_broadcasts: report.failed,
        }
    }
}
