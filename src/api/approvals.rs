//! Client wrappers for participant approvals. A registration is approved by
//! patching its status to CONFIRMED and rejected by patching it to CANCELLED
//! with an optional reason; the server enforces the workflow rules.

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, Approval, ParticipantStatus};
use crate::api::ApiClient;
use serde_json::json;

#[derive(Clone, Debug, Default)]
pub struct ApprovalFilters {
    pub status: Option<ParticipantStatus>,
    pub event_id: Option<i64>,
}

impl ApprovalFilters {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(event_id) = self.event_id {
            query.push(("eventId", event_id.to_string()));
        }
        query
    }
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn list(client: &ApiClient, filters: &ApprovalFilters) -> Result<Vec<Approval>, ApiError> {
    let response: ApiResponse<Vec<Approval>> = client
        .get_json_with_query("/events/all_participants", &filters.to_query())
        .await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn fetch(
    client: &ApiClient,
    event_id: i64,
    participant_id: i64,
) -> Result<Approval, ApiError> {
    let response: ApiResponse<Approval> = client
        .get_json(&format!("/events/{event_id}/participants/{participant_id}"))
        .await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails.
pub async fn approve(
    client: &ApiClient,
    event_id: i64,
    participant_id: i64,
) -> Result<(), ApiError> {
    client
        .patch_json_empty(
            &format!("/events/{event_id}/participants/{participant_id}/status"),
            &json!({ "status": ParticipantStatus::Confirmed.as_str() }),
        )
        .await
}

/// # Errors
/// Returns an error if the request fails.
pub async fn reject(
    client: &ApiClient,
    event_id: i64,
    participant_id: i64,
    reason: Option<&str>,
) -> Result<(), ApiError> {
    client
        .patch_json_empty(
            &format!("/events/{event_id}/participants/{participant_id}/status"),
            &json!({
                "status": ParticipantStatus::Cancelled.as_str(),
                "reason": reason,
            }),
        )
        .await
}
