//! Client wrappers for the event endpoints. Create and update go out as
//! multipart forms because the server accepts an optional event photo next
//! to the text fields.

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, Event, EventStatus, EventsPage};
use crate::api::ApiClient;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct EventFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub upcoming: Option<bool>,
}

impl EventFilters {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(upcoming) = self.upcoming {
            query.push(("upcoming", upcoming.to_string()));
        }
        query
    }
}

/// Fields for creating or updating an event. On update, absent fields are
/// left unchanged by the server.
#[derive(Clone, Debug, Default)]
pub struct EventDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_participants: Option<u32>,
    pub status: Option<EventStatus>,
    pub photo: Option<PathBuf>,
}

impl EventDraft {
    fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        if let Some(name) = &self.name {
            form = form.text("name", name.clone());
        }
        if let Some(description) = &self.description {
            form = form.text("description", description.clone());
        }
        if let Some(date) = &self.date {
            form = form.text("date", date.clone());
        }
        if let Some(location) = &self.location {
            form = form.text("location", location.clone());
        }
        if let Some(max_participants) = self.max_participants {
            form = form.text("max_participants", max_participants.to_string());
        }
        if let Some(status) = self.status {
            let encoded = serde_json::to_value(status)
                .ok()
                .and_then(|value| value.as_str().map(str::to_string))
                .ok_or_else(|| {
                    ApiError::Serialization("Failed to encode event status".to_string())
                })?;
            form = form.text("status", encoded);
        }
        if let Some(photo) = &self.photo {
            form = form.part("image", photo_part(photo)?);
        }
        Ok(form)
    }
}

fn photo_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = std::fs::read(path).map_err(|err| {
        ApiError::Config(format!("Failed to read photo {}: {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn list(client: &ApiClient, filters: &EventFilters) -> Result<EventsPage, ApiError> {
    let response: ApiResponse<EventsPage> = client
        .get_json_with_query("/events", &filters.to_query())
        .await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn fetch(client: &ApiClient, id: i64) -> Result<Event, ApiError> {
    let response: ApiResponse<Event> = client.get_json(&format!("/events/{id}")).await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn create(client: &ApiClient, draft: &EventDraft) -> Result<Event, ApiError> {
    let response: ApiResponse<Event> = client.post_multipart("/events", draft.to_form()?).await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn update(client: &ApiClient, id: i64, draft: &EventDraft) -> Result<Event, ApiError> {
    let response: ApiResponse<Event> = client
        .put_multipart(&format!("/events/{id}"), draft.to_form()?)
        .await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails.
pub async fn remove(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/events/{id}")).await
}

/// Cancel an event without deleting it; registrations stay on record.
///
/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn cancel(client: &ApiClient, id: i64) -> Result<Event, ApiError> {
    let response: ApiResponse<Event> = client
        .patch_json(&format!("/events/{id}/cancel"), &json!({}))
        .await?;
    Ok(response.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_serialize_only_present_fields() {
        let filters = EventFilters {
            page: Some(1),
            limit: Some(20),
            status: None,
            search: Some("sunset".to_string()),
            upcoming: Some(true),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
                ("search", "sunset".to_string()),
                ("upcoming", "true".to_string()),
            ]
        );
    }

    #[test]
    fn draft_builds_a_form_without_a_photo() {
        let draft = EventDraft {
            name: Some("Sunset Meet".to_string()),
            description: Some("Monthly meet".to_string()),
            date: Some("2026-09-01T18:00:00Z".to_string()),
            location: Some("Pier 7".to_string()),
            max_participants: Some(80),
            status: Some(EventStatus::Active),
            photo: None,
        };
        assert!(draft.to_form().is_ok());
    }

    #[test]
    fn draft_with_missing_photo_file_fails_with_config_error() {
        let draft = EventDraft {
            photo: Some(PathBuf::from("/definitely/not/here.jpg")),
            ..EventDraft::default()
        };
        assert!(matches!(draft.to_form(), Err(ApiError::Config(_))));
    }
}
