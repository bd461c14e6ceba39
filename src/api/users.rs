//! Client wrappers for the user management endpoints. All calls go through
//! the authorized pipeline; the server enforces the actual role checks.

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, User, UsersPage};
use crate::api::ApiClient;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};

#[derive(Clone, Debug, Default)]
pub struct UserFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl UserFilters {
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
        query
    }
}

/// Fields for creating a user; `password` is required on create and optional
/// on update (an empty password means "leave unchanged").
#[derive(Clone, Debug)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<SecretString>,
    pub role_id: Option<i64>,
}

impl UserDraft {
    fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("firstName".to_string(), json!(self.first_name));
        payload.insert("lastName".to_string(), json!(self.last_name));
        payload.insert("email".to_string(), json!(self.email));
        if let Some(phone) = &self.phone {
            payload.insert("phone".to_string(), json!(phone));
        }
        if let Some(password) = &self.password {
            if !password.expose_secret().trim().is_empty() {
                payload.insert("password".to_string(), json!(password.expose_secret()));
            }
        }
        if let Some(role_id) = self.role_id {
            payload.insert("roleId".to_string(), json!(role_id));
        }
        Value::Object(payload)
    }
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn list(client: &ApiClient, filters: &UserFilters) -> Result<UsersPage, ApiError> {
    let response: ApiResponse<UsersPage> = client
        .get_json_with_query("/users", &filters.to_query())
        .await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn fetch(client: &ApiClient, id: i64) -> Result<User, ApiError> {
    let response: ApiResponse<User> = client.get_json(&format!("/users/{id}")).await?;
    Ok(response.data)
}

/// # Errors
/// Returns an error if the request fails.
pub async fn create(client: &ApiClient, draft: &UserDraft) -> Result<(), ApiError> {
    client.post_json_empty("/users", &draft.to_payload()).await
}

/// # Errors
/// Returns an error if the request fails.
pub async fn update(client: &ApiClient, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
    client
        .put_json_empty(&format!("/users/{id}"), &draft.to_payload())
        .await
}

/// # Errors
/// Returns an error if the request fails.
pub async fn remove(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/users/{id}")).await
}
