//! Wire types for the CarMeet REST API. Field names mirror the server
//! payloads exactly: the users and approvals areas speak camelCase, the
//! events area snake_case. Optional and unknown fields are tolerated so a
//! server-side addition does not break the console.

use serde::{Deserialize, Serialize};

/// Standard response envelope used by most endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The authenticated principal, also cached locally for display. The server
/// owns the authoritative record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn role_slug(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.slug.as_str())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Active,
    Cancelled,
    Finished,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Organizer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventCounts {
    pub participants: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub max_participants: Option<u32>,
    pub status: EventStatus,
    #[serde(default)]
    pub organizer_id: Option<i64>,
    #[serde(default)]
    pub organizer: Option<Organizer>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, rename = "_count")]
    pub counts: Option<EventCounts>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventsPage {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ParticipantStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "PENDING",
            ParticipantStatus::Confirmed => "CONFIRMED",
            ParticipantStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEvent {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub location: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPhoto {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalCar {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub license_plate: String,
    #[serde(default)]
    pub modifications: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<CarPhoto>>,
}

/// A participant registration awaiting (or past) the approval decision.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub car_id: i64,
    pub status: ParticipantStatus,
    pub registered_at: String,
    pub event: ApprovalEvent,
    pub user: ApprovalUser,
    pub car: ApprovalCar,
}
