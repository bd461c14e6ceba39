//! Client wrappers for the aggregate analytics feeds. The server does the
//! aggregation; rows come back as loosely shaped JSON and are rendered as-is.

use crate::api::error::ApiError;
use crate::api::ApiClient;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct AnalyticsSummary {
    pub attendance: Vec<Value>,
    pub cars_stats: Vec<Value>,
    pub roles_distribution: Vec<Value>,
    pub top_cars: Vec<Value>,
    pub photos_summary: Vec<Value>,
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn attendance(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get_json("/analytics/attendance").await
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn cars_stats(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get_json("/analytics/cars-stats").await
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn roles_distribution(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get_json("/analytics/roles-distribution").await
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn top_cars(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get_json("/analytics/top-cars").await
}

/// # Errors
/// Returns an error if the request fails or the response cannot be decoded.
pub async fn photos_summary(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get_json("/analytics/photos-summary").await
}

/// Fetch all five feeds concurrently, as the dashboard does.
///
/// # Errors
/// Returns the first error if any feed fails.
pub async fn summary(client: &ApiClient) -> Result<AnalyticsSummary, ApiError> {
    let (attendance, cars_stats, roles_distribution, top_cars, photos_summary) = tokio::try_join!(
        attendance(client),
        cars_stats(client),
        roles_distribution(client),
        top_cars(client),
        photos_summary(client),
    )?;

    Ok(AnalyticsSummary {
        attendance,
        cars_stats,
        roles_distribution,
        top_cars,
        photos_summary,
    })
}
