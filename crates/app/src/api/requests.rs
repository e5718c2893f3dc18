//! Operation requests
//!
//! Identities are opaque strings supplied by the caller; ids are parsed here and a
//! malformed id is reported as not found.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTourRequest {
    pub guide_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourRequest {
    #[serde(default)]
    pub viewer_id: Option<String>,
    pub tour_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuideToursRequest {
    pub guide_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishTourRequest {
    pub guide_id: String,
    pub tour_id: String,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddKeyPointRequest {
    pub guide_id: String,
    pub tour_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateKeyPointRequest {
    pub guide_id: String,
    pub tour_id: String,
    pub key_point_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteKeyPointRequest {
    pub guide_id: String,
    pub tour_id: String,
    pub key_point_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TouristRequest {
    pub tourist_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItemRequest {
    pub tourist_id: String,
    pub tour_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartExecutionRequest {
    pub tourist_id: String,
    pub tour_id: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckProximityRequest {
    pub tourist_id: String,
    pub execution_id: String,
    pub current_latitude: f64,
    pub current_longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
    pub tourist_id: String,
    pub execution_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePositionRequest {
    pub tourist_id: String,
    pub latitude: f64,
    pub longitude: f64,
}
