use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub id: i32,
    pub name: String,
    pub location_summary: Option<String>,
    pub address: Option<String>,
    pub sport_type: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: f64,
    pub currency: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a field the admission engine needs: price for the total
/// and the activity gate. Read under a row lock during admission.
#[derive(Debug, Clone)]
pub struct FieldForBooking {
    pub id: i32,
    pub price_per_hour: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFieldRequest {
    pub name: String,
    pub location_summary: Option<String>,
    pub address: Option<String>,
    pub sport_type: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: f64,
    pub currency: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub location_summary: Option<String>,
    pub address: Option<String>,
    pub sport_type: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location_summary.is_none()
            && self.address.is_none()
            && self.sport_type.is_none()
            && self.capacity.is_none()
            && self.price_per_hour.is_none()
            && self.currency.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldListQuery {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sport_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
