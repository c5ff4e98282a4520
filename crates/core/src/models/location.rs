use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub link_maps: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub link_maps: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFacility {
    pub id: i64,
    pub location_id: i64,
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityInput {
    pub name: String,
    pub capacity: i32,
}

/// Opening window of a location on one weekday. `day_of_week` counts from
/// Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalHour {
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

impl OperationalHour {
    pub fn is_valid(&self) -> bool {
        (0..=6).contains(&self.day_of_week) && self.open_time < self.close_time
    }
}

/// An uploaded file attached to a location or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub url: String,
}

/// A stored file as returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub location: Location,
    pub facilities: Vec<LocationFacility>,
    pub operational_hours: Vec<OperationalHour>,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityAvailability {
    pub facility_id: i64,
    pub date: chrono::NaiveDate,
    pub duration_minutes: i64,
    pub slots: Vec<NaiveTime>,
}
