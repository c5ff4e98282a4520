use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::Asset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub class_type_id: i64,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInput {
    pub name: String,
    pub class_type_id: i64,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub is_active: bool,
}

/// The "detail" tab of a class: long description and where it is taught.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDetailInput {
    pub description: Option<String>,
    pub location_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDetail {
    pub class: Class,
    pub class_type: ClassType,
    pub location_ids: Vec<i64>,
    pub assets: Vec<Asset>,
}
