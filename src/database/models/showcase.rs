use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Timeline entry on the public "our journey" page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JourneyItem {
    pub id: i64,
    pub display_order: i32,
    pub year: Option<i32>,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i64,
    pub display_order: i32,
    pub year: Option<i32>,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}
