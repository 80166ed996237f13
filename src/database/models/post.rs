use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::deserialize_double_option;

/// Read time in minutes assumed when an author leaves it blank
pub const DEFAULT_READ_TIME: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured: bool,
    pub category: Option<String>,
    pub read_time: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// Listing options for posts. Unpublished drafts are only listed when
/// `include_drafts` is set, which the public routes never do.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub limit: Option<i32>,
    #[serde(skip)]
    pub include_drafts: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub read_time: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured: bool,
    pub category: Option<String>,
    pub read_time: i32,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update. For the nullable columns `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::option_option)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub category: Option<Option<String>>,
    pub read_time: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}
