use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use super::deserialize_double_option;

use crate::auth::{Identity, Role};

/// Dashboard account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            image: self.image.clone(),
        }
    }
}

// Role is stored as TEXT, so decode it by hand rather than through a custom Postgres type
impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role,
            image: row.try_get("image")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Create-user request body; presence is checked by the service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub image: Option<String>,
}

/// Validated insert
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub image: Option<String>,
}

/// Partial update. For the nullable columns `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::option_option)]
pub struct UserPatch {
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub name: Option<Option<String>>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub image: Option<Option<String>>,
}
