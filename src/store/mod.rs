//! Storage seam for the content tables.
//!
//! `ContentStore` is the narrow contract the access functions in
//! `services` run against: filtered/ordered reads, single-statement writes,
//! and slug/email counts for the uniqueness pre-checks. Absence is reported
//! as `Ok(None)`, never as an error.

use async_trait::async_trait;
use std::sync::Arc;

use crate::database::models::{
    Achievement, BlogCategory, BlogPost, BrandDivision, CategoryDraft, CategoryPatch, DivisionDraft, DivisionPatch,
    JourneyItem, PostDraft, PostPatch, PostQuery, User, UserDraft, UserPatch,
};
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseError, DatabaseManager};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Clamp a requested list size to `[0, max_limit]`
pub(crate) fn capped_limit(limit: i32, max_limit: Option<i32>) -> i32 {
    let cap = max_limit.unwrap_or(i32::MAX).max(0);
    if limit > cap {
        tracing::debug!("Limit {} exceeds max {}, capping", limit, cap);
    }
    limit.clamp(0, cap)
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Round trip to the storage engine
    async fn health_check(&self) -> StoreResult<()>;

    // Users, ordered by id
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn count_users_with_email(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<i64>;
    async fn insert_user(&self, draft: &UserDraft) -> StoreResult<User>;
    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<Option<User>>;

    // Posts, newest first with drafts ahead of published rows
    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<BlogPost>>;
    async fn find_post(&self, id: i64) -> StoreResult<Option<BlogPost>>;
    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>>;
    async fn count_posts_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64>;
    async fn insert_post(&self, draft: &PostDraft) -> StoreResult<BlogPost>;
    async fn update_post(&self, id: i64, patch: &PostPatch) -> StoreResult<Option<BlogPost>>;
    async fn delete_post(&self, id: i64) -> StoreResult<Option<BlogPost>>;

    // Categories, in insertion order
    async fn list_categories(&self) -> StoreResult<Vec<BlogCategory>>;
    async fn find_category(&self, id: i64) -> StoreResult<Option<BlogCategory>>;
    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<BlogCategory>>;
    async fn count_categories_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64>;
    async fn insert_category(&self, draft: &CategoryDraft) -> StoreResult<BlogCategory>;
    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> StoreResult<Option<BlogCategory>>;
    async fn delete_category(&self, id: i64) -> StoreResult<Option<BlogCategory>>;

    // Divisions, featured first then by name
    async fn list_divisions(&self, featured_only: bool) -> StoreResult<Vec<BrandDivision>>;
    async fn find_division(&self, id: i64) -> StoreResult<Option<BrandDivision>>;
    async fn find_division_by_slug(&self, slug: &str) -> StoreResult<Option<BrandDivision>>;
    async fn count_divisions_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64>;
    async fn insert_division(&self, draft: &DivisionDraft) -> StoreResult<BrandDivision>;
    async fn update_division(&self, id: i64, patch: &DivisionPatch) -> StoreResult<Option<BrandDivision>>;
    /// Flip `featured` in a single atomic step
    async fn toggle_division_featured(&self, id: i64) -> StoreResult<Option<BrandDivision>>;
    async fn delete_division(&self, id: i64) -> StoreResult<Option<BrandDivision>>;

    // Read-only display records
    async fn list_journey_items(&self) -> StoreResult<Vec<JourneyItem>>;
    async fn list_achievements(&self) -> StoreResult<Vec<Achievement>>;
}

/// Build the configured backend: a migrated Postgres pool, or a memory store
/// optionally filled with demo content
pub async fn open_store(app_config: &AppConfig) -> StoreResult<Arc<dyn ContentStore>> {
    let config = &app_config.database;
    match config.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(config).await?;
            if config.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Ok(Arc::new(PgStore::new(pool, app_config.filter.max_limit)))
        }
        StoreBackend::Memory => {
            let store = MemoryStore::with_max_limit(app_config.filter.max_limit);
            if config.seed_demo_content {
                seed::load_demo_content(&store).await?;
            }
            tracing::warn!("Using in-memory content store; data is lost on restart");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_clamped_to_the_cap() {
        assert_eq!(capped_limit(10, Some(3)), 3);
        assert_eq!(capped_limit(2, Some(3)), 2);
        assert_eq!(capped_limit(-5, Some(3)), 0);
        assert_eq!(capped_limit(7, None), 7);
    }

    #[tokio::test]
    async fn memory_backend_takes_its_limit_cap_from_config() {
        let mut config = AppConfig::development();
        config.filter.max_limit = Some(2);

        let store = open_store(&config).await.unwrap();
        let posts = store.list_posts(&PostQuery { limit: Some(10), ..Default::default() }).await.unwrap();
        assert_eq!(posts.len(), 2);
    }
}
