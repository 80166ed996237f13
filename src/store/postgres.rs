use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::PgPool;

use super::{capped_limit, ContentStore, StoreResult};
use crate::database::models::{
    Achievement, BlogCategory, BlogPost, BrandDivision, CategoryDraft, CategoryPatch, DivisionDraft, DivisionPatch,
    JourneyItem, PostDraft, PostPatch, PostQuery, User, UserDraft, UserPatch,
};
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;

const USERS: &str = "users";
const POSTS: &str = "blog_posts";
const CATEGORIES: &str = "blog_categories";
const DIVISIONS: &str = "brand_divisions";
const JOURNEY_ITEMS: &str = "journey_items";
const ACHIEVEMENTS: &str = "achievements";

// Nullable columns take a (present, value) pair so an explicit null clears them
const UPDATE_USER_SQL: &str = "UPDATE users SET
    email = COALESCE($2, email),
    name = CASE WHEN $3 THEN $4 ELSE name END,
    role = COALESCE($5, role),
    image = CASE WHEN $6 THEN $7 ELSE image END,
    updated_at = NOW()
 WHERE id = $1
 RETURNING *";

const UPDATE_POST_SQL: &str = "UPDATE blog_posts SET
    title = COALESCE($2, title),
    slug = COALESCE($3, slug),
    excerpt = CASE WHEN $4 THEN $5 ELSE excerpt END,
    content = COALESCE($6, content),
    featured = COALESCE($7, featured),
    category = CASE WHEN $8 THEN $9 ELSE category END,
    read_time = COALESCE($10, read_time),
    published_at = CASE WHEN $11 THEN $12 ELSE published_at END,
    updated_at = NOW()
 WHERE id = $1
 RETURNING *";

const UPDATE_DIVISION_SQL: &str = "UPDATE brand_divisions SET
    name = COALESCE($2, name),
    slug = COALESCE($3, slug),
    description = CASE WHEN $4 THEN $5 ELSE description END,
    logo_url = CASE WHEN $6 THEN $7 ELSE logo_url END,
    website_url = CASE WHEN $8 THEN $9 ELSE website_url END,
    featured = COALESCE($10, featured)
 WHERE id = $1
 RETURNING *";

/// PostgreSQL-backed content store.
///
/// Reads go through `Repository` and the filter DSL; writes are single
/// statements returning the affected row.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    max_limit: Option<i32>,
}

impl PgStore {
    pub fn new(pool: PgPool, max_limit: Option<i32>) -> Self {
        Self { pool, max_limit }
    }

    fn repo<T>(&self, table: &'static str) -> Repository<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        Repository::new(table, self.pool.clone())
    }

    /// `{ <column>: value }`, optionally excluding one row id
    fn match_excluding(column: &str, value: &str, exclude_id: Option<i64>) -> FilterData {
        let mut conditions = Map::new();
        conditions.insert(column.to_string(), Value::String(value.to_string()));
        if let Some(id) = exclude_id {
            conditions.insert("id".to_string(), json!({ "$ne": id }));
        }
        FilterData::where_eq(Value::Object(conditions))
    }

    fn by_id(id: i64) -> FilterData {
        FilterData::where_eq(json!({ "id": id }))
    }

    fn by_slug(slug: &str) -> FilterData {
        FilterData::where_eq(json!({ "slug": slug }))
    }

    fn post_filter(query: &PostQuery, max_limit: Option<i32>) -> FilterData {
        let mut conditions = Map::new();
        if let Some(featured) = query.featured {
            conditions.insert("featured".to_string(), Value::Bool(featured));
        }
        if let Some(category) = &query.category {
            conditions.insert("category".to_string(), Value::String(category.clone()));
        }
        if !query.include_drafts {
            conditions.insert("published_at".to_string(), json!({ "$ne": null }));
        }
        FilterData::where_eq(Value::Object(conditions))
            .ordered("published_at desc, id desc")
            .limited(query.limit.map(|limit| capped_limit(limit, max_limit)))
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.repo::<User>(USERS).select_any(FilterData::default().ordered("id asc")).await
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        self.repo::<User>(USERS).select_one(Self::by_id(id)).await
    }

    async fn count_users_with_email(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        self.repo::<User>(USERS).count(Self::match_excluding("email", email, exclude_id)).await
    }

    async fn insert_user(&self, draft: &UserDraft) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, role, image) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&draft.email)
        .bind(&draft.name)
        .bind(draft.role.as_str())
        .bind(&draft.image)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(UPDATE_USER_SQL)
        .bind(id)
        .bind(&patch.email)
        .bind(patch.name.is_some())
        .bind(patch.name.as_ref().and_then(Option::as_deref))
        .bind(patch.role.map(|r| r.as_str()))
        .bind(patch.image.is_some())
        .bind(patch.image.as_ref().and_then(Option::as_deref))
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<BlogPost>> {
        self.repo::<BlogPost>(POSTS).select_any(Self::post_filter(query, self.max_limit)).await
    }

    async fn find_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        self.repo::<BlogPost>(POSTS).select_one(Self::by_id(id)).await
    }

    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        self.repo::<BlogPost>(POSTS).select_one(Self::by_slug(slug)).await
    }

    async fn count_posts_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        self.repo::<BlogPost>(POSTS).count(Self::match_excluding("slug", slug, exclude_id)).await
    }

    async fn insert_post(&self, draft: &PostDraft) -> StoreResult<BlogPost> {
        sqlx::query_as::<_, BlogPost>(
            "INSERT INTO blog_posts
                (title, slug, excerpt, content, featured, category, read_time, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.excerpt)
        .bind(&draft.content)
        .bind(draft.featured)
        .bind(&draft.category)
        .bind(draft.read_time)
        .bind(draft.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn update_post(&self, id: i64, patch: &PostPatch) -> StoreResult<Option<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(UPDATE_POST_SQL)
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.slug)
        .bind(patch.excerpt.is_some())
        .bind(patch.excerpt.as_ref().and_then(Option::as_deref))
        .bind(&patch.content)
        .bind(patch.featured)
        .bind(patch.category.is_some())
        .bind(patch.category.as_ref().and_then(Option::as_deref))
        .bind(patch.read_time)
        .bind(patch.published_at.is_some())
        .bind(patch.published_at.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn delete_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        sqlx::query_as::<_, BlogPost>("DELETE FROM blog_posts WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn list_categories(&self) -> StoreResult<Vec<BlogCategory>> {
        self.repo::<BlogCategory>(CATEGORIES).select_any(FilterData::default().ordered("id asc")).await
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<BlogCategory>> {
        self.repo::<BlogCategory>(CATEGORIES).select_one(Self::by_id(id)).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<BlogCategory>> {
        self.repo::<BlogCategory>(CATEGORIES).select_one(Self::by_slug(slug)).await
    }

    async fn count_categories_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        self.repo::<BlogCategory>(CATEGORIES)
            .count(Self::match_excluding("slug", slug, exclude_id))
            .await
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> StoreResult<BlogCategory> {
        sqlx::query_as::<_, BlogCategory>("INSERT INTO blog_categories (name, slug) VALUES ($1, $2) RETURNING *")
            .bind(&draft.name)
            .bind(&draft.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> StoreResult<Option<BlogCategory>> {
        sqlx::query_as::<_, BlogCategory>(
            "UPDATE blog_categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<Option<BlogCategory>> {
        sqlx::query_as::<_, BlogCategory>("DELETE FROM blog_categories WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn list_divisions(&self, featured_only: bool) -> StoreResult<Vec<BrandDivision>> {
        let filter = if featured_only {
            FilterData::where_eq(json!({ "featured": true }))
        } else {
            FilterData::default()
        };
        self.repo::<BrandDivision>(DIVISIONS)
            .select_any(filter.ordered("featured desc, name asc"))
            .await
    }

    async fn find_division(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        self.repo::<BrandDivision>(DIVISIONS).select_one(Self::by_id(id)).await
    }

    async fn find_division_by_slug(&self, slug: &str) -> StoreResult<Option<BrandDivision>> {
        self.repo::<BrandDivision>(DIVISIONS).select_one(Self::by_slug(slug)).await
    }

    async fn count_divisions_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        self.repo::<BrandDivision>(DIVISIONS)
            .count(Self::match_excluding("slug", slug, exclude_id))
            .await
    }

    async fn insert_division(&self, draft: &DivisionDraft) -> StoreResult<BrandDivision> {
        sqlx::query_as::<_, BrandDivision>(
            "INSERT INTO brand_divisions (name, slug, description, logo_url, website_url, featured)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(&draft.logo_url)
        .bind(&draft.website_url)
        .bind(draft.featured)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn update_division(&self, id: i64, patch: &DivisionPatch) -> StoreResult<Option<BrandDivision>> {
        sqlx::query_as::<_, BrandDivision>(UPDATE_DIVISION_SQL)
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.slug)
        .bind(patch.description.is_some())
        .bind(patch.description.as_ref().and_then(Option::as_deref))
        .bind(patch.logo_url.is_some())
        .bind(patch.logo_url.as_ref().and_then(Option::as_deref))
        .bind(patch.website_url.is_some())
        .bind(patch.website_url.as_ref().and_then(Option::as_deref))
        .bind(patch.featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn toggle_division_featured(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        sqlx::query_as::<_, BrandDivision>(
            "UPDATE brand_divisions SET featured = NOT featured WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn delete_division(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        sqlx::query_as::<_, BrandDivision>("DELETE FROM brand_divisions WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn list_journey_items(&self) -> StoreResult<Vec<JourneyItem>> {
        self.repo::<JourneyItem>(JOURNEY_ITEMS)
            .select_any(FilterData::default().ordered("display_order asc, year asc"))
            .await
    }

    async fn list_achievements(&self) -> StoreResult<Vec<Achievement>> {
        self.repo::<Achievement>(ACHIEVEMENTS)
            .select_any(FilterData::default().ordered("display_order asc"))
            .await
    }
}
