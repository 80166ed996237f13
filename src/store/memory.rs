use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::debug;

use super::{capped_limit, ContentStore, StoreResult};
use crate::database::models::{
    Achievement, BlogCategory, BlogPost, BrandDivision, CategoryDraft, CategoryPatch, DivisionDraft, DivisionPatch,
    JourneyItem, PostDraft, PostPatch, PostQuery, User, UserDraft, UserPatch,
};
use crate::database::DatabaseError;

/// Rows plus a per-table id sequence, mirroring BIGSERIAL
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new(), next_id: 1 }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    users: Table<User>,
    posts: Table<BlogPost>,
    categories: Table<BlogCategory>,
    divisions: Table<BrandDivision>,
    journey_items: Table<JourneyItem>,
    achievements: Table<Achievement>,
}

/// In-process content store for development and tests.
///
/// Keeps the same ordering, uniqueness and atomicity guarantees as the
/// Postgres schema: every write happens under one write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    max_limit: Option<i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap list limits the way `filter.max_limit` caps SQL `LIMIT`
    pub fn with_max_limit(max_limit: Option<i32>) -> Self {
        Self { max_limit, ..Self::default() }
    }

    /// Load display records, which have no write path through `ContentStore`
    pub async fn load_showcase(&self, journey: Vec<JourneyItem>, achievements: Vec<Achievement>) {
        let mut state = self.state.write().await;
        for mut item in journey {
            item.id = state.journey_items.allocate_id();
            state.journey_items.rows.push(item);
        }
        for mut item in achievements {
            item.id = state.achievements.allocate_id();
            state.achievements.rows.push(item);
        }
        debug!(
            "Loaded {} journey items and {} achievements into memory store",
            state.journey_items.rows.len(),
            state.achievements.rows.len()
        );
    }
}

fn count_matching<T>(rows: &[T], exclude_id: Option<i64>, key: impl Fn(&T) -> (i64, &str), value: &str) -> i64 {
    rows.iter()
        .filter(|row| {
            let (id, field) = key(row);
            field == value && Some(id) != exclude_id
        })
        .count() as i64
}

fn ensure_unique<T>(rows: &[T], constraint: &str, exclude_id: Option<i64>, key: impl Fn(&T) -> (i64, &str), value: &str) -> StoreResult<()> {
    if count_matching(rows, exclude_id, key, value) > 0 {
        return Err(DatabaseError::UniqueViolation(constraint.to_string()));
    }
    Ok(())
}

/// Postgres `published_at DESC, id DESC`: NULLs (drafts) sort first under DESC
fn newest_first(a: &BlogPost, b: &BlogPost) -> Ordering {
    match (a.published_at, b.published_at) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (x, y) => y.cmp(&x).then_with(|| b.id.cmp(&a.id)),
    }
}

fn featured_then_name(a: &BrandDivision, b: &BrandDivision) -> Ordering {
    b.featured.cmp(&a.featured).then_with(|| a.name.cmp(&b.name))
}

fn remove_by_id<T>(rows: &mut Vec<T>, id: i64, key: impl Fn(&T) -> i64) -> Option<T> {
    rows.iter().position(|row| key(row) == id).map(|index| rows.remove(index))
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.rows.clone())
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn count_users_with_email(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(count_matching(&state.users.rows, exclude_id, |u| (u.id, u.email.as_str()), email))
    }

    async fn insert_user(&self, draft: &UserDraft) -> StoreResult<User> {
        let mut state = self.state.write().await;
        ensure_unique(&state.users.rows, "users_email_key", None, |u| (u.id, u.email.as_str()), &draft.email)?;

        let now = Utc::now();
        let user = User {
            id: state.users.allocate_id(),
            email: draft.email.clone(),
            name: draft.name.clone(),
            role: draft.role,
            image: draft.image.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.rows.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> StoreResult<Option<User>> {
        let mut state = self.state.write().await;
        if let Some(email) = &patch.email {
            ensure_unique(&state.users.rows, "users_email_key", Some(id), |u| (u.id, u.email.as_str()), email)?;
        }

        let Some(user) = state.users.rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &patch.email { user.email = email.clone(); }
        if let Some(name) = &patch.name { user.name = name.clone(); }
        if let Some(role) = patch.role { user.role = role; }
        if let Some(image) = &patch.image { user.image = image.clone(); }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn list_posts(&self, query: &PostQuery) -> StoreResult<Vec<BlogPost>> {
        let state = self.state.read().await;
        let mut posts: Vec<BlogPost> = state
            .posts
            .rows
            .iter()
            .filter(|p| query.include_drafts || p.is_published())
            .filter(|p| query.featured.map_or(true, |f| p.featured == f))
            .filter(|p| query.category.as_ref().map_or(true, |c| p.category.as_ref() == Some(c)))
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        if let Some(limit) = query.limit {
            posts.truncate(capped_limit(limit, self.max_limit) as usize);
        }
        Ok(posts)
    }

    async fn find_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        Ok(self.state.read().await.posts.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        Ok(self.state.read().await.posts.rows.iter().find(|p| p.slug == slug).cloned())
    }

    async fn count_posts_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(count_matching(&state.posts.rows, exclude_id, |p| (p.id, p.slug.as_str()), slug))
    }

    async fn insert_post(&self, draft: &PostDraft) -> StoreResult<BlogPost> {
        let mut state = self.state.write().await;
        ensure_unique(&state.posts.rows, "blog_posts_slug_key", None, |p| (p.id, p.slug.as_str()), &draft.slug)?;

        let now = Utc::now();
        let post = BlogPost {
            id: state.posts.allocate_id(),
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            featured: draft.featured,
            category: draft.category.clone(),
            read_time: draft.read_time,
            published_at: draft.published_at,
            created_at: now,
            updated_at: now,
        };
        state.posts.rows.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, patch: &PostPatch) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        if let Some(slug) = &patch.slug {
            ensure_unique(&state.posts.rows, "blog_posts_slug_key", Some(id), |p| (p.id, p.slug.as_str()), slug)?;
        }

        let Some(post) = state.posts.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title { post.title = title.clone(); }
        if let Some(slug) = &patch.slug { post.slug = slug.clone(); }
        if let Some(excerpt) = &patch.excerpt { post.excerpt = excerpt.clone(); }
        if let Some(content) = &patch.content { post.content = content.clone(); }
        if let Some(featured) = patch.featured { post.featured = featured; }
        if let Some(category) = &patch.category { post.category = category.clone(); }
        if let Some(read_time) = patch.read_time { post.read_time = read_time; }
        if let Some(published_at) = patch.published_at { post.published_at = published_at; }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> StoreResult<Option<BlogPost>> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.posts.rows, id, |p| p.id))
    }

    async fn list_categories(&self) -> StoreResult<Vec<BlogCategory>> {
        Ok(self.state.read().await.categories.rows.clone())
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<BlogCategory>> {
        Ok(self.state.read().await.categories.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<BlogCategory>> {
        Ok(self.state.read().await.categories.rows.iter().find(|c| c.slug == slug).cloned())
    }

    async fn count_categories_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(count_matching(&state.categories.rows, exclude_id, |c| (c.id, c.slug.as_str()), slug))
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> StoreResult<BlogCategory> {
        let mut state = self.state.write().await;
        ensure_unique(&state.categories.rows, "blog_categories_slug_key", None, |c| (c.id, c.slug.as_str()), &draft.slug)?;

        let category = BlogCategory {
            id: state.categories.allocate_id(),
            name: draft.name.clone(),
            slug: draft.slug.clone(),
        };
        state.categories.rows.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, patch: &CategoryPatch) -> StoreResult<Option<BlogCategory>> {
        let mut state = self.state.write().await;
        if let Some(slug) = &patch.slug {
            ensure_unique(&state.categories.rows, "blog_categories_slug_key", Some(id), |c| (c.id, c.slug.as_str()), slug)?;
        }

        let Some(category) = state.categories.rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name { category.name = name.clone(); }
        if let Some(slug) = &patch.slug { category.slug = slug.clone(); }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> StoreResult<Option<BlogCategory>> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.categories.rows, id, |c| c.id))
    }

    async fn list_divisions(&self, featured_only: bool) -> StoreResult<Vec<BrandDivision>> {
        let state = self.state.read().await;
        let mut divisions: Vec<BrandDivision> = state
            .divisions
            .rows
            .iter()
            .filter(|d| !featured_only || d.featured)
            .cloned()
            .collect();
        divisions.sort_by(featured_then_name);
        Ok(divisions)
    }

    async fn find_division(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        Ok(self.state.read().await.divisions.rows.iter().find(|d| d.id == id).cloned())
    }

    async fn find_division_by_slug(&self, slug: &str) -> StoreResult<Option<BrandDivision>> {
        Ok(self.state.read().await.divisions.rows.iter().find(|d| d.slug == slug).cloned())
    }

    async fn count_divisions_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(count_matching(&state.divisions.rows, exclude_id, |d| (d.id, d.slug.as_str()), slug))
    }

    async fn insert_division(&self, draft: &DivisionDraft) -> StoreResult<BrandDivision> {
        let mut state = self.state.write().await;
        ensure_unique(&state.divisions.rows, "brand_divisions_slug_key", None, |d| (d.id, d.slug.as_str()), &draft.slug)?;

        let division = BrandDivision {
            id: state.divisions.allocate_id(),
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            logo_url: draft.logo_url.clone(),
            website_url: draft.website_url.clone(),
            featured: draft.featured,
        };
        state.divisions.rows.push(division.clone());
        Ok(division)
    }

    async fn update_division(&self, id: i64, patch: &DivisionPatch) -> StoreResult<Option<BrandDivision>> {
        let mut state = self.state.write().await;
        if let Some(slug) = &patch.slug {
            ensure_unique(&state.divisions.rows, "brand_divisions_slug_key", Some(id), |d| (d.id, d.slug.as_str()), slug)?;
        }

        let Some(division) = state.divisions.rows.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name { division.name = name.clone(); }
        if let Some(slug) = &patch.slug { division.slug = slug.clone(); }
        if let Some(description) = &patch.description { division.description = description.clone(); }
        if let Some(logo_url) = &patch.logo_url { division.logo_url = logo_url.clone(); }
        if let Some(website_url) = &patch.website_url { division.website_url = website_url.clone(); }
        if let Some(featured) = patch.featured { division.featured = featured; }
        Ok(Some(division.clone()))
    }

    async fn toggle_division_featured(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        let mut state = self.state.write().await;
        Ok(state.divisions.rows.iter_mut().find(|d| d.id == id).map(|division| {
            division.featured = !division.featured;
            division.clone()
        }))
    }

    async fn delete_division(&self, id: i64) -> StoreResult<Option<BrandDivision>> {
        let mut state = self.state.write().await;
        Ok(remove_by_id(&mut state.divisions.rows, id, |d| d.id))
    }

    async fn list_journey_items(&self) -> StoreResult<Vec<JourneyItem>> {
        let mut items = self.state.read().await.journey_items.rows.clone();
        // ASC puts NULL years last in Postgres; Option would put them first
        items.sort_by(|a, b| {
            a.display_order.cmp(&b.display_order).then_with(|| match (a.year, b.year) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
        });
        Ok(items)
    }

    async fn list_achievements(&self) -> StoreResult<Vec<Achievement>> {
        let mut items = self.state.read().await.achievements.rows.clone();
        items.sort_by_key(|a| a.display_order);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn post_draft(slug: &str, published_days_ago: Option<i64>) -> PostDraft {
        PostDraft {
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: None,
            content: "body".to_string(),
            featured: false,
            category: None,
            read_time: 5,
            published_at: published_days_ago.map(|d| Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() - Duration::days(d)),
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_per_table() {
        let store = MemoryStore::new();
        let cat = store
            .insert_category(&CategoryDraft { name: "Acme".into(), slug: "acme".into() })
            .await
            .unwrap();
        let post = store.insert_post(&post_draft("hello", Some(1))).await.unwrap();
        assert_eq!(cat.id, 1);
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_unique_violation() {
        let store = MemoryStore::new();
        store.insert_post(&post_draft("hello", None)).await.unwrap();
        let err = store.insert_post(&post_draft("hello", None)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn posts_list_drafts_first_then_newest() {
        let store = MemoryStore::new();
        store.insert_post(&post_draft("old", Some(10))).await.unwrap();
        store.insert_post(&post_draft("draft", None)).await.unwrap();
        store.insert_post(&post_draft("new", Some(1))).await.unwrap();

        let all = store
            .list_posts(&PostQuery { include_drafts: true, ..Default::default() })
            .await
            .unwrap();
        let slugs: Vec<&str> = all.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["draft", "new", "old"]);

        let public = store.list_posts(&PostQuery::default()).await.unwrap();
        assert_eq!(public.len(), 2);
    }

    #[tokio::test]
    async fn list_limit_is_capped_by_store_setting() {
        let store = MemoryStore::with_max_limit(Some(2));
        for (i, slug) in ["a", "b", "c"].into_iter().enumerate() {
            store.insert_post(&post_draft(slug, Some(i as i64))).await.unwrap();
        }

        let capped = store.list_posts(&PostQuery { limit: Some(10), ..Default::default() }).await.unwrap();
        assert_eq!(capped.len(), 2);
        let under_cap = store.list_posts(&PostQuery { limit: Some(1), ..Default::default() }).await.unwrap();
        assert_eq!(under_cap.len(), 1);

        let uncapped = MemoryStore::new();
        for slug in ["a", "b", "c"] {
            uncapped.insert_post(&post_draft(slug, Some(1))).await.unwrap();
        }
        let all = uncapped.list_posts(&PostQuery { limit: Some(10), ..Default::default() }).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn journey_orders_by_display_order_then_year() {
        let store = MemoryStore::new();
        let item = |order: i32, year: Option<i32>, title: &str| JourneyItem {
            id: 0,
            display_order: order,
            year,
            title: title.to_string(),
            description: String::new(),
            image_url: None,
        };
        store
            .load_showcase(
                vec![item(2, Some(2010), "c"), item(1, Some(2005), "b"), item(1, Some(2001), "a")],
                vec![],
            )
            .await;
        let titles: Vec<String> = store.list_journey_items().await.unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
