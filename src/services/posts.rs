use std::sync::Arc;

use super::validation::{clearable_text, is_valid_slug, optional_text, taken, FieldErrors};
use crate::database::models::{BlogPost, NewPost, PostDraft, PostPatch, PostQuery, DEFAULT_READ_TIME};
use crate::error::CmsError;
use crate::store::ContentStore;

pub struct PostService {
    store: Arc<dyn ContentStore>,
}

fn check_read_time(errors: &mut FieldErrors, read_time: i32) {
    if read_time <= 0 {
        errors.add("readTime", "Read time must be at least one minute");
    }
}

impl PostService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Published posts, newest first
    pub async fn list(&self, query: PostQuery) -> Result<Vec<BlogPost>, CmsError> {
        if matches!(query.limit, Some(limit) if limit < 0) {
            return Err(CmsError::validation("limit must not be negative"));
        }
        Ok(self.store.list_posts(&PostQuery { include_drafts: false, ..query }).await?)
    }

    /// Every post including drafts, for the dashboard
    pub async fn list_all(&self, query: PostQuery) -> Result<Vec<BlogPost>, CmsError> {
        if matches!(query.limit, Some(limit) if limit < 0) {
            return Err(CmsError::validation("limit must not be negative"));
        }
        Ok(self.store.list_posts(&PostQuery { include_drafts: true, ..query }).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>, CmsError> {
        Ok(self.store.find_post(id).await?)
    }

    /// Any post by slug, draft or not
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, CmsError> {
        Ok(self.store.find_post_by_slug(slug).await?)
    }

    /// Public lookup: drafts read as absent
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, CmsError> {
        Ok(self.get_by_slug(slug).await?.filter(BlogPost::is_published))
    }

    pub async fn create(&self, input: NewPost) -> Result<BlogPost, CmsError> {
        let mut errors = FieldErrors::new();
        let title = errors.required("title", input.title.as_deref());
        let slug = errors.required("slug", input.slug.as_deref());
        let content = errors.required("content", input.content.as_deref());
        errors.slug("slug", &slug);
        let read_time = input.read_time.unwrap_or(DEFAULT_READ_TIME);
        check_read_time(&mut errors, read_time);
        errors.into_result()?;

        if self.store.count_posts_with_slug(&slug, None).await? > 0 {
            return Err(taken("slug"));
        }

        let draft = PostDraft {
            title,
            slug,
            excerpt: optional_text(input.excerpt),
            content,
            featured: input.featured.unwrap_or(false),
            category: optional_text(input.category),
            read_time,
            published_at: input.published_at,
        };
        let post = self.store.insert_post(&draft).await?;
        tracing::info!("Created post {} ({})", post.id, post.slug);
        Ok(post)
    }

    pub async fn update(&self, id: i64, patch: PostPatch) -> Result<BlogPost, CmsError> {
        let mut errors = FieldErrors::new();
        let patch = PostPatch {
            title: errors.non_blank("title", patch.title.as_deref()),
            slug: errors.non_blank("slug", patch.slug.as_deref()),
            content: errors.non_blank("content", patch.content.as_deref()),
            excerpt: clearable_text(patch.excerpt),
            category: clearable_text(patch.category),
            ..patch
        };
        if let Some(slug) = &patch.slug {
            errors.slug("slug", slug);
        }
        if let Some(read_time) = patch.read_time {
            check_read_time(&mut errors, read_time);
        }
        errors.into_result()?;

        if self.store.find_post(id).await?.is_none() {
            return Err(CmsError::not_found("Post"));
        }
        if let Some(slug) = &patch.slug {
            if self.store.count_posts_with_slug(slug, Some(id)).await? > 0 {
                return Err(taken("slug"));
            }
        }

        self.store
            .update_post(id, &patch)
            .await?
            .ok_or_else(|| CmsError::not_found("Post"))
    }

    pub async fn delete(&self, id: i64) -> Result<BlogPost, CmsError> {
        let removed = self
            .store
            .delete_post(id)
            .await?
            .ok_or_else(|| CmsError::not_found("Post"))?;
        tracing::info!("Deleted post {} ({})", removed.id, removed.slug);
        Ok(removed)
    }

    /// A malformed slug is never available, since create would reject it
    pub async fn slug_available(&self, slug: &str) -> Result<bool, CmsError> {
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Ok(false);
        }
        Ok(self.store.count_posts_with_slug(slug, None).await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()))
    }

    fn new_post(slug: &str, published: bool) -> NewPost {
        NewPost {
            title: Some(format!("Post {}", slug)),
            slug: Some(slug.to_string()),
            content: Some("Body".into()),
            published_at: published.then(|| Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let posts = service();
        let post = posts.create(new_post("hello", true)).await.unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.read_time, DEFAULT_READ_TIME);
        assert!(!post.featured);
        assert!(!posts.slug_available("hello").await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_missing_and_invalid_fields() {
        let posts = service();
        let err = posts
            .create(NewPost { slug: Some("ok".into()), read_time: Some(0), ..Default::default() })
            .await
            .unwrap_err();
        match err {
            CmsError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("title"));
                assert!(field_errors.contains_key("content"));
                assert!(field_errors.contains_key("readTime"));
                assert!(!field_errors.contains_key("slug"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_public_reads() {
        let posts = service();
        posts.create(new_post("live", true)).await.unwrap();
        posts.create(new_post("draft", false)).await.unwrap();

        assert_eq!(posts.list(PostQuery::default()).await.unwrap().len(), 1);
        assert_eq!(posts.list_all(PostQuery::default()).await.unwrap().len(), 2);
        assert!(posts.get_published_by_slug("draft").await.unwrap().is_none());
        assert!(posts.get_by_slug("draft").await.unwrap().is_some());
        assert!(posts.get_published_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() {
        let posts = service();
        let post = posts.create(new_post("hello", true)).await.unwrap();

        let updated = posts
            .update(post.id, PostPatch { featured: Some(true), ..Default::default() })
            .await
            .unwrap();
        assert!(updated.featured);
        assert_eq!(updated.title, post.title);
        assert_eq!(updated.slug, post.slug);

        assert!(matches!(
            posts.update(99, PostPatch::default()).await,
            Err(CmsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_clears_optional_fields_and_unpublishes() {
        let posts = service();
        let post = posts
            .create(NewPost {
                excerpt: Some("Short".into()),
                category: Some("news".into()),
                ..new_post("hello", true)
            })
            .await
            .unwrap();
        assert!(post.is_published());

        let patch: PostPatch = serde_json::from_value(serde_json::json!({
            "excerpt": null,
            "category": "   ",
            "publishedAt": null
        }))
        .unwrap();
        let updated = posts.update(post.id, patch).await.unwrap();
        assert_eq!(updated.excerpt, None);
        assert_eq!(updated.category, None);
        assert!(!updated.is_published());
        assert_eq!(updated.title, post.title);

        assert!(posts.get_published_by_slug("hello").await.unwrap().is_none());
        assert!(posts.list(PostQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_slug_is_never_available() {
        let posts = service();
        assert!(posts.slug_available(" hello ").await.unwrap());
        assert!(!posts.slug_available("Hello World").await.unwrap());
        assert!(!posts.slug_available("").await.unwrap());
    }

    #[tokio::test]
    async fn delete_returns_the_removed_row() {
        let posts = service();
        let post = posts.create(new_post("hello", true)).await.unwrap();
        let removed = posts.delete(post.id).await.unwrap();
        assert_eq!(removed.id, post.id);
        assert!(posts.slug_available("hello").await.unwrap());
        assert!(matches!(posts.delete(post.id).await, Err(CmsError::NotFound(_))));
    }
}
