use std::sync::Arc;

use super::validation::{is_valid_slug, taken, FieldErrors};
use crate::database::models::{BlogCategory, CategoryDraft, CategoryPatch, NewCategory};
use crate::error::CmsError;
use crate::store::ContentStore;

pub struct CategoryService {
    store: Arc<dyn ContentStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<BlogCategory>, CmsError> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<BlogCategory>, CmsError> {
        Ok(self.store.find_category(id).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogCategory>, CmsError> {
        Ok(self.store.find_category_by_slug(slug).await?)
    }

    pub async fn create(&self, input: NewCategory) -> Result<BlogCategory, CmsError> {
        let mut errors = FieldErrors::new();
        let name = errors.required("name", input.name.as_deref());
        let slug = errors.required("slug", input.slug.as_deref());
        errors.slug("slug", &slug);
        errors.into_result()?;

        if self.store.count_categories_with_slug(&slug, None).await? > 0 {
            return Err(taken("slug"));
        }

        let category = self.store.insert_category(&CategoryDraft { name, slug }).await?;
        tracing::info!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    pub async fn update(&self, id: i64, patch: CategoryPatch) -> Result<BlogCategory, CmsError> {
        let mut errors = FieldErrors::new();
        let patch = CategoryPatch {
            name: errors.non_blank("name", patch.name.as_deref()),
            slug: errors.non_blank("slug", patch.slug.as_deref()),
        };
        if let Some(slug) = &patch.slug {
            errors.slug("slug", slug);
        }
        errors.into_result()?;

        if self.store.find_category(id).await?.is_none() {
            return Err(CmsError::not_found("Category"));
        }
        if let Some(slug) = &patch.slug {
            if self.store.count_categories_with_slug(slug, Some(id)).await? > 0 {
                return Err(taken("slug"));
            }
        }

        self.store
            .update_category(id, &patch)
            .await?
            .ok_or_else(|| CmsError::not_found("Category"))
    }

    pub async fn delete(&self, id: i64) -> Result<BlogCategory, CmsError> {
        let removed = self
            .store
            .delete_category(id)
            .await?
            .ok_or_else(|| CmsError::not_found("Category"))?;
        tracing::info!("Deleted category {} ({})", removed.id, removed.slug);
        Ok(removed)
    }

    /// A malformed slug is never available, since create would reject it
    pub async fn slug_available(&self, slug: &str) -> Result<bool, CmsError> {
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Ok(false);
        }
        Ok(self.store.count_categories_with_slug(slug, None).await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStore::new()))
    }

    fn acme() -> NewCategory {
        NewCategory { name: Some("Acme".into()), slug: Some("acme".into()) }
    }

    #[tokio::test]
    async fn first_category_gets_id_one_and_duplicate_slug_is_rejected() {
        let categories = service();

        let created = categories.create(acme()).await.unwrap();
        assert_eq!(created, BlogCategory { id: 1, name: "Acme".into(), slug: "acme".into() });

        let err = categories.create(acme()).await.unwrap_err();
        match err {
            CmsError::Validation { field_errors, .. } => assert!(field_errors.contains_key("slug")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slug_is_unavailable_once_created() {
        let categories = service();
        assert!(categories.slug_available("acme").await.unwrap());
        assert!(!categories.slug_available("Acme News").await.unwrap());
        categories.create(acme()).await.unwrap();
        assert!(!categories.slug_available("acme").await.unwrap());
    }

    #[tokio::test]
    async fn blank_and_malformed_fields_are_rejected() {
        let categories = service();
        let err = categories
            .create(NewCategory { name: Some("   ".into()), slug: Some("Not A Slug".into()) })
            .await
            .unwrap_err();
        match err {
            CmsError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("name"));
                assert!(field_errors.contains_key("slug"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_keeps_own_slug_and_rejects_another() {
        let categories = service();
        let acme = categories.create(acme()).await.unwrap();
        categories
            .create(NewCategory { name: Some("Press".into()), slug: Some("press".into()) })
            .await
            .unwrap();

        let renamed = categories
            .update(acme.id, CategoryPatch { name: Some("Acme Co".into()), slug: Some("acme".into()) })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Acme Co");

        let err = categories
            .update(acme.id, CategoryPatch { name: None, slug: Some("press".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::Validation { .. }));
    }

    #[tokio::test]
    async fn missing_rows() {
        let categories = service();
        assert!(categories.get_by_slug("nope").await.unwrap().is_none());
        assert!(matches!(
            categories.update(9, CategoryPatch::default()).await,
            Err(CmsError::NotFound(_))
        ));
        assert!(matches!(categories.delete(9).await, Err(CmsError::NotFound(_))));
    }
}
