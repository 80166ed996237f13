use std::sync::Arc;

use super::validation::{clearable_text, is_valid_slug, optional_text, taken, FieldErrors};
use crate::database::models::{BrandDivision, DivisionDraft, DivisionPatch, NewDivision};
use crate::error::CmsError;
use crate::store::ContentStore;

pub struct DivisionService {
    store: Arc<dyn ContentStore>,
}

impl DivisionService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Featured divisions first, then by name
    pub async fn list(&self, featured_only: bool) -> Result<Vec<BrandDivision>, CmsError> {
        Ok(self.store.list_divisions(featured_only).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<BrandDivision>, CmsError> {
        Ok(self.store.find_division(id).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BrandDivision>, CmsError> {
        Ok(self.store.find_division_by_slug(slug).await?)
    }

    pub async fn create(&self, input: NewDivision) -> Result<BrandDivision, CmsError> {
        let mut errors = FieldErrors::new();
        let name = errors.required("name", input.name.as_deref());
        let slug = errors.required("slug", input.slug.as_deref());
        errors.slug("slug", &slug);
        errors.into_result()?;

        if self.store.count_divisions_with_slug(&slug, None).await? > 0 {
            return Err(taken("slug"));
        }

        let draft = DivisionDraft {
            name,
            slug,
            description: optional_text(input.description),
            logo_url: optional_text(input.logo_url),
            website_url: optional_text(input.website_url),
            featured: input.featured.unwrap_or(false),
        };
        let division = self.store.insert_division(&draft).await?;
        tracing::info!("Created division {} ({})", division.id, division.slug);
        Ok(division)
    }

    pub async fn update(&self, id: i64, patch: DivisionPatch) -> Result<BrandDivision, CmsError> {
        let mut errors = FieldErrors::new();
        let patch = DivisionPatch {
            name: errors.non_blank("name", patch.name.as_deref()),
            slug: errors.non_blank("slug", patch.slug.as_deref()),
            description: clearable_text(patch.description),
            logo_url: clearable_text(patch.logo_url),
            website_url: clearable_text(patch.website_url),
            ..patch
        };
        if let Some(slug) = &patch.slug {
            errors.slug("slug", slug);
        }
        errors.into_result()?;

        if self.store.find_division(id).await?.is_none() {
            return Err(CmsError::not_found("Division"));
        }
        if let Some(slug) = &patch.slug {
            if self.store.count_divisions_with_slug(slug, Some(id)).await? > 0 {
                return Err(taken("slug"));
            }
        }

        self.store
            .update_division(id, &patch)
            .await?
            .ok_or_else(|| CmsError::not_found("Division"))
    }

    /// Flip `featured` in one storage step and return the updated row
    pub async fn toggle_featured(&self, id: i64) -> Result<BrandDivision, CmsError> {
        let division = self
            .store
            .toggle_division_featured(id)
            .await?
            .ok_or_else(|| CmsError::not_found("Division"))?;
        tracing::info!("Division {} featured = {}", division.id, division.featured);
        Ok(division)
    }

    pub async fn delete(&self, id: i64) -> Result<BrandDivision, CmsError> {
        let removed = self
            .store
            .delete_division(id)
            .await?
            .ok_or_else(|| CmsError::not_found("Division"))?;
        tracing::info!("Deleted division {} ({})", removed.id, removed.slug);
        Ok(removed)
    }

    /// A malformed slug is never available, since create would reject it
    pub async fn slug_available(&self, slug: &str) -> Result<bool, CmsError> {
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Ok(false);
        }
        Ok(self.store.count_divisions_with_slug(slug, None).await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> DivisionService {
        DivisionService::new(Arc::new(MemoryStore::new()))
    }

    fn division(name: &str, slug: &str, featured: bool) -> NewDivision {
        NewDivision {
            name: Some(name.into()),
            slug: Some(slug.into()),
            featured: Some(featured),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn featured_filter_returns_featured_rows_by_name() {
        let divisions = service();
        divisions.create(division("Zeta", "zeta", true)).await.unwrap();
        divisions.create(division("Beta", "beta", false)).await.unwrap();
        divisions.create(division("Alpha", "alpha", true)).await.unwrap();

        let featured: Vec<String> = divisions.list(true).await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(featured, vec!["Alpha", "Zeta"]);

        let all: Vec<String> = divisions.list(false).await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(all, vec!["Alpha", "Zeta", "Beta"]);
    }

    #[tokio::test]
    async fn toggle_flips_and_flips_back() {
        let divisions = service();
        let created = divisions.create(division("Acme", "acme", false)).await.unwrap();

        assert!(divisions.toggle_featured(created.id).await.unwrap().featured);
        assert!(!divisions.toggle_featured(created.id).await.unwrap().featured);
    }

    #[tokio::test]
    async fn toggle_missing_division_is_not_found() {
        let divisions = service();
        assert!(matches!(divisions.toggle_featured(42).await, Err(CmsError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_toggles_do_not_lose_updates() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
        let divisions = Arc::new(DivisionService::new(store));
        let created = divisions.create(division("Acme", "acme", false)).await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let divisions = Arc::clone(&divisions);
                tokio::spawn(async move { divisions.toggle_featured(created.id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // An even number of flips lands back where it started
        assert!(!divisions.get_by_id(created.id).await.unwrap().unwrap().featured);
    }

    #[tokio::test]
    async fn update_trims_and_clears_optional_text() {
        let divisions = service();
        let created = divisions
            .create(NewDivision {
                description: Some("Food".into()),
                website_url: Some("https://foods.example.com".into()),
                ..division("Acme", "acme", false)
            })
            .await
            .unwrap();

        let updated = divisions
            .update(
                created.id,
                DivisionPatch {
                    description: Some(Some("  Groceries  ".into())),
                    website_url: Some(None),
                    logo_url: Some(Some("  ".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Groceries"));
        assert_eq!(updated.website_url, None);
        assert_eq!(updated.logo_url, None);
        assert_eq!(updated.name, "Acme");
    }

    #[tokio::test]
    async fn slug_lookup_and_availability() {
        let divisions = service();
        assert!(divisions.get_by_slug("acme").await.unwrap().is_none());
        divisions.create(division("Acme", "acme", false)).await.unwrap();
        assert!(divisions.get_by_slug("acme").await.unwrap().is_some());
        assert!(!divisions.slug_available("acme").await.unwrap());
        assert!(!divisions.slug_available("acme_labs").await.unwrap());
        assert!(matches!(
            divisions.create(division("Other", "acme", false)).await,
            Err(CmsError::Validation { .. })
        ));
    }
}
