use std::sync::Arc;

use super::validation::{clearable_text, optional_text, taken, FieldErrors};
use crate::auth::Role;
use crate::database::models::{NewUser, User, UserDraft, UserPatch};
use crate::error::CmsError;
use crate::store::ContentStore;

/// Dashboard account management
pub struct UserService {
    store: Arc<dyn ContentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<User>, CmsError> {
        Ok(self.store.list_users().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, CmsError> {
        Ok(self.store.find_user(id).await?)
    }

    pub async fn create(&self, input: NewUser) -> Result<User, CmsError> {
        let mut errors = FieldErrors::new();
        let email = errors.required("email", input.email.as_deref()).to_lowercase();
        errors.email("email", &email);
        errors.into_result()?;

        if self.store.count_users_with_email(&email, None).await? > 0 {
            return Err(taken("email"));
        }

        let draft = UserDraft {
            email,
            name: optional_text(input.name),
            role: input.role.unwrap_or(Role::Viewer),
            image: optional_text(input.image),
        };
        let user = self.store.insert_user(&draft).await?;
        tracing::info!("Created user {} with role '{}'", user.id, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User, CmsError> {
        let mut errors = FieldErrors::new();
        let email = errors.non_blank("email", patch.email.as_deref()).map(|e| e.to_lowercase());
        if let Some(email) = &email {
            errors.email("email", email);
        }
        errors.into_result()?;
        let patch = UserPatch {
            email,
            name: clearable_text(patch.name),
            image: clearable_text(patch.image),
            ..patch
        };

        if self.store.find_user(id).await?.is_none() {
            return Err(CmsError::not_found("User"));
        }
        if let Some(email) = &patch.email {
            if self.store.count_users_with_email(email, Some(id)).await? > 0 {
                return Err(taken("email"));
            }
        }

        let user = self
            .store
            .update_user(id, &patch)
            .await?
            .ok_or_else(|| CmsError::not_found("User"))?;
        if let Some(role) = patch.role {
            tracing::info!("User {} role set to '{}'", user.id, role);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn new_users_default_to_viewer() {
        let users = service();
        let user = users
            .create(NewUser { email: Some("Ada@Example.com".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn email_must_be_valid_and_unique() {
        let users = service();
        assert!(matches!(
            users.create(NewUser { email: Some("not-an-email".into()), ..Default::default() }).await,
            Err(CmsError::Validation { .. })
        ));

        users
            .create(NewUser { email: Some("ada@example.com".into()), ..Default::default() })
            .await
            .unwrap();
        match users.create(NewUser { email: Some("ada@example.com".into()), ..Default::default() }).await {
            Err(CmsError::Validation { field_errors, .. }) => assert!(field_errors.contains_key("email")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn promote_user() {
        let users = service();
        let user = users
            .create(NewUser { email: Some("ada@example.com".into()), ..Default::default() })
            .await
            .unwrap();
        let promoted = users
            .update(user.id, UserPatch { role: Some(Role::Editor), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(promoted.role, Role::Editor);
        assert_eq!(promoted.email, user.email);
        assert!(matches!(
            users.update(77, UserPatch::default()).await,
            Err(CmsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_can_clear_name() {
        let users = service();
        let user = users
            .create(NewUser {
                email: Some("ada@example.com".into()),
                name: Some("Ada".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));

        let updated = users
            .update(user.id, UserPatch { name: Some(None), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, None);
    }
}
