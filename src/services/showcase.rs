use std::sync::Arc;

use crate::database::models::{Achievement, JourneyItem};
use crate::error::CmsError;
use crate::store::ContentStore;

/// Read-only display records for the about pages
pub struct ShowcaseService {
    store: Arc<dyn ContentStore>,
}

impl ShowcaseService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn journey(&self) -> Result<Vec<JourneyItem>, CmsError> {
        Ok(self.store.list_journey_items().await?)
    }

    pub async fn achievements(&self) -> Result<Vec<Achievement>, CmsError> {
        Ok(self.store.list_achievements().await?)
    }
}
