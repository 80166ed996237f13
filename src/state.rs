use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{CategoryService, DivisionService, PostService, ShowcaseService, UserService};
use crate::store::ContentStore;

/// Shared handler state: configuration plus the content store every service runs against
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        Self { config: Arc::new(config), store }
    }

    pub fn users(&self) -> UserService {
        UserService::new(Arc::clone(&self.store))
    }

    pub fn posts(&self) -> PostService {
        PostService::new(Arc::clone(&self.store))
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(Arc::clone(&self.store))
    }

    pub fn divisions(&self) -> DivisionService {
        DivisionService::new(Arc::clone(&self.store))
    }

    pub fn showcase(&self) -> ShowcaseService {
        ShowcaseService::new(Arc::clone(&self.store))
    }
}
