use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;
use crate::services::Services;
use crate::storage::PhotoStore;

/// Shared application state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub services: Arc<Services>,
    pub photos: PhotoStore,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        let config = Arc::new(config);
        let services = Arc::new(Services::new(db.clone(), config.clone()));
        let photos = PhotoStore::new(config.files.photo_dir.clone());

        Self {
            config,
            db,
            services,
            photos,
        }
    }
}
