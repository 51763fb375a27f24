use std::sync::Arc;

use common::{DocumentSynthesizer, TemplateSynthesizer};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub synthesizer: Arc<dyn DocumentSynthesizer>,
}

impl AppState {
    /// State with the default template synthesizer.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self::with_synthesizer(db, config, Arc::new(TemplateSynthesizer))
    }

    pub fn with_synthesizer(
        db: DatabaseConnection,
        config: AppConfig,
        synthesizer: Arc<dyn DocumentSynthesizer>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            synthesizer,
        }
    }
}
