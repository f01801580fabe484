// Command surface
// Each submodule contains the async operations for one feature

pub mod ide;
pub mod launch;
pub mod project;
pub mod system;

use std::sync::Arc;

use crate::repositories::{IdeRepository, ProjectRepository};
use crate::services::platform::{self, Platform};
use crate::utils::config::AppConfig;
use crate::utils::database::{open_database, Database};
use crate::utils::entity_lock::EntityLocks;
use crate::utils::error::Result;

/// Shared state handed to every command
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub platform: Arc<dyn Platform>,
    pub locks: Arc<EntityLocks>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig, platform: Arc<dyn Platform>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            platform,
            locks: Arc::new(EntityLocks::new()),
        }
    }

    /// Open the store described by `config` on the host platform
    pub fn open(config: AppConfig) -> Result<Self> {
        Self::open_with_platform(config, platform::current())
    }

    pub fn open_with_platform(config: AppConfig, platform: Arc<dyn Platform>) -> Result<Self> {
        let db = open_database(&config)?;
        log::info!("[App] Using {} platform integration", platform.name());
        Ok(Self::new(db, config, platform))
    }

    pub fn projects(&self) -> ProjectRepository {
        ProjectRepository::new(self.db.clone())
    }

    pub fn ides(&self) -> IdeRepository {
        IdeRepository::new(self.db.clone())
    }
}
