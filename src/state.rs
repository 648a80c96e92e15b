use crate::config::AppConfig;
use crate::db;
use crate::users::repo::UserStore;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub users: UserStore,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::from_config(config).await
    }

    pub async fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let db = db::connect(&config).await?;
        let users = UserStore::new(db.clone());
        Ok(Self { db, config, users })
    }
}
