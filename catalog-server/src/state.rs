//! Shared application state

use std::sync::Arc;

use shared::error::AppResult;
use sqlx::SqlitePool;

use crate::auth::{self, JwtConfig, JwtService};
use crate::catalog::projection::ImageHostRewrite;
use crate::config::Config;
use crate::db::DbService;
use crate::notify::{OrderNotifier, TelegramNotifier};
use crate::storage::ImageStorage;

/// Cloned into every handler; all members are cheap handles
#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtService>,
    pub images: Arc<ImageStorage>,
    /// Image host substitution applied to served URLs
    pub rewrite: ImageHostRewrite,
    /// Order sink, `None` when notifications are not configured
    pub notifier: Option<Arc<dyn OrderNotifier>>,
}

impl AppState {
    /// Open the database, bootstrap the admin account and wire the notifier
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url).await?;

        if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
            auth::bootstrap_admin(&db.pool, username, password).await?;
        }

        let notifier = match &config.telegram {
            Some(telegram) => {
                tracing::info!(chat_id = %telegram.chat_id, "Telegram order notifications enabled");
                Some(Arc::new(TelegramNotifier::new(telegram)) as Arc<dyn OrderNotifier>)
            }
            None => {
                tracing::warn!("Telegram not configured, orders will not be forwarded");
                None
            }
        };

        Ok(Self::with_db(config, db).with_notifier(notifier))
    }

    /// Build state over an already opened database, without a notifier
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt = JwtService::with_config(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiry_hours,
        ));
        let images = ImageStorage::new(config.upload_dir.clone(), &config.public_base_url);
        let rewrite =
            ImageHostRewrite::new(config.image_host_from.clone(), config.image_host_to.clone());

        Self {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            images: Arc::new(images),
            rewrite,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Option<Arc<dyn OrderNotifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
