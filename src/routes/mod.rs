// Route exports
pub mod accounts;
pub mod matches;
pub mod secrets;
pub mod users;

use crate::core::Matcher;
use crate::models::{User, UserSummary};
use crate::services::{
    CacheError, CacheKey, CacheManager, PictureStore, PostgresClient, PostgresError, TokenService,
};
use actix_web::web;
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub tokens: Arc<TokenService>,
    pub pictures: Arc<PictureStore>,
    pub matcher: Matcher,
}

impl AppState {
    /// Drop cached views that depend on this user's row
    pub async fn invalidate_user(&self, user_id: Uuid) {
        for key in [CacheKey::user(user_id), CacheKey::preference_catalog()] {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!("Failed to invalidate cache key {}: {}", key, e);
            }
        }
    }

    /// Public summary of a user, from the cache when present
    ///
    /// `None` when no such account exists. Store hits are written back.
    pub async fn find_summary(&self, user_id: Uuid) -> Result<Option<UserSummary>, PostgresError> {
        match self.cache.get::<UserSummary>(&CacheKey::user(user_id)).await {
            Ok(summary) => return Ok(Some(summary)),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for user {}: {}", user_id, e),
        }

        match self.postgres.find_user(user_id).await? {
            Some(user) => Ok(Some(self.cache_summary(&user).await)),
            None => Ok(None),
        }
    }

    /// Refresh the cached summary after a write
    pub async fn cache_summary(&self, user: &User) -> UserSummary {
        let summary = user.summary();
        if let Err(e) = self.cache.set(&CacheKey::user(user.id), &summary).await {
            tracing::warn!("Failed to cache user {}: {}", user.id, e);
        }
        summary
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(accounts::configure)
            .configure(users::configure)
            .configure(secrets::configure),
    );
}
