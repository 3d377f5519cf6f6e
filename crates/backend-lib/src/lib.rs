// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core of the login service: credential checks, session lifecycle,
//! storage backends and the HTTP API.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{
    hasher_from_settings, AuthService, CredentialStore, DefaultAuth, SessionManager, SessionTable,
    DEMO_USERS,
};
use crate::config::Settings;
use crate::storage::{open_store, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session manager; shares its table with the one inside `auth`
    pub sessions: SessionManager,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Open the configured user store and build the application state
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let store = open_store(&settings.storage).await?;
        Self::with_store(store, settings).await
    }

    /// Build the application state over an already opened user store
    pub async fn with_store(store: Arc<dyn UserStore>, settings: Settings) -> anyhow::Result<Self> {
        let hasher = hasher_from_settings(&settings.auth)?;
        let credentials = CredentialStore::new(store, hasher);

        if settings.storage.seed_demo_users {
            let created = credentials.seed(&DEMO_USERS).await?;
            if created > 0 {
                tracing::info!(created, "seeded demo users");
            }
        }

        let sessions = SessionManager::new(SessionTable::new(), settings.session.ttl());
        let auth = Arc::new(DefaultAuth::new(credentials, sessions.clone()));

        Ok(Self {
            auth,
            sessions,
            settings: Arc::new(settings),
        })
    }
}
