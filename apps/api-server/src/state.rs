//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, UserRepository};
use quill_infra::database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build repositories backed by the configured database, falling back
    /// to the in-memory stores when no database is configured or the
    /// connection fails.
    #[cfg(feature = "postgres")]
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if let Some(config) = db_config {
            match connect(config).await {
                Ok(conn) => {
                    let conn = Arc::new(conn);
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(conn.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn)),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory stores.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running with in-memory stores.");
        }

        Self::in_memory()
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if db_config.is_some() {
            tracing::warn!("Built without postgres support; using in-memory stores.");
        }
        Self::in_memory()
    }

    /// In-memory repositories. Also the substrate for endpoint tests.
    pub fn in_memory() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new(users.clone()));
        Self { users, posts }
    }
}
