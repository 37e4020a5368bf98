use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - a registered account.
///
/// `password_hash` never leaves the server; the representation layer
/// serializes users through [`crate::ports`] consumers that strip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    /// Ids of the posts this user created, in creation order.
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            name,
            password_hash,
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record ownership of a newly created post.
    pub fn attach_post(&mut self, post_id: Uuid) {
        self.posts.push(post_id);
        self.updated_at = Utc::now();
    }
}

/// The owner projection joined onto posts: public identity fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}
