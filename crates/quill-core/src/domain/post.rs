use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;

/// Post entity - a blog post with likes and an ordered comment list.
///
/// `user_id` is set when the post is created through an authenticated
/// request; it is the only identity allowed to delete the post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Free-text author line, unrelated to the owning account.
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user_id: Option<Uuid>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps.
    pub fn new(
        title: String,
        author: Option<String>,
        url: String,
        likes: Option<i64>,
        user_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            author,
            url,
            likes: Self::normalize_likes(likes),
            user_id,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Collapse absent, zero or negative input to zero likes.
    /// The stored count is always a non-negative integer.
    pub fn normalize_likes(likes: Option<i64>) -> i64 {
        likes.unwrap_or(0).max(0)
    }

    /// Apply an edit. Provided fields replace the current values; likes
    /// always re-normalize, so an edit without likes resets the count to 0.
    pub fn apply_edit(
        &mut self,
        title: Option<String>,
        author: Option<String>,
        url: Option<String>,
        likes: Option<i64>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = Some(author);
        }
        if let Some(url) = url {
            self.url = url;
        }
        self.likes = Self::normalize_likes(likes);
        self.updated_at = Utc::now();
    }

    /// Append a comment to the end of the ordered comment list.
    pub fn add_comment(&mut self, comment: String) {
        self.comments.push(comment);
        self.updated_at = Utc::now();
    }

    /// Whether the given identity owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// A post joined with its owner's public identity.
#[derive(Debug, Clone)]
pub struct PostWithOwner {
    pub post: Post,
    pub owner: Option<UserSummary>,
}
