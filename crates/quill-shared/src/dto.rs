//! Data Transfer Objects - request/response types for the API.
//!
//! Required fields on mutating requests are `Option` on purpose: presence
//! is checked by the handlers so that a missing field produces the API's
//! own validation response instead of a deserializer error.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to create a post. `title` and `url` are required; `likes`
/// defaults to 0 when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request to edit a post. Absent fields keep their current value,
/// except `likes`, which resets to 0 when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request to append a comment to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub comment: Option<String>,
}

/// A user's public representation. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub posts: Vec<String>,
}

/// A post as returned by single-post endpoints; `user` is the owner's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub comments: Vec<String>,
}

/// A post as returned by the list endpoint, owner identity joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithOwnerResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PostOwnerResponse>,
    pub comments: Vec<String>,
}

/// Owner identity embedded in a joined post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOwnerResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
