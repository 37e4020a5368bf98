//! User handlers - registration and read-only lookups.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PasswordService, UserRepository};
use quill_shared::dto::{RegisterUserRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username,
        name: user.name,
        posts: user.posts.iter().map(|id| id.to_string()).collect(),
    }
}

/// POST /api/users
pub async fn register(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input before any persistence call
    let username = req.username.filter(|username| !username.is_empty());
    let password = req.password.filter(|password| !password.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    };
    if password.chars().count() < 3 {
        return Err(AppError::BadRequest(
            "password must be at least 3 characters".to_string(),
        ));
    }

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(DomainError::Duplicate("username".to_string()).into());
    }

    let password_hash = password_service.hash(&password)?;

    let user = User::new(username, req.name, password_hash);
    let saved = state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(to_response(saved)))
}

/// GET /api/users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.find_all().await?;
    let body: Vec<UserResponse> = users.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

    Ok(HttpResponse::Ok().json(to_response(user)))
}
