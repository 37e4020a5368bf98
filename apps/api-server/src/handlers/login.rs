//! Login handler - exchanges credentials for a bearer token.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use quill_core::ports::{PasswordService, TokenService, UserRepository};
use quill_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown user and wrong password respond identically
    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service.verify(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = token_service.issue_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::json;

    use super::super::test_support::{TestContext, seed_user, test_app};
    use quill_core::ports::TokenService;

    #[actix_web::test]
    async fn login_returns_a_verifiable_token() {
        let ctx = TestContext::new();
        let (user, _) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "mluukkai", "password": "salainen"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "mluukkai");

        let claims = ctx
            .token_service
            .verify_token(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.user_id, user.id);
    }

    #[actix_web::test]
    async fn login_rejects_wrong_password() {
        let ctx = TestContext::new();
        seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "mluukkai", "password": "wrong"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn login_rejects_unknown_user() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "ghost", "password": "salainen"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }
}
