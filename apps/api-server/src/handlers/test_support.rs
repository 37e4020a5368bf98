//! Shared scaffolding for endpoint tests.

use std::sync::Arc;

use quill_core::domain::{Post, User};
use quill_core::ports::{
    BaseRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use quill_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::state::AppState;

/// In-memory state plus real auth services, wired like the production app.
pub(crate) struct TestContext {
    pub state: AppState,
    pub token_service: Arc<dyn TokenService>,
    pub password_service: Arc<dyn PasswordService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            state: AppState::in_memory(),
            token_service: Arc::new(JwtTokenService::new(JwtConfig {
                secret: "endpoint-test-secret".to_string(),
                issuer: "quill-test".to_string(),
            })),
            password_service: Arc::new(Argon2PasswordService::new()),
        }
    }
}

/// Insert a user directly into the store; returns it with a valid token.
pub(crate) async fn seed_user(ctx: &TestContext, username: &str) -> (User, String) {
    let hash = ctx.password_service.hash("salainen").unwrap();
    let user = ctx
        .state
        .users
        .save(User::new(username.to_string(), None, hash))
        .await
        .unwrap();
    let token = ctx
        .token_service
        .issue_token(user.id, &user.username)
        .unwrap();
    (user, token)
}

/// Insert a post directly into the store.
pub(crate) async fn seed_post(ctx: &TestContext, title: &str, owner: Option<&User>) -> Post {
    let post = Post::new(
        title.to_string(),
        Some("test author".to_string()),
        format!("https://example.com/{title}"),
        Some(1),
        owner.map(|user| user.id),
    );
    ctx.state.posts.save(post).await.unwrap()
}

/// Number of posts currently stored.
pub(crate) async fn post_count(ctx: &TestContext) -> usize {
    ctx.state.posts.find_all_with_owner().await.unwrap().len()
}

/// Number of users currently stored.
pub(crate) async fn user_count(ctx: &TestContext) -> usize {
    ctx.state.users.find_all().await.unwrap().len()
}

/// Build the same app the server runs, backed by the context's services.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .app_data(actix_web::web::Data::new($ctx.token_service.clone()))
                .app_data(actix_web::web::Data::new($ctx.password_service.clone()))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

pub(crate) use test_app;
