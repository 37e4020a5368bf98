//! Post handlers - listing, creation, edits, deletion and comments.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, PostWithOwner};
use quill_core::ports::{BaseRepository, PostRepository};
use quill_shared::dto::{
    AddCommentRequest, CreatePostRequest, PostOwnerResponse, PostResponse, PostWithOwnerResponse,
    UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        author: post.author,
        url: post.url,
        likes: post.likes,
        user: post.user_id.map(|id| id.to_string()),
        comments: post.comments,
    }
}

fn to_joined_response(entry: PostWithOwner) -> PostWithOwnerResponse {
    PostWithOwnerResponse {
        id: entry.post.id.to_string(),
        title: entry.post.title,
        author: entry.post.author,
        url: entry.post.url,
        likes: entry.post.likes,
        user: entry.owner.map(|owner| PostOwnerResponse {
            id: owner.id.to_string(),
            username: owner.username,
            name: owner.name,
        }),
        comments: entry.post.comments,
    }
}

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("post {id} not found"))
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all_with_owner().await?;
    let body: Vec<PostWithOwnerResponse> = posts.into_iter().map(to_joined_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate before touching the stores
    let title = req.title.filter(|title| !title.is_empty());
    let url = req.url.filter(|url| !url.is_empty());
    let (Some(title), Some(url)) = (title, url) else {
        return Err(AppError::BadRequest(
            "title and url are required".to_string(),
        ));
    };

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let post = Post::new(title, req.author, url, req.likes, Some(user.id));
    let saved = state.posts.save(post).await?;

    // Attribute the new post to its creator
    user.attach_post(saved.id);
    state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(to_response(saved)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PUT /api/posts/{id}
///
/// Deliberately open to any caller: content edits are unrestricted, only
/// deletion is limited to the owner.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    post.apply_edit(req.title, req.author, req.url, req.likes);
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(to_response(saved)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    if !post.is_owned_by(identity.user_id) {
        return Err(AppError::Ownership(
            "only the owner may delete a post".to_string(),
        ));
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let comment = body
        .into_inner()
        .comment
        .filter(|comment| !comment.is_empty())
        .ok_or_else(|| AppError::BadRequest("comment is required".to_string()))?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    // Read-modify-write: concurrent appends race, last write wins.
    post.add_comment(comment);
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(to_response(saved)))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::json;

    use super::super::test_support::{TestContext, post_count, seed_post, seed_user, test_app};
    use quill_core::ports::BaseRepository;

    #[actix_web::test]
    async fn create_without_token_is_unauthorized_and_persists_nothing() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "t", "url": "u"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(post_count(&ctx).await, 0);
    }

    #[actix_web::test]
    async fn create_with_garbage_token_is_unauthorized() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", "bearer not-a-token"))
            .set_json(json!({"title": "t", "url": "u"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(post_count(&ctx).await, 0);
    }

    #[actix_web::test]
    async fn create_persists_post_and_attributes_it_to_the_caller() {
        let ctx = TestContext::new();
        let (user, token) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("bearer {token}")))
            .set_json(json!({
                "title": "test blog",
                "author": "test author",
                "url": "test url",
                "likes": 1
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "test blog");
        assert_eq!(body["likes"], 1);
        assert_eq!(body["user"], user.id.to_string());

        assert_eq!(post_count(&ctx).await, 1);

        let owner = ctx.state.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(owner.posts.len(), 1);
        assert_eq!(owner.posts[0].to_string(), body["id"]);
    }

    #[actix_web::test]
    async fn create_accepts_uppercase_bearer_scheme() {
        let ctx = TestContext::new();
        let (_, token) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"title": "t", "url": "u"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn create_without_title_or_url_is_a_validation_failure() {
        let ctx = TestContext::new();
        let (_, token) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        for body in [json!({"likes": 12}), json!({"title": "t"}), json!({"url": "u"})] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(("Authorization", format!("bearer {token}")))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), 400);
        }

        assert_eq!(post_count(&ctx).await, 0);
    }

    #[actix_web::test]
    async fn create_defaults_likes_to_zero() {
        let ctx = TestContext::new();
        let (_, token) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("bearer {token}")))
            .set_json(json!({
                "title": "value-test blog",
                "author": "test author",
                "url": "test url"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["likes"], 0);
    }

    #[actix_web::test]
    async fn list_joins_owner_identity_without_password_hash() {
        let ctx = TestContext::new();
        let (user, _) = seed_user(&ctx, "mluukkai").await;
        seed_post(&ctx, "owned", Some(&user)).await;
        seed_post(&ctx, "orphan", None).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let raw = test::read_body(resp).await;
        let text = std::str::from_utf8(&raw).unwrap();
        assert!(!text.contains("password"));

        let body: serde_json::Value = serde_json::from_str(text).unwrap();
        let posts = body.as_array().unwrap();
        assert_eq!(posts.len(), 2);

        let owned = posts.iter().find(|p| p["title"] == "owned").unwrap();
        assert_eq!(owned["user"]["username"], "mluukkai");

        let orphan = posts.iter().find(|p| p["title"] == "orphan").unwrap();
        assert!(orphan["user"].is_null());
    }

    #[actix_web::test]
    async fn get_returns_post_or_not_found() {
        let ctx = TestContext::new();
        let post = seed_post(&ctx, "findable", None).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn update_edits_any_post_without_a_token() {
        let ctx = TestContext::new();
        let (user, _) = seed_user(&ctx, "mluukkai").await;
        let post = seed_post(&ctx, "original", Some(&user)).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .set_json(json!({
                "title": "edited blog",
                "author": "new author",
                "url": "edited url",
                "likes": 9
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "edited blog");
        assert_eq!(body["likes"], 9);

        let stored = ctx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "edited blog");
    }

    #[actix_web::test]
    async fn update_without_likes_resets_the_count() {
        let ctx = TestContext::new();
        let post = seed_post(&ctx, "liked", None).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .set_json(json!({"title": "still liked?"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["likes"], 0);
    }

    #[actix_web::test]
    async fn delete_by_owner_removes_exactly_that_post() {
        let ctx = TestContext::new();
        let (user, token) = seed_user(&ctx, "mluukkai").await;
        let post = seed_post(&ctx, "doomed", Some(&user)).await;
        seed_post(&ctx, "survivor", Some(&user)).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(("Authorization", format!("bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 204);
        assert_eq!(post_count(&ctx).await, 1);
        assert!(
            ctx.state
                .posts
                .find_by_id(post.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn delete_by_non_owner_is_rejected_and_post_survives() {
        let ctx = TestContext::new();
        let (owner, _) = seed_user(&ctx, "owner").await;
        let (_, intruder_token) = seed_user(&ctx, "intruder").await;
        let post = seed_post(&ctx, "contested", Some(&owner)).await;
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(("Authorization", format!("bearer {intruder_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(post_count(&ctx).await, 1);
    }

    #[actix_web::test]
    async fn delete_missing_post_is_not_found() {
        let ctx = TestContext::new();
        let (_, token) = seed_user(&ctx, "mluukkai").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
            .insert_header(("Authorization", format!("bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn comment_appends_to_the_end_of_the_list() {
        let ctx = TestContext::new();
        let post = seed_post(&ctx, "discussed", None).await;

        {
            let mut stored = ctx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
            stored.add_comment("first!".to_string());
            ctx.state.posts.save(stored).await.unwrap();
        }

        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post.id))
            .set_json(json!({"comment": "second"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["comments"], json!(["first!", "second"]));
    }

    #[actix_web::test]
    async fn empty_comment_is_a_validation_failure() {
        let ctx = TestContext::new();
        let post = seed_post(&ctx, "quiet", None).await;
        let app = test_app!(ctx);

        for body in [json!({}), json!({"comment": ""})] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/posts/{}/comments", post.id))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), 400);
        }
    }
}
