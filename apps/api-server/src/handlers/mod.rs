//! HTTP handlers and route configuration.

mod health;
mod login;
mod posts;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/login", web::post().to(login::login))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::post().to(posts::add_comment)),
            )
            // User routes
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::register))
                    .route("", web::get().to(users::list))
                    .route("/{id}", web::get().to(users::get)),
            ),
    );
}
