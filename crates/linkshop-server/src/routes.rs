//! HTTP router

use crate::handlers;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Largest accepted request body (multipart uploads included)
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/admin", get(handlers::admin::page))
        .nest("/api", api_routes())
        .nest_service("/static", ServeDir::new(&static_dir))
        // Top-level files, `/` serves index.html
        .fallback_service(ServeDir::new(&static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/:id",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::delete),
        )
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get)
                .put(handlers::categories::rename)
                .delete(handlers::categories::delete),
        )
        .route(
            "/socials",
            get(handlers::socials::list).post(handlers::socials::create),
        )
        .route(
            "/socials/:id",
            get(handlers::socials::get)
                .put(handlers::socials::update)
                .delete(handlers::socials::delete),
        )
        .route(
            "/profile",
            get(handlers::profile::get)
                .put(handlers::profile::update)
                .post(handlers::profile::update),
        )
        .route("/static-imgs", get(handlers::assets::static_images))
        .route(
            "/admin/delete-product",
            post(handlers::admin::delete_product),
        )
        .route(
            "/admin/delete-category",
            post(handlers::admin::delete_category),
        )
}
