use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::session_middleware;
use crate::state::AppState;

pub mod extract;

/// Full HTTP surface with session resolution, CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Dashboard (guards run inside each handler)
        .merge(dashboard_routes())
        // Global middleware
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(public::list_posts))
        .route("/api/posts/:slug", get(public::get_post))
        .route("/api/categories", get(public::list_categories))
        .route("/api/divisions", get(public::list_divisions))
        .route("/api/divisions/:slug", get(public::get_division))
        .route("/api/journey", get(public::list_journey))
        .route("/api/achievements", get(public::list_achievements))
}

fn dashboard_routes() -> Router<AppState> {
    use protected::{categories, divisions, posts, users};

    Router::new()
        // any signed-in user
        .route("/api/dashboard/whoami", get(protected::whoami))
        // admin
        .route("/api/dashboard/users", get(users::list_users).post(users::create_user))
        .route("/api/dashboard/users/:id", get(users::get_user).patch(users::update_user))
        // contributor lists, reads and creates; editor edits; admin deletes
        .route("/api/dashboard/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/dashboard/posts/slug-available", get(posts::post_slug_available))
        .route(
            "/api/dashboard/posts/:id",
            get(posts::get_post).patch(posts::update_post).delete(posts::delete_post),
        )
        // editor writes, admin deletes
        .route("/api/dashboard/categories", post(categories::create_category))
        .route("/api/dashboard/categories/slug-available", get(categories::category_slug_available))
        .route(
            "/api/dashboard/categories/:id",
            axum::routing::patch(categories::update_category).delete(categories::delete_category),
        )
        // admin only, apart from the slug check
        .route("/api/dashboard/divisions", post(divisions::create_division))
        .route("/api/dashboard/divisions/slug-available", get(divisions::division_slug_available))
        .route(
            "/api/dashboard/divisions/:id",
            get(divisions::get_division)
                .patch(divisions::update_division)
                .delete(divisions::delete_division),
        )
        .route("/api/dashboard/divisions/:id/toggle-featured", post(divisions::toggle_featured))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(origins)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "CMS API (Rust)",
            "version": version,
            "description": "Brand site content API: blog, divisions and company history",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "posts": "/api/posts[/:slug] (public, published only)",
                "categories": "/api/categories (public)",
                "divisions": "/api/divisions[/:slug] (public)",
                "journey": "/api/journey (public)",
                "achievements": "/api/achievements (public)",
                "dashboard": "/api/dashboard/* (bearer token, role-gated)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": "ok"
                }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "storage unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
                .into_response()
        }
    }
}
