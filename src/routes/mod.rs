use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::{health_check, users};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = user_routes()
        .route("/health", get(health_check))
        .with_state(state);

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// The static `/users/page` segment takes priority over `/users/:id`.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/page", get(users::list_users_paged))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/email/:email", get(users::get_user_by_email))
}
