//! services/api/src/lib.rs
//!
//! Library crate for the symptom intake API service. The `api` binary wires
//! the real adapters into the router built here; tests wire in their own.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use web::state::AppState;

/// Uploaded photo and voice files are capped at 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router for the given application state.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes: symptom intake is keyed by an opaque session string,
    // not an authenticated identity.
    let public_routes = Router::new()
        .route("/api/auth/register", post(web::auth::register_handler))
        .route("/api/auth/login", post(web::auth::login_handler))
        .route("/api/auth/logout", post(web::auth::logout_handler))
        .route("/api/symptoms/text", post(web::submit_text_handler))
        .route("/api/symptoms/image", post(web::submit_image_handler))
        .route("/api/symptoms/audio", post(web::submit_audio_handler))
        .route("/api/analysis/{submission_id}", get(web::get_analysis_handler))
        .route(
            "/api/session/{session_id}",
            get(web::get_session_history_handler),
        );

    // Protected routes (auth cookie required).
    let protected_routes = Router::new()
        .route("/api/auth/me", get(web::auth::me_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            web::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}
