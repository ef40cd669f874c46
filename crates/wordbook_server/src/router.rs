//! Router assembly.
//!
//! Routes:
//! - `GET|POST /words`
//! - `GET|PUT|DELETE /words/{word_id}`
//! - `POST /words/{word_id}/definitions`
//! - `PUT|DELETE /words/{word_id}/definitions/{definition_id}`
//! - `POST /words/{word_id}/definitions/{definition_id}/vote-{up|down}`
//!
//! Unknown paths and unsupported methods answer 404 with the uniform error body.

use crate::error::panic_response;
use crate::handlers::{
    add_definition, create_word, delete_definition, delete_word, edit_definition, get_word,
    list_words, not_found, update_word, vote_definition,
};
use crate::middleware::log_requests;
use crate::state::AppState;
use axum::http::header::{HeaderName, ACCEPT, CONTENT_TYPE, ORIGIN};
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

/// Builds the full application router.
///
/// Layer order, outermost first: request logging, panic recovery, CORS.
pub fn build_router(state: AppState) -> Router {
    let layers = ServiceBuilder::new()
        .layer(axum::middleware::from_fn(log_requests))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(build_cors_layer());

    Router::new()
        .route("/words", get(list_words).post(create_word).fallback(not_found))
        .route(
            "/words/{word_id}",
            get(get_word)
                .put(update_word)
                .delete(delete_word)
                .fallback(not_found),
        )
        .route(
            "/words/{word_id}/definitions",
            post(add_definition).fallback(not_found),
        )
        .route(
            "/words/{word_id}/definitions/{definition_id}",
            put(edit_definition)
                .delete(delete_definition)
                .fallback(not_found),
        )
        .route(
            "/words/{word_id}/definitions/{definition_id}/{action}",
            post(vote_definition).fallback(not_found),
        )
        .fallback(not_found)
        .layer(layers)
        .with_state(state)
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
        ])
}
