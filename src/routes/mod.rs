mod health;
mod practice;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/api/letters/next", get(practice::letters_next))
        .route("/api/letters/attempt", post(practice::letters_attempt))
        .route(
            "/api/twoletterwords/next",
            get(practice::two_letter_words_next),
        )
        .route(
            "/api/twoletterwords/attempt",
            post(practice::two_letter_words_attempt),
        )
        .route("/api/words/next", get(practice::words_next))
        .route("/api/words/attempt", post(practice::words_attempt))
        .route("/api/sentences/next", get(practice::sentences_next))
        .route("/api/sentences/attempt", post(practice::sentences_attempt))
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
