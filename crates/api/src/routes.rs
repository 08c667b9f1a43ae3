use axum::{
    routing::{get, post},
    Router,
};
use crate::{apply_middleware, handlers::*, AppState};

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Tokens
        .route("/token/test", post(issue_token_test))
        .route("/token/steam", post(issue_token_steam))

        // Characters
        .route("/characters", post(request_characters))
        .route("/character/create/test", post(create_character_test))
        .route("/character/create/steam", post(create_character_steam))

        // Health and metrics
        .route("/healthcheck", get(healthcheck))
        .route("/readiness", get(readiness))
        .route("/metrics", get(metrics))
}

pub fn build_router(state: AppState) -> Router {
    apply_middleware(create_router().with_state(state))
}
