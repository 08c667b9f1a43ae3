use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Duration;
use tower_auth_metrics::TracingService;
use tower_auth_models::{
    validate_name, AuthError, CharactersResponse, CreateCharacterRequest, CreatedCharacter,
    HealthResponse, Platform, ReadinessResponse, RequestBase, SteamTokenQuery, TokenRequest,
    TokenResponse, User, TEST_TOKEN_TTL_HOURS,
};
use tracing::{error, instrument};

use crate::{ApiError, ApiJson, ApiQuery, AppState};

/// Logs and counts a failed request, then turns it into a response.
fn respond<T>(
    state: &AppState,
    route: &str,
    username: &str,
    result: Result<T, AuthError>,
) -> Result<Json<T>, ApiError> {
    match result {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            if e.http_status() >= 500 {
                error!(route = %route, error = %e, "Request failed");
            } else {
                TracingService::log_request_refused(route, username, &e);
            }
            state.metrics.record_request_error(e.http_status());
            Err(e.into())
        }
    }
}

fn issue(
    state: &AppState,
    username: &str,
    platform: Platform,
    ttl_hours: i64,
) -> Result<TokenResponse, AuthError> {
    let jwt = state.signer.issue(username, platform, Duration::hours(ttl_hours))?;
    state.metrics.record_token_issued(platform);
    TracingService::log_token_issued(username, platform, ttl_hours);
    Ok(TokenResponse { jwt })
}

/// Checks the request's token against its claimed identity and loads the player.
///
/// `route_platform` is set by routes that only serve one platform; it is
/// compared after the token checks and before the player lookup.
async fn authorize(
    state: &AppState,
    base: &RequestBase,
    route_platform: Option<Platform>,
) -> Result<User, AuthError> {
    let Some(claims) = state.signer.verify(&base.jwt) else {
        state.metrics.record_token_rejected();
        return Err(AuthError::InvalidToken);
    };

    if claims.username != base.username {
        return Err(AuthError::UsernameMismatch);
    }
    if claims.platform != base.platform {
        return Err(AuthError::PlatformMismatch);
    }
    if route_platform.is_some_and(|platform| platform != base.platform) {
        return Err(AuthError::PlatformMismatch);
    }

    state
        .store
        .get_user(&base.username, base.platform)
        .await?
        .ok_or(AuthError::UserNotRegistered)
}

#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn issue_token_test(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = validate_name("username", &request.username).and_then(|_| {
        if !state.settings.debug {
            return Err(AuthError::TestingDisabled);
        }
        issue(&state, &request.username, Platform::Test, TEST_TOKEN_TTL_HOURS)
    });

    respond(&state, "/token/test", &request.username, result)
}

#[instrument(skip(state, query), fields(username = %query.username))]
pub async fn issue_token_steam(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SteamTokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    // TODO: verify the player's Steam session ticket with the Steam Web API before issuing.
    let result = match state.store.get_active_user(&query.username, Platform::Steam).await {
        Ok(user) => issue(&state, &user.username, Platform::Steam, state.settings.token_expire_hours),
        Err(e) => Err(e),
    };

    respond(&state, "/token/steam", &query.username, result)
}

#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn request_characters(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RequestBase>,
) -> Result<Json<CharactersResponse>, ApiError> {
    let result = async {
        validate_name("username", &request.username)?;
        authorize(&state, &request, None).await?;
        let characters = state.store.list_characters(&request.username).await?;
        Ok::<_, AuthError>(CharactersResponse { characters })
    }
    .await;

    respond(&state, "/characters", &request.username, result)
}

async fn create_character(
    state: &AppState,
    platform: Platform,
    request: &CreateCharacterRequest,
) -> Result<CreatedCharacter, AuthError> {
    validate_name("username", &request.base.username)?;
    validate_name("character_name", &request.character_name)?;

    let user = authorize(state, &request.base, Some(platform)).await?;
    let created = state
        .store
        .create_character(&user, &request.character_name, request.race)
        .await?;

    state.metrics.record_character_created();
    TracingService::log_character_created(&user.username, &created.name);
    Ok(created)
}

#[instrument(skip(state, request), fields(username = %request.base.username))]
pub async fn create_character_test(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCharacterRequest>,
) -> Result<Json<CreatedCharacter>, ApiError> {
    let result = create_character(&state, Platform::Test, &request).await;
    respond(&state, "/character/create/test", &request.base.username, result)
}

#[instrument(skip(state, request), fields(username = %request.base.username))]
pub async fn create_character_steam(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCharacterRequest>,
) -> Result<Json<CreatedCharacter>, ApiError> {
    let result = create_character(&state, Platform::Steam, &request).await;
    respond(&state, "/character/create/steam", &request.base.username, result)
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[instrument(skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let (database, cache) = tokio::join!(state.store.ping(), state.cache.ping());

    if let Err(e) = &database {
        error!(error = %e, "Database not ready");
    }
    if let Err(e) = &cache {
        error!(error = %e, "Cache not ready");
    }

    let ready = database.is_ok() && cache.is_ok();
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(ReadinessResponse {
            status: if ready { "OK" } else { "UNAVAILABLE" }.to_string(),
            database: database.is_ok(),
            cache: cache.is_ok(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.get_prometheus_metrics() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
