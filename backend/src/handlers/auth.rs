//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthSession, CurrentSession, SignInInput, SignUpInput};
use crate::services::AuthService;
use crate::AppState;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.store.clone(),
        &state.config.jwt,
        state.session_events.clone(),
    )
}

/// Sign-up endpoint handler
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpInput>,
) -> AppResult<(StatusCode, Json<AuthSession>)> {
    let session = auth_service(&state).sign_up(body).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Sign-in endpoint handler
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInInput>,
) -> AppResult<Json<AuthSession>> {
    let session = auth_service(&state).sign_in(body).await?;
    Ok(Json(session))
}

/// Sign-out endpoint handler
pub async fn sign_out(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<StatusCode> {
    auth_service(&state).sign_out(&current_user.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current session
pub async fn get_session(current_user: CurrentUser) -> Json<CurrentSession> {
    Json(current_user.0)
}
