//! Authentication middleware
//!
//! Validates the bearer token against its stored session and exposes the
//! signed-in actor to handlers. There are no roles: any live session may call
//! every protected endpoint.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::AppError;
use crate::services::auth::{AuthService, CurrentSession};
use crate::AppState;

/// Authentication middleware that resolves the bearer token to a live session
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        AppError::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;

    let auth_service = AuthService::new(
        state.store.clone(),
        &state.config.jwt,
        state.session_events.clone(),
    );
    let session = auth_service.get_session(bearer.token()).await?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated session
#[derive(Clone, Debug)]
pub struct CurrentUser(pub CurrentSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
