use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let refresh_token = cookies::refresh_token(&jar)
        .ok_or_else(|| ApiError::Unauthorized("refresh token cookie is missing".to_string()))?;

    state.credential_service.logout(&refresh_token).await;

    Ok((
        jar.add(state.cookies.clear_refresh_cookie()),
        StatusCode::NO_CONTENT,
    ))
}
