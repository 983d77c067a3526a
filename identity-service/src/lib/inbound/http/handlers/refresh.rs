use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    let refresh_token = cookies::refresh_token(&jar)
        .ok_or_else(|| ApiError::Unauthorized("refresh token cookie is missing".to_string()))?;

    let tokens = state.credential_service.refresh(&refresh_token).await?;

    let jar = jar.add(state.cookies.refresh_cookie(&tokens.refresh_token));
    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            TokenResponseData {
                access: tokens.access_token,
            },
        ),
    ))
}
