use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::SessionMarker;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;
use crate::identity::errors::PasswordPolicyError;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    let session = SessionMarker::from_optional(cookies::session_marker(&jar));

    let tokens = state
        .credential_service
        .login(body.try_into_command(session)?)
        .await?;

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

/// Login by nickname or email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    login: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Invalid login: must not be empty")]
    EmptyLogin,

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl LoginRequest {
    fn try_into_command(
        self,
        session: Option<SessionMarker>,
    ) -> Result<LoginCommand, ParseLoginRequestError> {
        if self.login.trim().is_empty() {
            return Err(ParseLoginRequestError::EmptyLogin);
        }
        let password = Password::new(self.password)?;
        Ok(LoginCommand::new(self.login, password, session))
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
