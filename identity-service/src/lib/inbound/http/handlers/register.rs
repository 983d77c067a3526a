use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Nickname;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::SessionMarker;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;
use crate::identity::errors::EmailError;
use crate::identity::errors::NicknameError;
use crate::identity::errors::PasswordPolicyError;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    let session = SessionMarker::from_optional(cookies::session_marker(&jar));

    let tokens = state
        .credential_service
        .register(body.try_into_command(session)?)
        .await?;

    let jar = jar.add(state.cookies.refresh_cookie(&tokens.refresh_token));
    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::CREATED,
            TokenResponseData {
                access: tokens.access_token,
            },
        ),
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    nickname: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid nickname: {0}")]
    Nickname(#[from] NicknameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl RegisterRequest {
    fn try_into_command(
        self,
        session: Option<SessionMarker>,
    ) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let nickname = Nickname::new(self.nickname)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(RegisterCommand::new(nickname, email, password, session))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
