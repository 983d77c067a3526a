use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Nickname validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NicknameError {
    #[error("Nickname must not be empty")]
    Empty,

    #[error("Nickname too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Nickname must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for event dispatch operations
#[derive(Debug, Clone, Error)]
pub enum EventNotifierError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),

    #[error("Event dispatch timeout: {0}")]
    Timeout(String),
}

/// Closed set of error kinds a presentation layer chooses responses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input that cannot be honored: unknown login, wrong password, taken nickname or email.
    BadRequest,
    /// Refresh token unknown, already rotated, forged or expired.
    Unauthorized,
    /// Hashing, signing or storage failure not attributable to the caller.
    Internal,
}

/// Top-level error for all credential operations
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Nickname already exists: {0}")]
    NicknameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("user not found")]
    UserNotFound,

    #[error("login or password do not match")]
    CredentialsMismatch,

    #[error("refresh token is invalid or expired")]
    InvalidRefreshToken,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenIssuerError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl CredentialError {
    /// Classify the error for the presentation layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CredentialError::NicknameAlreadyExists(_)
            | CredentialError::EmailAlreadyExists(_)
            | CredentialError::UserNotFound
            | CredentialError::CredentialsMismatch => ErrorKind::BadRequest,
            CredentialError::InvalidRefreshToken => ErrorKind::Unauthorized,
            CredentialError::Password(_)
            | CredentialError::Token(_)
            | CredentialError::DatabaseError(_) => ErrorKind::Internal,
        }
    }

    /// True for duplicate nickname or email.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            CredentialError::NicknameAlreadyExists(_) | CredentialError::EmailAlreadyExists(_)
        )
    }
}
