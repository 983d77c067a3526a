use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::EmailError;
use crate::identity::errors::NicknameError;
use crate::identity::errors::PasswordPolicyError;
use crate::identity::errors::UserIdError;

/// Identity record.
///
/// Created on registration and never mutated by this service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub nickname: Nickname,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Nickname value type
///
/// Case-sensitive as stored. Must be non-empty, at most 64 characters and
/// free of whitespace and control characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid nickname.
    ///
    /// # Errors
    /// * `Empty` - Nickname is empty
    /// * `TooLong` - Nickname longer than 64 characters
    /// * `InvalidCharacters` - Contains whitespace or control characters
    pub fn new(nickname: String) -> Result<Self, NicknameError> {
        let length = nickname.chars().count();
        if length == 0 {
            return Err(NicknameError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(NicknameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if nickname
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(NicknameError::InvalidCharacters);
        }
        Ok(Self(nickname))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted from a caller.
///
/// Never printed: `Debug` redacts the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Opaque marker of pre-authentication activity (guest session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMarker(String);

impl SessionMarker {
    /// Build a marker from an optional raw value; empty values yield `None`.
    pub fn from_optional(raw: Option<String>) -> Option<Self> {
        raw.filter(|s| !s.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Refresh token record unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

impl RefreshTokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RefreshTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored refresh token.
///
/// `user_id` references the owning identity without owning it; `updated_at`
/// changes on every rotation and drives expiry sweeping.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token: String,
    pub updated_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Create a fresh record for a newly issued refresh token.
    pub fn new(user_id: UserId, token: String) -> Self {
        Self {
            id: RefreshTokenId::new(),
            user_id,
            token,
            updated_at: Utc::now(),
        }
    }
}

/// Command to register a new identity
#[derive(Debug)]
pub struct RegisterCommand {
    pub nickname: Nickname,
    pub email: EmailAddress,
    pub password: Password,
    pub session: Option<SessionMarker>,
}

impl RegisterCommand {
    pub fn new(
        nickname: Nickname,
        email: EmailAddress,
        password: Password,
        session: Option<SessionMarker>,
    ) -> Self {
        Self {
            nickname,
            email,
            password,
            session,
        }
    }
}

/// Command to log in with a nickname or an email
#[derive(Debug)]
pub struct LoginCommand {
    pub login: String,
    pub password: Password,
    pub session: Option<SessionMarker>,
}

impl LoginCommand {
    pub fn new(login: String, password: Password, session: Option<SessionMarker>) -> Self {
        Self {
            login,
            password,
            session,
        }
    }
}
