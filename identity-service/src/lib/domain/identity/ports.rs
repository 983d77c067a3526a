use async_trait::async_trait;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::events::DomainEvent;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RefreshTokenId;
use crate::domain::identity::models::RefreshTokenRecord;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::identity::errors::CredentialError;
use crate::identity::errors::EventNotifierError;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token pair.
    ///
    /// # Arguments
    /// * `command` - Validated nickname, email, password and optional session marker
    ///
    /// # Returns
    /// Access and refresh tokens for the new identity
    ///
    /// # Errors
    /// * `NicknameAlreadyExists` - Nickname is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` / `Token` / `DatabaseError` - Internal failure
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, CredentialError>;

    /// Authenticate by nickname or email and issue a new token pair.
    ///
    /// # Errors
    /// * `UserNotFound` - No identity matches the login string
    /// * `CredentialsMismatch` - Password does not match
    /// * `Password` / `Token` / `DatabaseError` - Internal failure
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, CredentialError>;

    /// Rotate a refresh token.
    ///
    /// The presented value stops being usable once this call succeeds.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token is unknown, already rotated, forged or expired
    /// * `Token` / `DatabaseError` - Internal failure
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, CredentialError>;

    /// Revoke a refresh token. Never fails from the caller's perspective.
    async fn logout(&self, refresh_token: &str);

    /// Delete refresh tokens not rotated within the refresh lifetime.
    ///
    /// # Returns
    /// Number of deleted records
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn purge_expired_refresh_tokens(&self) -> Result<u64, CredentialError>;
}

/// Persistence operations for identity records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `NicknameAlreadyExists` - Unique constraint on nickname violated
    /// * `EmailAlreadyExists` - Unique constraint on email violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, CredentialError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialError>;

    /// Retrieve user by exact (case-sensitive) nickname.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, CredentialError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialError>;
}

/// Persistence operations for refresh token records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Retrieve record by its token string.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, CredentialError>;

    /// Persist a new record.
    ///
    /// # Returns
    /// Identifier of the stored record
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed (including a duplicate token string)
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenId, CredentialError>;

    /// Atomically replace the token string of the record currently holding `old_token`.
    ///
    /// # Returns
    /// Updated record, or None when no record holds `old_token` anymore
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn replace(
        &self,
        old_token: &str,
        new_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, CredentialError>;

    /// Delete the record holding `token`.
    ///
    /// # Returns
    /// True if a record was deleted
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, token: &str) -> Result<bool, CredentialError>;

    /// Delete records last modified before `cutoff`.
    ///
    /// # Returns
    /// Number of deleted records
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_updated_before(&self, cutoff: DateTime<Utc>) -> Result<u64, CredentialError>;
}

/// Best-effort publication of domain events.
#[async_trait]
pub trait EventNotifier: Send + Sync + 'static {
    /// Publish `event.payload` to `event.destination`, single attempt.
    ///
    /// # Errors
    /// * `PublishFailed` - Broker rejected or failed to deliver the event
    /// * `Timeout` - Publishing timed out
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), EventNotifierError>;
}
