use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenPair;
use chrono::Utc;
use serde_json::json;

use crate::domain::identity::events::SessionMigrationEvent;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RefreshTokenRecord;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::SessionMarker;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::identity::errors::CredentialError;
use crate::identity::ports::CredentialServicePort;
use crate::identity::ports::EventNotifier;
use crate::identity::ports::RefreshTokenRepository;
use crate::identity::ports::UserRepository;

/// Runtime policy of the credential service, read once at startup.
#[derive(Debug, Clone)]
pub struct CredentialSettings {
    /// Topic receiving session migration events
    pub session_migration_destination: String,
    /// Upper bound for a single event dispatch attempt
    pub dispatch_timeout: Duration,
    /// Answer `InvalidRefreshToken` when the token owner no longer exists,
    /// instead of issuing tokens for an empty subject
    pub reject_orphaned_refresh: bool,
}

/// Domain service implementation for credential operations.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<UR, TR, EN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    EN: EventNotifier,
{
    users: Arc<UR>,
    refresh_tokens: Arc<TR>,
    event_notifier: Arc<EN>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    settings: CredentialSettings,
}

impl<UR, TR, EN> CredentialService<UR, TR, EN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    EN: EventNotifier,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Identity persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `event_notifier` - Domain event publishing implementation
    /// * `password_hasher` - Configured password hasher
    /// * `token_issuer` - Configured token issuer
    /// * `settings` - Runtime policy
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<TR>,
        event_notifier: Arc<EN>,
        password_hasher: PasswordHasher,
        token_issuer: Arc<TokenIssuer>,
        settings: CredentialSettings,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            event_notifier,
            password_hasher,
            token_issuer,
            settings,
        }
    }

    fn issue_tokens(&self, subject: &str, nickname: &str) -> Result<TokenPair, CredentialError> {
        Ok(self
            .token_issuer
            .issue_pair(subject, &[("nickname", json!(nickname))])?)
    }

    /// Issue a token pair for `user` and store its refresh token as a new record.
    async fn start_session(&self, user: &User) -> Result<TokenPair, CredentialError> {
        let tokens = self.issue_tokens(&user.id.to_string(), user.nickname.as_str())?;

        self.refresh_tokens
            .create(RefreshTokenRecord::new(user.id, tokens.refresh_token.clone()))
            .await?;

        Ok(tokens)
    }

    /// Best-effort: failures are logged and swallowed.
    async fn migrate_session(&self, session: Option<SessionMarker>, user_id: &UserId) {
        let Some(session) = session else {
            return;
        };

        let event = match SessionMigrationEvent::new(&session, user_id)
            .into_domain_event(&self.settings.session_migration_destination)
        {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Session results not migrated");
                return;
            }
        };

        match tokio::time::timeout(
            self.settings.dispatch_timeout,
            self.event_notifier.dispatch(&event),
        )
        .await
        {
            Ok(Ok(())) => {
                tracing::debug!(user_id = %user_id, "Session migration event dispatched")
            }
            Ok(Err(e)) => {
                tracing::warn!(user_id = %user_id, error = %e, "Session results not migrated")
            }
            Err(_) => tracing::warn!(
                user_id = %user_id,
                timeout_ms = self.settings.dispatch_timeout.as_millis() as u64,
                "Session results not migrated: dispatch timed out"
            ),
        }
    }
}

#[async_trait]
impl<UR, TR, EN> CredentialServicePort for CredentialService<UR, TR, EN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    EN: EventNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, CredentialError> {
        let password_hash = self.password_hasher.hash(command.password.expose())?;

        // Advisory checks; the unique constraints in storage are authoritative.
        if self
            .users
            .find_by_nickname(command.nickname.as_str())
            .await?
            .is_some()
        {
            return Err(CredentialError::NicknameAlreadyExists(
                command.nickname.to_string(),
            ));
        }
        if self
            .users
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(CredentialError::EmailAlreadyExists(
                command.email.to_string(),
            ));
        }

        let user = self
            .users
            .create(User {
                id: UserId::new(),
                nickname: command.nickname,
                email: command.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        let tokens = self.start_session(&user).await?;
        self.migrate_session(command.session, &user.id).await;

        tracing::info!(user_id = %user.id, "Identity registered");
        Ok(tokens)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, CredentialError> {
        let user = match self.users.find_by_nickname(&command.login).await? {
            Some(user) => user,
            None => self
                .users
                .find_by_email(&command.login)
                .await?
                .ok_or(CredentialError::UserNotFound)?,
        };

        let matches = self
            .password_hasher
            .verify(command.password.expose(), &user.password_hash)
            .unwrap_or_else(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Stored password digest is unreadable");
                false
            });
        if !matches {
            return Err(CredentialError::CredentialsMismatch);
        }

        let tokens = self.start_session(&user).await?;
        self.migrate_session(command.session, &user.id).await;

        tracing::info!(user_id = %user.id, "Identity logged in");
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, CredentialError> {
        self.token_issuer.verify(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            CredentialError::InvalidRefreshToken
        })?;

        let record = self
            .refresh_tokens
            .find(refresh_token)
            .await?
            .ok_or(CredentialError::InvalidRefreshToken)?;

        let tokens = match self.users.find_by_id(&record.user_id).await? {
            Some(user) => self.issue_tokens(&user.id.to_string(), user.nickname.as_str())?,
            None if self.settings.reject_orphaned_refresh => {
                tracing::warn!(user_id = %record.user_id, "Refresh token owner no longer exists");
                return Err(CredentialError::InvalidRefreshToken);
            }
            None => {
                tracing::warn!(
                    user_id = %record.user_id,
                    "Refresh token owner no longer exists, issuing tokens for empty subject"
                );
                self.issue_tokens("", "")?
            }
        };

        // Keyed by the old value: a concurrent rotation that already replaced it leaves nothing to match.
        let rotated = self
            .refresh_tokens
            .replace(refresh_token, &tokens.refresh_token)
            .await?;
        if rotated.is_none() {
            tracing::warn!(user_id = %record.user_id, "Refresh token was rotated concurrently");
            return Err(CredentialError::InvalidRefreshToken);
        }

        tracing::debug!(user_id = %record.user_id, "Refresh token rotated");
        Ok(tokens)
    }

    async fn logout(&self, refresh_token: &str) {
        match self.refresh_tokens.delete(refresh_token).await {
            Ok(true) => tracing::debug!("Refresh token revoked"),
            Ok(false) => tracing::debug!("Logout with unknown refresh token"),
            Err(e) => tracing::warn!(error = %e, "Refresh token not deleted on logout"),
        }
    }

    async fn purge_expired_refresh_tokens(&self) -> Result<u64, CredentialError> {
        let cutoff = Utc::now() - self.token_issuer.refresh_lifetime();
        self.refresh_tokens.delete_updated_before(cutoff).await
    }
}
