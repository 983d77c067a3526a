use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Nickname;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::UserRepository;
use crate::identity::errors::CredentialError;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    nickname: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CredentialError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            nickname: Nickname::new(row.nickname)
                .map_err(|e| CredentialError::DatabaseError(format!("stored nickname: {}", e)))?,
            email: EmailAddress::new(row.email)
                .map_err(|e| CredentialError::DatabaseError(format!("stored email: {}", e)))?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, sql: &str, value: &str) -> Result<Option<User>, CredentialError> {
        let row = sqlx::query_as::<_, UserRow>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CredentialError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, CredentialError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, nickname, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.0)
        .bind(user.nickname.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_nickname_key") {
                        return CredentialError::NicknameAlreadyExists(user.nickname.to_string());
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return CredentialError::EmailAlreadyExists(user.email.to_string());
                    }
                }
            }
            CredentialError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, nickname, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, CredentialError> {
        self.find_one(
            r#"
            SELECT id, nickname, email, password_hash, created_at
            FROM users
            WHERE nickname = $1
            "#,
            nickname,
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialError> {
        self.find_one(
            r#"
            SELECT id, nickname, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
            email,
        )
        .await
    }
}
