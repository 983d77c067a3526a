use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::RefreshTokenId;
use crate::domain::identity::models::RefreshTokenRecord;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::RefreshTokenRepository;
use crate::identity::errors::CredentialError;

#[derive(Debug, FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    updated_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshTokenRecord {
            id: RefreshTokenId(row.id),
            user_id: UserId(row.user_id),
            token: row.token,
            updated_at: row.updated_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> CredentialError {
    CredentialError::DatabaseError(e.to_string())
}

pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, CredentialError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT id, user_id, token, updated_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenId, CredentialError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id.0)
        .bind(record.user_id.0)
        .bind(&record.token)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(record.id)
    }

    async fn replace(
        &self,
        old_token: &str,
        new_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, CredentialError> {
        // Single statement: of two concurrent rotations of the same value only one matches.
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            UPDATE refresh_tokens
            SET token = $2, updated_at = now()
            WHERE token = $1
            RETURNING id, user_id, token, updated_at
            "#,
        )
        .bind(old_token)
        .bind(new_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn delete(&self, token: &str) -> Result<bool, CredentialError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_updated_before(&self, cutoff: DateTime<Utc>) -> Result<u64, CredentialError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE updated_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
