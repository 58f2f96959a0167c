//! PostgreSQL implementation of UserRepository
//!
//! Each user is one JSONB document keyed by the platform user id.

use async_trait::async_trait;
use sqlx::PgPool;

use parlor::{ChatMessage, DomainError, User, UserRepository};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError> {
        let document = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::load(user_id, e))?;

        // Decoding repairs out-of-range character indexes
        document
            .map(serde_json::from_value::<User>)
            .transpose()
            .map_err(|e| DomainError::load(user_id, e))
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let document = serde_json::to_value(user).map_err(|e| DomainError::persist(user.id, e))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, document)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET document = EXCLUDED.document, updated_at = NOW()
            "#,
        )
        .bind(user.id)
        .bind(&document)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persist(user.id, e))?;

        tracing::debug!(user_id = %user.id, "User document saved");
        Ok(())
    }

    async fn append_chat_message(
        &self,
        user_id: i64,
        character_index: usize,
        message: &ChatMessage,
    ) -> Result<(), DomainError> {
        let message = serde_json::to_value(message).map_err(|e| DomainError::persist(user_id, e))?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET document = jsonb_set(
                    document,
                    ARRAY['characters', $2, 'chat'],
                    (document #> ARRAY['characters', $2, 'chat']) || jsonb_build_array($3::jsonb)
                ),
                updated_at = NOW()
            WHERE id = $1
              AND jsonb_typeof(document #> ARRAY['characters', $2, 'chat']) = 'array'
            "#,
        )
        .bind(user_id)
        .bind(character_index.to_string())
        .bind(&message)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persist(user_id, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::persist(
                user_id,
                format!("no chat at character index {character_index}"),
            ));
        }
        Ok(())
    }
}
