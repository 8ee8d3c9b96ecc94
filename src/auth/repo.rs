use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

#[derive(Debug, thiserror::Error)]
pub enum AddUserError {
    #[error("name already taken")]
    NameTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence for user records. Takes already-hashed passwords.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert_user(
        &self,
        name: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<Uuid, AddUserError>;
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_user(
        &self,
        name: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<Uuid, AddUserError> {
        let res = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, password_hash, phone)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .bind(phone)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AddUserError::NameTaken),
            Err(e) => Err(AddUserError::Other(anyhow::Error::new(e).context("insert user"))),
        }
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, phone, role
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, password_hash, phone, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
