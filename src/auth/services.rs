use tokio::sync::OnceCell;
use tracing::{debug, error};
use uuid::Uuid;

use crate::auth::{
    password::{hash_password_blocking, verify_password_blocking},
    repo::{AddUserError, CredentialStore},
    repo_types::User,
};

// Verified against when the name is unknown, so both rejection paths do the
// same amount of hashing work.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

async fn dummy_hash() -> anyhow::Result<&'static str> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password_blocking("trainerbook-dummy".into()))
        .await?;
    Ok(hash.as_str())
}

/// Hashes `password` and stores a new user. Returns the new id.
pub async fn add_user(
    store: &dyn CredentialStore,
    name: &str,
    password: &str,
    phone: Option<&str>,
) -> Result<Uuid, AddUserError> {
    let hash = hash_password_blocking(password.to_owned()).await?;
    let id = store.insert_user(name, &hash, phone).await?;
    debug!(user_id = %id, %name, "user stored");
    Ok(id)
}

/// Looks a user up by name and checks the password.
///
/// Unknown name and wrong password both yield `Ok(None)`.
pub async fn find_user(
    store: &dyn CredentialStore,
    name: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = store.find_by_name(name).await? else {
        let dummy = dummy_hash().await?.to_owned();
        verify_password_blocking(password.to_owned(), dummy).await?;
        return Ok(None);
    };

    match verify_password_blocking(password.to_owned(), user.password_hash.clone()).await {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => {
            // A corrupt stored hash cannot match anything.
            error!(error = %e, user_id = %user.id, "stored password hash unreadable");
            Ok(None)
        }
    }
}

pub async fn get_user_by_id(store: &dyn CredentialStore, id: Uuid) -> anyhow::Result<Option<User>> {
    store.find_by_id(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDb;

    #[tokio::test]
    async fn add_then_find_returns_same_id() {
        let db = MemoryDb::default();
        let id = add_user(&db, "somchai", "s3cret", Some("0812345678")).await.unwrap();
        let user = find_user(&db, "somchai", "s3cret").await.unwrap().expect("user");
        assert_eq!(user.id, id);
        assert_eq!(user.phone.as_deref(), Some("0812345678"));
        assert_eq!(user.role, "user");
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_name_both_none() {
        let db = MemoryDb::default();
        add_user(&db, "malee", "right", None).await.unwrap();
        assert!(find_user(&db, "malee", "wrong").await.unwrap().is_none());
        assert!(find_user(&db, "nobody", "right").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_name_checks_a_real_hash() {
        let hash = dummy_hash().await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!verify_password_blocking("guess".into(), hash.to_owned()).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let db = MemoryDb::default();
        add_user(&db, "dup", "a", None).await.unwrap();
        let err = add_user(&db, "dup", "b", None).await.unwrap_err();
        assert!(matches!(err, AddUserError::NameTaken));
    }

    #[tokio::test]
    async fn get_by_id_includes_role() {
        let db = MemoryDb::default();
        let id = add_user(&db, "boss", "pw", None).await.unwrap();
        db.set_role(id, "admin");
        let user = get_user_by_id(&db, id).await.unwrap().unwrap();
        assert!(user.is_admin());
        assert!(get_user_by_id(&db, Uuid::new_v4()).await.unwrap().is_none());
    }
}
