use crate::auth::repo_types::{StoreError, User};
use sqlx::SqlitePool;

impl User {
    /// Insert a new user. A username or email collision surfaces as
    /// [`StoreError::DuplicateKey`], decided by the table's unique constraints.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> Result<User, StoreError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, full_name)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, password, full_name, bio
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::DuplicateKey),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(db: &SqlitePool, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, full_name, bio
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    #[cfg(test)]
    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, full_name, bio
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Overwrite the editable profile fields. Identity fields never change.
    pub async fn update_profile(
        db: &SqlitePool,
        id: i64,
        full_name: Option<&str>,
        bio: Option<&str>,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET full_name = ?, bio = ?
             WHERE id = ?
            RETURNING id, username, email, password, full_name, bio
            "#,
        )
        .bind(full_name)
        .bind(bio)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn create_assigns_id_and_finds_by_username() {
        let state = AppState::in_memory().await;
        let user = User::create(&state.db, "alice", "alice@example.com", "hash", Some("Alice"))
            .await
            .expect("create");
        assert!(user.id > 0);
        assert_eq!(user.full_name.as_deref(), Some("Alice"));
        assert_eq!(user.bio, None);

        let found = User::find_by_username(&state.db, "alice")
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(found.id, user.id);
        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.password_hash, "hash");

        assert!(User::find_by_username(&state.db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_original_kept() {
        let state = AppState::in_memory().await;
        let first = User::create(&state.db, "alice", "alice@example.com", "h1", None)
            .await
            .unwrap();

        let err = User::create(&state.db, "alice", "other@example.com", "h2", Some("Imposter"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));

        let kept = User::find_by_id(&state.db, first.id).await.unwrap().unwrap();
        assert_eq!(kept.email, "alice@example.com");
        assert_eq!(kept.password_hash, "h1");
        assert_eq!(kept.full_name, None);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let state = AppState::in_memory().await;
        User::create(&state.db, "alice", "same@example.com", "h", None)
            .await
            .unwrap();
        let err = User::create(&state.db, "bob", "same@example.com", "h", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));
        assert!(User::find_by_username(&state.db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_profile_round_trip() {
        let state = AppState::in_memory().await;
        let user = User::create(&state.db, "alice", "alice@example.com", "h", None)
            .await
            .unwrap();

        let updated = User::update_profile(&state.db, user.id, Some("Alice B"), Some("hi"))
            .await
            .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Alice B"));
        assert_eq!(updated.bio.as_deref(), Some("hi"));
        assert_eq!(updated.username, "alice");

        let read = User::find_by_id(&state.db, user.id).await.unwrap().unwrap();
        assert_eq!(read.full_name.as_deref(), Some("Alice B"));
        assert_eq!(read.bio.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn update_profile_unknown_id_is_not_found() {
        let state = AppState::in_memory().await;
        let err = User::update_profile(&state.db, 42, Some("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
