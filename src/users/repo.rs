use sqlx::{Executor, SqlitePool};
use tracing::{debug, instrument};

use crate::error::{StoreError, StoreResult};
use crate::skills::repo as skills;
use crate::users::repo_types::{User, UserProfileRow, UserRow};

/// Data access for `users` and their `skills` rows.
#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the `users` table and the trigger keeping `updated_at` current.
    pub async fn ensure_user_table(&self) -> StoreResult<()> {
        self.db
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    username   VARCHAR(50) NOT NULL,
                    email      VARCHAR(50) NOT NULL,
                    password   VARCHAR(255) NOT NULL,
                    bio        VARCHAR(255),
                    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
            )
            .await?;

        self.db
            .execute(
                r#"
                CREATE TRIGGER IF NOT EXISTS users_touch_updated_at
                AFTER UPDATE ON users
                FOR EACH ROW
                BEGIN
                    UPDATE users SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
                END
                "#,
            )
            .await?;
        Ok(())
    }

    pub async fn ensure_skill_table(&self) -> StoreResult<()> {
        skills::create_table(&self.db).await
    }

    /// Both tables, users first since skills reference them.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        self.ensure_user_table().await?;
        self.ensure_skill_table().await
    }

    /// Insert username, email and password. Bio and skills on `user` are ignored.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn insert_user(&self, user: &User) -> StoreResult<i64> {
        let id = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .execute(&self.db)
            .await?
            .last_insert_rowid();

        debug!(user_id = id, "user inserted");
        Ok(id)
    }

    /// Exact-match lookup. When several rows share the name, the oldest wins.
    pub async fn find_user_by_username(&self, username: &str) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password, bio, created_at, updated_at
              FROM users
             WHERE username = ?
             ORDER BY id ASC
             LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.with_skills(row.into()).await
    }

    /// Exact-match lookup by email. The password column is not read, so the
    /// returned user carries an empty `password`.
    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, username, email, bio, created_at, updated_at
              FROM users
             WHERE email = ?
             ORDER BY id ASC
             LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.with_skills(row.into()).await
    }

    async fn with_skills(&self, mut user: User) -> StoreResult<User> {
        user.skills = skills::list_by_user(&self.db, user.id).await?;
        Ok(user)
    }

    /// Update username, email and bio, then replace the whole skill set.
    ///
    /// Runs as one transaction: a failure at any step rolls everything back,
    /// and concurrent updates of the same user never leave a mixed skill set.
    #[instrument(skip(self, user), fields(user_id = user.id, skills = user.skills.len()))]
    pub async fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE users SET username = ?, email = ?, bio = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.bio)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        skills::delete_all(&mut *tx, user.id).await?;
        for skill in &user.skills {
            skills::insert(&mut *tx, user.id, skill).await?;
        }

        tx.commit().await?;
        debug!("user updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn insert_skill(&self, user_id: i64, skill: &str) -> StoreResult<()> {
        skills::insert(&self.db, user_id, skill).await
    }

    /// Remove a skill. Absent skills are not an error.
    #[instrument(skip(self))]
    pub async fn delete_skill(&self, user_id: i64, skill: &str) -> StoreResult<()> {
        let removed = skills::delete(&self.db, user_id, skill).await?;
        debug!(removed, "skill deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_all_skills(&self, user_id: i64) -> StoreResult<()> {
        let removed = skills::delete_all(&self.db, user_id).await?;
        debug!(removed, "skills cleared");
        Ok(())
    }

    pub async fn get_skills_by_user_id(&self, user_id: i64) -> StoreResult<Vec<String>> {
        skills::list_by_user(&self.db, user_id).await
    }
}
