use sqlx::{Executor, Sqlite};

use crate::error::StoreResult;

/// Create the `skills` table. Rows cascade away with their owning user.
pub async fn create_table<'c, E>(db: E) -> StoreResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS skills (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            skill   VARCHAR(100) NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    Ok(())
}

pub async fn insert<'c, E>(db: E, user_id: i64, skill: &str) -> StoreResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query("INSERT INTO skills (user_id, skill) VALUES (?, ?)")
        .bind(user_id)
        .bind(skill)
        .execute(db)
        .await?;
    Ok(())
}

/// Delete every row matching `(user_id, skill)`. Returns the number removed.
pub async fn delete<'c, E>(db: E, user_id: i64, skill: &str) -> StoreResult<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let done = sqlx::query("DELETE FROM skills WHERE user_id = ? AND skill = ?")
        .bind(user_id)
        .bind(skill)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

pub async fn delete_all<'c, E>(db: E, user_id: i64) -> StoreResult<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let done = sqlx::query("DELETE FROM skills WHERE user_id = ?")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

/// Skill labels of a user in insertion order. Unknown users yield an empty list.
pub async fn list_by_user<'c, E>(db: E, user_id: i64) -> StoreResult<Vec<String>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let skills = sqlx::query_scalar::<_, String>(
        r#"
        SELECT skill
          FROM skills
         WHERE user_id = ?
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(skills)
}
