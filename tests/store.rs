use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use profile_store::{config::AppConfig, state::AppState, User};
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;

fn file_config(path: &Path) -> AppConfig {
    AppConfig {
        database_url: format!("sqlite://{}", path.display()),
        max_connections: 4,
    }
}

async fn file_state(td: &TempDir) -> Result<AppState> {
    let config = Arc::new(file_config(&td.path().join("profiles.db")));
    let state = AppState::from_config(config).await?;
    state.users.ensure_schema().await?;
    Ok(state)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// The database file and both tables exist after bootstrap.
#[tokio::test]
async fn bootstrap_creates_file_and_tables() -> Result<()> {
    let td = TempDir::new()?;
    let state = file_state(&td).await?;

    assert!(td.path().join("profiles.db").exists());

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users','skills')",
    )
    .fetch_all(&state.db)
    .await?;
    for expected in ["users", "skills"] {
        assert!(names.contains(&expected.to_string()), "missing table {}", expected);
    }
    Ok(())
}

// An inserted user is committed by the time its id is returned.
#[tokio::test]
async fn inserted_user_is_visible_to_other_connections() -> Result<()> {
    let td = TempDir::new()?;
    let path = td.path().join("profiles.db");
    let state = file_state(&td).await?;
    assert!(state.config.max_connections > 1);

    let mut other = SqliteConnection::connect(&file_config(&path).database_url).await?;
    for round in 0..100 {
        let username = format!("user{round}");
        let id = state
            .users
            .insert_user(&User::new(username.clone(), format!("{username}@example.com"), "pw"))
            .await?;

        let seen: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ? AND username = ?")
            .bind(id)
            .bind(&username)
            .fetch_one(&mut other)
            .await?;
        assert_eq!(seen, 1, "user {} not visible after insert", username);
    }
    other.close().await?;
    Ok(())
}

// Data survives reopening the same file.
#[tokio::test]
async fn users_persist_across_pools() -> Result<()> {
    let td = TempDir::new()?;
    let id = {
        let state = file_state(&td).await?;
        let id = state
            .users
            .insert_user(&User::new("hopper", "grace@example.com", "cobol"))
            .await?;
        let mut user = state.users.find_user_by_username("hopper").await?;
        user.skills = owned(&["compilers"]);
        state.users.update_user(&user).await?;
        state.db.close().await;
        id
    };

    let state = file_state(&td).await?;
    let found = state.users.find_user_by_email("grace@example.com").await?;
    assert_eq!(found.id, id);
    assert_eq!(found.skills, owned(&["compilers"]));
    Ok(())
}

// Concurrent updates never leave a mix of both skill sets.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_updates_keep_one_skill_set() -> Result<()> {
    let td = TempDir::new()?;
    let state = file_state(&td).await?;
    let id = state
        .users
        .insert_user(&User::new("race", "race@example.com", "pw"))
        .await?;
    let base = state.users.find_user_by_username("race").await?;
    assert_eq!(base.id, id);

    let left = User { skills: owned(&["a1", "a2", "a3", "a4"]), ..base.clone() };
    let right = User { skills: owned(&["b1", "b2", "b3"]), ..base.clone() };

    for _ in 0..5 {
        let (l, r) = tokio::join!(
            state.users.update_user(&left),
            state.users.update_user(&right)
        );
        l?;
        r?;

        let got: HashSet<String> = state
            .users
            .get_skills_by_user_id(id)
            .await?
            .into_iter()
            .collect();
        let a: HashSet<String> = left.skills.iter().cloned().collect();
        let b: HashSet<String> = right.skills.iter().cloned().collect();
        assert!(got == a || got == b, "torn skill set: {:?}", got);
    }
    Ok(())
}
