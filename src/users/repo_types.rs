use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// A registered profile together with its skill labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String, // stored as given, never emitted
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl User {
    /// A not-yet-stored user, ready for `insert_user`.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }
}

/// Full `users` row, as read by the username lookup.
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// `users` row without the password column, as read by the email lookup.
#[derive(Debug, FromRow)]
pub(crate) struct UserProfileRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password: r.password,
            bio: r.bio,
            skills: Vec::new(),
            created_at: Some(r.created_at),
            updated_at: Some(r.updated_at),
        }
    }
}

impl From<UserProfileRow> for User {
    fn from(r: UserProfileRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password: String::new(),
            bio: r.bio,
            skills: Vec::new(),
            created_at: Some(r.created_at),
            updated_at: Some(r.updated_at),
        }
    }
}
