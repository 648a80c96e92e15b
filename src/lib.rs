//! User-profile data access over SQLite: `users` and their `skills`.

pub mod config;
pub mod db;
pub mod error;
pub mod skills;
pub mod state;
pub mod users;

pub use error::{StoreError, StoreResult};
pub use users::{User, UserStore};
