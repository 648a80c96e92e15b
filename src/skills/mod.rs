//! Row-level statements on the `skills` table.
//!
//! Every function takes any SQLite executor, so the same statement runs
//! against the pool or inside a transaction (`&mut *tx`).

pub mod repo;
