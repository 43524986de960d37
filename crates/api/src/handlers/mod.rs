//! Request handlers.
//!
//! Each submodule serves one resource. Handlers validate input with the
//! rules in `tourney_core`, delegate storage to the repositories in
//! `tourney_db`, and map errors via [`AppError`](crate::error::AppError).
//! Writes that depend on a tournament's current state run in a transaction
//! holding that tournament's row lock.

pub mod auth;
pub mod bracket;
pub mod entries;
pub mod matches;
pub mod random_entries;
pub mod teams;
pub mod tournaments;
