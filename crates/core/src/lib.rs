//! Domain logic for the tournament service.
//!
//! This crate has no IO: it holds the error type, shared id aliases,
//! scheduling and roster rules, random team partitioning, and the bracket
//! engine. Both the repository layer and the HTTP layer build on it.

pub mod bracket;
pub mod error;
pub mod random_teams;
pub mod roles;
pub mod roster;
pub mod schedule;
pub mod types;
