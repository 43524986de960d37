//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PLAYER: &str = "player";

/// Role id assigned to self-registered accounts.
pub const PLAYER_ROLE_ID: i64 = 2;
