//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where rows are editable

pub mod matches;
pub mod random_entry;
pub mod status;
pub mod team;
pub mod team_entry;
pub mod tournament;
pub mod user;
