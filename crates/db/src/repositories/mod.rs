//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-owned transaction take `&mut sqlx::Transaction` instead.

pub mod match_repo;
pub mod random_entry_repo;
pub mod session_repo;
pub mod team_entry_repo;
pub mod team_repo;
pub mod tournament_repo;
pub mod user_repo;

pub use match_repo::MatchRepo;
pub use random_entry_repo::RandomEntryRepo;
pub use session_repo::SessionRepo;
pub use team_entry_repo::TeamEntryRepo;
pub use team_repo::TeamRepo;
pub use tournament_repo::TournamentRepo;
pub use user_repo::UserRepo;
