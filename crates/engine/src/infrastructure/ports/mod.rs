//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (SQLite or in-memory)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;
pub mod types;

pub use error::RepoError;
pub use repos::*;
pub use testing::*;
pub use types::{CharacterListQuery, CharacterPage, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
