//! Management use cases for CRUD-style operations.
//!
//! These use cases keep HTTP handlers thin while coordinating the repository
//! and the clock.

mod character;

pub use character::{CharacterCrud, NewCharacter};

use berkana_domain::{CharacterId, DomainError};

use crate::infrastructure::ports::RepoError;

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub character: CharacterCrud,
}

impl ManagementUseCases {
    pub fn new(character: CharacterCrud) -> Self {
        Self { character }
    }
}
