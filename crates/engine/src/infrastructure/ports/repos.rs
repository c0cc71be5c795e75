//! Repository port traits for database access.

use async_trait::async_trait;
use berkana_domain::{Character, CharacterId};

use super::error::RepoError;
use super::types::{CharacterListQuery, CharacterPage};

// =============================================================================
// Character Storage
// =============================================================================

/// Read/write access to stored character sheets.
///
/// `save` is an upsert; concurrent writers to the same id resolve as last
/// write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list(&self, query: &CharacterListQuery) -> Result<CharacterPage, RepoError>;
}
