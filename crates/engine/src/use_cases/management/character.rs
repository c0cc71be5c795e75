//! Character CRUD operations.

use std::sync::Arc;

use berkana_domain::{Character, CharacterId, CharacterName, CharacterProfile, CharacterUpdate};

use crate::infrastructure::ports::{
    CharacterListQuery, CharacterPage, CharacterRepo, ClockPort, MAX_PAGE_LIMIT,
};

use super::ManagementError;

/// Input for creating a character. Everything but the name is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: CharacterName,
    pub profile: CharacterProfile,
    pub notes: Option<String>,
}

pub struct CharacterCrud {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterCrud {
    pub fn new(repo: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn list(&self, query: CharacterListQuery) -> Result<CharacterPage, ManagementError> {
        if query.page == 0 {
            return Err(ManagementError::InvalidInput(
                "page must be at least 1".to_string(),
            ));
        }
        if query.limit == 0 || query.limit > MAX_PAGE_LIMIT {
            return Err(ManagementError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        Ok(self.repo.list(&query).await?)
    }

    pub async fn get(&self, character_id: CharacterId) -> Result<Character, ManagementError> {
        self.repo
            .get(character_id)
            .await?
            .ok_or(ManagementError::NotFound(character_id))
    }

    pub async fn create(&self, input: NewCharacter) -> Result<Character, ManagementError> {
        let mut character =
            Character::new(input.name, self.clock.now()).with_profile(input.profile);
        if let Some(notes) = input.notes.filter(|notes| !notes.trim().is_empty()) {
            character = character.with_notes(notes);
        }

        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %character.id(),
            name = %character.name(),
            "Character created"
        );
        Ok(character)
    }

    pub async fn update(
        &self,
        character_id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<Character, ManagementError> {
        let mut character = self.get(character_id).await?;

        character.apply_update(update, self.clock.now())?;
        self.repo.save(&character).await?;

        tracing::info!(character_id = %character_id, "Character updated");
        Ok(character)
    }

    pub async fn delete(&self, character_id: CharacterId) -> Result<(), ManagementError> {
        // Missing ids report not found rather than a silent no-op.
        self.get(character_id).await?;
        self.repo.delete(character_id).await?;

        tracing::info!(character_id = %character_id, "Character deleted");
        Ok(())
    }
}
