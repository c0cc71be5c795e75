//! In-memory character storage.
//!
//! Used by tests and by `STORAGE_BACKEND=memory`. Nothing survives a restart.

use async_trait::async_trait;
use berkana_domain::{Character, CharacterId, CharacterSummary};
use dashmap::DashMap;

use crate::infrastructure::ports::{CharacterListQuery, CharacterPage, CharacterRepo, RepoError};

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: DashMap<CharacterId, Character>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(summary: &CharacterSummary, term: &str) -> bool {
    let term = term.to_lowercase();
    summary.character_name.to_lowercase().contains(&term)
        || summary
            .player_name
            .as_deref()
            .is_some_and(|player| player.to_lowercase().contains(&term))
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters.insert(character.id(), character.clone());
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.characters.remove(&id);
        Ok(())
    }

    async fn list(&self, query: &CharacterListQuery) -> Result<CharacterPage, RepoError> {
        let mut matching: Vec<CharacterSummary> = self
            .characters
            .iter()
            .map(|entry| entry.value().summary())
            .filter(|summary| match query.search_term() {
                Some(term) => matches_search(summary, term),
                None => true,
            })
            .collect();

        matching.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });

        let total = matching.len() as u64;
        let characters = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(CharacterPage { characters, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berkana_domain::{CharacterName, CharacterProfile};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
    }

    fn character(name: &str, player: Option<&str>, at: DateTime<Utc>) -> Character {
        Character::new(CharacterName::new(name).unwrap(), at).with_profile(CharacterProfile {
            player_name: player.map(str::to_string),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn save_get_delete() {
        let repo = InMemoryCharacterRepo::new();
        let sheet = character("Ayla", None, base_time());

        repo.save(&sheet).await.unwrap();
        assert_eq!(repo.get(sheet.id()).await.unwrap(), Some(sheet.clone()));

        repo.delete(sheet.id()).await.unwrap();
        assert_eq!(repo.get(sheet.id()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_sorts_and_paginates() {
        let repo = InMemoryCharacterRepo::new();
        repo.save(&character("Ayla", Some("Bruna"), base_time()))
            .await
            .unwrap();
        repo.save(&character("Toren", Some("Ana Bru"), base_time() + Duration::seconds(5)))
            .await
            .unwrap();
        repo.save(&character("Mira", None, base_time() + Duration::seconds(10)))
            .await
            .unwrap();

        let all = repo.list(&CharacterListQuery::default()).await.unwrap();
        let names: Vec<_> = all.characters.iter().map(|c| c.character_name.as_str()).collect();
        assert_eq!(names, vec!["Mira", "Toren", "Ayla"]);

        let searched = repo
            .list(&CharacterListQuery {
                search: Some("BRU".into()),
                page: 1,
                limit: 1,
            })
            .await
            .unwrap();
        assert_eq!(searched.total, 2);
        assert_eq!(searched.characters.len(), 1);
        assert_eq!(searched.characters[0].character_name, "Toren");
    }
}
