//! SQLite-backed character storage.
//!
//! One row per character: the columns needed for listing and searching, plus
//! the full sheet as a JSON document.
//!
//! SQLite's `lower()` only folds ASCII, so search runs against lowercase copies
//! of the names computed in Rust on save.

use async_trait::async_trait;
use berkana_domain::{Character, CharacterId, CharacterSummary, Level};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{CharacterListQuery, CharacterPage, CharacterRepo, RepoError};

const SEARCH_FILTER: &str = r#"
    (?1 IS NULL
        OR instr(search_name, ?1) > 0
        OR instr(search_player, ?1) > 0)
"#;

/// SQLite implementation of [`CharacterRepo`].
pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    /// Open (creating if needed) the database at `db_path` and ensure the schema.
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY NOT NULL,
                character_name TEXT NOT NULL,
                player_name TEXT,
                class TEXT,
                race TEXT,
                search_name TEXT NOT NULL,
                search_player TEXT NOT NULL,
                level INTEGER NOT NULL,
                data_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("migrate", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_characters_updated_at ON characters (updated_at DESC)",
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("migrate", e))?;

        Ok(Self { pool })
    }
}

/// Fixed-width UTC timestamps so text order matches time order.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

fn column<'r, T>(row: &'r SqliteRow, name: &'static str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::database("decode", format!("{}: {}", name, e)))
}

fn row_to_summary(row: &SqliteRow) -> Result<CharacterSummary, RepoError> {
    let id: String = column(row, "id")?;
    let level: i64 = column(row, "level")?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    let level = u8::try_from(level)
        .map_err(RepoError::serialization)
        .and_then(|value| Level::new(value).map_err(RepoError::serialization))?;

    Ok(CharacterSummary {
        id: id.parse::<CharacterId>().map_err(RepoError::serialization)?,
        player_name: column(row, "player_name")?,
        character_name: column(row, "character_name")?,
        class: column(row, "class")?,
        race: column(row, "race")?,
        level,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT data_json FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_character", e))?;

        match row {
            Some(row) => {
                let json: String = column(&row, "data_json")?;
                let character =
                    serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(character))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let json = serde_json::to_string(character).map_err(RepoError::serialization)?;
        let profile = character.profile();

        sqlx::query(
            r#"
            INSERT INTO characters (
                id, character_name, player_name, class, race,
                search_name, search_player, level,
                data_json, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                character_name = excluded.character_name,
                player_name = excluded.player_name,
                class = excluded.class,
                race = excluded.race,
                search_name = excluded.search_name,
                search_player = excluded.search_player,
                level = excluded.level,
                data_json = excluded.data_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(character.id().to_string())
        .bind(character.name().as_str())
        .bind(profile.player_name.as_deref())
        .bind(profile.class.as_deref())
        .bind(profile.race.as_deref())
        .bind(character.name().as_str().to_lowercase())
        .bind(
            profile
                .player_name
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default(),
        )
        .bind(i64::from(character.level().value()))
        .bind(json)
        .bind(format_timestamp(character.created_at()))
        .bind(format_timestamp(character.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_character", e))?;

        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;
        Ok(())
    }

    async fn list(&self, query: &CharacterListQuery) -> Result<CharacterPage, RepoError> {
        let search = query.search_term().map(str::to_lowercase);

        let rows = sqlx::query(&format!(
            r#"
            SELECT id, character_name, player_name, class, race, level, created_at, updated_at
            FROM characters
            WHERE {}
            ORDER BY updated_at DESC, id
            LIMIT ?2 OFFSET ?3
            "#,
            SEARCH_FILTER
        ))
        .bind(search.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::from(query.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_characters", e))?;

        let total_row = sqlx::query(&format!(
            "SELECT COUNT(*) AS total FROM characters WHERE {}",
            SEARCH_FILTER
        ))
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("count_characters", e))?;
        let total: i64 = column(&total_row, "total")?;

        let characters = rows
            .iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CharacterPage {
            characters,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berkana_domain::{CharacterName, CharacterProfile, CharacterUpdate, VitalityBase};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
    }

    async fn create_repo() -> (SqliteCharacterRepo, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.db");
        let repo = SqliteCharacterRepo::new(path.to_str().unwrap()).await.unwrap();
        (repo, dir)
    }

    fn character(name: &str, player: &str, at: DateTime<Utc>) -> Character {
        Character::new(CharacterName::new(name).unwrap(), at).with_profile(CharacterProfile {
            player_name: Some(player.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn save_then_get_returns_same_sheet() {
        let (repo, _dir) = create_repo().await;
        let mut sheet = character("Ayla", "Bruna", base_time());
        sheet
            .apply_update(
                CharacterUpdate {
                    vitality: Some(VitalityBase::new(70, 30)),
                    ..Default::default()
                },
                base_time(),
            )
            .unwrap();
        sheet.take_damage(45, base_time());

        repo.save(&sheet).await.unwrap();
        let loaded = repo.get(sheet.id()).await.unwrap().unwrap();

        assert_eq!(loaded, sheet);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (repo, _dir) = create_repo().await;
        assert!(repo.get(CharacterId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_existing_row() {
        let (repo, _dir) = create_repo().await;
        let mut sheet = character("Ayla", "Bruna", base_time());
        repo.save(&sheet).await.unwrap();

        sheet
            .apply_update(
                CharacterUpdate {
                    class: Some("Ladina".into()),
                    ..Default::default()
                },
                base_time() + Duration::minutes(1),
            )
            .unwrap();
        repo.save(&sheet).await.unwrap();

        let page = repo.list(&CharacterListQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.characters[0].class.as_deref(), Some("Ladina"));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (repo, _dir) = create_repo().await;
        let sheet = character("Ayla", "Bruna", base_time());
        repo.save(&sheet).await.unwrap();

        repo.delete(sheet.id()).await.unwrap();

        assert!(repo.get(sheet.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_by_most_recent_update() {
        let (repo, _dir) = create_repo().await;
        for (offset, name) in ["Primeiro", "Segundo", "Terceiro"].iter().enumerate() {
            let at = base_time() + Duration::seconds(offset as i64);
            repo.save(&character(name, "Bruna", at)).await.unwrap();
        }

        let page = repo
            .list(&CharacterListQuery {
                search: None,
                page: 1,
                limit: 2,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let names: Vec<_> = page.characters.iter().map(|c| c.character_name.as_str()).collect();
        assert_eq!(names, vec!["Terceiro", "Segundo"]);

        let second = repo
            .list(&CharacterListQuery {
                search: None,
                page: 2,
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.characters.len(), 1);
        assert_eq!(second.characters[0].character_name, "Primeiro");
    }

    #[tokio::test]
    async fn list_search_folds_accented_names() {
        let (repo, _dir) = create_repo().await;
        repo.save(&character("Ágata", "Élio", base_time())).await.unwrap();
        repo.save(&character("Toren", "Carlos", base_time())).await.unwrap();

        for term in ["Ágata", "ágata", "ÁGA"] {
            let page = repo
                .list(&CharacterListQuery {
                    search: Some(term.into()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(page.total, 1, "{term}");
            assert_eq!(page.characters[0].character_name, "Ágata");
        }

        let by_player = repo
            .list(&CharacterListQuery {
                search: Some("élio".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_player.total, 1);
        assert_eq!(by_player.characters[0].player_name.as_deref(), Some("Élio"));
    }

    #[tokio::test]
    async fn list_search_matches_character_or_player_name() {
        let (repo, _dir) = create_repo().await;
        repo.save(&character("Ayla", "Bruna", base_time())).await.unwrap();
        repo.save(&character("Toren", "Carlos", base_time())).await.unwrap();
        repo.save(&character("Mira", "Ana", base_time())).await.unwrap();

        let by_character = repo
            .list(&CharacterListQuery {
                search: Some("AYL".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_character.total, 1);
        assert_eq!(by_character.characters[0].character_name, "Ayla");

        let by_player = repo
            .list(&CharacterListQuery {
                search: Some("carl".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_player.total, 1);
        assert_eq!(by_player.characters[0].character_name, "Toren");
    }
}
