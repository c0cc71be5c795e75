//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use berkana_domain::{CharacterId, DamageReport, LevelUpOutcome, Recalculation};

use super::dto::{
    parse_level, BerkanaActionRequest, CalculateAttributesRequest, CalculateBerkanaRequest,
    CalculateVitalityRequest, CalculateXpRequest, CharacterListResponse, CharacterResponse,
    CreateCharacterRequest, DamageRequest, Envelope, HealResponse, ListCharactersQuery,
    MessageResponse, SkillsRequest, UpdateCharacterRequest,
};
use super::extract::{ValidatedJson, ValidatedQuery};
use crate::app::App;
use crate::infrastructure::ports::{CharacterListQuery, RepoError};
use crate::use_cases::calculations::{
    AttributeCalculation, BerkanaActionResult, BerkanaCalculation, SkillPointsCalculation,
    SkillValidationResult, VitalityCalculation, XpCalculation,
};
use crate::use_cases::{CalculationError, ManagementError, NewCharacter};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/api/characters/{id}/level-up", post(level_up))
        .route(
            "/api/characters/{id}/calculate-vitality",
            post(calculate_vitality),
        )
        .route(
            "/api/characters/{id}/calculate-berkana",
            post(calculate_berkana),
        )
        .route("/api/characters/{id}/validate-skills", post(validate_skills))
        .route(
            "/api/characters/{id}/calculate-attributes",
            post(calculate_attributes),
        )
        .route("/api/characters/{id}/calculate-xp", post(calculate_xp))
        .route(
            "/api/characters/{id}/calculate-skill-points",
            post(calculate_skill_points),
        )
        .route("/api/characters/{id}/recalculate", post(recalculate))
        .route("/api/characters/{id}/damage", post(apply_damage))
        .route("/api/characters/{id}/heal", post(heal))
        .route("/api/characters/{id}/berkana", post(berkana_action))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "service": "berkana-engine" }))
}

// =============================================================================
// Character management
// =============================================================================

async fn list_characters(
    State(app): State<Arc<App>>,
    ValidatedQuery(query): ValidatedQuery<ListCharactersQuery>,
) -> ApiResult<CharacterListResponse> {
    let query = CharacterListQuery::from(query);
    let (page, limit) = (query.page, query.limit);
    let result = app.use_cases.management.character.list(query).await?;
    Ok(Json(CharacterListResponse {
        characters: result.characters,
        total: result.total,
        page,
        limit,
    }))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> ApiResult<CharacterResponse> {
    let character = app
        .use_cases
        .management
        .character
        .get(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(CharacterResponse {
        character,
        message: None,
    }))
}

async fn create_character(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<CharacterResponse>), ApiError> {
    let input = NewCharacter::try_from(body)?;
    let character = app.use_cases.management.character.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CharacterResponse {
            character,
            message: Some("Personagem criado com sucesso".into()),
        }),
    ))
}

async fn update_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateCharacterRequest>,
) -> ApiResult<CharacterResponse> {
    let update = body.try_into()?;
    let character = app
        .use_cases
        .management
        .character
        .update(CharacterId::from_uuid(id), update)
        .await?;
    Ok(Json(CharacterResponse {
        character,
        message: Some("Personagem atualizado com sucesso".into()),
    }))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    app.use_cases
        .management
        .character
        .delete(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Personagem deletado com sucesso".into(),
    }))
}

// =============================================================================
// Calculations
// =============================================================================

async fn level_up(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Envelope<LevelUpOutcome>> {
    let outcome = app
        .use_cases
        .calculations
        .level_up(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(Envelope::ok(
        format!("Personagem subiu para o nível {}!", outcome.new_level),
        outcome,
    )))
}

async fn calculate_vitality(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CalculateVitalityRequest>,
) -> ApiResult<Envelope<VitalityCalculation>> {
    let result = app
        .use_cases
        .calculations
        .calculate_vitality(
            CharacterId::from_uuid(id),
            body.vitality,
            parse_level(body.level)?,
        )
        .await?;
    Ok(Json(Envelope::ok("Vitalidade calculada com sucesso", result)))
}

async fn calculate_berkana(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CalculateBerkanaRequest>,
) -> ApiResult<Envelope<BerkanaCalculation>> {
    let result = app
        .use_cases
        .calculations
        .calculate_berkana(
            CharacterId::from_uuid(id),
            parse_level(body.level)?,
            body.base_value,
            body.bonus,
        )
        .await?;
    Ok(Json(Envelope::ok("Berkana calculada com sucesso", result)))
}

async fn validate_skills(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<SkillsRequest>,
) -> ApiResult<Envelope<SkillValidationResult>> {
    let result = app
        .use_cases
        .calculations
        .validate_skills(
            CharacterId::from_uuid(id),
            body.skills,
            parse_level(body.level)?,
        )
        .await?;
    let message = if result.is_valid {
        "Distribuição de perícias válida"
    } else {
        "Encontrados problemas na distribuição"
    };
    Ok(Json(Envelope::ok(message, result)))
}

async fn calculate_attributes(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CalculateAttributesRequest>,
) -> ApiResult<Envelope<AttributeCalculation>> {
    let result = app
        .use_cases
        .calculations
        .calculate_attributes(
            CharacterId::from_uuid(id),
            body.attributes,
            parse_level(body.level)?,
        )
        .await?;
    Ok(Json(Envelope::ok("Atributos calculados com sucesso", result)))
}

async fn calculate_xp(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CalculateXpRequest>,
) -> ApiResult<Envelope<XpCalculation>> {
    let result = app
        .use_cases
        .calculations
        .calculate_xp(CharacterId::from_uuid(id), parse_level(body.current_level)?)
        .await?;
    Ok(Json(Envelope::ok("XP calculado com sucesso", result)))
}

async fn calculate_skill_points(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<SkillsRequest>,
) -> ApiResult<Envelope<SkillPointsCalculation>> {
    let result = app
        .use_cases
        .calculations
        .calculate_skill_points(
            CharacterId::from_uuid(id),
            body.skills,
            parse_level(body.level)?,
        )
        .await?;
    Ok(Json(Envelope::ok(
        "Pontos de perícia calculados com sucesso",
        result,
    )))
}

async fn recalculate(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Envelope<Recalculation>> {
    let result = app
        .use_cases
        .calculations
        .recalculate(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(Envelope::ok("Personagem recalculado com sucesso", result)))
}

async fn apply_damage(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<DamageRequest>,
) -> ApiResult<Envelope<DamageReport>> {
    let report = app
        .use_cases
        .calculations
        .apply_damage(CharacterId::from_uuid(id), body.amount)
        .await?;
    Ok(Json(Envelope::ok("Dano aplicado com sucesso", report)))
}

async fn heal(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Envelope<HealResponse>> {
    let vitality = app
        .use_cases
        .calculations
        .heal(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(Envelope::ok(
        "Vitalidade restaurada com sucesso",
        HealResponse { vitality },
    )))
}

async fn berkana_action(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<BerkanaActionRequest>,
) -> ApiResult<Envelope<BerkanaActionResult>> {
    let result = app
        .use_cases
        .calculations
        .berkana_action(CharacterId::from_uuid(id), body.action)
        .await?;
    Ok(Json(Envelope::ok("Berkana atualizada com sucesso", result)))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Well-formed request the current sheet state cannot satisfy.
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

const CHARACTER_NOT_FOUND: &str = "Personagem não encontrado";

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound(CHARACTER_NOT_FOUND.into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::NotFound(_) => ApiError::NotFound(CHARACTER_NOT_FOUND.into()),
            ManagementError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ManagementError::Domain(e) => ApiError::BadRequest(e.to_string()),
            ManagementError::Repo(e) => e.into(),
        }
    }
}

impl From<CalculationError> for ApiError {
    fn from(e: CalculationError) -> Self {
        match e {
            CalculationError::NotFound(_) => ApiError::NotFound(CHARACTER_NOT_FOUND.into()),
            CalculationError::LevelUp(e) => ApiError::Unprocessable(e.to_string()),
            CalculationError::InvalidInput(msg) => ApiError::BadRequest(msg),
            CalculationError::Repo(e) => e.into(),
        }
    }
}
