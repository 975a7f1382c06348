// src/handlers/meetings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        meeting::{CreateMeetingTypePayload, Meeting, MeetingPayload, MeetingType},
        scope::RequestScope,
    },
};

// =============================================================================
//  TIPOS DE REUNIÃO
// =============================================================================

// POST /api/meeting-types
#[utoipa::path(
    post,
    path = "/api/meeting-types",
    tag = "Meetings",
    request_body = CreateMeetingTypePayload,
    responses(
        (status = 201, description = "Tipo de reunião criado", body = MeetingType),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_meeting_type(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateMeetingTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let meeting_type = app_state.meeting_service.create_type(&scope, &payload).await?;
    Ok((StatusCode::CREATED, Json(meeting_type)))
}

// GET /api/meeting-types
#[utoipa::path(
    get,
    path = "/api/meeting-types",
    tag = "Meetings",
    responses(
        (status = 200, description = "Tipos globais + tipos dentro do escopo", body = Vec<MeetingType>),
        (status = 403, description = "Acesso negado")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_meeting_types(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<MeetingType>>, AppError> {
    Ok(Json(app_state.meeting_service.list_types(&scope).await?))
}

// DELETE /api/meeting-types/{id}
#[utoipa::path(
    delete,
    path = "/api/meeting-types/{id}",
    tag = "Meetings",
    responses(
        (status = 204, description = "Tipo removido"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Tipo não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do tipo de reunião"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_meeting_type(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.meeting_service.delete_type(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  REUNIÕES
// =============================================================================

// POST /api/meetings
#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 201, description = "Reunião criada com a etiqueta do escopo atual", body = Meeting),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_meeting(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<MeetingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let meeting = app_state.meeting_service.create(&scope, &payload).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

// GET /api/meetings
#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    responses(
        (status = 200, description = "Reuniões dentro do escopo", body = Vec<Meeting>),
        (status = 403, description = "Acesso negado")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_meetings(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<Meeting>>, AppError> {
    Ok(Json(app_state.meeting_service.list(&scope).await?))
}

// GET /api/meetings/{id}
#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    responses(
        (status = 200, description = "Reunião", body = Meeting),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Reunião não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da reunião"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_meeting(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Meeting>, AppError> {
    Ok(Json(app_state.meeting_service.get(&scope, id).await?))
}

// PUT /api/meetings/{id}
#[utoipa::path(
    put,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 200, description = "Reunião atualizada", body = Meeting),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Reunião não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da reunião"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_meeting(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<MeetingPayload>,
) -> Result<Json<Meeting>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.meeting_service.update(&scope, id, &payload).await?))
}

// DELETE /api/meetings/{id}
#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    responses(
        (status = 204, description = "Reunião removida"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Reunião não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da reunião"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_meeting(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.meeting_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
