// src/handlers/hierarchy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        hierarchy::{
            CreateLocalitePayload, CreateSectionPayload, CreateSousLocalitePayload, Localite,
            Section, SectionCreated, SousLocalite, SousLocaliteCreated,
        },
        scope::RequestScope,
    },
};

// =============================================================================
//  LOCALITÉS
// =============================================================================

// POST /api/hierarchy/localites
#[utoipa::path(
    post,
    path = "/api/hierarchy/localites",
    tag = "Hierarchy",
    request_body = CreateLocalitePayload,
    responses(
        (status = 201, description = "Localité criada", body = Localite),
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
pub async fn create_localite(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateLocalitePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let localite = app_state
        .hierarchy_service
        .create_localite(&scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(localite)))
}

// GET /api/hierarchy/localites
#[utoipa::path(
    get,
    path = "/api/hierarchy/localites",
    tag = "Hierarchy",
    responses(
        (status = 200, description = "Localités visíveis", body = Vec<Localite>),
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
pub async fn list_localites(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<Localite>>, AppError> {
    Ok(Json(app_state.hierarchy_service.list_localites(&scope).await?))
}

// =============================================================================
//  SOUS-LOCALITÉS
// =============================================================================

// POST /api/hierarchy/sous-localites
#[utoipa::path(
    post,
    path = "/api/hierarchy/sous-localites",
    tag = "Hierarchy",
    request_body = CreateSousLocalitePayload,
    responses(
        (status = 201, description = "Sous-localité criada (com o administrador, se pedido)", body = SousLocaliteCreated),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Localité não encontrada"),
        (status = 409, description = "E-mail já em uso")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_sous_localite(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateSousLocalitePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .hierarchy_service
        .create_sous_localite(&scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/hierarchy/sous-localites
#[utoipa::path(
    get,
    path = "/api/hierarchy/sous-localites",
    tag = "Hierarchy",
    responses(
        (status = 200, description = "Sous-localités visíveis", body = Vec<SousLocalite>),
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
pub async fn list_sous_localites(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<SousLocalite>>, AppError> {
    Ok(Json(app_state.hierarchy_service.list_sous_localites(&scope).await?))
}

// =============================================================================
//  SECTIONS
// =============================================================================

// POST /api/hierarchy/sections
#[utoipa::path(
    post,
    path = "/api/hierarchy/sections",
    tag = "Hierarchy",
    request_body = CreateSectionPayload,
    responses(
        (status = 201, description = "Section criada (com o primeiro usuário, se pedido)", body = SectionCreated),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Sous-localité não encontrada"),
        (status = 409, description = "E-mail já em uso")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_section(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateSectionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .hierarchy_service
        .create_section(&scope, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/hierarchy/sections
#[utoipa::path(
    get,
    path = "/api/hierarchy/sections",
    tag = "Hierarchy",
    responses(
        (status = 200, description = "Sections visíveis", body = Vec<Section>),
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
pub async fn list_sections(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<Section>>, AppError> {
    Ok(Json(app_state.hierarchy_service.list_sections(&scope).await?))
}
