// src/handlers/members.rs

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
        member::{CreateMembrePayload, Membre, UpdateMembrePayload},
        scope::RequestScope,
    },
};

// POST /api/members
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    request_body = CreateMembrePayload,
    responses(
        (status = 201, description = "Membro criado", body = Membre),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Section não encontrada")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateMembrePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let membre = app_state.member_service.create(&scope, &payload).await?;
    Ok((StatusCode::CREATED, Json(membre)))
}

// GET /api/members
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    responses(
        (status = 200, description = "Membros dentro do escopo", body = Vec<Membre>),
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
pub async fn list_members(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<Membre>>, AppError> {
    Ok(Json(app_state.member_service.list(&scope).await?))
}

// GET /api/members/{id}
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    responses(
        (status = 200, description = "Membro", body = Membre),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Membre>, AppError> {
    Ok(Json(app_state.member_service.get(&scope, id).await?))
}

// PUT /api/members/{id}
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    request_body = UpdateMembrePayload,
    responses(
        (status = 200, description = "Membro atualizado", body = Membre),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMembrePayload>,
) -> Result<Json<Membre>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.member_service.update(&scope, id, &payload).await?))
}

// DELETE /api/members/{id}
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    responses(
        (status = 204, description = "Membro removido"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.member_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
