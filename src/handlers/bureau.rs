// src/handlers/bureau.rs

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
        bureau::{AssignMembrePayload, BureauAssignment, BureauPost, CreateBureauPostPayload},
        scope::RequestScope,
    },
};

// POST /api/bureau/posts
#[utoipa::path(
    post,
    path = "/api/bureau/posts",
    tag = "Bureau",
    request_body = CreateBureauPostPayload,
    responses(
        (status = 201, description = "Cargo criado", body = BureauPost),
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
pub async fn create_post(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Json(payload): Json<CreateBureauPostPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let post = app_state.bureau_service.create_post(&scope, &payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

// GET /api/bureau/posts
#[utoipa::path(
    get,
    path = "/api/bureau/posts",
    tag = "Bureau",
    responses(
        (status = 200, description = "Cargos dentro do escopo", body = Vec<BureauPost>),
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
pub async fn list_posts(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<BureauPost>>, AppError> {
    Ok(Json(app_state.bureau_service.list_posts(&scope).await?))
}

// DELETE /api/bureau/posts/{id}
#[utoipa::path(
    delete,
    path = "/api/bureau/posts/{id}",
    tag = "Bureau",
    responses(
        (status = 204, description = "Cargo removido"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Cargo não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do cargo"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_post(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.bureau_service.delete_post(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/bureau/posts/{id}/assignments
#[utoipa::path(
    post,
    path = "/api/bureau/posts/{id}/assignments",
    tag = "Bureau",
    request_body = AssignMembrePayload,
    responses(
        (status = 201, description = "Membro atribuído ao cargo", body = BureauAssignment),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Cargo ou membro não encontrado"),
        (status = 409, description = "Membro já ocupa o cargo"),
        (status = 422, description = "Membro inelegível ou fora do escopo do cargo")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do cargo"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn assign_member(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<AssignMembrePayload>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = app_state
        .bureau_service
        .assign(&scope, post_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

// GET /api/bureau/posts/{id}/assignments
#[utoipa::path(
    get,
    path = "/api/bureau/posts/{id}/assignments",
    tag = "Bureau",
    responses(
        (status = 200, description = "Atribuições do cargo", body = Vec<BureauAssignment>),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Cargo não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do cargo"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_assignments(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<BureauAssignment>>, AppError> {
    Ok(Json(app_state.bureau_service.list_assignments(&scope, post_id).await?))
}

// DELETE /api/bureau/assignments/{id}
#[utoipa::path(
    delete,
    path = "/api/bureau/assignments/{id}",
    tag = "Bureau",
    responses(
        (status = 204, description = "Atribuição removida"),
        (status = 403, description = "Acesso negado"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da atribuição"),
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    scope: RequestScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.bureau_service.delete_assignment(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
