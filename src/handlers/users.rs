// src/handlers/users.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::User, scope::RequestScope},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários dentro do escopo", body = Vec<User>),
        (status = 401, description = "Não autorizado"),
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
pub async fn list_users(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.hierarchy_service.list_users(&scope).await?;
    Ok(Json(users))
}
