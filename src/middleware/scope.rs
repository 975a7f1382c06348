// src/middleware/scope.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Principal,
        scope::{RequestScope, ScopeOverride, ScopeType},
    },
};

// Cabeçalhos do override de escopo (só LOCALITE e OWNER podem usar)
const SCOPE_TYPE_HEADER: &str = "x-scope-type";
const SCOPE_ID_HEADER: &str = "x-scope-id";

// O escopo é resolvido de novo em toda requisição, a partir do banco.
impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        let requested = read_override(&parts.headers)?;

        app_state.access_service.resolve_scope(&principal, requested).await
    }
}

/// Os dois cabeçalhos juntos ou nenhum.
pub fn read_override(headers: &HeaderMap) -> Result<Option<ScopeOverride>, AppError> {
    let scope_type = header_str(headers, SCOPE_TYPE_HEADER)?;
    let scope_id = header_str(headers, SCOPE_ID_HEADER)?;

    match (scope_type, scope_id) {
        (None, None) => Ok(None),
        (Some(scope_type), Some(scope_id)) => {
            let scope_type: ScopeType = scope_type.parse()?;
            let scope_id = Uuid::parse_str(scope_id).map_err(|_| {
                AppError::InvalidInput("Cabeçalho x-scope-id inválido (não é um UUID).".into())
            })?;
            Ok(Some(ScopeOverride { scope_type, scope_id }))
        }
        _ => Err(AppError::InvalidInput(
            "Os cabeçalhos x-scope-type e x-scope-id devem ser enviados juntos.".into(),
        )),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                AppError::InvalidInput(format!("Cabeçalho {} contém caracteres inválidos.", name))
            })
        })
        .transpose()
}
