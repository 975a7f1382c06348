use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Mensagem única para ScopeMissing e Forbidden: o cliente não sabe qual dos dois foi.
const ACCESS_DENIED: &str = "Acesso negado.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // --- Controle de acesso por escopo ---
    #[error("Escopo ausente: {0}")]
    ScopeMissing(String),

    #[error("Proibido: {0}")]
    Forbidden(String),

    #[error("Membro inelegível: {0}")]
    IneligibleMember(String),

    #[error("Membro fora do escopo: {0}")]
    OutOfScope(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ScopeMissing(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::IneligibleMember(_) | AppError::OutOfScope(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidInput(msg) => msg,
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),

            // A distinção interna fica só no log.
            AppError::ScopeMissing(reason) => {
                tracing::warn!(kind = "scope_missing", %reason, "Acesso negado");
                ACCESS_DENIED.to_string()
            }
            AppError::Forbidden(reason) => {
                tracing::warn!(kind = "forbidden", %reason, "Acesso negado");
                ACCESS_DENIED.to_string()
            }

            AppError::IneligibleMember(msg) => msg,
            AppError::OutOfScope(msg) => msg,
            AppError::NotFound(what) => format!("{} não encontrado(a).", what),
            AppError::UniqueConstraintViolation(msg) => msg,

            // Todos os outros erros viram 500. O log leva a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Converte a violação de unicidade do Postgres numa mensagem amigável.
pub fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message.to_string());
        }
    }
    e.into()
}
