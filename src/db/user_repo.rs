use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    access::query::{ScopeFilter, ScopedTable},
    common::error::{map_unique_violation, AppError},
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

// A ligação de um novo usuário à árvore (só a coluna do papel é preenchida)
#[derive(Debug, Clone, Copy, Default)]
pub struct Attachment {
    pub localite_id: Option<Uuid>,
    pub sous_localite_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    // Cria um novo usuário (aceita pool ou transação)
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        hashed_password: &str,
        role: Role,
        attachment: Attachment,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role, localite_id, sous_localite_id, section_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .bind(role)
        .bind(attachment.localite_id)
        .bind(attachment.sous_localite_id)
        .bind(attachment.section_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Este e-mail já está em uso."))
    }

    // Lista os usuários dentro do escopo
    pub async fn list_users(&self, filter: &ScopeFilter) -> Result<Vec<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT u.* FROM users u WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::Users { alias: "u" });
        qb.push(" ORDER BY u.email");

        Ok(qb.build_query_as::<User>().fetch_all(&self.pool).await?)
    }
}
