// src/db/member_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    access::query::{ScopeFilter, ScopedTable},
    common::error::AppError,
    models::member::{CreateMembrePayload, Membre, UpdateMembrePayload},
};

/// Acesso aos membros; os serviços só enxergam esta interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membre>, AppError>;
    async fn create(&self, payload: &CreateMembrePayload) -> Result<Membre, AppError>;
    async fn update(&self, id: Uuid, payload: &UpdateMembrePayload) -> Result<Membre, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn list(&self, filter: &ScopeFilter) -> Result<Vec<Membre>, AppError>;
}

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Membre>, AppError> {
        sqlx::query_as::<_, Membre>("SELECT * FROM membres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, payload: &CreateMembrePayload) -> Result<Membre, AppError> {
        sqlx::query_as::<_, Membre>(
            r#"
            INSERT INTO membres (
                section_id, first_name, last_name, gender, birth_date,
                age_bracket, voter_card_number, voter_card_place
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.section_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.gender)
        .bind(payload.birth_date)
        .bind(payload.age_bracket.map(|b| b.as_str()))
        .bind(&payload.voter_card_number)
        .bind(&payload.voter_card_place)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // section_id nunca entra no UPDATE
    async fn update(&self, id: Uuid, payload: &UpdateMembrePayload) -> Result<Membre, AppError> {
        sqlx::query_as::<_, Membre>(
            r#"
            UPDATE membres
            SET first_name = $2, last_name = $3, gender = $4, birth_date = $5,
                age_bracket = $6, voter_card_number = $7, voter_card_place = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.gender)
        .bind(payload.birth_date)
        .bind(payload.age_bracket.map(|b| b.as_str()))
        .bind(&payload.voter_card_number)
        .bind(&payload.voter_card_place)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Membro".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM membres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &ScopeFilter) -> Result<Vec<Membre>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT mb.* FROM membres mb WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::SectionAnchored { column: "mb.section_id" });
        qb.push(" ORDER BY mb.last_name, mb.first_name");

        Ok(qb.build_query_as::<Membre>().fetch_all(&self.pool).await?)
    }
}
