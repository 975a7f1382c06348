// src/db/meeting_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    access::query::{ScopeFilter, ScopedTable},
    common::error::AppError,
    models::{
        meeting::{CreateMeetingTypePayload, Meeting, MeetingPayload, MeetingType},
        scope::TargetScope,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn create_type(
        &self,
        payload: &CreateMeetingTypePayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<MeetingType, AppError>;
    async fn find_type(&self, id: Uuid) -> Result<Option<MeetingType>, AppError>;
    async fn list_types(&self, filter: &ScopeFilter) -> Result<Vec<MeetingType>, AppError>;
    async fn delete_type(&self, id: Uuid) -> Result<(), AppError>;

    async fn create(
        &self,
        payload: &MeetingPayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<Meeting, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>, AppError>;
    async fn update(&self, id: Uuid, payload: &MeetingPayload) -> Result<Meeting, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn list(&self, filter: &ScopeFilter) -> Result<Vec<Meeting>, AppError>;
}

#[derive(Clone)]
pub struct MeetingRepository {
    pool: PgPool,
}

impl MeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingStore for MeetingRepository {
    // =========================================================================
    //  1. TIPOS DE REUNIÃO
    // =========================================================================

    async fn create_type(
        &self,
        payload: &CreateMeetingTypePayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<MeetingType, AppError> {
        let (scope_type, scope_id) = tag.columns();

        sqlx::query_as::<_, MeetingType>(
            r#"
            INSERT INTO meeting_types (name, description, scope_type, scope_id, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(scope_type)
        .bind(scope_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_type(&self, id: Uuid) -> Result<Option<MeetingType>, AppError> {
        sqlx::query_as::<_, MeetingType>("SELECT * FROM meeting_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Globais + o que o filtro alcança.
    async fn list_types(&self, filter: &ScopeFilter) -> Result<Vec<MeetingType>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT mt.* FROM meeting_types mt WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::MeetingTypes { alias: "mt" });
        qb.push(" ORDER BY mt.name");

        Ok(qb.build_query_as::<MeetingType>().fetch_all(&self.pool).await?)
    }

    async fn delete_type(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM meeting_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  2. REUNIÕES
    // =========================================================================

    async fn create(
        &self,
        payload: &MeetingPayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<Meeting, AppError> {
        let (scope_type, scope_id) = tag.columns();

        sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings (
                title, description, location, scheduled_at, meeting_type_id,
                scope_type, scope_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.scheduled_at)
        .bind(payload.meeting_type_id)
        .bind(scope_type)
        .bind(scope_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>, AppError> {
        sqlx::query_as::<_, Meeting>("SELECT * FROM meetings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    // A etiqueta (scope_type, scope_id) não é alterável
    async fn update(&self, id: Uuid, payload: &MeetingPayload) -> Result<Meeting, AppError> {
        sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings
            SET title = $2, description = $3, location = $4, scheduled_at = $5,
                meeting_type_id = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.scheduled_at)
        .bind(payload.meeting_type_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reunião".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &ScopeFilter) -> Result<Vec<Meeting>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT m.* FROM meetings m WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::Tagged { alias: "m" });
        qb.push(" ORDER BY m.scheduled_at DESC");

        Ok(qb.build_query_as::<Meeting>().fetch_all(&self.pool).await?)
    }
}
