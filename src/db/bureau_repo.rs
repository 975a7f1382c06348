// src/db/bureau_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    access::query::{ScopeFilter, ScopedTable},
    common::error::{map_unique_violation, AppError},
    models::{
        bureau::{BureauAssignment, BureauPost, CreateBureauPostPayload},
        scope::TargetScope,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BureauStore: Send + Sync {
    async fn create_post(
        &self,
        payload: &CreateBureauPostPayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<BureauPost, AppError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<BureauPost>, AppError>;
    async fn list_posts(&self, filter: &ScopeFilter) -> Result<Vec<BureauPost>, AppError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), AppError>;

    /// Duplicata (mesmo membro no mesmo cargo) é `UniqueConstraintViolation`.
    async fn create_assignment(
        &self,
        post_id: Uuid,
        membre_id: Uuid,
        assigned_by: Uuid,
    ) -> Result<BureauAssignment, AppError>;
    async fn find_assignment(&self, id: Uuid) -> Result<Option<BureauAssignment>, AppError>;
    async fn list_assignments(&self, post_id: Uuid) -> Result<Vec<BureauAssignment>, AppError>;
    async fn delete_assignment(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct BureauRepository {
    pool: PgPool,
}

impl BureauRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BureauStore for BureauRepository {
    // =========================================================================
    //  1. CARGOS
    // =========================================================================

    async fn create_post(
        &self,
        payload: &CreateBureauPostPayload,
        tag: TargetScope,
        created_by: Uuid,
    ) -> Result<BureauPost, AppError> {
        let (scope_type, scope_id) = tag.columns();

        sqlx::query_as::<_, BureauPost>(
            r#"
            INSERT INTO bureau_posts (title, age_group, scope_type, scope_id, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(payload.age_group)
        .bind(scope_type)
        .bind(scope_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<BureauPost>, AppError> {
        sqlx::query_as::<_, BureauPost>("SELECT * FROM bureau_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_posts(&self, filter: &ScopeFilter) -> Result<Vec<BureauPost>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT p.* FROM bureau_posts p WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::Tagged { alias: "p" });
        qb.push(" ORDER BY p.title");

        Ok(qb.build_query_as::<BureauPost>().fetch_all(&self.pool).await?)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM bureau_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  2. ATRIBUIÇÕES
    // =========================================================================

    async fn create_assignment(
        &self,
        post_id: Uuid,
        membre_id: Uuid,
        assigned_by: Uuid,
    ) -> Result<BureauAssignment, AppError> {
        sqlx::query_as::<_, BureauAssignment>(
            r#"
            INSERT INTO bureau_assignments (post_id, membre_id, assigned_by)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(membre_id)
        .bind(assigned_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Este membro já ocupa este cargo."))
    }

    async fn find_assignment(&self, id: Uuid) -> Result<Option<BureauAssignment>, AppError> {
        sqlx::query_as::<_, BureauAssignment>("SELECT * FROM bureau_assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_assignments(&self, post_id: Uuid) -> Result<Vec<BureauAssignment>, AppError> {
        sqlx::query_as::<_, BureauAssignment>(
            "SELECT * FROM bureau_assignments WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_assignment(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM bureau_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
