// src/db/hierarchy_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    access::query::{ScopeFilter, ScopedTable},
    common::error::{map_unique_violation, AppError},
    models::{
        hierarchy::{Localite, Section, SousLocalite},
        scope::ScopeType,
    },
};

/// Consultas somente-leitura à árvore, usadas pelo controle de acesso.
///
/// É a única porta entre as políticas e o armazenamento: os testes injetam
/// um dublê em memória ou um mock no lugar do Postgres.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    async fn find_localite(&self, id: Uuid) -> Result<Option<Localite>, AppError>;
    async fn find_sous_localite(&self, id: Uuid) -> Result<Option<SousLocalite>, AppError>;
    async fn find_section(&self, id: Uuid) -> Result<Option<Section>, AppError>;
}

// O repositório da hierarquia (localites, sous_localites, sections)
#[derive(Clone)]
pub struct HierarchyRepository {
    pool: PgPool,
}

impl HierarchyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CRIAÇÃO (aceita pool ou transação)
    // =========================================================================

    pub async fn create_localite<'e, E>(&self, executor: E, name: &str) -> Result<Localite, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Localite>("INSERT INTO localites (name) VALUES ($1) RETURNING *")
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(AppError::from)
    }

    pub async fn create_sous_localite<'e, E>(
        &self,
        executor: E,
        localite_id: Uuid,
        name: &str,
    ) -> Result<SousLocalite, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SousLocalite>(
            r#"
            INSERT INTO sous_localites (localite_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(localite_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe uma sous-localité com esse nome."))
    }

    pub async fn create_section<'e, E>(
        &self,
        executor: E,
        sous_localite_id: Uuid,
        name: &str,
    ) -> Result<Section, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Section>(
            r#"
            INSERT INTO sections (sous_localite_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(sous_localite_id)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe uma section com esse nome."))
    }

    // =========================================================================
    //  LISTAGENS FILTRADAS PELO ESCOPO
    // =========================================================================

    pub async fn list_localites(&self, filter: &ScopeFilter) -> Result<Vec<Localite>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT n.* FROM localites n WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::Node { level: ScopeType::Localite, alias: "n" });
        qb.push(" ORDER BY n.name");

        Ok(qb.build_query_as::<Localite>().fetch_all(&self.pool).await?)
    }

    pub async fn list_sous_localites(
        &self,
        filter: &ScopeFilter,
    ) -> Result<Vec<SousLocalite>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT n.* FROM sous_localites n WHERE ");
        filter.push_predicate(
            &mut qb,
            ScopedTable::Node { level: ScopeType::SousLocalite, alias: "n" },
        );
        qb.push(" ORDER BY n.name");

        Ok(qb.build_query_as::<SousLocalite>().fetch_all(&self.pool).await?)
    }

    pub async fn list_sections(&self, filter: &ScopeFilter) -> Result<Vec<Section>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT n.* FROM sections n WHERE ");
        filter.push_predicate(&mut qb, ScopedTable::Node { level: ScopeType::Section, alias: "n" });
        qb.push(" ORDER BY n.name");

        Ok(qb.build_query_as::<Section>().fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl HierarchyStore for HierarchyRepository {
    async fn find_localite(&self, id: Uuid) -> Result<Option<Localite>, AppError> {
        sqlx::query_as::<_, Localite>("SELECT * FROM localites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_sous_localite(&self, id: Uuid) -> Result<Option<SousLocalite>, AppError> {
        sqlx::query_as::<_, SousLocalite>("SELECT * FROM sous_localites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_section(&self, id: Uuid) -> Result<Option<Section>, AppError> {
        sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
