// src/services/hierarchy_service.rs

use sqlx::PgPool;

use crate::{
    access::query::ScopeFilter,
    common::error::AppError,
    db::{user_repo::Attachment, HierarchyRepository, UserRepository},
    models::{
        auth::{InitialUserPayload, Role, User},
        hierarchy::{
            CreateLocalitePayload, CreateSectionPayload, CreateSousLocalitePayload, Localite,
            Section, SectionCreated, SousLocalite, SousLocaliteCreated,
        },
        scope::{RequestScope, ScopeType, TargetScope},
    },
    services::{access_service::AccessService, auth::hash_password},
};

#[derive(Clone)]
pub struct HierarchyService {
    hierarchy_repo: HierarchyRepository,
    user_repo: UserRepository,
    access: AccessService,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl HierarchyService {
    pub fn new(
        hierarchy_repo: HierarchyRepository,
        user_repo: UserRepository,
        access: AccessService,
        pool: PgPool,
    ) -> Self {
        Self { hierarchy_repo, user_repo, access, pool }
    }

    /// Só OWNER cria localités.
    pub async fn create_localite(
        &self,
        scope: &RequestScope,
        payload: &CreateLocalitePayload,
    ) -> Result<Localite, AppError> {
        self.access
            .ensure_create_child(scope, TargetScope::Global, ScopeType::Localite)
            .await?;

        let localite = self.hierarchy_repo.create_localite(&self.pool, &payload.name).await?;
        tracing::info!(localite_id = %localite.id, by = %scope.user_id, "Localité criada");
        Ok(localite)
    }

    /// Cria a sous-localité e, atomicamente, o seu administrador (se pedido).
    pub async fn create_sous_localite(
        &self,
        scope: &RequestScope,
        payload: &CreateSousLocalitePayload,
    ) -> Result<SousLocaliteCreated, AppError> {
        self.access
            .ensure_create_child(
                scope,
                TargetScope::Localite(payload.localite_id),
                ScopeType::SousLocalite,
            )
            .await?;

        // O hash fica fora da transação, pois não toca no banco
        let admin_hash = hash_initial_user(payload.admin.as_ref()).await?;

        let mut tx = self.pool.begin().await?;

        let sous_localite = self
            .hierarchy_repo
            .create_sous_localite(&mut *tx, payload.localite_id, &payload.name)
            .await?;

        let admin = match (&payload.admin, admin_hash) {
            (Some(initial), Some(hashed)) => {
                let attachment = Attachment {
                    sous_localite_id: Some(sous_localite.id),
                    ..Attachment::default()
                };
                Some(
                    self.user_repo
                        .create_user(
                            &mut *tx,
                            &initial.email,
                            &hashed,
                            Role::SousLocaliteAdmin,
                            attachment,
                        )
                        .await?,
                )
            }
            _ => None,
        };

        tx.commit().await?;

        tracing::info!(
            sous_localite_id = %sous_localite.id,
            localite_id = %payload.localite_id,
            with_admin = admin.is_some(),
            "Sous-localité criada"
        );
        Ok(SousLocaliteCreated { sous_localite, admin })
    }

    /// Cria a section e, atomicamente, o seu primeiro SECTION_USER (se pedido).
    pub async fn create_section(
        &self,
        scope: &RequestScope,
        payload: &CreateSectionPayload,
    ) -> Result<SectionCreated, AppError> {
        self.access
            .ensure_create_child(
                scope,
                TargetScope::SousLocalite(payload.sous_localite_id),
                ScopeType::Section,
            )
            .await?;

        let user_hash = hash_initial_user(payload.first_user.as_ref()).await?;

        let mut tx = self.pool.begin().await?;

        let section = self
            .hierarchy_repo
            .create_section(&mut *tx, payload.sous_localite_id, &payload.name)
            .await?;

        let first_user = match (&payload.first_user, user_hash) {
            (Some(initial), Some(hashed)) => {
                let attachment = Attachment {
                    section_id: Some(section.id),
                    ..Attachment::default()
                };
                Some(
                    self.user_repo
                        .create_user(&mut *tx, &initial.email, &hashed, Role::SectionUser, attachment)
                        .await?,
                )
            }
            _ => None,
        };

        tx.commit().await?;

        tracing::info!(
            section_id = %section.id,
            sous_localite_id = %payload.sous_localite_id,
            with_user = first_user.is_some(),
            "Section criada"
        );
        Ok(SectionCreated { section, first_user })
    }

    pub async fn list_localites(&self, scope: &RequestScope) -> Result<Vec<Localite>, AppError> {
        self.hierarchy_repo.list_localites(&ScopeFilter::for_scope(scope)).await
    }

    pub async fn list_sous_localites(
        &self,
        scope: &RequestScope,
    ) -> Result<Vec<SousLocalite>, AppError> {
        self.hierarchy_repo.list_sous_localites(&ScopeFilter::for_scope(scope)).await
    }

    pub async fn list_sections(&self, scope: &RequestScope) -> Result<Vec<Section>, AppError> {
        self.hierarchy_repo.list_sections(&ScopeFilter::for_scope(scope)).await
    }

    /// Usuários ligados a nós que o escopo alcança.
    pub async fn list_users(&self, scope: &RequestScope) -> Result<Vec<User>, AppError> {
        self.user_repo.list_users(&ScopeFilter::for_scope(scope)).await
    }
}

async fn hash_initial_user(initial: Option<&InitialUserPayload>) -> Result<Option<String>, AppError> {
    match initial {
        Some(user) => Ok(Some(hash_password(&user.password).await?)),
        None => Ok(None),
    }
}
