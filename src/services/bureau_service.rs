// src/services/bureau_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    access::query::ScopeFilter,
    common::error::AppError,
    db::{BureauStore, MemberStore},
    models::{
        bureau::{AssignMembrePayload, BureauAssignment, BureauPost, CreateBureauPostPayload},
        scope::{RequestScope, TargetScope},
    },
    services::{access_service::AccessService, member_service::today},
};

#[derive(Clone)]
pub struct BureauService {
    bureau_repo: Arc<dyn BureauStore>,
    member_repo: Arc<dyn MemberStore>,
    access: AccessService,
}

impl BureauService {
    pub fn new(
        bureau_repo: Arc<dyn BureauStore>,
        member_repo: Arc<dyn MemberStore>,
        access: AccessService,
    ) -> Self {
        Self { bureau_repo, member_repo, access }
    }

    // =========================================================================
    //  1. CARGOS
    // =========================================================================

    pub async fn create_post(
        &self,
        scope: &RequestScope,
        payload: &CreateBureauPostPayload,
    ) -> Result<BureauPost, AppError> {
        let tag = AccessService::creation_tag(scope)?;
        self.access.ensure_mutate(scope, tag).await?;

        self.bureau_repo.create_post(payload, tag, scope.user_id).await
    }

    pub async fn list_posts(&self, scope: &RequestScope) -> Result<Vec<BureauPost>, AppError> {
        self.bureau_repo.list_posts(&ScopeFilter::for_scope(scope)).await
    }

    pub async fn delete_post(&self, scope: &RequestScope, id: Uuid) -> Result<(), AppError> {
        let post = self.load_post(id).await?;
        self.access.ensure_mutate(scope, post.target()).await?;

        self.bureau_repo.delete_post(id).await
    }

    async fn load_post(&self, id: Uuid) -> Result<BureauPost, AppError> {
        self.bureau_repo
            .find_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cargo".into()))
    }

    // =========================================================================
    //  2. ATRIBUIÇÕES
    // =========================================================================

    /// Coloca um membro num cargo.
    ///
    /// Quem atribui precisa poder alterar o cargo e enxergar o membro; um
    /// membro fora do seu escopo dá o mesmo 403 de qualquer outro registro.
    /// Depois disso o membro precisa estar na faixa etária do grupo e numa
    /// section contida no escopo do cargo.
    pub async fn assign(
        &self,
        scope: &RequestScope,
        post_id: Uuid,
        payload: &AssignMembrePayload,
    ) -> Result<BureauAssignment, AppError> {
        let post = self.load_post(post_id).await?;
        self.access.ensure_mutate(scope, post.target()).await?;

        let membre = self
            .member_repo
            .find_by_id(payload.membre_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membro".into()))?;
        self.access
            .ensure_view(scope, TargetScope::Section(membre.section_id))
            .await?;

        let verdict = self
            .access
            .classify_eligibility(&membre, &post.group(), today())
            .await?;
        if let Err(e) = verdict.into_result() {
            tracing::info!(
                post_id = %post.id,
                membre_id = %membre.id,
                verdict = ?verdict,
                "Atribuição recusada"
            );
            return Err(e);
        }

        self.bureau_repo
            .create_assignment(post.id, membre.id, scope.user_id)
            .await
    }

    pub async fn list_assignments(
        &self,
        scope: &RequestScope,
        post_id: Uuid,
    ) -> Result<Vec<BureauAssignment>, AppError> {
        let post = self.load_post(post_id).await?;
        self.access.ensure_view(scope, post.target()).await?;

        self.bureau_repo.list_assignments(post.id).await
    }

    pub async fn delete_assignment(&self, scope: &RequestScope, id: Uuid) -> Result<(), AppError> {
        let assignment = self
            .bureau_repo
            .find_assignment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Atribuição".into()))?;
        let post = self.load_post(assignment.post_id).await?;
        self.access.ensure_mutate(scope, post.target()).await?;

        self.bureau_repo.delete_assignment(id).await
    }
}
