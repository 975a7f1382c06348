// src/services/member_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    access::query::ScopeFilter,
    common::error::AppError,
    db::MemberStore,
    models::{
        member::{CreateMembrePayload, Membre, UpdateMembrePayload},
        scope::{RequestScope, TargetScope},
    },
    services::access_service::AccessService,
};

#[derive(Clone)]
pub struct MemberService {
    member_repo: Arc<dyn MemberStore>,
    access: AccessService,
}

impl MemberService {
    pub fn new(member_repo: Arc<dyn MemberStore>, access: AccessService) -> Self {
        Self { member_repo, access }
    }

    pub async fn create(
        &self,
        scope: &RequestScope,
        payload: &CreateMembrePayload,
    ) -> Result<Membre, AppError> {
        check_birth_date(payload.birth_date, today())?;
        self.access
            .ensure_mutate(scope, TargetScope::Section(payload.section_id))
            .await?;

        let membre = self.member_repo.create(payload).await?;
        tracing::info!(membre_id = %membre.id, section_id = %membre.section_id, "Membro criado");
        Ok(membre)
    }

    pub async fn get(&self, scope: &RequestScope, id: Uuid) -> Result<Membre, AppError> {
        let membre = self.load(id).await?;
        self.access
            .ensure_view(scope, TargetScope::Section(membre.section_id))
            .await?;
        Ok(membre)
    }

    pub async fn update(
        &self,
        scope: &RequestScope,
        id: Uuid,
        payload: &UpdateMembrePayload,
    ) -> Result<Membre, AppError> {
        check_birth_date(payload.birth_date, today())?;
        let current = self.load(id).await?;
        self.access
            .ensure_mutate(scope, TargetScope::Section(current.section_id))
            .await?;

        self.member_repo.update(id, payload).await
    }

    pub async fn delete(&self, scope: &RequestScope, id: Uuid) -> Result<(), AppError> {
        let current = self.load(id).await?;
        self.access
            .ensure_mutate(scope, TargetScope::Section(current.section_id))
            .await?;

        self.member_repo.delete(id).await?;
        tracing::info!(membre_id = %id, by = %scope.user_id, "Membro removido");
        Ok(())
    }

    pub async fn list(&self, scope: &RequestScope) -> Result<Vec<Membre>, AppError> {
        self.member_repo.list(&ScopeFilter::for_scope(scope)).await
    }

    async fn load(&self, id: Uuid) -> Result<Membre, AppError> {
        self.member_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membro".into()))
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// Nascimento no futuro nunca é gravado
fn check_birth_date(birth_date: Option<NaiveDate>, today: NaiveDate) -> Result<(), AppError> {
    match birth_date {
        Some(date) if date > today => Err(AppError::InvalidInput(format!(
            "Data de nascimento {} está no futuro.",
            date
        ))),
        _ => Ok(()),
    }
}
