// src/services/access_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    access::{
        eligibility::{self, Eligibility},
        mutation::{can_create_child, can_mutate},
        resolver,
        visibility::can_view,
    },
    common::error::AppError,
    db::HierarchyStore,
    models::{
        auth::Principal,
        bureau::GroupDescriptor,
        member::Membre,
        scope::{RequestScope, ScopeOverride, ScopePath, ScopeType, TargetScope},
    },
};

/// Ponto único de decisão usado por todos os handlers.
///
/// Cada handler chama `ensure_view` para leituras e `ensure_mutate` para
/// escritas; nenhum reimplementa a regra de contenção.
#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn HierarchyStore>,
}

impl AccessService {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_scope(
        &self,
        principal: &Principal,
        requested: Option<ScopeOverride>,
    ) -> Result<RequestScope, AppError> {
        resolver::resolve_scope(self.store.as_ref(), principal, requested).await
    }

    pub async fn top_level_id(&self, principal: &Principal) -> Result<Option<Uuid>, AppError> {
        resolver::top_level_id(self.store.as_ref(), principal).await
    }

    pub async fn locate(&self, target: TargetScope) -> Result<ScopePath, AppError> {
        resolver::locate(self.store.as_ref(), target).await
    }

    /// Leitura de um registro que já sabemos existir. Fora do escopo: 403.
    pub async fn ensure_view(
        &self,
        scope: &RequestScope,
        target: TargetScope,
    ) -> Result<ScopePath, AppError> {
        let path = self.locate(target).await?;
        if !can_view(scope, &path) {
            return Err(AppError::Forbidden(format!(
                "usuário {} ({:?}, {:?}) sem leitura em {:?}",
                scope.user_id, scope.role, scope.descriptor, target
            )));
        }
        Ok(path)
    }

    /// Criação, alteração ou remoção. Mesmo 403 para qualquer recusa.
    pub async fn ensure_mutate(
        &self,
        scope: &RequestScope,
        target: TargetScope,
    ) -> Result<ScopePath, AppError> {
        let path = self.locate(target).await?;
        if !can_mutate(scope, &path) {
            return Err(AppError::Forbidden(format!(
                "usuário {} ({:?}, {:?}) sem escrita em {:?}",
                scope.user_id, scope.role, scope.descriptor, target
            )));
        }
        Ok(path)
    }

    pub async fn ensure_create_child(
        &self,
        scope: &RequestScope,
        parent: TargetScope,
        child_level: ScopeType,
    ) -> Result<ScopePath, AppError> {
        let path = self.locate(parent).await?;
        if !can_create_child(scope, &path, child_level) {
            return Err(AppError::Forbidden(format!(
                "usuário {} ({:?}) não pode criar {:?} em {:?}",
                scope.user_id, scope.role, child_level, parent
            )));
        }
        Ok(path)
    }

    /// A etiqueta que um recurso novo recebe: o escopo de quem cria.
    ///
    /// Recursos que precisam de etiqueta (reuniões, cargos) não podem nascer
    /// da sentinela "todas as localités".
    pub fn creation_tag(scope: &RequestScope) -> Result<TargetScope, AppError> {
        match scope.descriptor.as_target() {
            TargetScope::Global => Err(AppError::ScopeMissing(format!(
                "usuário {} sem escopo concreto para criar; informe x-scope-type/x-scope-id",
                scope.user_id
            ))),
            tag => Ok(tag),
        }
    }

    /// Faixa etária + contenção da section do membro no escopo do grupo.
    pub async fn classify_eligibility(
        &self,
        member: &Membre,
        group: &GroupDescriptor,
        today: NaiveDate,
    ) -> Result<Eligibility, AppError> {
        let bracket = eligibility::effective_bracket(member, today)?;
        let member_path = self.locate(TargetScope::Section(member.section_id)).await?;
        Ok(eligibility::classify(bracket, &member_path, group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::{membre, principal, Fixture};
    use crate::models::{auth::Role, bureau::AgeGroup, scope::ScopeDescriptor};

    fn service(fx: &Fixture) -> AccessService {
        AccessService::new(Arc::new(fx.store()))
    }

    #[tokio::test]
    async fn out_of_scope_is_forbidden_and_missing_is_not_found() {
        let fx = Fixture::new();
        let svc = service(&fx);
        let mut p = principal(Role::SectionUser);
        p.section_id = Some(fx.sec1);
        let scope = svc.resolve_scope(&p, None).await.unwrap();

        assert!(svc.ensure_view(&scope, TargetScope::Section(fx.sec1)).await.is_ok());
        assert!(matches!(
            svc.ensure_view(&scope, TargetScope::Section(fx.sec2)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            svc.ensure_mutate(&scope, TargetScope::SousLocalite(fx.sl1)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            svc.ensure_view(&scope, TargetScope::Section(Uuid::new_v4())).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn sentinel_scope_cannot_tag_new_resources() {
        let fx = Fixture::new();
        let svc = service(&fx);
        let owner = svc.resolve_scope(&principal(Role::Owner), None).await.unwrap();

        assert!(matches!(
            AccessService::creation_tag(&owner),
            Err(AppError::ScopeMissing(_))
        ));

        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));
        assert_eq!(
            AccessService::creation_tag(&admin).unwrap(),
            TargetScope::SousLocalite(fx.sl1)
        );
    }

    #[tokio::test]
    async fn eligibility_goes_through_the_member_section() {
        let fx = Fixture::new();
        let svc = service(&fx);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let m = membre(fx.sec3, NaiveDate::from_ymd_opt(2008, 1, 1), None);

        let in_sl2 = GroupDescriptor {
            age_group: AgeGroup::S1S2,
            scope: ScopeDescriptor::SousLocalite(fx.sl2),
        };
        let in_sl1 = GroupDescriptor {
            age_group: AgeGroup::S1S2,
            scope: ScopeDescriptor::SousLocalite(fx.sl1),
        };

        assert_eq!(
            svc.classify_eligibility(&m, &in_sl2, today).await.unwrap(),
            Eligibility::Eligible
        );
        assert_eq!(
            svc.classify_eligibility(&m, &in_sl1, today).await.unwrap(),
            Eligibility::OutOfScope
        );
    }

    #[tokio::test]
    async fn sous_localite_admin_creates_sections_only_below_itself() {
        let fx = Fixture::new();
        let svc = service(&fx);
        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));

        assert!(svc
            .ensure_create_child(&admin, TargetScope::SousLocalite(fx.sl1), ScopeType::Section)
            .await
            .is_ok());
        assert!(matches!(
            svc.ensure_create_child(&admin, TargetScope::SousLocalite(fx.sl2), ScopeType::Section)
                .await,
            Err(AppError::Forbidden(_))
        ));
    }
}
