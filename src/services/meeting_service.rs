// src/services/meeting_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    access::query::ScopeFilter,
    common::error::AppError,
    db::MeetingStore,
    models::{
        meeting::{CreateMeetingTypePayload, Meeting, MeetingPayload, MeetingType},
        scope::RequestScope,
    },
    services::access_service::AccessService,
};

#[derive(Clone)]
pub struct MeetingService {
    meeting_repo: Arc<dyn MeetingStore>,
    access: AccessService,
}

impl MeetingService {
    pub fn new(meeting_repo: Arc<dyn MeetingStore>, access: AccessService) -> Self {
        Self { meeting_repo, access }
    }

    // =========================================================================
    //  1. TIPOS DE REUNIÃO
    // =========================================================================

    /// A etiqueta é o escopo de quem cria; a sentinela "todas" vira um tipo global.
    pub async fn create_type(
        &self,
        scope: &RequestScope,
        payload: &CreateMeetingTypePayload,
    ) -> Result<MeetingType, AppError> {
        let tag = scope.descriptor.as_target();
        self.access.ensure_mutate(scope, tag).await?;

        self.meeting_repo.create_type(payload, tag, scope.user_id).await
    }

    pub async fn list_types(&self, scope: &RequestScope) -> Result<Vec<MeetingType>, AppError> {
        self.meeting_repo.list_types(&ScopeFilter::for_scope(scope)).await
    }

    pub async fn delete_type(&self, scope: &RequestScope, id: Uuid) -> Result<(), AppError> {
        let meeting_type = self.load_type(id).await?;
        self.access.ensure_mutate(scope, meeting_type.target()?).await?;

        self.meeting_repo.delete_type(id).await
    }

    async fn load_type(&self, id: Uuid) -> Result<MeetingType, AppError> {
        self.meeting_repo
            .find_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tipo de reunião".into()))
    }

    // Uma reunião só pode usar um tipo que aparece na listagem do autor
    async fn check_type_reference(
        &self,
        scope: &RequestScope,
        meeting_type_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(type_id) = meeting_type_id else {
            return Ok(());
        };

        let meeting_type = self.load_type(type_id).await?;
        let path = self.access.locate(meeting_type.target()?).await?;
        if !ScopeFilter::for_scope(scope).matches_meeting_type(&path) {
            return Err(AppError::Forbidden(format!(
                "usuário {} não enxerga o tipo de reunião {}",
                scope.user_id, type_id
            )));
        }
        Ok(())
    }

    // =========================================================================
    //  2. REUNIÕES
    // =========================================================================

    pub async fn create(
        &self,
        scope: &RequestScope,
        payload: &MeetingPayload,
    ) -> Result<Meeting, AppError> {
        let tag = AccessService::creation_tag(scope)?;
        self.access.ensure_mutate(scope, tag).await?;
        self.check_type_reference(scope, payload.meeting_type_id).await?;

        let meeting = self.meeting_repo.create(payload, tag, scope.user_id).await?;
        tracing::info!(meeting_id = %meeting.id, tag = ?tag, "Reunião criada");
        Ok(meeting)
    }

    pub async fn get(&self, scope: &RequestScope, id: Uuid) -> Result<Meeting, AppError> {
        let meeting = self.load(id).await?;
        self.access.ensure_view(scope, meeting.target()).await?;
        Ok(meeting)
    }

    pub async fn update(
        &self,
        scope: &RequestScope,
        id: Uuid,
        payload: &MeetingPayload,
    ) -> Result<Meeting, AppError> {
        let current = self.load(id).await?;
        self.access.ensure_mutate(scope, current.target()).await?;
        self.check_type_reference(scope, payload.meeting_type_id).await?;

        self.meeting_repo.update(id, payload).await
    }

    pub async fn delete(&self, scope: &RequestScope, id: Uuid) -> Result<(), AppError> {
        let current = self.load(id).await?;
        self.access.ensure_mutate(scope, current.target()).await?;

        self.meeting_repo.delete(id).await
    }

    pub async fn list(&self, scope: &RequestScope) -> Result<Vec<Meeting>, AppError> {
        self.meeting_repo.list(&ScopeFilter::for_scope(scope)).await
    }

    async fn load(&self, id: Uuid) -> Result<Meeting, AppError> {
        self.meeting_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reunião".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        access::testing::Fixture,
        db::MockMeetingStore,
        models::{
            auth::Role,
            scope::{ScopeDescriptor, ScopeType, TargetScope},
        },
    };
    use chrono::Utc;

    fn meeting_type(scope_type: Option<ScopeType>, scope_id: Option<Uuid>) -> MeetingType {
        MeetingType {
            id: Uuid::new_v4(),
            name: "Assembleia".into(),
            description: None,
            scope_type,
            scope_id,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(meeting_type_id: Uuid) -> MeetingPayload {
        MeetingPayload {
            title: "Reunião mensal".into(),
            description: None,
            location: None,
            scheduled_at: Utc::now(),
            meeting_type_id: Some(meeting_type_id),
        }
    }

    fn store_with(meeting_type: &MeetingType) -> MockMeetingStore {
        let mut store = MockMeetingStore::new();
        let found = meeting_type.clone();
        store
            .expect_find_type()
            .returning(move |_| Ok(Some(found.clone())));
        store
    }

    fn echo_create(store: &mut MockMeetingStore) {
        store
            .expect_create()
            .times(1)
            .returning(|payload, tag, created_by| {
                let (scope_type, scope_id) = tag.columns();
                Ok(Meeting {
                    id: Uuid::new_v4(),
                    title: payload.title.clone(),
                    description: None,
                    location: None,
                    scheduled_at: payload.scheduled_at,
                    meeting_type_id: payload.meeting_type_id,
                    scope_type: scope_type.unwrap_or(ScopeType::Section),
                    scope_id: scope_id.unwrap_or_default(),
                    created_by,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });
    }

    fn service(fx: &Fixture, store: MockMeetingStore) -> MeetingService {
        MeetingService::new(Arc::new(store), AccessService::new(Arc::new(fx.store())))
    }

    #[tokio::test]
    async fn type_of_another_section_is_forbidden() {
        let fx = Fixture::new();
        let other = meeting_type(Some(ScopeType::Section), Some(fx.sec2));
        let mut store = store_with(&other);
        store.expect_create().times(0);

        let svc = service(&fx, store);
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        let err = svc.create(&u1, &payload(other.id)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn global_type_is_usable_everywhere() {
        let fx = Fixture::new();
        let global = meeting_type(None, None);
        let mut store = store_with(&global);
        echo_create(&mut store);

        let svc = service(&fx, store);
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        let meeting = svc.create(&u1, &payload(global.id)).await.unwrap();
        assert_eq!(meeting.target(), TargetScope::Section(fx.sec1));
    }

    #[tokio::test]
    async fn admin_may_use_a_section_type_of_its_subtree() {
        let fx = Fixture::new();
        let below = meeting_type(Some(ScopeType::Section), Some(fx.sec2));
        let mut store = store_with(&below);
        echo_create(&mut store);

        let svc = service(&fx, store);
        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));

        let meeting = svc.create(&admin, &payload(below.id)).await.unwrap();
        assert_eq!(meeting.target(), TargetScope::SousLocalite(fx.sl1));
    }

    #[tokio::test]
    async fn update_cannot_switch_to_a_foreign_type() {
        let fx = Fixture::new();
        let foreign = meeting_type(Some(ScopeType::SousLocalite), Some(fx.sl3));
        let mut store = store_with(&foreign);
        let existing_id = Uuid::new_v4();
        let sec1 = fx.sec1;
        store.expect_find_by_id().returning(move |id| {
            Ok(Some(Meeting {
                id,
                title: "Antiga".into(),
                description: None,
                location: None,
                scheduled_at: Utc::now(),
                meeting_type_id: None,
                scope_type: ScopeType::Section,
                scope_id: sec1,
                created_by: Uuid::new_v4(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        store.expect_update().times(0);

        let svc = service(&fx, store);
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        let err = svc.update(&u1, existing_id, &payload(foreign.id)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "{:?}", err);
    }
}
