// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,

        // --- Hierarchy ---
        handlers::hierarchy::create_localite,
        handlers::hierarchy::list_localites,
        handlers::hierarchy::create_sous_localite,
        handlers::hierarchy::list_sous_localites,
        handlers::hierarchy::create_section,
        handlers::hierarchy::list_sections,

        // --- Members ---
        handlers::members::create_member,
        handlers::members::list_members,
        handlers::members::get_member,
        handlers::members::update_member,
        handlers::members::delete_member,

        // --- Meetings ---
        handlers::meetings::create_meeting_type,
        handlers::meetings::list_meeting_types,
        handlers::meetings::delete_meeting_type,
        handlers::meetings::create_meeting,
        handlers::meetings::list_meetings,
        handlers::meetings::get_meeting,
        handlers::meetings::update_meeting,
        handlers::meetings::delete_meeting,

        // --- Bureau ---
        handlers::bureau::create_post,
        handlers::bureau::list_posts,
        handlers::bureau::delete_post,
        handlers::bureau::assign_member,
        handlers::bureau::list_assignments,
        handlers::bureau::delete_assignment,

        // --- Stats ---
        handlers::stats::member_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,
            models::auth::InitialUserPayload,
            models::scope::ScopeType,
            models::scope::RequestScope,

            // --- Hierarchy ---
            models::hierarchy::Localite,
            models::hierarchy::SousLocalite,
            models::hierarchy::Section,
            models::hierarchy::CreateLocalitePayload,
            models::hierarchy::CreateSousLocalitePayload,
            models::hierarchy::CreateSectionPayload,
            models::hierarchy::SousLocaliteCreated,
            models::hierarchy::SectionCreated,

            // --- Members ---
            models::member::AgeBracket,
            models::member::Membre,
            models::member::CreateMembrePayload,
            models::member::UpdateMembrePayload,

            // --- Meetings ---
            models::meeting::MeetingType,
            models::meeting::Meeting,
            models::meeting::CreateMeetingTypePayload,
            models::meeting::MeetingPayload,

            // --- Bureau ---
            models::bureau::AgeGroup,
            models::bureau::BureauPost,
            models::bureau::BureauAssignment,
            models::bureau::CreateBureauPostPayload,
            models::bureau::AssignMembrePayload,

            // --- Stats ---
            models::stats::BracketCounts,
            models::stats::MemberStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuário atual e usuários do escopo"),
        (name = "Hierarchy", description = "Localités, Sous-Localités e Sections"),
        (name = "Members", description = "Membros (presos a uma Section)"),
        (name = "Meetings", description = "Reuniões e tipos de reunião"),
        (name = "Bureau", description = "Cargos e atribuições com elegibilidade"),
        (name = "Stats", description = "Indicadores de membros por escopo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
