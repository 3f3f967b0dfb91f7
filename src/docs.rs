use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use solvex_auth::Role;
use solvex_core::{ErrorResponse, MessageResponse};
use solvex_models::{
    Application, ApplicationStatus, ApplicationWithDetails, Coins, CoinsAmountDto,
    CreateApplicationDto, CreateEventDto, CreateOpportunityDto, CreateReportDto, CreateTagDto,
    Event, EventWithOrganization, Notification, NotificationType, Opportunity, OpportunityRef,
    OpportunityType, OpportunityWithDetails, Organization, OrganizationSignUpRequest, Professor,
    ProfessorSummary, ReportWithStudent, SendCodeRequest, SignInRequest, SignInResponse,
    SignUpRequest, Student, StudentProfile, StudentSummary, Tag, UnreadCountResponse,
    UpdateApplicationStatusDto, UpdateEventDto, UpdateOpportunityDto, UpdateOrganizationDto,
    UpdateProfessorDto, UpdateStudentDto, UpdateStudentTagsDto, WeeklyReport,
    WithdrawApplicationDto,
};

use crate::middleware::auth::Principal;
use crate::modules::auth::model::ProfileResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::ping,
        crate::modules::auth::controller::send_code,
        crate::modules::auth::controller::sign_up,
        crate::modules::auth::controller::sign_in,
        crate::modules::auth::controller::get_profile,
        crate::modules::students::controller::get_me,
        crate::modules::students::controller::update_me,
        crate::modules::students::controller::update_my_tags,
        crate::modules::students::controller::delete_me,
        crate::modules::professors::controller::get_me,
        crate::modules::professors::controller::update_me,
        crate::modules::professors::controller::delete_me,
        crate::modules::organizations::controller::get_me,
        crate::modules::organizations::controller::update_me,
        crate::modules::organizations::controller::delete_me,
        crate::modules::organizations::controller::get_organization,
        crate::modules::tags::controller::list_tags,
        crate::modules::tags::controller::get_tag,
        crate::modules::tags::controller::create_tag,
        crate::modules::opportunities::controller::create_opportunity,
        crate::modules::opportunities::controller::list_opportunities,
        crate::modules::opportunities::controller::list_my_opportunities,
        crate::modules::opportunities::controller::get_opportunity,
        crate::modules::opportunities::controller::update_opportunity,
        crate::modules::opportunities::controller::delete_opportunity,
        crate::modules::opportunities::controller::list_public_opportunities,
        crate::modules::opportunities::controller::get_public_opportunity,
        crate::modules::applications::controller::apply,
        crate::modules::applications::controller::withdraw,
        crate::modules::applications::controller::list_my_applications,
        crate::modules::applications::controller::list_opportunity_applications,
        crate::modules::applications::controller::get_application,
        crate::modules::applications::controller::update_status,
        crate::modules::applications::controller::delete_application,
        crate::modules::coins::controller::get_my_coins,
        crate::modules::coins::controller::increment_coins,
        crate::modules::coins::controller::decrement_coins,
        crate::modules::reports::controller::create_report,
        crate::modules::reports::controller::list_my_reports,
        crate::modules::reports::controller::list_student_reports,
        crate::modules::reports::controller::get_report,
        crate::modules::reports::controller::delete_report,
        crate::modules::notifications::controller::list_my_notifications,
        crate::modules::notifications::controller::unread_count,
        crate::modules::notifications::controller::mark_read,
        crate::modules::notifications::controller::mark_all_read,
        crate::modules::notifications::controller::delete_notification,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::list_my_events,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::delete_event,
        crate::modules::events::controller::list_events,
        crate::modules::events::controller::get_event,
        crate::modules::events::controller::list_organization_events,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            Role,
            Principal,
            ProfileResponse,
            SendCodeRequest,
            SignUpRequest,
            OrganizationSignUpRequest,
            SignInRequest,
            SignInResponse,
            Student,
            StudentSummary,
            StudentProfile,
            UpdateStudentDto,
            UpdateStudentTagsDto,
            Professor,
            ProfessorSummary,
            UpdateProfessorDto,
            Organization,
            UpdateOrganizationDto,
            Tag,
            CreateTagDto,
            Opportunity,
            OpportunityType,
            OpportunityWithDetails,
            CreateOpportunityDto,
            UpdateOpportunityDto,
            Application,
            ApplicationStatus,
            ApplicationWithDetails,
            OpportunityRef,
            CreateApplicationDto,
            UpdateApplicationStatusDto,
            WithdrawApplicationDto,
            Coins,
            CoinsAmountDto,
            WeeklyReport,
            ReportWithStudent,
            CreateReportDto,
            Notification,
            NotificationType,
            UnreadCountResponse,
            Event,
            EventWithOrganization,
            CreateEventDto,
            UpdateEventDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Email verification, sign-up and sign-in"),
        (name = "Students", description = "Student accounts"),
        (name = "Professors", description = "Professor accounts"),
        (name = "Organizations", description = "Organization accounts and public profiles"),
        (name = "Tags", description = "Interest tags"),
        (name = "Opportunities", description = "Research, project and internship postings"),
        (name = "Applications", description = "Student applications to opportunities"),
        (name = "Coins", description = "Student coin balances"),
        (name = "Reports", description = "Weekly reports from students to professors"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Events", description = "Organization events")
    ),
    info(
        title = "SolveX API",
        version = "0.1.0",
        description = "Matchmaking between students, professors and organizations: opportunities, applications, weekly reports, coins and events."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
