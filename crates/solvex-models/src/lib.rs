//! # SolveX Models
//!
//! Domain models and DTOs for the SolveX API: database rows (`FromRow`),
//! request bodies (`Validate`) and response shapes (`ToSchema`).
//!
//! # Modules
//!
//! - [`auth`]: send-code, sign-up and sign-in bodies
//! - [`students`], [`professors`], [`organizations`]: the three account kinds
//! - [`tags`]: interest tags
//! - [`opportunities`]: research, project and internship postings
//! - [`applications`]: student applications and their status
//! - [`coins`]: student balances
//! - [`reports`]: weekly reports
//! - [`notifications`]: in-app notifications
//! - [`events`]: organization events
//!
//! Account rows never carry the password digest.

pub mod applications;
pub mod auth;
pub mod coins;
pub mod events;
pub mod notifications;
pub mod opportunities;
pub mod organizations;
pub mod professors;
pub mod reports;
pub mod students;
pub mod tags;

// Re-export commonly used types at crate root for convenience
pub use applications::{
    Application, ApplicationStatus, ApplicationWithDetails, CreateApplicationDto, OpportunityRef,
    UpdateApplicationStatusDto, WithdrawApplicationDto,
};
pub use auth::{
    OrganizationSignUpRequest, SendCodeRequest, SignInRequest, SignInResponse, SignUpRequest,
    normalize_email,
};
pub use coins::{Coins, CoinsAmountDto};
pub use events::{CreateEventDto, Event, EventWithOrganization, UpdateEventDto};
pub use notifications::{Notification, NotificationQuery, NotificationType, UnreadCountResponse};
pub use opportunities::{
    CreateOpportunityDto, Opportunity, OpportunityType, OpportunityWithDetails,
    UpdateOpportunityDto,
};
pub use organizations::{Organization, UpdateOrganizationDto};
pub use professors::{Professor, ProfessorSummary, UpdateProfessorDto};
pub use reports::{CreateReportDto, ReportWithStudent, WeeklyReport};
pub use students::{Student, StudentProfile, StudentSummary, UpdateStudentDto, UpdateStudentTagsDto};
pub use tags::{CreateTagDto, Tag};
