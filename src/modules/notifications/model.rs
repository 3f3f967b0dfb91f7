use solvex_models::ApplicationStatus;

pub use solvex_models::notifications::*;

/// Title, message and kind of a notification before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
}

impl NewNotification {
    /// The notice a student gets when a professor decides on their
    /// application. Pending is not a decision and yields nothing.
    pub fn application_decision(opportunity_name: &str, status: ApplicationStatus) -> Option<Self> {
        match status {
            ApplicationStatus::Accepted => Some(Self {
                title: "🎉 Application Accepted!".to_string(),
                message: format!("Your application for '{}' has been accepted", opportunity_name),
                kind: NotificationType::Success,
            }),
            ApplicationStatus::Rejected => Some(Self {
                title: "Application Update".to_string(),
                message: format!(
                    "Your application for '{}' was not accepted this time",
                    opportunity_name
                ),
                kind: NotificationType::Info,
            }),
            ApplicationStatus::Pending => None,
        }
    }

    pub fn report_submitted(student_name: &str) -> Self {
        Self {
            title: "📝 Weekly Report Submitted".to_string(),
            message: format!("{} submitted a weekly report", student_name),
            kind: NotificationType::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_notice() {
        let notice =
            NewNotification::application_decision("Compiler Lab", ApplicationStatus::Accepted)
                .unwrap();
        assert_eq!(notice.title, "🎉 Application Accepted!");
        assert_eq!(notice.kind, NotificationType::Success);
        assert_eq!(
            notice.message,
            "Your application for 'Compiler Lab' has been accepted"
        );
    }

    #[test]
    fn test_rejected_notice() {
        let notice =
            NewNotification::application_decision("Compiler Lab", ApplicationStatus::Rejected)
                .unwrap();
        assert_eq!(notice.title, "Application Update");
        assert_eq!(notice.kind, NotificationType::Info);
        assert!(notice.message.contains("was not accepted this time"));
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        assert!(
            NewNotification::application_decision("Compiler Lab", ApplicationStatus::Pending)
                .is_none()
        );
    }

    #[test]
    fn test_report_notice() {
        let notice = NewNotification::report_submitted("Ada Lovelace");
        assert_eq!(notice.message, "Ada Lovelace submitted a weekly report");
        assert_eq!(notice.kind, NotificationType::Info);
    }
}
