//! Message text for reminders and alerts.

use chrono::SecondsFormat;
use coursehub_core::types::Timestamp;
use coursehub_db::models::activity_tracker::ActivityLogDetails;
use coursehub_db::models::course_allocation::AllocationDetails;
use coursehub_db::models::user::User;

use crate::delivery::{MessageKind, OutboundMessage};
use crate::item::{AlertItem, ReminderItem};

const SIGNATURE: &str = "Best regards,\nCourse Management System";

/// Reminder to `facilitator` that the log for `item`'s week is due.
pub fn reminder_message(
    facilitator: &User,
    allocation: &AllocationDetails,
    item: &ReminderItem,
    now: Timestamp,
) -> OutboundMessage {
    let body = format!(
        "Dear {name},\n\n\
         This is a friendly reminder that your weekly activity log for Week {week} ({year}) is due.\n\n\
         Course: {code} - {title}\n\
         Cohort: {cohort}\n\n\
         Please submit your activity log as soon as possible to ensure compliance with institutional requirements.\n\n\
         {SIGNATURE}",
        name = facilitator.full_name(),
        week = item.week_number,
        year = item.academic_year,
        code = allocation.course_code,
        title = allocation.course_title,
        cohort = allocation.cohort_name,
    );

    OutboundMessage {
        kind: MessageKind::Reminder,
        recipients: vec![facilitator.email.clone()],
        subject: format!("Weekly Activity Log Reminder - Week {}", item.week_number),
        body,
        timestamp: now,
    }
}

/// Alert to every manager in `managers` about `item`.
pub fn alert_message(
    facilitator: &User,
    log: &ActivityLogDetails,
    managers: &[User],
    item: &AlertItem,
    now: Timestamp,
) -> OutboundMessage {
    let body = format!(
        "Dear Manager,\n\n\
         An activity log has been {action} by {name}.\n\n\
         Details:\n\
         - Week: {week}\n\
         - Academic Year: {year}\n\
         - Course: {code} - {title}\n\
         - Cohort: {cohort}\n\
         - Action: {action}\n\
         - Completion: {completion}%\n\
         - Timestamp: {timestamp}\n\n\
         Please review the submission in the system.\n\n\
         {SIGNATURE}",
        action = item.action,
        name = facilitator.full_name(),
        week = item.week_number,
        year = item.academic_year,
        code = log.course_code,
        title = log.course_title,
        cohort = log.cohort_name,
        completion = log.log.completion_percentage(),
        timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    OutboundMessage {
        kind: MessageKind::Alert,
        recipients: managers.iter().map(|m| m.email.clone()).collect(),
        subject: format!(
            "Activity Log {} - Week {}",
            item.action.capitalized(),
            item.week_number
        ),
        body,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use coursehub_core::week::{AcademicYear, WeekNumber};
    use coursehub_db::models::activity_tracker::{ActivityTracker, STATUS_DONE, STATUS_PENDING};
    use coursehub_db::models::course_allocation::CourseAllocation;

    use super::*;
    use crate::item::AlertAction;

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    fn user(id: i64, first: &str, last: &str, email: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            user_role: "manager".to_string(),
            is_active: true,
            last_login_at: None,
            created_at: at(),
            updated_at: at(),
        }
    }

    fn allocation() -> CourseAllocation {
        CourseAllocation {
            id: 5,
            course_id: 1,
            facilitator_id: 7,
            cohort_id: 1,
            trimester: "HT1".to_string(),
            intake_period: "2024S".to_string(),
            delivery_mode: "online".to_string(),
            class_section: "A".to_string(),
            is_active: true,
            assigned_by: 1,
            created_at: at(),
            updated_at: at(),
        }
    }

    #[test]
    fn reminder_addresses_the_facilitator() {
        let facilitator = user(7, "John", "Smith", "john.smith@institution.com");
        let details = AllocationDetails {
            allocation: allocation(),
            course_code: "CS101".to_string(),
            course_title: "Introduction to Computer Science".to_string(),
            cohort_name: "2024-Spring".to_string(),
        };
        let item = ReminderItem {
            facilitator_id: 7,
            allocation_id: 5,
            week_number: WeekNumber::new(3).unwrap(),
            academic_year: AcademicYear::new("2024").unwrap(),
            enqueued_at: at(),
        };

        let message = reminder_message(&facilitator, &details, &item, at());
        assert_eq!(message.kind, MessageKind::Reminder);
        assert_eq!(message.recipients, vec!["john.smith@institution.com"]);
        assert_eq!(message.subject, "Weekly Activity Log Reminder - Week 3");
        assert!(message.body.starts_with("Dear John Smith,"));
        assert!(message.body.contains("Week 3 (2024) is due"));
        assert!(message.body.contains("Course: CS101 - Introduction to Computer Science"));
        assert!(message.body.contains("Cohort: 2024-Spring"));
    }

    #[test]
    fn alert_goes_to_every_manager() {
        let facilitator = user(7, "John", "Smith", "john.smith@institution.com");
        let managers = [
            user(1, "Ada", "Lovelace", "ada@institution.com"),
            user(2, "Alan", "Turing", "alan@institution.com"),
        ];
        let log = ActivityLogDetails {
            log: ActivityTracker {
                id: 42,
                allocation_id: 5,
                facilitator_id: 7,
                week_number: 2,
                academic_year: "2024".to_string(),
                attendance_status: serde_json::json!([true, true]),
                formative_one_grading: STATUS_DONE.to_string(),
                formative_two_grading: STATUS_DONE.to_string(),
                summative_grading: STATUS_DONE.to_string(),
                course_moderation: STATUS_PENDING.to_string(),
                intranet_sync: STATUS_PENDING.to_string(),
                grade_book_status: STATUS_PENDING.to_string(),
                additional_notes: None,
                submitted_at: at(),
                last_updated_at: at(),
            },
            course_code: "CS101".to_string(),
            course_title: "Introduction to Computer Science".to_string(),
            cohort_name: "2024-Spring".to_string(),
        };
        let item = AlertItem {
            action: AlertAction::Submitted,
            log_id: 42,
            facilitator_id: 7,
            week_number: WeekNumber::new(2).unwrap(),
            academic_year: AcademicYear::new("2024").unwrap(),
            enqueued_at: at(),
        };

        let message = alert_message(&facilitator, &log, &managers, &item, at());
        assert_eq!(message.kind, MessageKind::Alert);
        assert_eq!(
            message.recipients,
            vec!["ada@institution.com", "alan@institution.com"]
        );
        assert_eq!(message.subject, "Activity Log Submitted - Week 2");
        assert!(message.body.contains("has been submitted by John Smith."));
        assert!(message.body.contains("- Academic Year: 2024"));
        assert!(message.body.contains("- Completion: 50%"));
        assert!(message.body.contains("- Timestamp: 2024-01-10T09:00:00.000Z"));
    }
}
