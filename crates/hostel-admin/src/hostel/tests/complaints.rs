use chrono::Duration;

use super::common::*;
use crate::clock::Clock;
use crate::hostel::domain::{
    parse_ticket, ComplaintCategory, ComplaintPatch, ComplaintStatus, NewComplaint, Priority,
    ProfileId, UserId,
};
use crate::hostel::service::ComplaintFilter;
use crate::hostel::{PageRequest, ServiceError};

fn leak(student: ProfileId, subject: &str) -> NewComplaint {
    NewComplaint {
        student,
        category: ComplaintCategory::Maintenance,
        subject: subject.to_string(),
        description: "Water dripping from the ceiling".to_string(),
        location: "Block A, 2nd floor washroom".to_string(),
        priority: Priority::High,
        attachment: None,
    }
}

#[test]
fn tickets_carry_the_filing_date_and_a_four_digit_sequence() {
    let (admin, _) = build_admin();
    let (_, profile) = student(&admin, "nadia");

    let first = admin
        .file_complaint(leak(profile.id, "Leaking pipe"))
        .expect("filed");
    let second = admin
        .file_complaint(leak(profile.id, "Leaking tap"))
        .expect("filed");

    assert_eq!(first.complaint_id, "CMP-20250310-0001");
    assert_eq!(second.complaint_id, "CMP-20250310-0002");
    assert_eq!(first.status, ComplaintStatus::Submitted);
    assert_eq!(
        parse_ticket(&second.complaint_id),
        Some((day(2025, 3, 10), 2))
    );
}

#[test]
fn sequence_restarts_each_day_then_follows_primary_keys() {
    let (admin, clock) = build_admin();
    let (_, profile) = student(&admin, "nadia");
    for subject in ["One", "Two"] {
        admin
            .file_complaint(leak(profile.id, subject))
            .expect("filed");
    }

    clock.advance(Duration::days(1));
    let morning = admin
        .file_complaint(leak(profile.id, "Three"))
        .expect("filed");
    let evening = admin
        .file_complaint(leak(profile.id, "Four"))
        .expect("filed");

    assert_eq!(morning.complaint_id, "CMP-20250311-0001");
    assert_eq!(morning.id.0, 3);
    assert_eq!(evening.complaint_id, "CMP-20250311-0004");
}

#[test]
fn resolving_stamps_the_resolution_time_once() {
    let (admin, clock) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    let complaint = admin
        .file_complaint(leak(profile.id, "Leaking pipe"))
        .expect("filed");

    clock.advance(Duration::hours(3));
    let resolved_at = clock.now();
    let resolved = admin
        .update_complaint(
            complaint.id,
            ComplaintPatch {
                status: Some(ComplaintStatus::Resolved),
                assigned_to: Some(Some(warden.id)),
                resolution_notes: Some("Pipe replaced".to_string()),
                ..ComplaintPatch::default()
            },
        )
        .expect("resolved");
    assert_eq!(resolved.resolved_at, Some(resolved_at));
    assert_eq!(resolved.assigned_to, Some(warden.id));
    assert!(!resolved.is_open());

    clock.advance(Duration::days(1));
    let closed = admin
        .update_complaint(
            complaint.id,
            ComplaintPatch {
                status: Some(ComplaintStatus::Closed),
                ..ComplaintPatch::default()
            },
        )
        .expect("closed");
    assert_eq!(closed.resolved_at, Some(resolved_at));

    let reopened = admin
        .update_complaint(
            complaint.id,
            ComplaintPatch {
                status: Some(ComplaintStatus::InProgress),
                ..ComplaintPatch::default()
            },
        )
        .expect("reopened");
    assert_eq!(reopened.resolved_at, None);
    assert_eq!(reopened.complaint_id, complaint.complaint_id);
}

#[test]
fn assignee_must_exist() {
    let (admin, _) = build_admin();
    let (_, profile) = student(&admin, "nadia");
    let complaint = admin
        .file_complaint(leak(profile.id, "Leaking pipe"))
        .expect("filed");

    let err = admin
        .update_complaint(
            complaint.id,
            ComplaintPatch {
                assigned_to: Some(Some(UserId(404))),
                status: Some(ComplaintStatus::InProgress),
                ..ComplaintPatch::default()
            },
        )
        .expect_err("unknown assignee");
    assert!(matches!(err, ServiceError::NotFound { model: "user", .. }));
    assert_eq!(
        admin.get_complaint(complaint.id).expect("complaint").status,
        ComplaintStatus::Submitted
    );
}

#[test]
fn complaints_are_found_by_ticket_and_search() {
    let (admin, clock) = build_admin();
    let (_, profile) = student(&admin, "nadia");
    let leak_report = admin
        .file_complaint(leak(profile.id, "Leaking pipe"))
        .expect("filed");
    clock.advance(Duration::minutes(5));
    let mut noise = leak(profile.id, "Loud generator");
    noise.category = ComplaintCategory::Noise;
    noise.location = "Courtyard".to_string();
    admin.file_complaint(noise).expect("filed");

    let found = admin
        .complaint_by_ticket(&leak_report.complaint_id)
        .expect("ticket known");
    assert_eq!(found.id, leak_report.id);

    let err = admin
        .complaint_by_ticket("CMP-19990101-0001")
        .expect_err("unknown ticket");
    assert!(matches!(err, ServiceError::NotFound { .. }));

    let listed = admin
        .list_complaints(&ComplaintFilter::default(), PageRequest::default())
        .expect("list");
    assert_eq!(listed.results[0].subject, "Loud generator");

    let searched = admin
        .list_complaints(
            &ComplaintFilter {
                search: Some("courtyard".to_string()),
                ..ComplaintFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(searched.count, 1);
    assert_eq!(searched.results[0].category, ComplaintCategory::Noise);
}

#[test]
fn complaints_need_a_known_student_and_a_subject() {
    let (admin, _) = build_admin();
    let err = admin
        .file_complaint(leak(ProfileId(9), "Leaking pipe"))
        .expect_err("unknown student");
    assert!(matches!(err, ServiceError::NotFound { .. }));

    let (_, profile) = student(&admin, "nadia");
    let err = admin
        .file_complaint(leak(profile.id, "   "))
        .expect_err("blank subject");
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(tables(&admin).complaints.is_empty());
}
