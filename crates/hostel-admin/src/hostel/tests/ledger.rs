use chrono::Duration;
use rust_decimal::Decimal;

use super::common::*;
use crate::hostel::domain::{
    ItemCategory, ItemStatus, LostItemPatch, NewLostItem, NewStipend, PaymentMethod, ProfileId,
    UserId,
};
use crate::hostel::service::{LostItemFilter, StipendFilter};
use crate::hostel::{PageRequest, ServiceError};

fn payout(student: ProfileId, processed_by: UserId, reference: &str) -> NewStipend {
    NewStipend {
        student,
        amount: Decimal::new(1500, 0),
        payment_method: PaymentMethod::BankTransfer,
        reference_number: reference.to_string(),
        processed_by,
        notes: String::new(),
    }
}

fn lost_wallet(reporter: ProfileId) -> NewLostItem {
    NewLostItem {
        reporter,
        item_name: "Wallet".to_string(),
        description: "Brown leather wallet".to_string(),
        category: ItemCategory::Accessories,
        lost_location: "Dining hall".to_string(),
        lost_date: opening_day() - Duration::days(1),
        contact_info: "nadia@example.edu".to_string(),
        image: None,
        status: ItemStatus::Lost,
        expires_at: None,
    }
}

#[test]
fn stipends_are_labelled_with_student_amount_and_date() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");

    let stipend = admin
        .record_stipend(payout(profile.id, warden.id, "TXN-0001"))
        .expect("recorded");
    assert_eq!(
        stipend.label(&profile),
        format!("{} - $1500.00 - 2025-03-10", profile.student_id)
    );
}

#[test]
fn stipend_references_are_unique_and_amounts_positive() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    admin
        .record_stipend(payout(profile.id, warden.id, "TXN-0001"))
        .expect("recorded");

    let err = admin
        .record_stipend(payout(profile.id, warden.id, "TXN-0001"))
        .expect_err("reference reused");
    assert!(matches!(err, ServiceError::Conflict(_)));

    let mut free = payout(profile.id, warden.id, "TXN-0002");
    free.amount = Decimal::ZERO;
    let err = admin.record_stipend(free).expect_err("zero amount");
    assert!(matches!(err, ServiceError::Validation(_)));

    let listed = admin
        .list_stipends(
            &StipendFilter {
                student: Some(profile.id),
                ..StipendFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(listed.count, 1);
}

#[test]
fn deleting_the_processor_removes_their_payouts() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    admin
        .record_stipend(payout(profile.id, warden.id, "TXN-0001"))
        .expect("recorded");

    admin.delete_user(warden.id).expect("deleted");
    assert!(tables(&admin).stipend_transactions.is_empty());
    assert_eq!(tables(&admin).student_profiles.len(), 1);
}

#[test]
fn lost_items_expire_thirty_days_after_the_report() {
    let (admin, _) = build_admin();
    let (_, profile) = student(&admin, "nadia");

    let item = admin.report_lost_item(lost_wallet(profile.id)).expect("reported");
    assert_eq!(item.expires_at, opening_day() + Duration::days(30));
    assert_eq!(item.to_string(), "Wallet - lost");
}

#[test]
fn expiry_action_only_touches_unclaimed_overdue_reports() {
    let (admin, clock) = build_admin();
    let (_, profile) = student(&admin, "nadia");
    let wallet = admin.report_lost_item(lost_wallet(profile.id)).expect("reported");
    let mut keys = lost_wallet(profile.id);
    keys.item_name = "Keys".to_string();
    let keys = admin.report_lost_item(keys).expect("reported");
    admin
        .update_lost_item(
            keys.id,
            LostItemPatch {
                status: Some(ItemStatus::Claimed),
                ..LostItemPatch::default()
            },
        )
        .expect("claimed");

    let early = admin.expire_lost_items().expect("action runs");
    assert_eq!(early.affected, 0);

    clock.advance(Duration::days(31));
    let outcome = admin.expire_lost_items().expect("action runs");
    assert_eq!(outcome.affected, 1);
    assert_eq!(outcome.message, "1 lost items marked as expired.");
    assert_eq!(
        admin.get_lost_item(wallet.id).expect("item").status,
        ItemStatus::Expired
    );
    assert_eq!(
        admin.get_lost_item(keys.id).expect("item").status,
        ItemStatus::Claimed
    );

    let expired = admin
        .list_lost_items(
            &LostItemFilter {
                status: Some(ItemStatus::Expired),
                ..LostItemFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(expired.count, 1);
}

#[test]
fn lost_item_reports_are_validated() {
    let (admin, _) = build_admin();
    let (_, profile) = student(&admin, "nadia");
    let mut report = lost_wallet(profile.id);
    report.contact_info = String::new();
    report.item_name = "x".repeat(101);

    let errors = match admin.report_lost_item(report) {
        Err(ServiceError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    let fields: Vec<_> = errors.fields().map(|error| error.field).collect();
    assert_eq!(fields, ["item_name", "contact_info"]);
}
