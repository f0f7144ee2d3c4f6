use rust_decimal::Decimal;

use super::common::*;
use crate::clock::Clock;
use crate::hostel::domain::{
    ApplicationDecision, ApplicationStatus, NewRoom, NewRoomAllocation, NewRoomApplication,
    ProfileId, RoomId, RoomPatch, UserId,
};
use crate::hostel::service::{ApplicationFilter, RoomFilter};
use crate::hostel::{PageRequest, RoomCsvImporter, ServiceError};

fn placement(student: ProfileId, room: RoomId, by: UserId) -> NewRoomAllocation {
    NewRoomAllocation {
        student,
        room,
        allocated_by: by,
        notes: String::new(),
        application: None,
    }
}

#[test]
fn occupancy_drives_free_beds() {
    let (admin, _) = build_admin();
    let mut draft = NewRoom::new("A-101", 1);
    draft.capacity = 3;
    draft.current_occupancy = 1;
    let room = admin.create_room(draft).expect("room created");
    assert_eq!(room.available_beds(), 2);
    assert!(!room.is_full());

    let crowded = admin
        .update_room(
            room.id,
            RoomPatch {
                current_occupancy: Some(4),
                ..RoomPatch::default()
            },
        )
        .expect("room updated");
    assert_eq!(crowded.available_beds(), -1);
    assert!(crowded.is_full());
}

#[test]
fn room_numbers_are_unique() {
    let (admin, _) = build_admin();
    room(&admin, "A-101", 2);

    let err = admin
        .create_room(NewRoom::new("A-101", 3))
        .expect_err("room number taken");
    assert!(
        matches!(err, ServiceError::Conflict(ref message) if message == "room with this room number already exists")
    );
    assert_eq!(tables(&admin).rooms.len(), 1);
}

#[test]
fn rent_must_fit_the_money_column() {
    let (admin, _) = build_admin();
    let mut draft = NewRoom::new("A-102", 1);
    draft.rent_amount = Decimal::new(1234567, 3);

    let err = admin.create_room(draft).expect_err("three decimal places");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn bulk_actions_report_the_rooms_they_touched() {
    let (admin, _) = build_admin();
    let first = room(&admin, "A-101", 2);
    let second = room(&admin, "A-102", 2);
    let untouched = room(&admin, "A-103", 2);

    let outcome = admin
        .make_rooms_unavailable(&[first.id, second.id, RoomId(999)])
        .expect("action applied");
    assert_eq!(outcome.affected, 2);
    assert_eq!(outcome.message, "2 rooms marked as unavailable.");

    let unavailable = admin
        .list_rooms(
            &RoomFilter {
                is_available: Some(false),
                ..RoomFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(unavailable.count, 2);
    assert!(admin.get_room(untouched.id).expect("room").is_available);

    let outcome = admin
        .make_rooms_available(&[first.id])
        .expect("action applied");
    assert_eq!(outcome.message, "1 rooms marked as available.");
    assert_eq!(outcome.action, "make_available");
}

#[test]
fn room_changelist_shows_twenty_per_page_in_number_order() {
    let (admin, _) = build_admin();
    for number in (1..=25).rev() {
        room(&admin, &format!("B-{number:03}"), 2);
    }

    let first = admin
        .list_rooms(&RoomFilter::default(), PageRequest::default())
        .expect("list");
    assert_eq!(first.per_page, 20);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.results.len(), 20);
    assert_eq!(first.results[0].room_number, "B-001");

    let search = admin
        .list_rooms(
            &RoomFilter {
                search: Some("b-02".to_string()),
                ..RoomFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(search.count, 6);
}

#[test]
fn import_skips_known_and_invalid_rooms() {
    let (admin, _) = build_admin();
    room(&admin, "A-101", 2);

    let mut zero_capacity = NewRoom::new("A-104", 1);
    zero_capacity.capacity = 0;
    let summary = admin
        .import_rooms(vec![
            NewRoom::new("A-101", 1),
            NewRoom::new("A-102", 1),
            NewRoom::new("A-102", 1),
            zero_capacity,
            NewRoom::new("A-103", 1),
        ])
        .expect("import runs");

    let created: Vec<_> = summary
        .created
        .iter()
        .map(|room| room.room_number.as_str())
        .collect();
    assert_eq!(created, ["A-102", "A-103"]);
    let skipped: Vec<_> = summary
        .skipped
        .iter()
        .map(|room| room.room_number.as_str())
        .collect();
    assert_eq!(skipped, ["A-101", "A-102", "A-104"]);
    assert_eq!(tables(&admin).rooms.len(), 3);
}

#[test]
fn sheet_import_reports_unreadable_rows_by_line() {
    let (admin, _) = build_admin();
    room(&admin, "A-104", 2);

    let sheet = RoomCsvImporter::from_reader(
        "Room Number,Floor,Air Conditioning\nA-101,1,yes\nA-102,ground,no\nA-103,1,maybe\nA-104,1,no\n"
            .as_bytes(),
    )
    .expect("sheet structure is fine");
    let summary = admin.import_room_sheet(sheet).expect("import runs");

    let created: Vec<_> = summary
        .created
        .iter()
        .map(|room| room.room_number.as_str())
        .collect();
    assert_eq!(created, ["A-101"]);
    assert!(summary.created[0].has_air_conditioning);

    let skipped: Vec<_> = summary
        .skipped
        .iter()
        .map(|room| (room.room_number.as_str(), room.line))
        .collect();
    assert_eq!(
        skipped,
        [("A-102", Some(3)), ("A-103", Some(4)), ("A-104", None)]
    );
    assert_eq!(summary.skipped[0].reason, "Floor `ground` is not a whole number");
    assert_eq!(tables(&admin).rooms.len(), 2);
}

#[test]
fn allocation_takes_a_bed_and_release_gives_it_back() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    let room = room(&admin, "A-101", 2);

    let allocation = admin
        .allocate_room(placement(profile.id, room.id, warden.id))
        .expect("allocated");
    assert!(allocation.is_active);
    assert_eq!(admin.get_room(room.id).expect("room").current_occupancy, 1);
    assert!(admin.get_student_profile(profile.id).expect("profile").is_allocated);

    admin
        .release_allocation(allocation.id)
        .expect("released");
    assert_eq!(admin.get_room(room.id).expect("room").current_occupancy, 0);
    assert!(!admin.get_student_profile(profile.id).expect("profile").is_allocated);
    assert!(tables(&admin).room_allocations.is_empty());
}

#[test]
fn allocation_refuses_full_unavailable_and_double_placements() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, nadia) = student(&admin, "nadia");
    let (_, arif) = student(&admin, "arif");
    let single = room(&admin, "A-101", 1);
    let closed = room(&admin, "A-102", 2);
    admin
        .make_rooms_unavailable(&[closed.id])
        .expect("room closed");

    admin
        .allocate_room(placement(nadia.id, single.id, warden.id))
        .expect("allocated");

    let err = admin
        .allocate_room(placement(arif.id, single.id, warden.id))
        .expect_err("room full");
    assert!(matches!(err, ServiceError::Rejected(ref message) if message.contains("full")));

    let err = admin
        .allocate_room(placement(arif.id, closed.id, warden.id))
        .expect_err("room closed");
    assert!(matches!(err, ServiceError::Rejected(_)));

    let err = admin
        .allocate_room(placement(nadia.id, closed.id, warden.id))
        .expect_err("already placed");
    assert!(matches!(err, ServiceError::Conflict(_)));

    assert_eq!(admin.get_room(single.id).expect("room").current_occupancy, 1);
}

#[test]
fn applications_flow_from_pending_to_allocated() {
    let (admin, clock) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    let room = room(&admin, "A-101", 2);

    let request = NewRoomApplication {
        student: profile.id,
        room: room.id,
        preferred_move_date: day(2025, 4, 1),
        priority_score: 7,
        reason: "Closer to the library".to_string(),
    };
    let application = admin
        .submit_application(request.clone())
        .expect("submitted");
    assert_eq!(application.status, ApplicationStatus::Pending);

    let err = admin
        .submit_application(request)
        .expect_err("pending twice");
    assert!(matches!(err, ServiceError::Conflict(_)));

    clock.advance(chrono::Duration::hours(2));
    let approved = admin
        .decide_application(
            application.id,
            ApplicationDecision {
                status: ApplicationStatus::Approved,
                processed_by: warden.id,
                remarks: Some("Approved for April".to_string()),
            },
        )
        .expect("approved");
    assert_eq!(approved.processed_by, Some(warden.id));
    assert_eq!(approved.processed_at, Some(clock.now()));

    let mut draft = placement(profile.id, room.id, warden.id);
    draft.application = Some(application.id);
    admin.allocate_room(draft).expect("allocated");

    let allocated = admin
        .get_application(application.id)
        .expect("application");
    assert_eq!(allocated.status, ApplicationStatus::Allocated);

    let err = admin
        .decide_application(
            application.id,
            ApplicationDecision {
                status: ApplicationStatus::Rejected,
                processed_by: warden.id,
                remarks: None,
            },
        )
        .expect_err("already allocated");
    assert!(matches!(err, ServiceError::Rejected(_)));

    let allocation = tables(&admin)
        .room_allocations
        .iter()
        .next()
        .cloned()
        .expect("placement recorded");
    clock.advance(chrono::Duration::days(30));
    admin
        .release_allocation(allocation.id)
        .expect("released");
    let released = admin
        .get_application(application.id)
        .expect("application");
    assert_eq!(released.status, ApplicationStatus::Allocated);
    assert_eq!(
        released.remarks,
        "Approved for April\nAllocation released on 2025-04-09."
    );

    let listed = admin
        .list_applications(
            &ApplicationFilter {
                status: Some(ApplicationStatus::Allocated),
                ..ApplicationFilter::default()
            },
            PageRequest::default(),
        )
        .expect("list");
    assert_eq!(listed.count, 1);
}

#[test]
fn deleting_a_room_evicts_its_residents() {
    let (admin, _) = build_admin();
    let warden = warden(&admin, "warden");
    let (_, profile) = student(&admin, "nadia");
    let room = room(&admin, "A-101", 2);
    admin
        .allocate_room(placement(profile.id, room.id, warden.id))
        .expect("allocated");

    admin.delete_room(room.id).expect("room deleted");

    let tables = tables(&admin);
    assert!(tables.rooms.is_empty());
    assert!(tables.room_allocations.is_empty());
    assert!(!admin.get_student_profile(profile.id).expect("profile").is_allocated);
}
