use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use hostel_admin::clock::{Clock, ManualClock};
use hostel_admin::hostel::domain::{
    ComplaintCategory, ComplaintPatch, ComplaintStatus, NewComplaint, NewRoom, NewRoomAllocation,
    NewRoomApplication, NewUser, Priority, UserRole,
};
use hostel_admin::hostel::service::RoomFilter;
use hostel_admin::hostel::{HostelAdmin, JsonFileHostelRepository, PageRequest, RoomCsvImporter};

const INVENTORY: &str = "\
Room Number,Block,Floor,Room Type,Capacity,Attached Bathroom,Air Conditioning,Rent Amount
A-101,A,1,single,1,yes,yes,5200.00
A-102,A,1,double,2,yes,no,3800.00
B-201,B,2,shared,4,no,no,2100.50
";

#[test]
fn a_semester_of_hostel_records_survives_a_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_file = dir.path().join("hostel.json");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 8, 1, 8, 30, 0).unwrap(),
    ));

    let repository = Arc::new(JsonFileHostelRepository::open(&data_file).expect("store opens"));
    let admin = HostelAdmin::with_clock(repository, clock.clone());

    let sheet = RoomCsvImporter::from_reader(INVENTORY.as_bytes()).expect("inventory parses");
    assert!(sheet.rejected.is_empty());
    let summary = admin.import_room_sheet(sheet).expect("inventory imported");
    assert_eq!(summary.created.len(), 3);
    assert!(summary.skipped.is_empty());

    let mut provost = NewUser::new("provost", UserRole::Provost);
    provost.is_staff = true;
    let provost = admin.create_user(provost).expect("provost created");
    let student = admin
        .create_user(NewUser::new("tanvir", UserRole::Student))
        .expect("student created");
    let profile = admin.profile_for_user(student.id).expect("profile exists");
    assert_eq!(profile.student_id, "TEMP0002");

    let double = summary
        .created
        .iter()
        .find(|room| room.room_number == "A-102")
        .expect("double room imported");
    let application = admin
        .submit_application(NewRoomApplication {
            student: profile.id,
            room: double.id,
            preferred_move_date: clock.now().date_naive() + Duration::days(14),
            priority_score: 3,
            reason: String::new(),
        })
        .expect("application submitted");
    admin
        .allocate_room(NewRoomAllocation {
            student: profile.id,
            room: double.id,
            allocated_by: provost.id,
            notes: "Start of semester".to_string(),
            application: Some(application.id),
        })
        .expect("room allocated");

    clock.advance(Duration::days(20));
    let complaint = admin
        .file_complaint(NewComplaint {
            student: profile.id,
            category: ComplaintCategory::Facilities,
            subject: "Ceiling fan not working".to_string(),
            description: "Fan stopped spinning last night".to_string(),
            location: "A-102".to_string(),
            priority: Priority::Medium,
            attachment: None,
        })
        .expect("complaint filed");
    assert_eq!(complaint.complaint_id, "CMP-20250821-0001");
    admin
        .update_complaint(
            complaint.id,
            ComplaintPatch {
                status: Some(ComplaintStatus::Resolved),
                assigned_to: Some(Some(provost.id)),
                ..ComplaintPatch::default()
            },
        )
        .expect("complaint resolved");
    drop(admin);

    let reopened = Arc::new(JsonFileHostelRepository::open(&data_file).expect("store reopens"));
    let admin = HostelAdmin::with_clock(reopened, clock);

    let room = admin.get_room(double.id).expect("room persisted");
    assert_eq!(room.current_occupancy, 1);
    assert_eq!(room.available_beds(), 1);
    assert!(admin.get_student_profile(profile.id).expect("profile").is_allocated);

    let complaint = admin
        .complaint_by_ticket("CMP-20250821-0001")
        .expect("ticket persisted");
    assert_eq!(complaint.status, ComplaintStatus::Resolved);
    assert!(complaint.resolved_at.is_some());

    let rooms = admin
        .list_rooms(
            &RoomFilter {
                block: Some("A".to_string()),
                ..RoomFilter::default()
            },
            PageRequest::default(),
        )
        .expect("rooms listed");
    assert_eq!(rooms.count, 2);

    let again = admin
        .import_rooms(vec![NewRoom::new("B-201", 2)])
        .expect("import runs");
    assert!(again.created.is_empty());
    assert_eq!(again.skipped[0].room_number, "B-201");
}
