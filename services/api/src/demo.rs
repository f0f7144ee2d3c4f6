use crate::infra::hostel_admin;
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;
use hostel_admin::clock::ManualClock;
use hostel_admin::config::AppConfig;
use hostel_admin::error::AppError;
use hostel_admin::hostel::domain::{
    ApplicationDecision, ApplicationStatus, ComplaintCategory, ComplaintPatch, ComplaintStatus,
    ItemCategory, NewAttachment, NewComplaint, NewLostItem, NewNotice, NewRoom,
    NewRoomAllocation, NewRoomApplication, NewStipend, NewUser, NoticeCategory, PaymentMethod,
    Priority, RoomType, UserRole,
};
use hostel_admin::hostel::service::RoomImportSummary;
use hostel_admin::hostel::{
    HostelAdmin, InMemoryHostelRepository, JsonFileHostelRepository, PageRequest,
    RoomCsvImporter,
};
use hostel_admin::telemetry;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct RoomImportArgs {
    /// CSV export with one room per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Term opening date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional room CSV used instead of the built-in inventory.
    #[arg(long)]
    pub(crate) rooms_csv: Option<PathBuf>,
}

pub(crate) fn run_room_import(args: RoomImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let sheet = RoomCsvImporter::from_path(&args.csv)?;
    info!(
        rows = sheet.rooms.len(),
        rejected = sheet.rejected.len(),
        path = %args.csv.display(),
        "parsed room export"
    );

    let summary = match &config.storage.data_file {
        Some(path) => {
            let repository = Arc::new(JsonFileHostelRepository::open(path.clone())?);
            hostel_admin(repository, &config).import_room_sheet(sheet)?
        }
        None => {
            warn!("APP_DATA_FILE not set; importing into a throwaway in-memory store");
            let repository = Arc::new(InMemoryHostelRepository::new());
            hostel_admin(repository, &config).import_room_sheet(sheet)?
        }
    };

    render_import_summary(&summary);
    Ok(())
}

fn render_import_summary(summary: &RoomImportSummary) {
    println!(
        "Imported {} room(s), skipped {}",
        summary.created.len(),
        summary.skipped.len()
    );
    for room in &summary.created {
        println!(
            "  + {} (block {}, floor {}, {} bed(s))",
            room.room_number,
            if room.block.is_empty() { "-" } else { &room.block },
            room.floor,
            room.capacity
        );
    }
    for skipped in &summary.skipped {
        match skipped.line {
            Some(line) => println!("  - {} (line {line}): {}", skipped.room_number, skipped.reason),
            None => println!("  - {}: {}", skipped.room_number, skipped.reason),
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, rooms_csv } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let opening = today.and_time(NaiveTime::MIN).and_utc() + Duration::hours(9);

    let clock = Arc::new(ManualClock::new(opening));
    let admin = HostelAdmin::with_clock(Arc::new(InMemoryHostelRepository::new()), clock.clone());

    println!("Hostel Management System demo ({today})");

    let provost = {
        let mut draft = NewUser::new("provost", UserRole::Provost);
        draft.first_name = "Farida".to_string();
        draft.last_name = "Haque".to_string();
        draft.is_staff = true;
        admin.create_user(draft)?
    };
    let resident = {
        let mut draft = NewUser::new("student01", UserRole::Student);
        draft.first_name = "Arif".to_string();
        draft.last_name = "Hossain".to_string();
        draft.email = "arif@example.edu".to_string();
        admin.create_user(draft)?
    };
    let profile = admin.profile_for_user(resident.id)?;
    println!(
        "\nAccounts\n  {} ({}) and {} ({}); profile {} created on signup",
        provost.username,
        provost.user_type,
        resident.username,
        resident.user_type,
        profile.student_id
    );

    let summary = match rooms_csv {
        Some(path) => admin.import_room_sheet(RoomCsvImporter::from_path(&path)?)?,
        None => admin.import_rooms(built_in_rooms())?,
    };
    println!("\nRooms");
    render_import_summary(&summary);

    let rooms = admin.list_rooms(&Default::default(), PageRequest::default())?;
    let Some(target) = rooms.results.iter().find(|room| room.is_available && !room.is_full()).cloned() else {
        println!("  No room has a free bed; stopping here.");
        return Ok(());
    };

    let application = admin.submit_application(NewRoomApplication {
        student: profile.id,
        room: target.id,
        preferred_move_date: today + Duration::days(7),
        priority_score: 80,
        reason: "First-year resident".to_string(),
    })?;
    clock.advance(Duration::hours(2));
    let application = admin.decide_application(
        application.id,
        ApplicationDecision {
            status: ApplicationStatus::Approved,
            processed_by: provost.id,
            remarks: Some("Approved at intake".to_string()),
        },
    )?;
    let allocation = admin.allocate_room(NewRoomAllocation {
        student: profile.id,
        room: target.id,
        allocated_by: provost.id,
        notes: String::new(),
        application: Some(application.id),
    })?;
    let placed = admin.get_room(target.id)?;
    println!(
        "\nAllocation\n  {} placed in {}; {} of {} bed(s) taken, {} free",
        profile.student_id,
        placed.room_number,
        placed.current_occupancy,
        placed.capacity,
        placed.available_beds()
    );
    println!(
        "  application {} is now {}",
        application.id,
        admin.get_application(application.id)?.status
    );

    clock.advance(Duration::days(1));
    let complaint = admin.file_complaint(NewComplaint {
        student: profile.id,
        category: ComplaintCategory::Maintenance,
        subject: "Leaking tap".to_string(),
        description: "The bathroom tap drips all night.".to_string(),
        location: placed.room_number.clone(),
        priority: Priority::High,
        attachment: None,
    })?;
    let complaint = admin.update_complaint(
        complaint.id,
        ComplaintPatch {
            status: Some(ComplaintStatus::Resolved),
            assigned_to: Some(Some(provost.id)),
            resolution_notes: Some("Washer replaced".to_string()),
            ..Default::default()
        },
    )?;
    println!(
        "\nComplaints\n  {} [{}] {}",
        complaint.complaint_id, complaint.status, complaint.subject
    );

    let notice = admin.publish_notice(NewNotice {
        title: "Water supply maintenance".to_string(),
        content: "Supply is interrupted on Saturday morning.".to_string(),
        category: NoticeCategory::Maintenance,
        priority: Priority::Medium,
        created_by: provost.id,
        expires_at: None,
        is_active: true,
        target_audience: "all".to_string(),
    })?;
    let attachment = admin.add_attachment(
        notice.id,
        NewAttachment {
            file: "notice_attachments/2025/03/schedule.pdf".to_string(),
            size: 48_213,
        },
    )?;
    println!(
        "\nNotices\n  {} (visible: {}) with {} [{}]",
        notice.title,
        notice.is_visible(admin.now()),
        attachment.filename,
        attachment.content_type
    );

    let stipend = admin.record_stipend(NewStipend {
        student: profile.id,
        amount: Decimal::new(350_000, 2),
        payment_method: PaymentMethod::BankTransfer,
        reference_number: format!("STP-{}", today.format("%Y%m")),
        processed_by: provost.id,
        notes: String::new(),
    })?;
    println!(
        "\nStipends\n  {} paid {} via {}",
        stipend.reference_number, stipend.amount, stipend.payment_method
    );

    let lost = admin.report_lost_item(NewLostItem {
        reporter: profile.id,
        item_name: "Library card".to_string(),
        description: "Blue lanyard".to_string(),
        category: ItemCategory::Documents,
        lost_location: "Dining hall".to_string(),
        lost_date: admin.now(),
        contact_info: resident.email.clone(),
        image: None,
        status: Default::default(),
        expires_at: None,
    })?;
    clock.advance(Duration::days(31));
    let outcome = admin.expire_lost_items()?;
    println!(
        "\nLost and found\n  {} reported; after 31 days: {}",
        lost.item_name, outcome.message
    );

    let released = admin.release_allocation(allocation.id)?;
    let outcome = admin.make_rooms_unavailable(&[released.room])?;
    println!("\nEnd of term\n  allocation {} released; {}", released.id, outcome.message);

    Ok(())
}

fn built_in_rooms() -> Vec<NewRoom> {
    [
        ("A-101", 1, RoomType::Single, 1),
        ("A-102", 1, RoomType::Double, 2),
        ("B-201", 2, RoomType::Shared, 4),
    ]
    .into_iter()
    .map(|(number, floor, room_type, capacity)| {
        let mut draft = NewRoom::new(number, floor);
        draft.block = number[..1].to_string();
        draft.room_type = room_type;
        draft.capacity = capacity;
        draft.rent_amount = Decimal::new(1_500 * i64::from(capacity), 0);
        draft
    })
    .collect()
}
