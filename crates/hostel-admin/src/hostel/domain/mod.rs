//! Records kept by the hostel office and the bookkeeping rules attached to them.

pub mod accounts;
pub mod choices;
pub mod complaints;
pub mod ids;
pub mod ledger;
pub mod notices;
pub mod rooms;
pub mod validation;

pub use accounts::{
    CustomUser, NewStudentProfile, NewUser, StudentProfile, StudentProfilePatch, UserPatch,
};
pub use choices::{
    ApplicationStatus, ComplaintCategory, ComplaintStatus, ItemCategory, ItemStatus,
    NoticeCategory, PaymentMethod, Priority, RoomType, UserRole,
};
pub use complaints::{
    next_ticket, parse_ticket, ticket_day_prefix, Complaint, ComplaintPatch, NewComplaint,
};
pub use ids::{
    AllocationId, ApplicationId, AttachmentId, ComplaintId, LostItemId, NoticeId, ProfileId,
    RoomId, StipendId, UserId,
};
pub use ledger::{LostItem, LostItemPatch, NewLostItem, NewStipend, StipendTransaction};
pub use notices::{
    default_expiry, NewAttachment, NewNotice, Notice, NoticeAttachment, NoticePatch,
    DEFAULT_EXPIRY_DAYS,
};
pub use rooms::{
    ApplicationDecision, NewRoom, NewRoomAllocation, NewRoomApplication, Room, RoomAllocation,
    RoomApplication, RoomPatch,
};
pub use validation::{FieldError, ValidationErrors};
