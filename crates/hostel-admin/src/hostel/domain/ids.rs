use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Primary key of an account.
    UserId
);
record_id!(
    /// Primary key of a student profile (not the student's institutional id).
    ProfileId
);
record_id!(RoomId);
record_id!(ApplicationId);
record_id!(AllocationId);
record_id!(
    /// Numeric primary key of a complaint; the human-readable ticket lives in `complaint_id`.
    ComplaintId
);
record_id!(NoticeId);
record_id!(AttachmentId);
record_id!(StipendId);
record_id!(LostItemId);
