//! Closed choice sets stored on hostel records.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! choice_labels {
    ($name:ident { $($variant:ident => $value:literal, $label:literal),+ $(,)? }) => {
        impl $name {
            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            /// Stored value, as it appears in JSON payloads and filters.
            pub const fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Human readable label shown on admin pages.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Staff,
    Provost,
    Admin,
}

choice_labels!(UserRole {
    Student => "student", "Student",
    Staff => "staff", "Hostel Staff",
    Provost => "provost", "Provost/Warden",
    Admin => "admin", "System Admin",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    #[default]
    Double,
    Shared,
}

choice_labels!(RoomType {
    Single => "single", "Single",
    Double => "double", "Double",
    Shared => "shared", "Shared",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Allocated,
}

choice_labels!(ApplicationStatus {
    Pending => "pending", "Pending",
    Approved => "approved", "Approved",
    Rejected => "rejected", "Rejected",
    Allocated => "allocated", "Allocated",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Maintenance,
    Security,
    Facilities,
    Cleanliness,
    Noise,
    Other,
}

choice_labels!(ComplaintCategory {
    Maintenance => "maintenance", "Maintenance",
    Security => "security", "Security",
    Facilities => "facilities", "Facilities",
    Cleanliness => "cleanliness", "Cleanliness",
    Noise => "noise", "Noise",
    Other => "other", "Other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Submitted,
    InProgress,
    Resolved,
    Closed,
}

choice_labels!(ComplaintStatus {
    Submitted => "submitted", "Submitted",
    InProgress => "in_progress", "In Progress",
    Resolved => "resolved", "Resolved",
    Closed => "closed", "Closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    #[default]
    General,
    Important,
    Urgent,
    Academic,
    Maintenance,
}

choice_labels!(NoticeCategory {
    General => "general", "General",
    Important => "important", "Important",
    Urgent => "urgent", "Urgent",
    Academic => "academic", "Academic",
    Maintenance => "maintenance", "Maintenance",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

choice_labels!(Priority {
    Low => "low", "Low",
    Medium => "medium", "Medium",
    High => "high", "High",
    Urgent => "urgent", "Urgent",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    BankTransfer,
    Cash,
    Cheque,
}

choice_labels!(PaymentMethod {
    BankTransfer => "bank_transfer", "Bank Transfer",
    Cash => "cash", "Cash",
    Cheque => "cheque", "Cheque",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Electronics,
    Books,
    Clothing,
    Documents,
    Accessories,
    Other,
}

choice_labels!(ItemCategory {
    Electronics => "electronics", "Electronics",
    Books => "books", "Books",
    Clothing => "clothing", "Clothing",
    Documents => "documents", "Documents",
    Accessories => "accessories", "Accessories",
    Other => "other", "Other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Lost,
    Found,
    Claimed,
    Expired,
}

choice_labels!(ItemStatus {
    Lost => "lost", "Lost",
    Found => "found", "Found",
    Claimed => "claimed", "Claimed",
    Expired => "expired", "Expired",
});
