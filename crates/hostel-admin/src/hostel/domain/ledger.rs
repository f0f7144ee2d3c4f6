use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accounts::StudentProfile;
use super::choices::{ItemCategory, ItemStatus, PaymentMethod};
use super::ids::{LostItemId, ProfileId, StipendId, UserId};
use super::notices::default_expiry;
use super::validation::ValidationErrors;

/// Stipend paid out to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StipendTransaction {
    pub id: StipendId,
    pub student: ProfileId,
    pub amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub reference_number: String,
    pub processed_by: UserId,
    pub notes: String,
}

impl StipendTransaction {
    pub fn label(&self, student: &StudentProfile) -> String {
        let mut amount = self.amount;
        amount.rescale(2);
        format!(
            "{} - ${} - {}",
            student.student_id,
            amount,
            self.transaction_date.date_naive()
        )
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.amount <= Decimal::ZERO {
            errors.add("amount", "Amount must be greater than zero.");
        }
        errors.decimal("amount", &self.amount, 10, 2);
        errors.required("reference_number", &self.reference_number);
        errors.max_len("reference_number", &self.reference_number, 50);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStipend {
    pub student: ProfileId,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub reference_number: String,
    pub processed_by: UserId,
    #[serde(default)]
    pub notes: String,
}

impl NewStipend {
    pub(crate) fn into_record(self, id: StipendId, now: DateTime<Utc>) -> StipendTransaction {
        StipendTransaction {
            id,
            student: self.student,
            amount: self.amount,
            transaction_date: now,
            payment_method: self.payment_method,
            reference_number: self.reference_number.trim().to_string(),
            processed_by: self.processed_by,
            notes: self.notes,
        }
    }
}

/// Lost-and-found report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostItem {
    pub id: LostItemId,
    pub reporter: ProfileId,
    pub item_name: String,
    pub description: String,
    pub category: ItemCategory,
    pub lost_location: String,
    pub lost_date: DateTime<Utc>,
    pub contact_info: String,
    pub image: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LostItem {
    /// Still lost or found-but-unclaimed after its expiry.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, ItemStatus::Lost | ItemStatus::Found) && now > self.expires_at
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("item_name", &self.item_name);
        errors.max_len("item_name", &self.item_name, 100);
        errors.required("description", &self.description);
        errors.required("lost_location", &self.lost_location);
        errors.max_len("lost_location", &self.lost_location, 100);
        errors.required("contact_info", &self.contact_info);
        errors.max_len("contact_info", &self.contact_info, 100);
        if let Some(image) = &self.image {
            errors.max_len("image", image, 100);
        }
        errors.into_result()
    }
}

impl std::fmt::Display for LostItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.item_name, self.status.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLostItem {
    pub reporter: ProfileId,
    pub item_name: String,
    pub description: String,
    pub category: ItemCategory,
    pub lost_location: String,
    pub lost_date: DateTime<Utc>,
    pub contact_info: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLostItem {
    pub(crate) fn into_record(self, id: LostItemId, now: DateTime<Utc>) -> LostItem {
        LostItem {
            id,
            reporter: self.reporter,
            item_name: self.item_name.trim().to_string(),
            description: self.description,
            category: self.category,
            lost_location: self.lost_location,
            lost_date: self.lost_date,
            contact_info: self.contact_info,
            image: self.image,
            status: self.status,
            created_at: now,
            expires_at: self.expires_at.unwrap_or_else(|| default_expiry(now)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostItemPatch {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ItemCategory>,
    pub lost_location: Option<String>,
    pub lost_date: Option<DateTime<Utc>>,
    pub contact_info: Option<String>,
    #[serde(default, deserialize_with = "super::validation::double_option")]
    pub image: Option<Option<String>>,
    pub status: Option<ItemStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LostItemPatch {
    pub(crate) fn apply(self, item: &mut LostItem) {
        if let Some(item_name) = self.item_name {
            item.item_name = item_name.trim().to_string();
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(lost_location) = self.lost_location {
            item.lost_location = lost_location;
        }
        if let Some(lost_date) = self.lost_date {
            item.lost_date = lost_date;
        }
        if let Some(contact_info) = self.contact_info {
            item.contact_info = contact_info;
        }
        if let Some(image) = self.image {
            item.image = image;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(expires_at) = self.expires_at {
            item.expires_at = expires_at;
        }
    }
}
