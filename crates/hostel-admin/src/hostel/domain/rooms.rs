use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::accounts::StudentProfile;
use super::choices::{ApplicationStatus, RoomType};
use super::ids::{AllocationId, ApplicationId, ProfileId, RoomId, UserId};
use super::validation::ValidationErrors;

/// One row of the room inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    pub floor: u32,
    pub block: String,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub room_type: RoomType,
    pub has_attached_bathroom: bool,
    #[serde(alias = "has_ac")]
    pub has_air_conditioning: bool,
    pub has_furniture: bool,
    pub rent_amount: Decimal,
    pub is_available: bool,
    pub maintenance_status: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Free beds; negative when the room is over-occupied.
    pub fn available_beds(&self) -> i64 {
        i64::from(self.capacity) - i64::from(self.current_occupancy)
    }

    pub fn is_full(&self) -> bool {
        self.current_occupancy >= self.capacity
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("room_number", &self.room_number);
        errors.max_len("room_number", &self.room_number, 10);
        errors.required("block", &self.block);
        errors.max_len("block", &self.block, 10);
        errors.at_least("capacity", self.capacity, 1);
        if self.rent_amount.is_sign_negative() {
            errors.add("rent_amount", "Rent cannot be negative.");
        }
        errors.decimal("rent_amount", &self.rent_amount, 10, 2);
        errors.max_len("maintenance_status", &self.maintenance_status, 50);
        errors.into_result()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room {} - {}", self.room_number, self.room_type.label())
    }
}

fn default_block() -> String {
    "A".to_string()
}

fn default_capacity() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_maintenance_status() -> String {
    "good".to_string()
}

/// Payload for adding a room to the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub floor: u32,
    #[serde(default = "default_block")]
    pub block: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub current_occupancy: u32,
    #[serde(default)]
    pub room_type: RoomType,
    #[serde(default = "default_true")]
    pub has_attached_bathroom: bool,
    #[serde(default, alias = "has_ac")]
    pub has_air_conditioning: bool,
    #[serde(default = "default_true")]
    pub has_furniture: bool,
    #[serde(default)]
    pub rent_amount: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default = "default_maintenance_status")]
    pub maintenance_status: String,
}

impl NewRoom {
    /// A room with every column at its default.
    pub fn new(room_number: impl Into<String>, floor: u32) -> Self {
        Self {
            room_number: room_number.into(),
            floor,
            block: default_block(),
            capacity: default_capacity(),
            current_occupancy: 0,
            room_type: RoomType::default(),
            has_attached_bathroom: true,
            has_air_conditioning: false,
            has_furniture: true,
            rent_amount: Decimal::ZERO,
            is_available: true,
            maintenance_status: default_maintenance_status(),
        }
    }

    pub(crate) fn into_record(self, id: RoomId, now: DateTime<Utc>) -> Room {
        Room {
            id,
            room_number: self.room_number.trim().to_string(),
            floor: self.floor,
            block: self.block.trim().to_string(),
            capacity: self.capacity,
            current_occupancy: self.current_occupancy,
            room_type: self.room_type,
            has_attached_bathroom: self.has_attached_bathroom,
            has_air_conditioning: self.has_air_conditioning,
            has_furniture: self.has_furniture,
            rent_amount: self.rent_amount,
            is_available: self.is_available,
            maintenance_status: self.maintenance_status,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPatch {
    pub room_number: Option<String>,
    pub floor: Option<u32>,
    pub block: Option<String>,
    pub capacity: Option<u32>,
    pub current_occupancy: Option<u32>,
    pub room_type: Option<RoomType>,
    pub has_attached_bathroom: Option<bool>,
    #[serde(alias = "has_ac")]
    pub has_air_conditioning: Option<bool>,
    pub has_furniture: Option<bool>,
    pub rent_amount: Option<Decimal>,
    pub is_available: Option<bool>,
    pub maintenance_status: Option<String>,
}

impl RoomPatch {
    pub(crate) fn apply(self, room: &mut Room) {
        if let Some(room_number) = self.room_number {
            room.room_number = room_number.trim().to_string();
        }
        if let Some(floor) = self.floor {
            room.floor = floor;
        }
        if let Some(block) = self.block {
            room.block = block.trim().to_string();
        }
        if let Some(capacity) = self.capacity {
            room.capacity = capacity;
        }
        if let Some(current_occupancy) = self.current_occupancy {
            room.current_occupancy = current_occupancy;
        }
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(has_attached_bathroom) = self.has_attached_bathroom {
            room.has_attached_bathroom = has_attached_bathroom;
        }
        if let Some(has_air_conditioning) = self.has_air_conditioning {
            room.has_air_conditioning = has_air_conditioning;
        }
        if let Some(has_furniture) = self.has_furniture {
            room.has_furniture = has_furniture;
        }
        if let Some(rent_amount) = self.rent_amount {
            room.rent_amount = rent_amount;
        }
        if let Some(is_available) = self.is_available {
            room.is_available = is_available;
        }
        if let Some(maintenance_status) = self.maintenance_status {
            room.maintenance_status = maintenance_status;
        }
    }
}

/// A student's request for a particular room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomApplication {
    pub id: ApplicationId,
    pub student: ProfileId,
    pub room: RoomId,
    pub application_date: DateTime<Utc>,
    pub preferred_move_date: NaiveDate,
    pub status: ApplicationStatus,
    pub priority_score: u32,
    pub reason: String,
    pub remarks: String,
    pub processed_by: Option<UserId>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl RoomApplication {
    pub fn label(&self, student: &StudentProfile, room: &Room) -> String {
        format!(
            "{} - {} ({})",
            student.student_id,
            room.room_number,
            self.status.value()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoomApplication {
    pub student: ProfileId,
    pub room: RoomId,
    pub preferred_move_date: NaiveDate,
    #[serde(default)]
    pub priority_score: u32,
    #[serde(default)]
    pub reason: String,
}

/// Staff verdict on a room application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDecision {
    pub status: ApplicationStatus,
    pub processed_by: UserId,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A student currently placed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAllocation {
    pub id: AllocationId,
    pub student: ProfileId,
    pub room: RoomId,
    pub allocated_date: DateTime<Utc>,
    pub allocated_by: UserId,
    pub is_active: bool,
    pub notes: String,
}

impl RoomAllocation {
    pub fn label(&self, student: &StudentProfile, room: &Room) -> String {
        format!("{} in {}", student.student_id, room.room_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoomAllocation {
    pub student: ProfileId,
    pub room: RoomId,
    pub allocated_by: UserId,
    #[serde(default)]
    pub notes: String,
    /// Application fulfilled by this placement; it moves to `allocated`.
    #[serde(default)]
    pub application: Option<ApplicationId>,
}
