//! Room inventory import from the office's spreadsheet export.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::domain::{NewRoom, RoomType};

#[derive(Debug, thiserror::Error)]
pub enum RoomImportError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Parsed spreadsheet: drafts for every readable row, plus the rows that were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSheet {
    pub rooms: Vec<NewRoom>,
    pub rejected: Vec<RejectedRow>,
}

/// Row whose values could not be read. `line` counts the header as line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: u64,
    pub room_number: String,
    pub message: String,
}

/// Reads `Room Number, Block, Floor, ...` rows into room drafts.
///
/// Only `Room Number` and `Floor` are required; every other column falls back to the
/// room defaults when missing or blank. A broken file is an error; an unreadable value
/// only rejects its own row.
pub struct RoomCsvImporter;

impl RoomCsvImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<RoomSheet, RoomImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RoomImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RoomSheet, RoomImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut sheet = RoomSheet::default();

        // Line 1 is the header.
        for (index, record) in csv_reader.deserialize::<RoomRow>().enumerate() {
            let row = record?;
            let line = index as u64 + 2;
            let room_number = row.room_number.clone();
            match row.into_draft() {
                Ok(draft) => sheet.rooms.push(draft),
                Err(message) => sheet.rejected.push(RejectedRow {
                    line,
                    room_number,
                    message,
                }),
            }
        }

        Ok(sheet)
    }
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    #[serde(rename = "Room Number")]
    room_number: String,
    #[serde(rename = "Floor")]
    floor: String,
    #[serde(rename = "Block", default, deserialize_with = "empty_string_as_none")]
    block: Option<String>,
    #[serde(rename = "Room Type", default, deserialize_with = "empty_string_as_none")]
    room_type: Option<String>,
    #[serde(rename = "Capacity", default, deserialize_with = "empty_string_as_none")]
    capacity: Option<String>,
    #[serde(
        rename = "Current Occupancy",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    current_occupancy: Option<String>,
    #[serde(
        rename = "Attached Bathroom",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    attached_bathroom: Option<String>,
    #[serde(
        rename = "Air Conditioning",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    air_conditioning: Option<String>,
    #[serde(rename = "Furniture", default, deserialize_with = "empty_string_as_none")]
    furniture: Option<String>,
    #[serde(rename = "Rent Amount", default, deserialize_with = "empty_string_as_none")]
    rent_amount: Option<String>,
    #[serde(
        rename = "Maintenance Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    maintenance_status: Option<String>,
}

impl RoomRow {
    fn into_draft(self) -> Result<NewRoom, String> {
        if self.room_number.is_empty() {
            return Err("Room Number is required".to_string());
        }
        let floor = parse_number("Floor", &self.floor)?;
        let mut draft = NewRoom::new(self.room_number, floor);

        if let Some(block) = self.block {
            draft.block = block;
        }
        if let Some(room_type) = self.room_type.as_deref() {
            draft.room_type = parse_room_type(room_type)?;
        }
        if let Some(capacity) = self.capacity.as_deref() {
            draft.capacity = parse_number("Capacity", capacity)?;
        }
        if let Some(occupancy) = self.current_occupancy.as_deref() {
            draft.current_occupancy = parse_number("Current Occupancy", occupancy)?;
        }
        if let Some(flag) = self.attached_bathroom.as_deref() {
            draft.has_attached_bathroom = parse_flag("Attached Bathroom", flag)?;
        }
        if let Some(flag) = self.air_conditioning.as_deref() {
            draft.has_air_conditioning = parse_flag("Air Conditioning", flag)?;
        }
        if let Some(flag) = self.furniture.as_deref() {
            draft.has_furniture = parse_flag("Furniture", flag)?;
        }
        if let Some(rent) = self.rent_amount.as_deref() {
            draft.rent_amount = Decimal::from_str(rent.trim_start_matches('$'))
                .map_err(|err| format!("Rent Amount `{rent}`: {err}"))?;
        }
        if let Some(status) = self.maintenance_status {
            draft.maintenance_status = status;
        }

        Ok(draft)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_number(column: &str, value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("{column} `{value}` is not a whole number"))
}

fn parse_flag(column: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        _ => Err(format!("{column} `{value}` is not yes/no")),
    }
}

fn parse_room_type(value: &str) -> Result<RoomType, String> {
    RoomType::ordered()
        .iter()
        .copied()
        .find(|room_type| {
            room_type.value().eq_ignore_ascii_case(value)
                || room_type.label().eq_ignore_ascii_case(value)
        })
        .ok_or_else(|| format!("Room Type `{value}` is not one of single, double, shared"))
}
