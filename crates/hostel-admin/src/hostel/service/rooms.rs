use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{cascade, ensure_unique, fetch, fetch_mut, BulkActionOutcome, HostelAdmin, ServiceError};
use crate::hostel::domain::{NewRoom, Room, RoomId, RoomPatch, RoomType};
use crate::hostel::import::RoomSheet;
use crate::hostel::query::{matches, matches_search, Page, PageRequest};
use crate::hostel::repository::HostelRepository;

/// Rooms are listed twenty to a page.
pub const ROOM_LIST_PER_PAGE: usize = 20;

/// Changelist filters for the room inventory. Search covers room number and block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoomFilter {
    pub block: Option<String>,
    pub floor: Option<u32>,
    pub room_type: Option<RoomType>,
    pub is_available: Option<bool>,
    pub has_attached_bathroom: Option<bool>,
    #[serde(alias = "has_ac")]
    pub has_air_conditioning: Option<bool>,
    pub search: Option<String>,
}

/// Outcome of a bulk room import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomImportSummary {
    pub created: Vec<Room>,
    pub skipped: Vec<SkippedRoom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRoom {
    pub room_number: String,
    /// Spreadsheet line, for rows whose values could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    pub reason: String,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    pub fn create_room(&self, draft: NewRoom) -> Result<Room, ServiceError> {
        let now = self.now();
        let room = self.repository.write(|tables| {
            let room = tables.rooms.insert_with(|id| draft.into_record(id, now));
            room.validate()?;
            ensure_unique(&tables.rooms, room.id, "room_number", &room.room_number, |row| {
                row.room_number.as_str()
            })?;
            Ok::<_, ServiceError>(room)
        })?;
        info!(room_id = %room.id, room_number = %room.room_number, "room created");
        Ok(room)
    }

    pub fn update_room(&self, id: RoomId, patch: RoomPatch) -> Result<Room, ServiceError> {
        self.repository.write(|tables| {
            let room = fetch_mut(&mut tables.rooms, id)?;
            patch.apply(room);
            let room = room.clone();
            room.validate()?;
            ensure_unique(&tables.rooms, room.id, "room_number", &room.room_number, |row| {
                row.room_number.as_str()
            })?;
            Ok(room)
        })
    }

    pub fn get_room(&self, id: RoomId) -> Result<Room, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.rooms, id).cloned())?
    }

    /// Rooms ordered by room number, twenty per page unless the request says otherwise.
    pub fn list_rooms(
        &self,
        filter: &RoomFilter,
        page: PageRequest,
    ) -> Result<Page<Room>, ServiceError> {
        let mut rows = self.repository.read(|tables| {
            tables
                .rooms
                .iter()
                .filter(|room| {
                    matches(filter.block.as_deref(), room.block.as_str())
                        && matches(filter.floor, room.floor)
                        && matches(filter.room_type, room.room_type)
                        && matches(filter.is_available, room.is_available)
                        && matches(filter.has_attached_bathroom, room.has_attached_bathroom)
                        && matches(filter.has_air_conditioning, room.has_air_conditioning)
                        && matches_search(
                            filter.search.as_deref(),
                            &[room.room_number.as_str(), room.block.as_str()],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(Page::paginate(rows, page, ROOM_LIST_PER_PAGE))
    }

    /// Deletes a room with its applications and allocations.
    pub fn delete_room(&self, id: RoomId) -> Result<Room, ServiceError> {
        let room = self.repository.write(|tables| {
            let room = fetch(&tables.rooms, id)?.clone();
            cascade::remove_room(tables, id);
            Ok::<_, ServiceError>(room)
        })?;
        info!(room_id = %id, room_number = %room.room_number, "room deleted");
        Ok(room)
    }

    /// Bulk action: mark the selected rooms as available.
    pub fn make_rooms_available(&self, ids: &[RoomId]) -> Result<BulkActionOutcome, ServiceError> {
        self.set_room_availability(ids, true)
    }

    /// Bulk action: mark the selected rooms as unavailable.
    pub fn make_rooms_unavailable(
        &self,
        ids: &[RoomId],
    ) -> Result<BulkActionOutcome, ServiceError> {
        self.set_room_availability(ids, false)
    }

    fn set_room_availability(
        &self,
        ids: &[RoomId],
        available: bool,
    ) -> Result<BulkActionOutcome, ServiceError> {
        let affected = self.repository.write(|tables| {
            let mut affected = 0;
            for room in tables.rooms.iter_mut().filter(|room| ids.contains(&room.id)) {
                room.is_available = available;
                affected += 1;
            }
            Ok::<_, ServiceError>(affected)
        })?;

        let (action, state) = if available {
            ("make_available", "available")
        } else {
            ("make_unavailable", "unavailable")
        };
        info!(action, affected, "room bulk action applied");

        Ok(BulkActionOutcome {
            action,
            affected,
            message: format!("{affected} rooms marked as {state}."),
        })
    }

    /// Creates every valid, not yet known room in one write; the rest are reported back.
    pub fn import_rooms(&self, drafts: Vec<NewRoom>) -> Result<RoomImportSummary, ServiceError> {
        self.import_room_sheet(RoomSheet {
            rooms: drafts,
            rejected: Vec::new(),
        })
    }

    /// Like [`Self::import_rooms`]; unreadable rows are reported first, by line.
    pub fn import_room_sheet(&self, sheet: RoomSheet) -> Result<RoomImportSummary, ServiceError> {
        let now = self.now();
        let RoomSheet { rooms, rejected } = sheet;
        let summary = self.repository.write(|tables| {
            let mut summary = RoomImportSummary::default();
            summary.skipped.extend(rejected.into_iter().map(|row| SkippedRoom {
                room_number: row.room_number,
                line: Some(row.line),
                reason: row.message,
            }));
            for draft in rooms {
                let room_number = draft.room_number.trim().to_string();
                if tables
                    .rooms
                    .find(|room| room.room_number == room_number)
                    .is_some()
                {
                    summary.skipped.push(SkippedRoom {
                        room_number,
                        line: None,
                        reason: "room with this room number already exists".to_string(),
                    });
                    continue;
                }

                let candidate = draft.into_record(tables.rooms.peek_next_id(), now);
                if let Err(errors) = candidate.validate() {
                    summary.skipped.push(SkippedRoom {
                        room_number,
                        line: None,
                        reason: errors.to_string(),
                    });
                    continue;
                }
                let room = tables.rooms.insert_with(|_| candidate);
                summary.created.push(room);
            }
            Ok::<_, ServiceError>(summary)
        })?;

        for skipped in &summary.skipped {
            warn!(
                room_number = %skipped.room_number,
                line = ?skipped.line,
                reason = %skipped.reason,
                "room import row skipped"
            );
        }
        info!(
            created = summary.created.len(),
            skipped = summary.skipped.len(),
            "room import finished"
        );
        Ok(summary)
    }
}
