use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::{
    AllocationId, ApplicationId, AttachmentId, Complaint, ComplaintId, CustomUser, LostItem,
    LostItemId, Notice, NoticeAttachment, NoticeId, ProfileId, Room, RoomAllocation,
    RoomApplication, RoomId, StipendId, StipendTransaction, StudentProfile, UserId,
};

/// A row type stored in a [`Table`].
pub trait Record: Clone {
    type Id: Copy + Ord + From<u64> + Into<u64>;

    /// Model name used in error messages and the admin registry.
    const MODEL: &'static str;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_record {
    ($record:ty, $id:ty, $model:literal) => {
        impl Record for $record {
            type Id = $id;
            const MODEL: &'static str = $model;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

impl_record!(CustomUser, UserId, "user");
impl_record!(StudentProfile, ProfileId, "student profile");
impl_record!(Room, RoomId, "room");
impl_record!(RoomApplication, ApplicationId, "room application");
impl_record!(RoomAllocation, AllocationId, "room allocation");
impl_record!(Complaint, ComplaintId, "complaint");
impl_record!(Notice, NoticeId, "notice");
impl_record!(NoticeAttachment, AttachmentId, "notice attachment");
impl_record!(StipendTransaction, StipendId, "stipend transaction");
impl_record!(LostItem, LostItemId, "lost item");

/// Rows of one model keyed by primary key. Keys grow monotonically and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    last_id: u64,
    rows: BTreeMap<u64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Key the next insert will receive.
    pub fn peek_next_id(&self) -> T::Id {
        T::Id::from(self.last_id + 1)
    }

    /// Builds a row around a freshly allocated key and stores it.
    pub fn insert_with<F>(&mut self, build: F) -> T
    where
        F: FnOnce(T::Id) -> T,
    {
        self.last_id += 1;
        let row = build(T::Id::from(self.last_id));
        self.rows.insert(self.last_id, row.clone());
        row
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.rows.get(&id.into())
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.rows.get_mut(&id.into())
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.rows.contains_key(&id.into())
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        self.rows.remove(&id.into())
    }

    /// Removes every row matching `predicate`, returning them in key order.
    pub fn remove_where<P>(&mut self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        let doomed: Vec<u64> = self
            .rows
            .iter()
            .filter(|(_, row)| predicate(row))
            .map(|(key, _)| *key)
            .collect();
        doomed
            .into_iter()
            .filter_map(|key| self.rows.remove(&key))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.rows.values().find(|row| predicate(row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every table the hostel office keeps. Cloned wholesale to stage a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostelTables {
    #[serde(default)]
    pub users: Table<CustomUser>,
    #[serde(default)]
    pub student_profiles: Table<StudentProfile>,
    #[serde(default)]
    pub rooms: Table<Room>,
    #[serde(default)]
    pub room_applications: Table<RoomApplication>,
    #[serde(default)]
    pub room_allocations: Table<RoomAllocation>,
    #[serde(default)]
    pub complaints: Table<Complaint>,
    #[serde(default)]
    pub notices: Table<Notice>,
    #[serde(default)]
    pub notice_attachments: Table<NoticeAttachment>,
    #[serde(default)]
    pub stipend_transactions: Table<StipendTransaction>,
    #[serde(default)]
    pub lost_items: Table<LostItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostel::domain::NewRoom;
    use chrono::Utc;

    #[test]
    fn keys_are_not_reused_after_removal() {
        let mut rooms: Table<Room> = Table::default();
        let first = rooms.insert_with(|id| NewRoom::new("101", 1).into_record(id, Utc::now()));
        let second = rooms.insert_with(|id| NewRoom::new("102", 1).into_record(id, Utc::now()));
        assert_eq!(first.id, RoomId(1));
        assert_eq!(second.id, RoomId(2));

        rooms.remove(second.id);
        assert_eq!(rooms.peek_next_id(), RoomId(3));
        let third = rooms.insert_with(|id| NewRoom::new("103", 1).into_record(id, Utc::now()));
        assert_eq!(third.id, RoomId(3));
        assert_eq!(rooms.len(), 2);
    }

    #[test]
    fn tables_survive_a_json_snapshot() {
        let mut tables = HostelTables::default();
        tables
            .rooms
            .insert_with(|id| NewRoom::new("A-101", 1).into_record(id, Utc::now()));
        let encoded = serde_json::to_string(&tables).expect("serializes");
        let decoded: HostelTables = serde_json::from_str(&encoded).expect("deserializes");
        assert_eq!(decoded.rooms.len(), 1);
        assert_eq!(decoded.rooms.peek_next_id(), RoomId(2));
        assert_eq!(
            decoded.rooms.get(RoomId(1)).map(|room| room.room_number.as_str()),
            Some("A-101")
        );
    }
}
