use serde::Deserialize;
use tracing::info;

use super::{cascade, fetch, fetch_mut, HostelAdmin, ServiceError};
use crate::hostel::domain::{
    AttachmentId, NewAttachment, NewNotice, Notice, NoticeAttachment, NoticeCategory, NoticeId,
    NoticePatch, Priority,
};
use crate::hostel::query::{matches, matches_search, Page, PageRequest};
use crate::hostel::repository::HostelRepository;

/// Changelist filters for the notice board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoticeFilter {
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    pub is_active: Option<bool>,
    /// Only notices that are active and not yet expired.
    #[serde(default)]
    pub current_only: bool,
    pub search: Option<String>,
}

impl<R> HostelAdmin<R>
where
    R: HostelRepository + 'static,
{
    /// Publishes a notice. Without an explicit expiry it lapses thirty days after creation.
    pub fn publish_notice(&self, draft: NewNotice) -> Result<Notice, ServiceError> {
        let now = self.now();
        let notice = self.repository.write(|tables| {
            fetch(&tables.users, draft.created_by)?;
            let notice = tables
                .notices
                .insert_with(|id| draft.into_record(id, now));
            notice.validate()?;
            Ok::<_, ServiceError>(notice)
        })?;

        info!(
            notice_id = %notice.id,
            category = notice.category.value(),
            expires_at = %notice.expires_at,
            "notice published"
        );
        Ok(notice)
    }

    pub fn update_notice(&self, id: NoticeId, patch: NoticePatch) -> Result<Notice, ServiceError> {
        let now = self.now();
        self.repository.write(|tables| {
            let notice = fetch_mut(&mut tables.notices, id)?;
            patch.apply(notice, now);
            notice.validate()?;
            Ok(notice.clone())
        })
    }

    pub fn get_notice(&self, id: NoticeId) -> Result<Notice, ServiceError> {
        self.repository
            .read(|tables| fetch(&tables.notices, id).cloned())?
    }

    /// Newest notices first.
    pub fn list_notices(
        &self,
        filter: &NoticeFilter,
        page: PageRequest,
    ) -> Result<Page<Notice>, ServiceError> {
        let now = self.now();
        let mut rows = self.repository.read(|tables| {
            tables
                .notices
                .iter()
                .filter(|notice| {
                    matches(filter.category, notice.category)
                        && matches(filter.priority, notice.priority)
                        && matches(filter.is_active, notice.is_active)
                        && (!filter.current_only || notice.is_visible(now))
                        && matches_search(
                            filter.search.as_deref(),
                            &[notice.title.as_str(), notice.content.as_str()],
                        )
                })
                .cloned()
                .collect::<Vec<_>>()
        })?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(Page::paginate(rows, page, self.list_per_page))
    }

    /// Deletes a notice together with its attachments.
    pub fn delete_notice(&self, id: NoticeId) -> Result<Notice, ServiceError> {
        let notice = self.repository.write(|tables| {
            let notice = fetch(&tables.notices, id)?.clone();
            cascade::remove_notice(tables, id);
            Ok::<_, ServiceError>(notice)
        })?;
        info!(notice_id = %id, "notice deleted");
        Ok(notice)
    }

    pub fn add_attachment(
        &self,
        notice: NoticeId,
        upload: NewAttachment,
    ) -> Result<NoticeAttachment, ServiceError> {
        let now = self.now();
        let attachment = self.repository.write(|tables| {
            fetch(&tables.notices, notice)?;
            let attachment = tables
                .notice_attachments
                .insert_with(|id| upload.into_record(id, notice, now));
            attachment.validate()?;
            Ok::<_, ServiceError>(attachment)
        })?;

        info!(
            notice_id = %notice,
            attachment_id = %attachment.id,
            content_type = %attachment.content_type,
            "notice attachment added"
        );
        Ok(attachment)
    }

    /// Attachments of one notice in upload order.
    pub fn list_attachments(&self, notice: NoticeId) -> Result<Vec<NoticeAttachment>, ServiceError> {
        self.repository.read(|tables| {
            fetch(&tables.notices, notice)?;
            Ok(tables
                .notice_attachments
                .iter()
                .filter(|attachment| attachment.notice == notice)
                .cloned()
                .collect())
        })?
    }

    pub fn delete_attachment(&self, id: AttachmentId) -> Result<NoticeAttachment, ServiceError> {
        self.repository.write(|tables| {
            tables
                .notice_attachments
                .remove(id)
                .ok_or_else(|| ServiceError::not_found::<NoticeAttachment>(id))
        })
    }
}
