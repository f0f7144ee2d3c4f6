use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::choices::{NoticeCategory, Priority};
use super::ids::{AttachmentId, NoticeId, UserId};
use super::validation::ValidationErrors;

/// Lifetime of notices and lost-item reports created without an explicit expiry.
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

pub fn default_expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(DEFAULT_EXPIRY_DAYS)
}

/// Bulletin board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub priority: Priority,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub target_audience: String,
}

impl Notice {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Active and not yet expired.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("title", &self.title);
        errors.max_len("title", &self.title, 200);
        errors.required("content", &self.content);
        errors.required("target_audience", &self.target_audience);
        errors.max_len("target_audience", &self.target_audience, 50);
        errors.into_result()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.category.label())
    }
}

fn default_true() -> bool {
    true
}

fn default_audience() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: NoticeCategory,
    #[serde(default)]
    pub priority: Priority,
    pub created_by: UserId,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_audience")]
    pub target_audience: String,
}

impl NewNotice {
    pub(crate) fn into_record(self, id: NoticeId, now: DateTime<Utc>) -> Notice {
        Notice {
            id,
            title: self.title.trim().to_string(),
            content: self.content,
            category: self.category,
            priority: self.priority,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
            expires_at: self.expires_at.unwrap_or_else(|| default_expiry(now)),
            is_active: self.is_active,
            target_audience: self.target_audience,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub target_audience: Option<String>,
}

impl NoticePatch {
    pub(crate) fn apply(self, notice: &mut Notice, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            notice.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            notice.content = content;
        }
        if let Some(category) = self.category {
            notice.category = category;
        }
        if let Some(priority) = self.priority {
            notice.priority = priority;
        }
        if let Some(expires_at) = self.expires_at {
            notice.expires_at = expires_at;
        }
        if let Some(is_active) = self.is_active {
            notice.is_active = is_active;
        }
        if let Some(target_audience) = self.target_audience {
            notice.target_audience = target_audience;
        }
        notice.updated_at = now;
    }
}

/// File pinned to a notice. Only the storage key is kept; bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeAttachment {
    pub id: AttachmentId,
    pub notice: NoticeId,
    pub file: String,
    pub filename: String,
    pub file_size: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl NoticeAttachment {
    pub fn label(&self, notice: &Notice) -> String {
        format!("{} - {}", notice.title, self.filename)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("file", &self.file);
        errors.max_len("file", &self.file, 100);
        errors.required("filename", &self.filename);
        errors.max_len("filename", &self.filename, 255);
        errors.into_result()
    }
}

/// Uploaded file as handed over by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttachment {
    pub file: String,
    #[serde(default)]
    pub size: u64,
}

impl NewAttachment {
    pub(crate) fn into_record(
        self,
        id: AttachmentId,
        notice: NoticeId,
        now: DateTime<Utc>,
    ) -> NoticeAttachment {
        let file = self.file.trim().to_string();
        let filename = file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(file.as_str())
            .to_string();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        NoticeAttachment {
            id,
            notice,
            filename,
            file_size: self.size,
            content_type,
            file,
            uploaded_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn draft(expires_at: Option<DateTime<Utc>>) -> NewNotice {
        NewNotice {
            title: "Water supply interruption".to_string(),
            content: "Block A tanks are cleaned on Saturday.".to_string(),
            category: NoticeCategory::Maintenance,
            priority: Priority::High,
            created_by: UserId(1),
            expires_at,
            is_active: true,
            target_audience: "all".to_string(),
        }
    }

    #[test]
    fn expiry_defaults_to_thirty_days_after_creation() {
        let notice = draft(None).into_record(NoticeId(1), now());
        assert_eq!(notice.expires_at, now() + Duration::days(30));
        assert!(!notice.is_expired(now() + Duration::days(30)));
        assert!(notice.is_expired(now() + Duration::days(30) + Duration::seconds(1)));
    }

    #[test]
    fn explicit_expiry_is_kept() {
        let explicit = now() + Duration::days(2);
        let notice = draft(Some(explicit)).into_record(NoticeId(1), now());
        assert_eq!(notice.expires_at, explicit);
        assert_eq!(notice.to_string(), "Water supply interruption - Maintenance");
    }

    #[test]
    fn attachment_metadata_comes_from_the_file() {
        let attachment = NewAttachment {
            file: "notices/2025/mess-menu.pdf".to_string(),
            size: 48_213,
        }
        .into_record(AttachmentId(1), NoticeId(1), now());

        assert_eq!(attachment.filename, "mess-menu.pdf");
        assert_eq!(attachment.file_size, 48_213);
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(attachment.validate().is_ok());
    }
}
