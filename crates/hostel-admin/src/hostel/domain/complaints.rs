use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::choices::{ComplaintCategory, ComplaintStatus, Priority};
use super::ids::{ComplaintId, ProfileId, UserId};
use super::validation::ValidationErrors;

pub const TICKET_PREFIX: &str = "CMP";

/// `CMP-YYYYMMDD`, the prefix shared by every ticket filed on `day`.
pub fn ticket_day_prefix(day: NaiveDate) -> String {
    format!("{TICKET_PREFIX}-{}", day.format("%Y%m%d"))
}

/// Next ticket for `day`, given the primary keys of complaints already ticketed that day.
///
/// The sequence is one past the largest such key, or 1 for the first complaint of the day.
pub fn next_ticket<I>(day: NaiveDate, same_day_keys: I) -> String
where
    I: IntoIterator<Item = ComplaintId>,
{
    let sequence = same_day_keys
        .into_iter()
        .map(|key| key.0)
        .max()
        .filter(|max| *max > 0)
        .map_or(1, |max| max + 1);
    format!("{}-{sequence:04}", ticket_day_prefix(day))
}

/// Splits a ticket into its date and sequence parts.
pub fn parse_ticket(ticket: &str) -> Option<(NaiveDate, u64)> {
    let mut parts = ticket.splitn(3, '-');
    if parts.next()? != TICKET_PREFIX {
        return None;
    }
    let day = parts.next()?;
    let sequence = parts.next()?;
    if day.len() != 8 || sequence.len() < 4 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = NaiveDate::parse_from_str(day, "%Y%m%d").ok()?;
    let sequence = sequence.parse().ok()?;
    Some((day, sequence))
}

/// Issue report filed by a resident and tracked to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub complaint_id: String,
    pub student: ProfileId,
    pub category: ComplaintCategory,
    pub subject: String,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub submitted_at: DateTime<Utc>,
    pub assigned_to: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: String,
    pub attachment: Option<String>,
}

impl Complaint {
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            ComplaintStatus::Submitted | ComplaintStatus::InProgress
        )
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("subject", &self.subject);
        errors.max_len("subject", &self.subject, 200);
        errors.required("description", &self.description);
        errors.max_len("location", &self.location, 100);
        errors.max_len("complaint_id", &self.complaint_id, 20);
        if let Some(attachment) = &self.attachment {
            errors.max_len("attachment", attachment, 100);
        }
        errors.into_result()
    }
}

impl fmt::Display for Complaint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.complaint_id, self.subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    pub student: ProfileId,
    pub category: ComplaintCategory,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub attachment: Option<String>,
}

impl NewComplaint {
    pub(crate) fn into_record(
        self,
        id: ComplaintId,
        complaint_id: String,
        now: DateTime<Utc>,
    ) -> Complaint {
        Complaint {
            id,
            complaint_id,
            student: self.student,
            category: self.category,
            subject: self.subject.trim().to_string(),
            description: self.description,
            location: self.location,
            priority: self.priority,
            status: ComplaintStatus::Submitted,
            submitted_at: now,
            assigned_to: None,
            resolved_at: None,
            resolution_notes: String::new(),
            attachment: self.attachment,
        }
    }
}

/// Staff-side update of a complaint. The ticket itself is never editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintPatch {
    pub category: Option<ComplaintCategory>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<ComplaintStatus>,
    #[serde(default, deserialize_with = "super::validation::double_option")]
    pub assigned_to: Option<Option<UserId>>,
    pub resolution_notes: Option<String>,
    #[serde(default, deserialize_with = "super::validation::double_option")]
    pub attachment: Option<Option<String>>,
}

impl ComplaintPatch {
    pub(crate) fn apply(self, complaint: &mut Complaint, now: DateTime<Utc>) {
        if let Some(category) = self.category {
            complaint.category = category;
        }
        if let Some(subject) = self.subject {
            complaint.subject = subject.trim().to_string();
        }
        if let Some(description) = self.description {
            complaint.description = description;
        }
        if let Some(location) = self.location {
            complaint.location = location;
        }
        if let Some(priority) = self.priority {
            complaint.priority = priority;
        }
        if let Some(assigned_to) = self.assigned_to {
            complaint.assigned_to = assigned_to;
        }
        if let Some(resolution_notes) = self.resolution_notes {
            complaint.resolution_notes = resolution_notes;
        }
        if let Some(attachment) = self.attachment {
            complaint.attachment = attachment;
        }
        if let Some(status) = self.status {
            complaint.status = status;
            match status {
                ComplaintStatus::Resolved | ComplaintStatus::Closed => {
                    complaint.resolved_at.get_or_insert(now);
                }
                ComplaintStatus::Submitted | ComplaintStatus::InProgress => {
                    complaint.resolved_at = None;
                }
            }
        }
    }
}
