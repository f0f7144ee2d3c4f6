//! Registry describing how each hostel model is presented on the admin site.

use serde::Serialize;

use crate::hostel::service::ROOM_LIST_PER_PAGE;

pub const SITE_HEADER: &str = "Hostel Management System";
pub const SITE_TITLE: &str = "HMS Admin";
pub const INDEX_TITLE: &str = "Welcome to Hostel Management System";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminAction {
    pub name: &'static str,
    pub description: &'static str,
}

/// Changelist and form options for one registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    /// Collection path under `/api/v1/admin`.
    pub path: &'static str,
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub fieldsets: Vec<Fieldset>,
    pub actions: Vec<AdminAction>,
    pub list_per_page: usize,
}

impl ModelAdmin {
    fn new(model: &'static str, path: &'static str, list_per_page: usize) -> Self {
        Self {
            model,
            path,
            list_display: &[],
            list_filter: &[],
            search_fields: &[],
            fieldsets: Vec::new(),
            actions: Vec::new(),
            list_per_page,
        }
    }

    fn display(mut self, fields: &'static [&'static str]) -> Self {
        self.list_display = fields;
        self
    }

    fn filters(mut self, fields: &'static [&'static str]) -> Self {
        self.list_filter = fields;
        self
    }

    fn search(mut self, fields: &'static [&'static str]) -> Self {
        self.search_fields = fields;
        self
    }

    fn fieldset(mut self, name: &'static str, fields: &'static [&'static str]) -> Self {
        self.fieldsets.push(Fieldset { name, fields });
        self
    }

    fn action(mut self, name: &'static str, description: &'static str) -> Self {
        self.actions.push(AdminAction { name, description });
        self
    }
}

/// The admin site index: branding plus every registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSite {
    pub site_header: &'static str,
    pub site_title: &'static str,
    pub index_title: &'static str,
    pub models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn hostel(list_per_page: usize) -> Self {
        let models = vec![
            ModelAdmin::new("user", "users", list_per_page)
                .display(&[
                    "username",
                    "email",
                    "first_name",
                    "last_name",
                    "is_staff",
                    "user_type",
                    "phone",
                ])
                .filters(&["user_type", "is_staff", "is_active"])
                .search(&["username", "first_name", "last_name", "email"])
                .fieldset("Account", &["username", "email", "first_name", "last_name"])
                .fieldset("Permissions", &["is_active", "is_staff"])
                .fieldset("Additional Info", &["user_type", "phone"]),
            ModelAdmin::new("student profile", "students", list_per_page)
                .display(&[
                    "student_id",
                    "user",
                    "department",
                    "faculty",
                    "academic_year",
                    "is_allocated",
                ])
                .filters(&["department", "faculty", "academic_year", "is_allocated"])
                .search(&[
                    "student_id",
                    "user__username",
                    "user__first_name",
                    "user__last_name",
                ])
                .fieldset("User Information", &["user"])
                .fieldset(
                    "Academic Information",
                    &[
                        "student_id",
                        "department",
                        "faculty",
                        "academic_level",
                        "academic_year",
                        "semester",
                        "date_of_enrollment",
                    ],
                )
                .fieldset(
                    "Emergency Contact",
                    &["emergency_contact", "emergency_contact_name"],
                )
                .fieldset("Hostel Status", &["is_allocated"]),
            ModelAdmin::new("room", "rooms", ROOM_LIST_PER_PAGE)
                .display(&[
                    "room_number",
                    "block",
                    "floor",
                    "room_type",
                    "capacity",
                    "current_occupancy",
                    "available_beds",
                    "is_available",
                ])
                .filters(&[
                    "block",
                    "floor",
                    "room_type",
                    "is_available",
                    "has_attached_bathroom",
                    "has_ac",
                ])
                .search(&["room_number", "block"])
                .fieldset("Room Information", &["room_number", "block", "floor", "room_type"])
                .fieldset("Capacity", &["capacity", "current_occupancy", "is_available"])
                .fieldset("Facilities", &["has_attached_bathroom", "has_ac"])
                .action("make_available", "Mark selected rooms as available")
                .action("make_unavailable", "Mark selected rooms as unavailable"),
            ModelAdmin::new("room application", "applications", list_per_page)
                .display(&["student", "room", "status", "application_date", "priority_score"])
                .filters(&["status", "student", "room"]),
            ModelAdmin::new("room allocation", "allocations", list_per_page)
                .display(&["student", "room", "allocated_date", "allocated_by", "is_active"])
                .filters(&["room", "student", "is_active"]),
            ModelAdmin::new("complaint", "complaints", list_per_page)
                .display(&[
                    "complaint_id",
                    "subject",
                    "category",
                    "priority",
                    "status",
                    "submitted_at",
                ])
                .filters(&["status", "category", "priority", "student", "assigned_to"])
                .search(&["complaint_id", "subject", "location"]),
            ModelAdmin::new("notice", "notices", list_per_page)
                .display(&["title", "category", "priority", "created_at", "expires_at", "is_active"])
                .filters(&["category", "priority", "is_active", "current_only"])
                .search(&["title", "content"]),
            ModelAdmin::new("stipend transaction", "stipends", list_per_page)
                .display(&["student", "amount", "payment_method", "reference_number", "transaction_date"])
                .filters(&["student", "payment_method"])
                .search(&["reference_number"]),
            ModelAdmin::new("lost item", "lost-items", list_per_page)
                .display(&["item_name", "category", "status", "lost_date", "expires_at"])
                .filters(&["status", "category", "reporter"])
                .search(&["item_name", "lost_location"])
                .action("mark_expired", "Mark overdue items as expired"),
        ];

        Self {
            site_header: SITE_HEADER,
            site_title: SITE_TITLE,
            index_title: INDEX_TITLE,
            models,
        }
    }

    pub fn model(&self, path: &str) -> Option<&ModelAdmin> {
        self.models.iter().find(|model| model.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_keep_their_own_page_size_and_actions() {
        let site = AdminSite::hostel(50);
        let rooms = site.model("rooms").expect("rooms registered");
        assert_eq!(rooms.list_per_page, 20);
        let actions: Vec<_> = rooms.actions.iter().map(|action| action.name).collect();
        assert_eq!(actions, ["make_available", "make_unavailable"]);
        assert!(rooms.list_display.contains(&"available_beds"));

        let students = site.model("students").expect("students registered");
        assert_eq!(students.list_per_page, 50);
        assert_eq!(students.fieldsets.len(), 4);
    }

    #[test]
    fn every_collection_is_registered_once() {
        let site = AdminSite::hostel(100);
        let mut paths: Vec<_> = site.models.iter().map(|model| model.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), 9);
        assert_eq!(site.site_header, "Hostel Management System");
    }
}
