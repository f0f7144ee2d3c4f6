use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::choices::UserRole;
use super::ids::{ProfileId, UserId};
use super::validation::ValidationErrors;

/// Placeholder written into auto-created profiles until staff fill them in.
pub const NOT_SET: &str = "Not Set";

/// Account with a hostel role tag and contact numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomUser {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: UserRole,
    pub phone: String,
    pub emergency_contact: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_student(&self) -> bool {
        self.user_type == UserRole::Student
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("username", &self.username);
        errors.max_len("username", &self.username, 150);
        if self.username.chars().any(char::is_whitespace) {
            errors.add("username", "Usernames may not contain whitespace.");
        }
        errors.max_len("first_name", &self.first_name, 150);
        errors.max_len("last_name", &self.last_name, 150);
        errors.max_len("email", &self.email, 254);
        if !self.email.is_empty() && !self.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        errors.max_len("phone", &self.phone, 15);
        errors.max_len("emergency_contact", &self.emergency_contact, 15);
        errors.into_result()
    }
}

impl fmt::Display for CustomUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.username, self.user_type.label())
    }
}

fn default_true() -> bool {
    true
}

/// Payload for creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user_type: UserRole,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewUser {
    pub fn new(username: impl Into<String>, user_type: UserRole) -> Self {
        Self {
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            user_type,
            phone: String::new(),
            emergency_contact: String::new(),
            is_staff: false,
            is_active: true,
        }
    }

    pub(crate) fn into_record(self, id: UserId, now: DateTime<Utc>) -> CustomUser {
        CustomUser {
            id,
            username: self.username.trim().to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.trim().to_string(),
            user_type: self.user_type,
            phone: self.phone,
            emergency_contact: self.emergency_contact,
            is_staff: self.is_staff,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an account; missing fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserRole>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub(crate) fn apply(self, user: &mut CustomUser, now: DateTime<Utc>) {
        if let Some(username) = self.username {
            user.username = username.trim().to_string();
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = self.email {
            user.email = email.trim().to_string();
        }
        if let Some(user_type) = self.user_type {
            user.user_type = user_type;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(emergency_contact) = self.emergency_contact {
            user.emergency_contact = emergency_contact;
        }
        if let Some(is_staff) = self.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        user.updated_at = now;
    }
}

/// Academic and contact details kept for every resident student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: ProfileId,
    pub user: UserId,
    pub student_id: String,
    pub department: String,
    pub faculty: String,
    pub academic_level: String,
    pub academic_year: u32,
    pub semester: u32,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_contact_name: String,
    pub date_of_enrollment: NaiveDate,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub is_allocated: bool,
}

impl StudentProfile {
    /// Profile written for a freshly created student account.
    pub fn placeholder(id: ProfileId, user: UserId, today: NaiveDate) -> Self {
        Self {
            id,
            user,
            student_id: format!("TEMP{:04}", user.0),
            department: NOT_SET.to_string(),
            faculty: NOT_SET.to_string(),
            academic_level: "Undergraduate".to_string(),
            academic_year: today.year().max(1) as u32,
            semester: 1,
            guardian_name: String::new(),
            guardian_phone: String::new(),
            address: String::new(),
            emergency_contact: NOT_SET.to_string(),
            emergency_contact_name: NOT_SET.to_string(),
            date_of_enrollment: today,
            profile_picture: None,
            is_active: true,
            is_allocated: false,
        }
    }

    /// `"<student_id> - <full name>"`, the admin list label.
    pub fn label(&self, owner: &CustomUser) -> String {
        format!("{} - {}", self.student_id, owner.full_name())
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("student_id", &self.student_id);
        errors.max_len("student_id", &self.student_id, 20);
        errors.required("department", &self.department);
        errors.max_len("department", &self.department, 100);
        errors.max_len("faculty", &self.faculty, 100);
        errors.max_len("academic_level", &self.academic_level, 50);
        errors.at_least("academic_year", self.academic_year, 1);
        errors.at_least("semester", self.semester, 1);
        errors.max_len("guardian_name", &self.guardian_name, 100);
        errors.max_len("guardian_phone", &self.guardian_phone, 15);
        errors.max_len("emergency_contact", &self.emergency_contact, 15);
        errors.max_len("emergency_contact_name", &self.emergency_contact_name, 100);
        if let Some(picture) = &self.profile_picture {
            errors.max_len("profile_picture", picture, 100);
        }
        errors.into_result()
    }
}

fn default_semester() -> u32 {
    1
}

/// Payload for creating a profile by hand (accounts created as non-students, imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudentProfile {
    pub user: UserId,
    pub student_id: String,
    pub department: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub academic_level: String,
    pub academic_year: u32,
    #[serde(default = "default_semester")]
    pub semester: u32,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub date_of_enrollment: Option<NaiveDate>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewStudentProfile {
    pub(crate) fn into_record(self, id: ProfileId, today: NaiveDate) -> StudentProfile {
        StudentProfile {
            id,
            user: self.user,
            student_id: self.student_id.trim().to_string(),
            department: self.department,
            faculty: self.faculty,
            academic_level: self.academic_level,
            academic_year: self.academic_year,
            semester: self.semester,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            address: self.address,
            emergency_contact: self.emergency_contact,
            emergency_contact_name: self.emergency_contact_name,
            date_of_enrollment: self.date_of_enrollment.unwrap_or(today),
            profile_picture: self.profile_picture,
            is_active: self.is_active,
            is_allocated: false,
        }
    }
}

/// Partial update of a profile. `profile_picture: null` clears the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfilePatch {
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub academic_level: Option<String>,
    pub academic_year: Option<u32>,
    pub semester: Option<u32>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub date_of_enrollment: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::validation::double_option")]
    pub profile_picture: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_allocated: Option<bool>,
}

impl StudentProfilePatch {
    pub(crate) fn apply(self, profile: &mut StudentProfile) {
        if let Some(student_id) = self.student_id {
            profile.student_id = student_id.trim().to_string();
        }
        if let Some(department) = self.department {
            profile.department = department;
        }
        if let Some(faculty) = self.faculty {
            profile.faculty = faculty;
        }
        if let Some(academic_level) = self.academic_level {
            profile.academic_level = academic_level;
        }
        if let Some(academic_year) = self.academic_year {
            profile.academic_year = academic_year;
        }
        if let Some(semester) = self.semester {
            profile.semester = semester;
        }
        if let Some(guardian_name) = self.guardian_name {
            profile.guardian_name = guardian_name;
        }
        if let Some(guardian_phone) = self.guardian_phone {
            profile.guardian_phone = guardian_phone;
        }
        if let Some(address) = self.address {
            profile.address = address;
        }
        if let Some(emergency_contact) = self.emergency_contact {
            profile.emergency_contact = emergency_contact;
        }
        if let Some(emergency_contact_name) = self.emergency_contact_name {
            profile.emergency_contact_name = emergency_contact_name;
        }
        if let Some(date_of_enrollment) = self.date_of_enrollment {
            profile.date_of_enrollment = date_of_enrollment;
        }
        if let Some(profile_picture) = self.profile_picture {
            profile.profile_picture = profile_picture;
        }
        if let Some(is_active) = self.is_active {
            profile.is_active = is_active;
        }
        if let Some(is_allocated) = self.is_allocated {
            profile.is_allocated = is_allocated;
        }
    }
}
