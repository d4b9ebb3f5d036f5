use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub expected_salary: Option<i64>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub cv_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecruiterProfile {
    pub id: i64,
    pub user_id: UserId,
    pub company_name: String,
    pub company_description: Option<String>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial student profile update. Unknown keys in the payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    pub name: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub expected_salary: Option<i64>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

impl StudentProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.education.is_none()
            && self.skills.is_none()
            && self.location.is_none()
            && self.expected_salary.is_none()
            && self.bio.is_none()
            && self.phone.is_none()
    }
}

/// Partial recruiter profile update. Unknown keys in the payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterProfileUpdate {
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl RecruiterProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.company_description.is_none()
            && self.location.is_none()
            && self.contact_person.is_none()
            && self.phone.is_none()
            && self.website.is_none()
    }
}
