use async_trait::async_trait;

use super::domain::{
    RecruiterProfile, RecruiterProfileUpdate, StudentProfile, StudentProfileUpdate,
};
use crate::auth::UserId;
use crate::storage::RepositoryError;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn student_profile(&self, user: UserId)
        -> Result<Option<StudentProfile>, RepositoryError>;

    /// Applies the present fields and bumps `updated_at`. `None` when the profile is missing.
    async fn update_student_profile(
        &self,
        user: UserId,
        update: &StudentProfileUpdate,
    ) -> Result<Option<StudentProfile>, RepositoryError>;

    /// Records a new CV file name and returns the one it replaced. A missing profile surfaces
    /// as [`RepositoryError::NotFound`].
    async fn replace_cv(
        &self,
        user: UserId,
        filename: &str,
    ) -> Result<Option<String>, RepositoryError>;

    async fn recruiter_profile(
        &self,
        user: UserId,
    ) -> Result<Option<RecruiterProfile>, RepositoryError>;

    async fn update_recruiter_profile(
        &self,
        user: UserId,
        update: &RecruiterProfileUpdate,
    ) -> Result<Option<RecruiterProfile>, RepositoryError>;
}
