use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    RecruiterProfile, RecruiterProfileUpdate, StudentProfile, StudentProfileUpdate,
};
use super::repository::ProfileStore;
use crate::auth::UserId;
use crate::storage::RepositoryError;
use crate::uploads::{CvStorage, UploadError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found")]
    NotFound,
    #[error("No valid fields to update")]
    NoFields,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Profile reads and partial updates for both roles, plus student CV replacement.
pub struct ProfileService<S> {
    store: Arc<S>,
    storage: Arc<CvStorage>,
}

impl<S> ProfileService<S>
where
    S: ProfileStore + 'static,
{
    pub fn new(store: Arc<S>, storage: Arc<CvStorage>) -> Self {
        Self { store, storage }
    }

    pub fn storage(&self) -> &Arc<CvStorage> {
        &self.storage
    }

    pub async fn student(&self, user: UserId) -> Result<StudentProfile, ProfileError> {
        self.store
            .student_profile(user)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    pub async fn update_student(
        &self,
        user: UserId,
        update: StudentProfileUpdate,
    ) -> Result<StudentProfile, ProfileError> {
        if update.is_empty() {
            return Err(ProfileError::NoFields);
        }
        self.store
            .update_student_profile(user, &update)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    pub async fn recruiter(&self, user: UserId) -> Result<RecruiterProfile, ProfileError> {
        self.store
            .recruiter_profile(user)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    pub async fn update_recruiter(
        &self,
        user: UserId,
        update: RecruiterProfileUpdate,
    ) -> Result<RecruiterProfile, ProfileError> {
        if update.is_empty() {
            return Err(ProfileError::NoFields);
        }
        self.store
            .update_recruiter_profile(user, &update)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// Stores the new CV, records it, then deletes the file it replaced.
    pub async fn upload_cv(
        &self,
        user: UserId,
        original_name: &str,
        contents: &[u8],
    ) -> Result<String, ProfileError> {
        let stored = self.storage.store(original_name, contents).await?;

        let previous = match self.store.replace_cv(user, &stored).await {
            Ok(previous) => previous,
            Err(err) => {
                self.discard(&stored).await;
                return Err(match err {
                    RepositoryError::NotFound => ProfileError::NotFound,
                    other => other.into(),
                });
            }
        };

        if let Some(previous) = previous.filter(|name| name != &stored) {
            self.discard(&previous).await;
        }
        info!(user_id = %user, file = %stored, "cv uploaded");
        Ok(stored)
    }

    async fn discard(&self, name: &str) {
        if let Err(err) = self.storage.remove(name).await {
            warn!(file = %name, error = %err, "failed to remove cv file");
        }
    }
}
