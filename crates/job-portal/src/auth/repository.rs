use async_trait::async_trait;

use super::domain::{NewAccount, User};
use crate::storage::RepositoryError;

/// Account storage. Emails are matched case-insensitively.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Creates the account and its initial profile atomically. A taken email surfaces as
    /// [`RepositoryError::Conflict`].
    async fn create_account(&self, account: NewAccount) -> Result<User, RepositoryError>;
}
