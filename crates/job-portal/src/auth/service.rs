use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::credentials::{hash_password, verify_password, CredentialError};
use super::domain::{InitialProfile, NewAccount, Role, UserView};
use super::repository::UserStore;
use super::token::{TokenError, TokenService};
use crate::storage::RepositoryError;

const MIN_PASSWORD_LENGTH: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token plus the public account fields, returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub message: String,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Signup and login on top of the credential store and token service.
pub struct AuthService<S> {
    store: Arc<S>,
    tokens: Arc<TokenService>,
}

impl<S> AuthService<S>
where
    S: UserStore + 'static,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthSession, AuthError> {
        let email = required(&request.email, "email")?.trim().to_lowercase();
        let password = required(&request.password, "password")?;
        let role = required(&request.role, "role")?;

        if !email_pattern().is_match(&email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        let role: Role = role
            .parse()
            .map_err(|_| AuthError::Validation("Invalid role".to_string()))?;

        let profile = match role {
            Role::Student => InitialProfile::Student {
                name: non_blank(&request.name)
                    .ok_or_else(|| {
                        AuthError::Validation("Name is required for students".to_string())
                    })?
                    .to_string(),
            },
            Role::Recruiter => InitialProfile::Recruiter {
                company_name: non_blank(&request.company_name)
                    .ok_or_else(|| {
                        AuthError::Validation(
                            "Company name is required for recruiters".to_string(),
                        )
                    })?
                    .to_string(),
            },
        };

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let account = NewAccount {
            email,
            password_hash: hash_password(password)?,
            profile,
        };
        let user = match self.store.create_account(account).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict) => return Err(AuthError::UserExists),
            Err(other) => return Err(other.into()),
        };

        let token = self.tokens.issue(user.id, user.role)?;
        info!(user_id = %user.id, role = %user.role, "account created");

        Ok(AuthSession {
            message: "User created successfully".to_string(),
            token,
            user: user.public_view(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let (Some(email), Some(password)) = (non_blank(&request.email), non_blank(&request.password))
        else {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        };

        let email = email.trim().to_lowercase();
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(user.id, user.role)?;

        Ok(AuthSession {
            message: "Login successful".to_string(),
            token,
            user: user.public_view(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.trim().is_empty())
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AuthError> {
    non_blank(value).ok_or_else(|| AuthError::Validation(format!("{field} is required")))
}
