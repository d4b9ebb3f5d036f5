//! Accounts and access control: password hashing, signed session tokens, and the middleware
//! that turns a bearer token into an [`Identity`].

pub mod credentials;
pub mod domain;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod service;
pub mod token;

pub use credentials::{hash_password, verify_password, CredentialError};
pub use domain::{Identity, InitialProfile, NewAccount, Role, UnknownRole, User, UserId, UserView};
pub use middleware::{authenticate, guard, require_role};
pub use repository::UserStore;
pub use router::auth_routes;
pub use service::{AuthError, AuthService, AuthSession, LoginRequest, SignupRequest};
pub use token::{TokenError, TokenService, TOKEN_TTL_DAYS};
