//! Job portal backend: token-authenticated job search, postings, profiles and the application
//! lifecycle, exposed as an axum router over a SQLite store.

pub mod api;
pub mod applications;
pub mod auth;
pub mod config;
pub mod error;
pub mod jobs;
pub mod profiles;
pub mod storage;
pub mod telemetry;
pub mod uploads;
