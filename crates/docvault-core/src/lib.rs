//! docvault-core - client library for the docvault document service.
//!
//! Handles OTP login, the persisted session token, and the document
//! upload, tag lookup, search and download calls against the REST backend.

pub mod api;
pub mod auth;
pub mod config;
pub mod download;
pub mod models;
pub mod sequence;
pub mod utils;

pub use api::{ApiClient, ApiError, Operation};
pub use auth::{Persisted, Session, SessionManager, TokenStore, UserIdentity};
pub use config::Config;
pub use sequence::{RequestSequence, Ticket};
