//! REST API client module for the document service.
//!
//! This module provides the `ApiClient` for the five backend operations
//! (OTP generation and validation, document upload, tag lookup and
//! search) plus file download.
//!
//! Authenticated endpoints expect the session token in a `token` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, TOKEN_HEADER};
pub use error::{ApiError, Operation};
