//! Authentication module for the session token lifecycle.
//!
//! This module provides:
//! - `TokenStore`: device-local persistence of the one session token,
//!   backed by the OS keychain (`KeyringTokenStore`), a plain file
//!   (`FileTokenStore`) or memory (`MemoryTokenStore`)
//! - `SessionManager`: the in-memory session, restored from the store at
//!   startup and updated by login and logout
//!
//! Tokens do not expire on the client and are never refreshed.

pub mod session;
pub mod store;

pub use session::{Persisted, Session, SessionManager, UserIdentity};
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, StoreError, TokenStore, TOKEN_KEY};
