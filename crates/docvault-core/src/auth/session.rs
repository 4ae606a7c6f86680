use tracing::{debug, info, warn};

use super::store::{StoreError, TokenStore};
use crate::api::ApiError;

/// Who is logged in, as reported by OTP validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// In-memory authentication state.
///
/// `is_authenticated` is true iff `token` holds a non-empty value.
/// `loading` is true until the first `restore()` finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub token: Option<String>,
    pub user: UserIdentity,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            token: None,
            user: UserIdentity::default(),
            loading: true,
        }
    }
}

impl Session {
    fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }
}

/// Outcome of writing to or deleting from the token store.
///
/// Persistence failures never fail a login or logout: the in-memory session
/// is updated either way and the error is logged. The value is returned so
/// callers can tell whether the change will survive a restart.
#[derive(Debug)]
#[must_use]
pub enum Persisted {
    Ok,
    /// Nothing was written (empty token)
    Skipped,
    Failed(StoreError),
}

impl Persisted {
    pub fn is_ok(&self) -> bool {
        matches!(self, Persisted::Ok)
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Persisted::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Owner of the session state and its backing token store.
///
/// Mutations take `&mut self`; there is no lock, so callers serialize
/// login, logout and restore by construction.
pub struct SessionManager<S: TokenStore> {
    store: S,
    session: Session,
    restored: bool,
}

impl<S: TokenStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Session::default(),
            restored: false,
        }
    }

    /// Load the persisted token. Runs once; later calls are ignored.
    ///
    /// Only the token is restored. User identity is not persisted, so
    /// `user` stays empty until the next login.
    pub fn restore(&mut self) {
        if self.restored {
            warn!("Session restore already ran, ignoring");
            return;
        }
        self.restored = true;

        match self.store.get() {
            Ok(Some(token)) if !token.is_empty() => {
                debug!("Restored session token");
                self.session.token = Some(token);
                self.session.is_authenticated = true;
            }
            Ok(_) => debug!("No stored session token"),
            Err(e) => warn!(error = %e, "Failed to read stored session token"),
        }

        self.session.loading = false;
    }

    /// Persist the token, then mark the session authenticated.
    ///
    /// An empty token is ignored: neither the store nor the current session
    /// changes, so memory and storage stay in agreement.
    pub fn login(
        &mut self,
        token: impl Into<String>,
        user_name: Option<String>,
        user_id: Option<String>,
    ) -> Persisted {
        let token = token.into();
        if token.is_empty() {
            warn!("Ignoring login with an empty token");
            return Persisted::Skipped;
        }

        let persisted = match self.store.set(&token) {
            Ok(()) => Persisted::Ok,
            Err(e) => {
                warn!(error = %e, "Failed to store session token");
                Persisted::Failed(e)
            }
        };

        self.session = Session {
            is_authenticated: true,
            token: Some(token),
            user: UserIdentity {
                name: user_name,
                id: user_id,
            },
            loading: false,
        };
        info!("Logged in");
        persisted
    }

    /// Delete the persisted token, then clear the session unconditionally.
    pub fn logout(&mut self) -> Persisted {
        let persisted = match self.store.remove() {
            Ok(()) => Persisted::Ok,
            Err(e) => {
                warn!(error = %e, "Failed to remove session token");
                Persisted::Failed(e)
            }
        };

        self.session = Session::signed_out();
        info!("Logged out");
        persisted
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.session.loading
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> &UserIdentity {
        &self.session.user
    }

    /// The token for an authenticated request
    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.token()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotAuthenticated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
