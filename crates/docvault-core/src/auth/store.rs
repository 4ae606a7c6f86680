use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;

/// Key the session token is stored under
pub const TOKEN_KEY: &str = "authToken";

/// Keychain service name
const SERVICE_NAME: &str = "docvault";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Device-local persistence of the single session token value
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing is stored
    fn get(&self) -> Result<Option<String>, StoreError>;

    fn set(&self, value: &str) -> Result<(), StoreError>;

    /// Removing an absent value succeeds
    fn remove(&self) -> Result<(), StoreError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn get(&self) -> Result<Option<String>, StoreError> {
        (**self).get()
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        (**self).set(value)
    }

    fn remove(&self) -> Result<(), StoreError> {
        (**self).remove()
    }
}

/// Token kept in the OS keychain
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, TOKEN_KEY)?)
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(value)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token kept as a plain file `<dir>/authToken`
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the platform data directory
    pub fn in_data_dir(app_name: &str) -> Result<Self, StoreError> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| StoreError::Unavailable("Could not find data directory".to_string()))?;
        Ok(Self::new(data_dir.join(app_name)))
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.token_path()) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.token_path(), value)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, optionally failing every call
#[derive(Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<String>>,
    failing: bool,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
            failing: false,
        }
    }

    /// A store whose every operation errors
    pub fn failing() -> Self {
        Self {
            value: Mutex::new(None),
            failing: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Unavailable("storage is failing".to_string()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.lock().clone())
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        self.check()?;
        *self.lock() = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.check()?;
        *self.lock() = None;
        Ok(())
    }
}
