//! Durable key-value storage for cart state.
//!
//! The cart reads and writes its whole state under one key through the
//! [`CartStorage`] trait. Backends:
//!
//! - [`CookieStorage`] - the visitor's cookie jar; writes become `Set-Cookie`
//!   headers so the state lives in the browser, not on the server
//! - [`FileStorage`] - one file per key in a directory (CLI)
//! - [`MemoryStorage`] - an in-process map

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::http::{HeaderMap, HeaderValue, header};
use thiserror::Error;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

/// Browsers drop cookies larger than this (name + value).
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Cookie lifetime. Cart contents outlive the browsing session.
const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("Value for {key} is too large ({len} bytes)")]
    TooLarge { key: String, len: usize },
    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

/// Synchronous string storage addressed by key.
pub trait CartStorage {
    /// Read the value stored under `key`, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

// =============================================================================
// Memory
// =============================================================================

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }

    /// Raw stored value, for inspection.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// Directory-backed storage, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =============================================================================
// Cookie
// =============================================================================

/// Storage over the request's cookie jar.
///
/// Reads come from the `Cookie` request headers captured at construction.
/// Writes update the snapshot and queue a `Set-Cookie` header; call
/// [`CookieStorage::set_cookie_headers`] when building the response.
/// Values are percent-encoded so arbitrary JSON survives the cookie grammar.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    values: HashMap<String, String>,
    pending: Vec<String>,
    secure: bool,
}

impl CookieStorage {
    /// Snapshot the cookies sent with a request.
    ///
    /// Cookies that fail to parse or decode are ignored.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        let mut values = HashMap::new();
        for header_value in headers.get_all(header::COOKIE) {
            let Ok(raw) = header_value.to_str() else {
                continue;
            };
            for cookie in Cookie::split_parse(raw).flatten() {
                if let Ok(decoded) = urlencoding::decode(cookie.value()) {
                    values.insert(cookie.name().to_string(), decoded.into_owned());
                }
            }
        }

        Self {
            values,
            pending: Vec::new(),
            secure,
        }
    }

    /// `Set-Cookie` header values for every write made through this storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Header` if a cookie cannot be encoded as a header.
    pub fn set_cookie_headers(&self) -> Result<Vec<HeaderValue>, StorageError> {
        self.pending
            .iter()
            .map(|cookie| HeaderValue::from_str(cookie).map_err(StorageError::from))
            .collect()
    }
}

impl CartStorage for CookieStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let encoded = urlencoding::encode(value);
        let len = key.len() + encoded.len();
        if len > MAX_COOKIE_BYTES {
            return Err(StorageError::TooLarge {
                key: key.to_string(),
                len,
            });
        }

        let cookie = Cookie::build((key.to_string(), encoded.into_owned()))
            .path("/")
            .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();

        // Only the last write per key matters to the browser.
        let prefix = format!("{key}=");
        self.pending.retain(|pending| !pending.starts_with(&prefix));
        self.pending.push(cookie.to_string());
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
