use crate::error::ApiError;
use core_types::TokenPair;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Persistent storage for the two session credential strings.
///
/// Nothing outside this crate reads or writes tokens directly; the transport
/// attaches them, the refresh cycle rotates them, and session teardown clears
/// them. Implementations must be safe to share across concurrent requests.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store(&self, pair: TokenPair) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Token storage backed by a JSON file on disk, the CLI equivalent of the
/// browser's persisted local storage. The pair is cached in memory and
/// written through on every mutation.
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<TokenPair>>,
}

impl FileTokenStore {
    /// Opens the store at `path`, loading any previously persisted pair.
    /// A missing, unreadable, or corrupt file is treated as "no tokens".
    pub fn new(path: PathBuf) -> Self {
        let cached = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<TokenPair>(&contents) {
                Ok(pair) => Some(pair),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "ignoring corrupt token file");
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.cached
            .read()
            .ok()?
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.cached
            .read()
            .ok()?
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
    }

    fn store(&self, pair: TokenPair) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ApiError::TokenStore(e.to_string()))?;
            }
        }
        let json = serde_json::to_string_pretty(&pair)
            .map_err(|e| ApiError::TokenStore(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| ApiError::TokenStore(e.to_string()))?;
        *self
            .cached
            .write()
            .map_err(|_| ApiError::TokenStore("token cache lock poisoned".to_string()))? =
            Some(pair);
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(ApiError::TokenStore(err.to_string())),
        }
        *self
            .cached
            .write()
            .map_err(|_| ApiError::TokenStore("token cache lock poisoned".to_string()))? = None;
        Ok(())
    }
}

/// In-memory token storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    cached: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the store, e.g. with a deliberately stale access token.
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            cached: RwLock::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.cached
            .read()
            .ok()?
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.cached
            .read()
            .ok()?
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
    }

    fn store(&self, pair: TokenPair) -> Result<(), ApiError> {
        *self
            .cached
            .write()
            .map_err(|_| ApiError::TokenStore("token cache lock poisoned".to_string()))? =
            Some(pair);
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self
            .cached
            .write()
            .map_err(|_| ApiError::TokenStore("token cache lock poisoned".to_string()))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn file_store_roundtrips_and_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(path.clone());
        assert_eq!(store.access_token(), None);
        store.store(pair("acc-1", "ref-1")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("acc-1"));

        // A fresh store over the same path sees the persisted pair.
        let reloaded = FileTokenStore::new(path.clone());
        assert_eq!(reloaded.refresh_token().as_deref(), Some("ref-1"));
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(path.clone());
        store.store(pair("acc", "ref")).unwrap();
        assert!(path.exists());
        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.access_token(), None);

        // Clearing an already-empty store is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_absent_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileTokenStore::new(path);
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn store_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/tokens.json");

        let store = FileTokenStore::new(path.clone());
        store.store(pair("acc", "ref")).unwrap();
        assert!(path.exists());
    }
}
