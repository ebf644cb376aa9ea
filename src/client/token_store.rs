//! Durable token storage behind a trait, so the session machine does not
//! care whether the token lives in memory or on disk.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Where the current session token is persisted between runs.
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> io::Result<Option<String>>;

    /// Persist the token, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> io::Result<()>;
}

/// Process-local token store, used in tests and short-lived tools.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

/// File-backed token store: a single token string at a fixed path, surviving
/// restarts the way a browser's storage key survives reloads.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn memory_store_round_trips() -> io::Result<()> {
        let store = MemoryTokenStore::default();
        assert_eq!(store.load()?, None);

        store.save("abc.def.ghi")?;
        assert_eq!(store.load()?, Some("abc.def.ghi".to_string()));

        store.clear()?;
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn file_store_round_trips() -> io::Result<()> {
        let path = std::env::temp_dir()
            .join(format!("taskgate-test-{}", Ulid::new()))
            .join("token");
        let store = FileTokenStore::new(path.clone());

        assert_eq!(store.load()?, None);

        store.save("abc.def.ghi")?;
        assert_eq!(store.load()?, Some("abc.def.ghi".to_string()));

        store.clear()?;
        assert_eq!(store.load()?, None);

        // Clearing twice is fine
        store.clear()?;

        let _ = fs::remove_dir_all(path.parent().unwrap());
        Ok(())
    }
}
