//! Durable session-token storage.
//!
//! The persisted token is one opaque string behind one interface: login
//! writes it, a failed user fetch clears it, startup reads it. Tests
//! substitute [`MemorySessionStore`] for the file-backed default.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// File-backed store, one token per file. Defaults to `~/.spigot/session`.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        std::env::var("SPIGOT_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|_| {
                std::env::var("HOME").map(|h| Path::new(&h).join(".spigot"))
            })
            .unwrap_or_else(|_| PathBuf::from(".spigot"))
            .join("session")
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => {
                let s = s.trim().to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(s)
                }
            }
            Err(_) => None,
        }
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("[session] create {} failed: {e}", parent.display());
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, token) {
            log::warn!("[session] persist failed: {e}");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("[session] clear failed: {e}"),
        }
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.token.lock().expect("session lock").clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().expect("session lock") = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().expect("session lock") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load(), None);
        store.save("tok-1");
        assert_eq!(store.load(), Some("tok-1".to_string()));
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clearing_an_empty_store_is_fine() {
        let store = MemorySessionStore::default();
        store.clear();
        assert_eq!(store.load(), None);
    }
}
