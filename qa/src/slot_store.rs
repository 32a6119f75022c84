use crate::error::{QaError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use tempfile::NamedTempFile;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

const DEFAULT_SLOT: &str = "default";
const DEFAULT_DOCUMENT_NAME: &str = "a.pdf";
const DEFAULT_TEXT_NAME: &str = "raw.txt";
const SESSIONS_DIR: &str = "sessions";

static SLOT_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Names one document slot and its extracted-text slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(String);

impl SlotKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let pattern = SLOT_KEY_PATTERN
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("static pattern"));

        if pattern.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(QaError::Input("Invalid session identifier.".into()))
        }
    }

    /// Resolve an optional caller-supplied session, falling back to the shared slot.
    pub fn from_session(session: Option<&str>) -> Result<Self> {
        match session.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Self::parse(raw),
            None => Ok(Self::default()),
        }
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_SLOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SlotKey {
    fn default() -> Self {
        Self(DEFAULT_SLOT.to_string())
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File-backed single-value slots, one document and one text file per key.
///
/// Every slot has its own async mutex, tracked only while someone holds or
/// waits on it. Callers that need the document and its text to stay
/// consistent hold `lock(key)` across the whole operation.
#[derive(Debug)]
pub struct SlotStore {
    upload_dir: PathBuf,
    text_dir: PathBuf,
    locks: Mutex<HashMap<SlotKey, Weak<AsyncMutex<()>>>>,
}

impl SlotStore {
    pub fn new(upload_dir: impl Into<PathBuf>, text_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            text_dir: text_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn document_path(&self, key: &SlotKey) -> PathBuf {
        if key.is_default() {
            self.upload_dir.join(DEFAULT_DOCUMENT_NAME)
        } else {
            self.upload_dir.join(SESSIONS_DIR).join(format!("{}.pdf", key))
        }
    }

    pub fn text_path(&self, key: &SlotKey) -> PathBuf {
        if key.is_default() {
            self.text_dir.join(DEFAULT_TEXT_NAME)
        } else {
            self.text_dir.join(SESSIONS_DIR).join(format!("{}.txt", key))
        }
    }

    /// Exclusive access to one slot. The lock entry is dropped with the last guard.
    pub async fn lock(&self, key: &SlotKey) -> SlotGuard<'_> {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Entries left behind by cancelled waiters
            locks.retain(|_, slot| slot.strong_count() > 0);
            match locks.get(key).and_then(Weak::upgrade) {
                Some(slot) => slot,
                None => {
                    let slot = Arc::new(AsyncMutex::new(()));
                    locks.insert(key.clone(), Arc::downgrade(&slot));
                    slot
                }
            }
        };
        SlotGuard {
            store: self,
            key: key.clone(),
            guard: Some(slot.lock_owned().await),
        }
    }

    /// Number of slots with a holder or waiter.
    pub fn active_slots(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub async fn has_text(&self, key: &SlotKey) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.text_path(key)).await?)
    }

    /// Replace the document slot, discarding whatever was there before.
    pub async fn write_document(&self, key: &SlotKey, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.document_path(key);
        replace_in_background(path.clone(), bytes.to_vec()).await?;
        log::info!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    pub async fn write_text(&self, key: &SlotKey, text: &str) -> Result<()> {
        replace_in_background(self.text_path(key), text.as_bytes().to_vec()).await
    }

    /// `Ok(None)` when nothing has been extracted for this slot.
    pub async fn read_text(&self, key: &SlotKey) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.text_path(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn clear_text(&self, key: &SlotKey) -> Result<()> {
        match tokio::fs::remove_file(self.text_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct SlotGuard<'a> {
    store: &'a SlotStore,
    key: SlotKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        // Upgrades only happen under the map lock, so a dead handle here means
        // nobody holds or waits on this slot.
        let mut locks = self
            .store
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks.get(&self.key).is_some_and(|slot| slot.strong_count() == 0) {
            locks.remove(&self.key);
        }
    }
}

async fn replace_in_background(path: PathBuf, contents: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || replace_file(&path, &contents))
        .await
        .map_err(|e| QaError::Storage(format!("Slot write aborted: {}", e)))??;
    Ok(())
}

// Readers never observe a half-written file: the new content lands in a temp
// file beside the target and is renamed over it.
fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
