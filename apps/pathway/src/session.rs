//! Persistent client session: who the user is and which assessment they
//! saved last. Every read and write of that state goes through `SessionStore`.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub latest_assessment_id: Option<String>,
}

/// JSON-file backed session. Writes go to a sibling temp file and are
/// renamed into place so a crash never leaves a half-written session.
pub struct SessionStore {
    path: PathBuf,
    data: RwLock<SessionData>,
}

impl SessionStore {
    /// Loads the session at `path`. A missing file is an empty session; an
    /// unreadable or corrupt one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring corrupt session file {}: {e}", path.display());
                SessionData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionData::default(),
            Err(e) => {
                warn!("Could not read session file {}: {e}", path.display());
                SessionData::default()
            }
        };
        Self {
            path,
            data: RwLock::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> SessionData {
        self.read().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().user_id.clone()
    }

    pub fn latest_assessment_id(&self) -> Option<String> {
        self.read().latest_assessment_id.clone()
    }

    /// Called after a successful save: the backend may have minted the user id.
    pub fn record_saved_assessment(
        &self,
        user_id: Option<&str>,
        assessment_id: &str,
    ) -> Result<(), AppError> {
        self.update(|data| {
            if let Some(user_id) = user_id {
                data.user_id = Some(user_id.to_string());
            }
            data.latest_assessment_id = Some(assessment_id.to_string());
        })
    }

    pub fn set_user_name(&self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        self.update(|data| {
            data.user_name = (!name.is_empty()).then(|| name.to_string());
        })
    }

    /// Drops `latest_assessment_id` if it points at a deleted assessment.
    pub fn forget_assessment(&self, assessment_id: &str) -> Result<(), AppError> {
        if self.latest_assessment_id().as_deref() != Some(assessment_id) {
            return Ok(());
        }
        self.update(|data| data.latest_assessment_id = None)
    }

    pub fn clear(&self) -> Result<(), AppError> {
        self.update(|data| *data = SessionData::default())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(&self, change: impl FnOnce(&mut SessionData)) -> Result<(), AppError> {
        let mut data = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = data.clone();
        change(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn persist(&self, data: &SessionData) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let raw = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::Session(format!("could not encode session: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Session written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        assert_eq!(store.snapshot(), SessionData::default());
    }

    #[test]
    fn test_saved_assessment_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = SessionStore::open(&path);
        store.record_saved_assessment(Some("u-1"), "42").unwrap();
        store.set_user_name("  Ada ").unwrap();

        let reopened = SessionStore::open(&path);
        let data = reopened.snapshot();
        assert_eq!(data.user_id.as_deref(), Some("u-1"));
        assert_eq!(data.user_name.as_deref(), Some("Ada"));
        assert_eq!(data.latest_assessment_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_save_without_user_keeps_existing_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        store.record_saved_assessment(Some("u-1"), "1").unwrap();
        store.record_saved_assessment(None, "2").unwrap();
        assert_eq!(store.user_id().as_deref(), Some("u-1"));
        assert_eq!(store.latest_assessment_id().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::open(&path);
        assert_eq!(store.snapshot(), SessionData::default());
        store.record_saved_assessment(Some("u"), "9").unwrap();
        assert_eq!(SessionStore::open(&path).latest_assessment_id().as_deref(), Some("9"));
    }

    #[test]
    fn test_forget_only_matching_assessment() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        store.record_saved_assessment(Some("u"), "7").unwrap();
        store.forget_assessment("8").unwrap();
        assert_eq!(store.latest_assessment_id().as_deref(), Some("7"));
        store.forget_assessment("7").unwrap();
        assert_eq!(store.latest_assessment_id(), None);
        assert_eq!(store.user_id().as_deref(), Some("u"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path);
        store.record_saved_assessment(Some("u"), "7").unwrap();
        store.clear().unwrap();
        assert_eq!(SessionStore::open(&path).snapshot(), SessionData::default());
    }
}
