//! The persisted profile blob and its storage port.
//!
//! One JSON record holds everything the app remembers: the user's name,
//! their reminder times and the stats record. Field names are camelCase
//! in the file, e.g.:
//!
//! ```json
//! {
//!   "userName": "Asha",
//!   "notificationTimes": ["08:30"],
//!   "stats": {
//!     "today": { "sessions": 1, "date": "2026-08-22" },
//!     "week": { "sessions": 4, "weekNumber": 34 },
//!     "month": { "sessions": 9, "month": 7 },
//!     "totalReps": 120, "points": 90, "badges": []
//!   }
//! }
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::stats::StatsRecord;

const PROFILE_FILE: &str = "profile.json";

/// Everything the app persists for its single local user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub user_name: String,
    /// Reminder times as canonical `HH:MM` strings.
    pub notification_times: Vec<String>,
    pub stats: StatsRecord,
}

impl Profile {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            user_name: String::new(),
            notification_times: Vec::new(),
            stats: StatsRecord::for_date(date),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

/// Persistence port for the profile blob.
///
/// `load` distinguishes "nothing stored yet" (`Ok(None)`) from a record
/// that exists but cannot be read (`Err`); the ledger treats both as a
/// fresh start but only the latter is worth a warning.
pub trait ProfileStore {
    fn load(&self) -> Result<Option<Profile>, StorageError>;
    fn save(&self, profile: &Profile) -> Result<(), StorageError>;
}

/// Profile stored as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `profile.json` under the data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        match super::data_dir() {
            Ok(dir) => Ok(Self::at(dir.join(PROFILE_FILE))),
            Err(source) => Err(StorageError::OpenFailed {
                path: super::base_dir().join(PROFILE_FILE),
                source,
            }),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<Profile>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|source| StorageError::ParseFailed {
                    path: self.path.clone(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(profile).map_err(StorageError::EncodeFailed)?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store for tests and frontends that manage their own
/// persistence. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Profile>>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Option<Profile>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<Profile>, StorageError> {
        Ok(self.lock().clone())
    }

    fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        *self.lock() = Some(profile.clone());
        Ok(())
    }
}
