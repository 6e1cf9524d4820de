//! File-backed durable client storage.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mailroom_dashboard::core::session::{ClientStorage, SessionError};

const STATE_FILE: &str = "session.json";

/// JSON key/value file under the CLI state directory.
#[derive(Clone, Debug)]
pub(crate) struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(STATE_FILE),
        }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(storage_error("read", err)),
        };
        serde_json::from_str(&text).map_err(|err| storage_error("decode", err))
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| storage_error("create_dir", err))?;
        }
        let text =
            serde_json::to_string_pretty(entries).map_err(|err| storage_error("encode", err))?;
        fs::write(&self.path, text).map_err(|err| storage_error("write", err))
    }
}

fn storage_error(
    operation: &'static str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> SessionError {
    SessionError::Storage {
        operation,
        source: Box::new(source),
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error("clear", err)),
        }
    }
}
