//! Durable file writes: write to a sibling temp file, then rename over
//! the target so a crash never leaves a half-written status file.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("tmp")
    ));

    let json = serde_json::to_vec_pretty(value)?;
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(Error::from)
}

/// Create a file only if it does not already exist, returning an error
/// otherwise. Used so two concurrent callers can't both "initialize" the
/// same run's status file.
pub fn write_json_if_absent<T: serde::Serialize>(path: &Path, value: &T) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_json_atomic(path, value)?;
    Ok(true)
}
