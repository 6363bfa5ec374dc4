// In app/src/snapshot.rs

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reads a JSON snapshot. Deserialization runs the type's own validation,
/// so a corrupt bot record is rejected here.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Like `load`, but falls back to `default` when the file does not exist yet.
pub fn load_or_else<T: DeserializeOwned>(path: &Path, default: impl FnOnce() -> T) -> Result<T> {
    if path.exists() {
        load(path)
    } else {
        tracing::info!(path = %path.display(), "Snapshot not found, starting from configured defaults.");
        Ok(default())
    }
}

/// Writes `value` as pretty JSON, replacing the file atomically.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize snapshot")?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;
    Ok(())
}
