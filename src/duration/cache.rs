use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::util::write_json_pretty;

/// Persistent media-id → duration-label map.
///
/// Loaded once, append-only while a run is in progress, written back by an
/// explicit [`DurationCache::flush`]. A missing or malformed file yields an
/// empty cache.
#[derive(Debug, Clone)]
pub struct DurationCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    added: usize,
}

impl DurationCache {
    pub fn load(path: &Path) -> Self {
        let mut entries = match fs::read(path) {
            Ok(raw) => match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "duration cache unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no duration cache yet");
                BTreeMap::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "duration cache unreadable, starting empty");
                BTreeMap::new()
            }
        };

        let before = entries.len();
        entries.retain(|_, label| !label.trim().is_empty());
        if entries.len() < before {
            warn!(
                path = %path.display(),
                dropped = before - entries.len(),
                "ignoring duration cache entries with empty labels"
            );
        }

        debug!(path = %path.display(), entries = entries.len(), "loaded duration cache");
        Self {
            path: path.to_path_buf(),
            entries,
            added: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, media_id: &str) -> Option<&str> {
        self.entries.get(media_id).map(String::as_str)
    }

    pub fn contains(&self, media_id: &str) -> bool {
        self.entries.contains_key(media_id)
    }

    /// Records a resolved label. Existing entries are never overwritten.
    pub fn insert(&mut self, media_id: &str, label: &str) -> bool {
        if self.entries.contains_key(media_id) {
            return false;
        }
        self.entries.insert(media_id.to_string(), label.to_string());
        self.added += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn added(&self) -> usize {
        self.added
    }

    /// Writes the cache back to disk if it gained entries since load.
    pub fn flush(&mut self) -> Result<()> {
        if self.added == 0 {
            debug!(path = %self.path.display(), "duration cache unchanged, skipping write");
            return Ok(());
        }

        write_json_pretty(&self.path, &self.entries)?;
        info!(
            path = %self.path.display(),
            entries = self.entries.len(),
            added = self.added,
            "wrote duration cache"
        );
        self.added = 0;
        Ok(())
    }
}
