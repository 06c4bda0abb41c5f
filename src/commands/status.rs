use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::duration::DurationCache;
use crate::model::GenerateRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    let cache_path = args.cache_path();
    let manifest_dir = args.cache_root.join("manifests");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if cache_path.exists() {
        let cache = DurationCache::load(&cache_path);
        if cache.is_empty() {
            warn!(path = %cache.path().display(), "duration cache empty or unreadable");
        } else {
            info!(path = %cache.path().display(), entries = cache.len(), "duration cache");
        }
    } else {
        warn!(path = %cache_path.display(), "duration cache missing");
    }

    match latest_run_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: GenerateRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                path = %path.display(),
                run_id = %manifest.run_id,
                format = %manifest.format,
                completed_at = %manifest.completed_at,
                match_mode = %manifest.match_mode,
                items = manifest.counts.items,
                groups = manifest.counts.groups,
                empty_groups = manifest.counts.empty_groups,
                courses = manifest.counts.courses,
                fallback_durations = manifest.counts.fallback_durations,
                prefetch_failed = manifest.prefetch.failed,
                artifact_sha256 = %manifest.artifact_sha256,
                "loaded latest run manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no run manifest found"),
    }

    Ok(())
}

fn latest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut manifests = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("generate_run_") && name.ends_with(".json"))
            .unwrap_or(false);
        if is_run_manifest {
            manifests.push(path);
        }
    }

    // Timestamps in the file names sort lexically.
    manifests.sort();
    Ok(manifests.pop())
}
