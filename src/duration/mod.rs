use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

use crate::model::{DurationSource, PrefetchCounts};

mod cache;
mod fetch;
mod prefetch;

pub use cache::DurationCache;
pub use fetch::{FetchError, HttpFetcher, PageFetcher};
use prefetch::{FetchJob, run_fetch_group};

const MEDIA_ID_PATTERN: &str = r"(?:v=|/)([\w-]{11})(?:[&?]|$)";
const DURATION_MARKER_PATTERN: &str = r#""approxDurationMs":"(\d+)""#;

pub fn is_video_host(url: &str) -> bool {
    url.contains("youtube") || url.contains("youtu.be")
}

#[derive(Debug, Clone)]
pub struct DurationPatterns {
    media_id: Regex,
    marker: Regex,
}

impl DurationPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            media_id: Regex::new(MEDIA_ID_PATTERN).context("failed to compile media id regex")?,
            marker: Regex::new(DURATION_MARKER_PATTERN)
                .context("failed to compile duration marker regex")?,
        })
    }

    /// The 11-character media identifier of a video URL, if it has one.
    pub fn media_id(&self, url: &str) -> Option<String> {
        if url.is_empty() || !is_video_host(url) {
            return None;
        }
        self.media_id
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn duration_ms(&self, page: &str) -> Result<u64, FetchError> {
        let digits = self
            .marker
            .captures(page)
            .and_then(|captures| captures.get(1))
            .ok_or(FetchError::MarkerNotFound)?
            .as_str();

        digits
            .parse::<u64>()
            .map_err(|_| FetchError::InvalidMarker(digits.to_string()))
    }
}

/// `H:MM:SS` at or above one hour, `MM:SS` below it.
pub fn format_duration_label(ms: u64) -> String {
    let seconds = ms / 1000;
    let (minutes, secs) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Inverse of [`format_duration_label`]; `None` for anything else.
pub fn duration_label_seconds(label: &str) -> Option<u64> {
    let parts = label
        .split(':')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;

    let (hours, minutes, secs) = match parts.as_slice() {
        [hours, minutes, secs] => (*hours, *minutes, *secs),
        [minutes, secs] => (0, *minutes, *secs),
        _ => return None,
    };

    // Labels can come from a hand-edited cache file.
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(secs)
}

pub(crate) fn lookup_duration<F: PageFetcher>(
    fetcher: &F,
    patterns: &DurationPatterns,
    url: &str,
) -> Result<String, FetchError> {
    let page = fetcher.fetch(url)?;
    let ms = patterns.duration_ms(&page)?;
    Ok(format_duration_label(ms))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub label: String,
    pub source: DurationSource,
}

/// Maps video URLs to display durations through a persistent cache.
///
/// The resolver owns the cache for its whole lifetime; callers get it back
/// through [`DurationResolver::flush`] or [`DurationResolver::into_cache`].
pub struct DurationResolver<F> {
    cache: DurationCache,
    fetcher: F,
    patterns: DurationPatterns,
    fallback: String,
    fetch_enabled: bool,
    fetched: HashSet<String>,
    failed: HashSet<String>,
}

impl<F: PageFetcher> DurationResolver<F> {
    pub fn new(cache: DurationCache, fetcher: F, fallback: &str) -> Result<Self> {
        Ok(Self {
            cache,
            fetcher,
            patterns: DurationPatterns::new()?,
            fallback: fallback.to_string(),
            fetch_enabled: true,
            fetched: HashSet::new(),
            failed: HashSet::new(),
        })
    }

    pub fn with_fetch_enabled(mut self, enabled: bool) -> Self {
        self.fetch_enabled = enabled;
        self
    }

    pub fn cache(&self) -> &DurationCache {
        &self.cache
    }

    pub fn flush(&mut self) -> Result<()> {
        self.cache.flush()
    }

    pub fn into_cache(self) -> DurationCache {
        self.cache
    }

    pub fn resolve(&mut self, url: &str) -> Resolution {
        let Some(media_id) = self.patterns.media_id(url) else {
            return self.fallback();
        };

        if let Some(label) = self.cache.get(&media_id) {
            let source = if self.fetched.contains(&media_id) {
                DurationSource::Fetched
            } else {
                DurationSource::Cached
            };
            return Resolution {
                label: label.to_string(),
                source,
            };
        }

        if !self.fetch_enabled || self.failed.contains(&media_id) {
            return self.fallback();
        }

        match lookup_duration(&self.fetcher, &self.patterns, url) {
            Ok(label) => {
                self.cache.insert(&media_id, &label);
                self.fetched.insert(media_id);
                Resolution {
                    label,
                    source: DurationSource::Fetched,
                }
            }
            Err(err) => {
                warn!(url = %url, error = %err, "duration lookup failed, using fallback");
                self.failed.insert(media_id);
                self.fallback()
            }
        }
    }

    /// Fetches every uncached identifier among `urls` on a bounded pool.
    pub fn prefetch<'a, I>(&mut self, urls: I, workers: usize) -> PrefetchCounts
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();
        for url in urls {
            let Some(media_id) = self.patterns.media_id(url) else {
                continue;
            };
            if self.cache.contains(&media_id) || self.failed.contains(&media_id) {
                continue;
            }
            if seen.insert(media_id.clone()) {
                jobs.push(FetchJob {
                    media_id,
                    url: url.to_string(),
                });
            }
        }

        let mut counts = PrefetchCounts {
            requested: jobs.len(),
            ..PrefetchCounts::default()
        };
        info!(requested = counts.requested, workers, "found uncached videos");

        if jobs.is_empty() || !self.fetch_enabled {
            return counts;
        }

        for outcome in run_fetch_group(&self.fetcher, &self.patterns, jobs, workers) {
            match outcome.result {
                Ok(label) => {
                    self.cache.insert(&outcome.media_id, &label);
                    self.fetched.insert(outcome.media_id);
                    counts.fetched += 1;
                }
                Err(err) => {
                    warn!(url = %outcome.url, error = %err, "duration prefetch failed");
                    self.failed.insert(outcome.media_id);
                    counts.failed += 1;
                }
            }
        }

        info!(
            fetched = counts.fetched,
            failed = counts.failed,
            "prefetch completed"
        );
        counts
    }

    fn fallback(&self) -> Resolution {
        Resolution {
            label: self.fallback.clone(),
            source: DurationSource::Fallback,
        }
    }
}
