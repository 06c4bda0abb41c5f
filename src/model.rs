use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Quiz,
    Document,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Quiz => "quiz",
            Self::Document => "document",
        }
    }
}

/// Where a duration label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    Cached,
    Fetched,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "duration")]
    pub duration_label: String,
    pub category: String,
    pub created_at: String,
    #[serde(skip)]
    pub duration_source: DurationSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRecord {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub id: String,
    pub title: String,
    pub description: String,
    pub course_count: usize,
    pub lessons: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub lesson_count: usize,
}

/// Everything the renderers need, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub items: Vec<MediaItem>,
    pub groups: Vec<CategoryGroup>,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefetchCounts {
    pub requested: usize,
    pub fetched: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub content_rows: usize,
    pub category_rows: usize,
    pub course_rows: usize,
    pub items: usize,
    pub groups: usize,
    pub empty_groups: usize,
    pub courses: usize,
    pub cached_durations: usize,
    pub fetched_durations: usize,
    pub fallback_durations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPaths {
    pub content_csv: String,
    pub category_csv: String,
    pub course_csv: String,
    pub cache_path: String,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub format: String,
    pub started_at: String,
    pub completed_at: String,
    pub match_mode: String,
    pub paths: RunPaths,
    pub counts: CatalogCounts,
    pub prefetch: PrefetchCounts,
    pub cache_entries: usize,
    pub artifact_sha256: String,
}
