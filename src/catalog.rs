use crate::duration::{DurationResolver, PageFetcher};
use crate::layout::{ContentColumns, DescriptionColumns};
use crate::model::{DescriptionRecord, MediaItem, MediaKind};
use crate::rows::{RawRecord, TableShape};

const VIDEO_HOST_MARKER: &str = "youtu";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub category: String,
    pub created_at: String,
}

pub fn content_shape(columns: &ContentColumns) -> TableShape<'_> {
    TableShape {
        min_columns: columns.min_columns,
        title_column: &columns.title,
    }
}

pub fn description_shape(columns: &DescriptionColumns) -> TableShape<'_> {
    TableShape {
        min_columns: columns.min_columns,
        title_column: &columns.title,
    }
}

pub fn content_rows(
    records: &[RawRecord],
    columns: &ContentColumns,
    uncategorized: &str,
) -> Vec<ContentRow> {
    records
        .iter()
        .map(|record| {
            let url = record.get(&columns.url).trim();
            let category = record.get(&columns.category);
            ContentRow {
                id: record.get(&columns.id).to_string(),
                title: record.get(&columns.title).to_string(),
                url: (!url.is_empty()).then(|| url.to_string()),
                category: if category.trim().is_empty() {
                    uncategorized.to_string()
                } else {
                    category.to_string()
                },
                created_at: record.get(&columns.created_at).to_string(),
            }
        })
        .collect()
}

pub fn description_records(
    records: &[RawRecord],
    columns: &DescriptionColumns,
) -> Vec<DescriptionRecord> {
    records
        .iter()
        .map(|record| DescriptionRecord {
            id: record.get(&columns.id).to_string(),
            title: record.get(&columns.title).to_string(),
            description: record.get(&columns.description).to_string(),
        })
        .collect()
}

pub fn classify_kind(url: Option<&str>, title: &str) -> MediaKind {
    if title.to_lowercase().contains("quiz") {
        MediaKind::Quiz
    } else if url.is_some_and(|url| url.contains(VIDEO_HOST_MARKER)) {
        MediaKind::Video
    } else {
        MediaKind::Document
    }
}

pub fn media_urls(rows: &[ContentRow]) -> impl Iterator<Item = &str> {
    rows.iter().filter_map(|row| row.url.as_deref())
}

/// Attaches a duration label to every row, in row order.
pub fn enrich<F: PageFetcher>(
    rows: Vec<ContentRow>,
    resolver: &mut DurationResolver<F>,
) -> Vec<MediaItem> {
    rows.into_iter()
        .map(|row| {
            let resolution = resolver.resolve(row.url.as_deref().unwrap_or(""));
            MediaItem {
                kind: classify_kind(row.url.as_deref(), &row.title),
                id: row.id,
                title: row.title,
                url: row.url,
                duration_label: resolution.label,
                category: row.category,
                created_at: row.created_at,
                duration_source: resolution.source,
            }
        })
        .collect()
}
