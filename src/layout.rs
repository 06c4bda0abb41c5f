use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK_DURATION: &str = "10:00";
pub const DEFAULT_UNCATEGORIZED: &str = "Uncategorized";
pub const DEFAULT_COURSE_CATEGORY: &str = "General";

/// Column names and labels used to read the three source tables.
///
/// Defaults follow the spreadsheet exports the catalog is maintained in; a
/// JSON file passed with `--layout` may override any subset of the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    pub content: ContentColumns,
    pub category: DescriptionColumns,
    pub course: DescriptionColumns,
    pub fallback_duration: String,
    pub uncategorized: String,
    pub course_category: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            content: ContentColumns::default(),
            category: DescriptionColumns {
                id: "ID".to_string(),
                title: "コース名".to_string(),
                description: "コース概要".to_string(),
                min_columns: 3,
            },
            course: DescriptionColumns {
                id: "ID".to_string(),
                title: "プログラム名".to_string(),
                description: "カリキュラム説明".to_string(),
                min_columns: 5,
            },
            fallback_duration: DEFAULT_FALLBACK_DURATION.to_string(),
            uncategorized: DEFAULT_UNCATEGORIZED.to_string(),
            course_category: DEFAULT_COURSE_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentColumns {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    pub created_at: String,
    pub min_columns: usize,
}

impl Default for ContentColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            title: "コンテンツ名".to_string(),
            url: "YOUTUBE_URL".to_string(),
            category: "コース".to_string(),
            created_at: "Created".to_string(),
            min_columns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptionColumns {
    pub id: String,
    pub title: String,
    pub description: String,
    pub min_columns: usize,
}

impl Layout {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let layout: Layout = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse layout {}", path.display()))?;
        if layout.fallback_duration.trim().is_empty() {
            bail!("layout {} sets an empty fallback_duration", path.display());
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_layout_keeps_defaults_for_missing_keys() {
        let raw = r#"{ "fallback_duration": "05:00", "content": { "url": "Link" } }"#;
        let layout: Layout = serde_json::from_str(raw).expect("partial layout should parse");

        assert_eq!(layout.fallback_duration, "05:00");
        assert_eq!(layout.content.url, "Link");
        assert_eq!(layout.content.title, "コンテンツ名");
        assert_eq!(layout.course.min_columns, 5);
        assert_eq!(layout.uncategorized, DEFAULT_UNCATEGORIZED);
    }

    #[test]
    fn unknown_layout_keys_are_rejected() {
        let raw = r#"{ "fallback": "05:00" }"#;
        assert!(serde_json::from_str::<Layout>(raw).is_err());
    }

    #[test]
    fn empty_fallback_duration_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("layout.json");
        fs::write(&path, r#"{ "fallback_duration": "" }"#).expect("write layout");

        let err = Layout::load(Some(&path)).expect_err("empty fallback must fail");
        assert!(err.to_string().contains("empty fallback_duration"));
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let layout = Layout::load(None).expect("default layout");
        assert_eq!(layout, Layout::default());
    }
}
