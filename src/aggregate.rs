use std::borrow::Cow;
use std::collections::HashMap;

use crate::cli::MatchMode;
use crate::model::{CategoryGroup, CourseSummary, DescriptionRecord, MediaItem};

fn match_key(mode: MatchMode, value: &str) -> Cow<'_, str> {
    match mode {
        MatchMode::Exact => Cow::Borrowed(value),
        MatchMode::Normalized => Cow::Owned(value.trim().to_lowercase()),
    }
}

/// Builds one group per description record, in description order.
///
/// Each group nests the items whose category matches the record's title, in
/// item order. Records without matching items still produce a group.
pub fn group_by_category(
    items: &[MediaItem],
    descriptions: &[DescriptionRecord],
    mode: MatchMode,
) -> Vec<CategoryGroup> {
    let mut by_category: HashMap<Cow<'_, str>, Vec<&MediaItem>> = HashMap::new();
    for item in items {
        by_category
            .entry(match_key(mode, &item.category))
            .or_default()
            .push(item);
    }

    descriptions
        .iter()
        .map(|record| {
            let lessons: Vec<MediaItem> = by_category
                .get(&*match_key(mode, &record.title))
                .map(|matched| matched.iter().map(|item| (*item).clone()).collect())
                .unwrap_or_default();

            CategoryGroup {
                id: record.id.clone(),
                title: record.title.clone(),
                description: record.description.clone(),
                course_count: lessons.len(),
                lessons,
            }
        })
        .collect()
}

pub fn course_summaries(records: &[DescriptionRecord], category: &str) -> Vec<CourseSummary> {
    records
        .iter()
        .map(|record| CourseSummary {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            category: category.to_string(),
            lesson_count: 0,
        })
        .collect()
}
