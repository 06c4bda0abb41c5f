use crate::duration::duration_label_seconds;
use crate::model::Catalog;

const COURSE_UUID_PREFIX: &str = "c0ee0000-0000-0000-0000-";
const CURRICULUM_UUID_PREFIX: &str = "d0ee0000-0000-0000-0000-";
const LESSON_UUID_PREFIX: &str = "e0ee0000-0000-0000-0000-";

fn seed_uuid(prefix: &str, counter: usize) -> String {
    format!("{prefix}{counter:012}")
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_opt(value: Option<&str>) -> String {
    value.map(quote).unwrap_or_else(|| "NULL".to_string())
}

fn push_insert(out: &mut String, table: &str, columns: &str, rows: &[String]) {
    out.push_str(&format!("-- {table}\n"));
    if rows.is_empty() {
        out.push_str("-- (no rows)\n\n");
        return;
    }
    out.push_str(&format!("INSERT INTO {table} ({columns})\nVALUES\n"));
    out.push_str(&rows.join(",\n"));
    out.push_str(";\n\n");
}

/// Seed statements for courses, curriculums and their lessons.
///
/// UUIDs are assigned from a fixed per-table prefix and a counter in output
/// order, so the same catalog always yields the same script.
pub fn render_sql(catalog: &Catalog) -> String {
    let courses: Vec<String> = catalog
        .courses
        .iter()
        .enumerate()
        .map(|(idx, course)| {
            format!(
                "({}, {}, {}, {}, true)",
                quote(&seed_uuid(COURSE_UUID_PREFIX, idx + 1)),
                quote(&course.title),
                quote(&course.description),
                quote(&course.category),
            )
        })
        .collect();

    let mut curriculums = Vec::with_capacity(catalog.groups.len());
    let mut lessons = Vec::new();
    for (group_idx, group) in catalog.groups.iter().enumerate() {
        let curriculum_id = seed_uuid(CURRICULUM_UUID_PREFIX, group_idx + 1);
        curriculums.push(format!(
            "({}, {}, {}, {})",
            quote(&curriculum_id),
            quote(&group.title),
            quote(&group.description),
            group_idx,
        ));

        for (order, lesson) in group.lessons.iter().enumerate() {
            let seconds = duration_label_seconds(&lesson.duration_label)
                .map(|value| value.to_string())
                .unwrap_or_else(|| "NULL".to_string());
            lessons.push(format!(
                "({}, {}, {}, {}, {}, {}, {}, {})",
                quote(&seed_uuid(LESSON_UUID_PREFIX, lessons.len() + 1)),
                quote(&curriculum_id),
                quote(&lesson.title),
                quote(lesson.kind.as_str()),
                quote_opt(lesson.url.as_deref()),
                quote(&lesson.duration_label),
                seconds,
                order,
            ));
        }
    }

    let mut out = String::from("-- Generated by coursegen; do not edit by hand.\n\n");
    push_insert(
        &mut out,
        "courses",
        "id, title, description, category, is_published",
        &courses,
    );
    push_insert(
        &mut out,
        "course_curriculums",
        "id, title, description, order_index",
        &curriculums,
    );
    push_insert(
        &mut out,
        "course_lessons",
        "id, curriculum_id, title, type, youtube_url, duration, duration_seconds, order_index",
        &lessons,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryGroup, CourseSummary, DurationSource, MediaItem, MediaKind};

    fn lesson(id: &str, title: &str, url: Option<&str>, duration: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: title.to_string(),
            kind: MediaKind::Video,
            url: url.map(str::to_string),
            duration_label: duration.to_string(),
            category: "Basics".to_string(),
            created_at: String::new(),
            duration_source: DurationSource::Cached,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            items: Vec::new(),
            groups: vec![
                CategoryGroup {
                    id: "k1".to_string(),
                    title: "Basics".to_string(),
                    description: "It's the start".to_string(),
                    course_count: 2,
                    lessons: vec![
                        lesson("c1", "Intro", Some("https://youtu.be/abcdefghijk"), "02:05"),
                        lesson("c2", "Deep dive", None, "1:02:03"),
                    ],
                },
                CategoryGroup {
                    id: "k2".to_string(),
                    title: "Advanced".to_string(),
                    description: String::new(),
                    course_count: 0,
                    lessons: Vec::new(),
                },
            ],
            courses: vec![CourseSummary {
                id: "p1".to_string(),
                title: "Track".to_string(),
                description: "Desc".to_string(),
                category: "General".to_string(),
                lesson_count: 0,
            }],
        }
    }

    #[test]
    fn quotes_are_doubled_and_missing_urls_are_null() {
        let sql = render_sql(&catalog());

        assert!(sql.contains("'It''s the start'"));
        assert!(sql.contains("'Deep dive', 'video', NULL, '1:02:03', 3723, 1)"));
        assert!(sql.contains("'Intro', 'video', 'https://youtu.be/abcdefghijk', '02:05', 125, 0)"));
    }

    #[test]
    fn uuids_are_deterministic_and_lessons_reference_their_curriculum() {
        let sql = render_sql(&catalog());

        assert!(sql.contains("('c0ee0000-0000-0000-0000-000000000001', 'Track'"));
        assert!(sql.contains("('d0ee0000-0000-0000-0000-000000000002', 'Advanced', '', 1)"));
        assert!(sql.contains(
            "('e0ee0000-0000-0000-0000-000000000002', 'd0ee0000-0000-0000-0000-000000000001'"
        ));
        assert_eq!(sql, render_sql(&catalog()));
    }

    #[test]
    fn empty_tables_are_commented_out() {
        let sql = render_sql(&Catalog::default());
        assert!(!sql.contains("INSERT INTO"));
        assert_eq!(sql.matches("-- (no rows)").count(), 3);
    }
}
