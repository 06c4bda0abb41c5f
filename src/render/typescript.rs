use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::model::Catalog;

const HEADER: &str = "// This file contains catalog data imported from CSV files.
// Generated by coursegen; do not edit by hand.

export interface ContentItem {
    id: string;
    title: string;
    type: 'video' | 'quiz' | 'document';
    url?: string;
    thumbnail?: string;
    duration?: string;
    category: string;
    createdAt: string;
}

export interface CurriculumDef {
    id: string;
    title: string;
    description: string;
    thumbnail_url?: string;
    courseCount: number;
    lessons: ContentItem[];
}

export interface CourseDef {
    id: string;
    title: string;
    description: string;
    category: string;
    lessonCount: number;
}
";

pub fn render_typescript(catalog: &Catalog) -> Result<String> {
    let mut out = String::from(HEADER);

    push_export(
        &mut out,
        "1. Content Data (FULL LIST)",
        "ALL_CONTENT: ContentItem[]",
        &catalog.items,
    )?;
    push_export(
        &mut out,
        "2. Curriculum Data (with Nested Lessons)",
        "ALL_CURRICULUMS: CurriculumDef[]",
        &catalog.groups,
    )?;
    push_export(
        &mut out,
        "3. Course Data",
        "ALL_COURSES: CourseDef[]",
        &catalog.courses,
    )?;

    Ok(out)
}

fn push_export<T: Serialize>(out: &mut String, banner: &str, binding: &str, value: &T) -> Result<()> {
    let rule = "-".repeat(66);
    out.push_str(&format!("\n// {rule}\n// {banner}\n// {rule}\n"));
    out.push_str(&format!("export const {binding} = "));
    out.push_str(&to_json_indented(value).with_context(|| format!("failed to serialize {binding}"))?);
    out.push_str(";\n");
    Ok(())
}

fn to_json_indented<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryGroup, CourseSummary, DurationSource, MediaItem, MediaKind};

    fn catalog() -> Catalog {
        let item = MediaItem {
            id: "c1".to_string(),
            title: "はじめに".to_string(),
            kind: MediaKind::Video,
            url: Some("https://youtu.be/abcdefghijk".to_string()),
            duration_label: "02:05".to_string(),
            category: "Basics".to_string(),
            created_at: "2024/01/01".to_string(),
            duration_source: DurationSource::Fetched,
        };
        Catalog {
            items: vec![item.clone()],
            groups: vec![CategoryGroup {
                id: "k1".to_string(),
                title: "Basics".to_string(),
                description: "Start here".to_string(),
                course_count: 1,
                lessons: vec![item],
            }],
            courses: vec![CourseSummary {
                id: "p1".to_string(),
                title: "Track".to_string(),
                description: String::new(),
                category: "General".to_string(),
                lesson_count: 0,
            }],
        }
    }

    #[test]
    fn typescript_output_has_three_exports_in_order() {
        let out = render_typescript(&catalog()).expect("render");

        let content = out.find("export const ALL_CONTENT: ContentItem[] = [").expect("content");
        let curriculums = out
            .find("export const ALL_CURRICULUMS: CurriculumDef[] = [")
            .expect("curriculums");
        let courses = out.find("export const ALL_COURSES: CourseDef[] = [").expect("courses");
        assert!(content < curriculums && curriculums < courses);
        assert!(out.ends_with("];\n"));
    }

    #[test]
    fn items_use_artifact_field_names_and_keep_non_ascii() {
        let out = render_typescript(&catalog()).expect("render");

        assert!(out.contains(r#""type": "video""#));
        assert!(out.contains(r#""duration": "02:05""#));
        assert!(out.contains(r#""createdAt": "2024/01/01""#));
        assert!(out.contains(r#""courseCount": 1"#));
        assert!(out.contains(r#""lessonCount": 0"#));
        assert!(out.contains("はじめに"));
        assert!(!out.contains("duration_source"));
        assert!(out.contains("\n    {\n        \"id\": \"c1\""));
    }

    #[test]
    fn absent_url_is_omitted() {
        let mut catalog = catalog();
        catalog.items[0].url = None;
        let out = render_typescript(&catalog).expect("render");

        let content_section = &out[..out.find("ALL_CURRICULUMS").expect("curriculums")];
        let content_body = &content_section[content_section.find("ALL_CONTENT").expect("content")..];
        assert!(!content_body.contains("\"url\""));
    }

    #[test]
    fn rendering_is_deterministic() {
        let first = render_typescript(&catalog()).expect("render");
        let second = render_typescript(&catalog()).expect("render");
        assert_eq!(first, second);
    }
}
