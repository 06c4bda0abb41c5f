use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::aggregate::{course_summaries, group_by_category};
use crate::catalog::{
    content_rows, content_shape, description_records, description_shape, enrich, media_urls,
};
use crate::cli::{FetchArgs, GenerateArgs};
use crate::duration::{DurationCache, DurationResolver, HttpFetcher, PageFetcher};
use crate::layout::Layout;
use crate::model::{
    Catalog, CatalogCounts, CategoryGroup, DurationSource, GenerateRunManifest, MediaItem,
    PrefetchCounts, RunPaths,
};
use crate::render::{render_sql, render_typescript};
use crate::rows::read_table;
use crate::util::{now_utc_string, sha256_hex, utc_compact_string, write_json_pretty, write_text};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    TypeScript,
    Sql,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Sql => "sql",
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub catalog: Catalog,
    pub counts: CatalogCounts,
    pub prefetch: PrefetchCounts,
    pub cache_entries: usize,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    run_with_format(args, OutputFormat::TypeScript)
}

pub fn run_with_format(args: GenerateArgs, format: OutputFormat) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("{}-{}", format.as_str(), utc_compact_string(started_ts));
    let cache_path = args.fetch.cache_path();

    info!(run_id = %run_id, cache = %cache_path.display(), "starting generate");

    let layout = Layout::load(args.fetch.layout.as_deref())?;
    let mut resolver = build_resolver(&args.fetch, &cache_path, &layout)?;
    let output = build_catalog(&args, &layout, &mut resolver)?;

    let artifact = match format {
        OutputFormat::TypeScript => render_typescript(&output.catalog)?,
        OutputFormat::Sql => render_sql(&output.catalog),
    };
    write_artifact(args.output.as_deref(), &artifact)?;

    if !args.no_manifest {
        let manifest = GenerateRunManifest {
            manifest_version: 1,
            run_id,
            format: format.as_str().to_string(),
            started_at,
            completed_at: now_utc_string(),
            match_mode: args.match_mode.as_str().to_string(),
            paths: RunPaths {
                content_csv: args.content_csv.display().to_string(),
                category_csv: args.category_csv.display().to_string(),
                course_csv: args.course_csv.display().to_string(),
                cache_path: cache_path.display().to_string(),
                output_path: args.output.as_ref().map(|path| path.display().to_string()),
            },
            counts: output.counts.clone(),
            prefetch: output.prefetch.clone(),
            cache_entries: output.cache_entries,
            artifact_sha256: sha256_hex(artifact.as_bytes()),
        };
        let manifest_path = args
            .fetch
            .cache_root
            .join("manifests")
            .join(format!("generate_run_{}.json", utc_compact_string(started_ts)));
        write_json_pretty(&manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote generate run manifest");
    }

    info!(
        items = output.counts.items,
        groups = output.counts.groups,
        empty_groups = output.counts.empty_groups,
        courses = output.counts.courses,
        fallback_durations = output.counts.fallback_durations,
        "generate completed"
    );

    Ok(())
}

pub fn build_resolver(
    fetch: &FetchArgs,
    cache_path: &Path,
    layout: &Layout,
) -> Result<DurationResolver<HttpFetcher>> {
    let fetcher = HttpFetcher::new(fetch.fetch_timeout_secs.map(Duration::from_secs))?;
    let cache = DurationCache::load(cache_path);
    let resolver = DurationResolver::new(cache, fetcher, &layout.fallback_duration)?
        .with_fetch_enabled(!fetch.no_fetch);
    Ok(resolver)
}

/// Reads the three tables, resolves durations and nests items under their
/// categories. The duration cache is flushed before returning.
pub fn build_catalog<F: PageFetcher>(
    args: &GenerateArgs,
    layout: &Layout,
    resolver: &mut DurationResolver<F>,
) -> Result<PipelineOutput> {
    let content_records = read_table(&args.content_csv, content_shape(&layout.content))?;
    let category_records = read_table(&args.category_csv, description_shape(&layout.category))?;
    let course_records = read_table(&args.course_csv, description_shape(&layout.course))?;
    info!(
        content_rows = content_records.len(),
        category_rows = category_records.len(),
        course_rows = course_records.len(),
        "read source tables"
    );

    let rows = content_rows(&content_records, &layout.content, &layout.uncategorized);
    let prefetch = resolver.prefetch(media_urls(&rows), args.fetch.workers);
    resolver.flush()?;

    let items = enrich(rows, resolver);
    resolver.flush()?;

    let descriptions = description_records(&category_records, &layout.category);
    let groups = group_by_category(&items, &descriptions, args.match_mode);
    let courses = course_summaries(
        &description_records(&course_records, &layout.course),
        &layout.course_category,
    );

    let counts = CatalogCounts {
        content_rows: content_records.len(),
        category_rows: category_records.len(),
        course_rows: course_records.len(),
        ..catalog_counts(&items, &groups, courses.len())
    };

    Ok(PipelineOutput {
        catalog: Catalog {
            items,
            groups,
            courses,
        },
        counts,
        prefetch,
        cache_entries: resolver.cache().len(),
    })
}

fn catalog_counts(items: &[MediaItem], groups: &[CategoryGroup], courses: usize) -> CatalogCounts {
    let by_source =
        |source: DurationSource| items.iter().filter(|item| item.duration_source == source).count();

    CatalogCounts {
        items: items.len(),
        groups: groups.len(),
        empty_groups: groups.iter().filter(|group| group.lessons.is_empty()).count(),
        courses,
        cached_durations: by_source(DurationSource::Cached),
        fetched_durations: by_source(DurationSource::Fetched),
        fallback_durations: by_source(DurationSource::Fallback),
        ..CatalogCounts::default()
    }
}

fn write_artifact(path: Option<&Path>, artifact: &str) -> Result<()> {
    match path {
        Some(path) => {
            write_text(path, artifact)?;
            info!(path = %path.display(), bytes = artifact.len(), "wrote artifact");
        }
        None => {
            let mut output = io::BufWriter::new(io::stdout().lock());
            output
                .write_all(artifact.as_bytes())
                .context("failed to write artifact to stdout")?;
            output.flush()?;
        }
    }
    Ok(())
}
