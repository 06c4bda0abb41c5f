use anyhow::Result;
use tracing::info;

use crate::catalog::{content_rows, content_shape, media_urls};
use crate::cli::PrefetchArgs;
use crate::commands::generate::build_resolver;
use crate::layout::Layout;
use crate::rows::read_table;

pub fn run(args: PrefetchArgs) -> Result<()> {
    let cache_path = args.fetch.cache_path();
    let layout = Layout::load(args.fetch.layout.as_deref())?;

    let records = read_table(&args.content_csv, content_shape(&layout.content))?;
    let rows = content_rows(&records, &layout.content, &layout.uncategorized);

    let mut resolver = build_resolver(&args.fetch, &cache_path, &layout)?;
    let counts = resolver.prefetch(media_urls(&rows), args.fetch.workers);
    resolver.flush()?;
    let cache = resolver.into_cache();

    info!(
        content_rows = rows.len(),
        requested = counts.requested,
        fetched = counts.fetched,
        failed = counts.failed,
        cache_entries = cache.len(),
        "prefetch completed"
    );

    Ok(())
}
