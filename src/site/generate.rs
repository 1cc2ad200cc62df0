use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use color_eyre::eyre::{Result, WrapErr};
use futures::{stream, StreamExt};
use rand::Rng;
use tracing::{error, info, instrument, warn};

use super::template::{PageContext, Template};
use crate::{
    catalog::{Catalog, VideoRecord},
    store::thumbnails::pick_thumbnail,
    view::{format::format_view_count, sampler::RandomSampler, PLACEHOLDER_VIEWS},
};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub out_dir: PathBuf,
    pub overwrite: bool,
    pub site_name: String,
    pub related: usize,
    pub concurrency: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Created,
    Skipped,
    Failed,
}

struct Job {
    record: Arc<VideoRecord>,
    html: String,
}

/// Writes one page per catalog entry into `options.out_dir`.
///
/// Existing pages are kept unless `options.overwrite` is set. A page that cannot be
/// written is logged and counted; the remaining pages are still generated.
#[instrument(skip_all, fields(out_dir = %options.out_dir.display()))]
pub async fn generate_pages<R: Rng>(
    catalog: &Catalog,
    template: &Template,
    options: &GenerateOptions,
    sampler: &mut RandomSampler<R>,
    rng: &mut R,
) -> Result<Summary> {
    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .wrap_err_with(|| {
            format!(
                "could not create output directory '{}'",
                options.out_dir.display()
            )
        })?;

    // Sampling needs `&mut`, so sidebars are drawn up front; only the writes run concurrently.
    let jobs: Vec<Job> = catalog
        .records()
        .iter()
        .map(|record| {
            let related = if options.related > 0 {
                related_html(&sampler.draw(options.related, Some(record.id.as_str())), rng)
            } else {
                String::new()
            };
            let html = template.render(&PageContext {
                record,
                site_name: &options.site_name,
                related_html: &related,
            });

            Job {
                record: record.clone(),
                html,
            }
        })
        .collect();

    let outcomes: Vec<Outcome> = stream::iter(jobs)
        .map(|job| write_page(job, &options.out_dir, options.overwrite))
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    let summary = outcomes
        .into_iter()
        .fold(Summary::default(), |mut summary, outcome| {
            match outcome {
                Outcome::Created => summary.created += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
            summary
        });
    info!(?summary, "Generation finished");

    Ok(summary)
}

async fn write_page(job: Job, out_dir: &Path, overwrite: bool) -> Outcome {
    let Some(file_name) = job.record.file_name() else {
        error!("No file name in url '{}'", job.record.url);
        return Outcome::Failed;
    };
    let path = out_dir.join(file_name);

    match tokio::fs::try_exists(&path).await {
        Ok(true) if !overwrite => {
            warn!("Skipped: {file_name} (already exists)");
            return Outcome::Skipped;
        }
        Ok(_) => {}
        Err(e) => {
            error!("Could not check '{}': {e}", path.display());
            return Outcome::Failed;
        }
    }

    match tokio::fs::write(&path, job.html).await {
        Ok(()) => {
            info!("Created: {file_name}");
            Outcome::Created
        }
        Err(e) => {
            error!("Error generating '{}': {e}", job.record.url);
            Outcome::Failed
        }
    }
}

/// Sidebar entries. Pages sit next to each other, so links are bare `<id>.html`.
///
/// Videos without a view count show a made-up one.
fn related_html<R: Rng>(records: &[Arc<VideoRecord>], rng: &mut R) -> String {
    let mut html = String::new();

    for record in records {
        let title = htmlize::escape_text(record.title.as_str());
        let href = htmlize::escape_attribute(record.id.as_str());
        let thumbnail = htmlize::escape_attribute(pick_thumbnail(record, rng));

        let views = record
            .views
            .unwrap_or_else(|| rng.random_range(PLACEHOLDER_VIEWS));

        let _ = writeln!(
            html,
            concat!(
                r#"<div class="sidebar-video-item">"#,
                r#"<a href="{href}.html" class="sidebar-video-link">"#,
                r#"<img src="{thumbnail}" alt="{title}" class="sidebar-video-thumb">"#,
                r#"<div class="sidebar-video-info">"#,
                r#"<div class="sidebar-video-title">{title}</div>"#,
                r#"<div class="sidebar-video-meta">👁 {views}</div>"#,
                "</div></a></div>",
            ),
            href = href,
            thumbnail = thumbnail,
            title = title,
            views = format_view_count(views),
        );
    }

    html
}
