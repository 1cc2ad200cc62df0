use std::{path::Path, sync::Arc};

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use args::{Command, FavoritesArgs, GenerateArgs, HomeArgs};
use catalog::Catalog;
use site::{GenerateOptions, Summary, Template};
use store::FileStore;
use view::{card::Card, sampler::RandomSampler, PageView, Section, ViewConfig};

mod args;
mod catalog;
mod error;
mod site;
mod store;
mod trace;
mod util;
mod view;

#[tokio::main]
async fn main() -> Result<()> {
    error::color_eyre_install()?;

    let args = args::parse();

    let _appender_guard = trace::init(&args)?;

    let catalog = Arc::new(Catalog::load(&args.catalog).await?);
    if catalog.is_empty() {
        warn!("The catalog has no videos");
    }
    let store = Arc::new(FileStore::new(&args.store));
    debug!(store = %store.path().display(), "Using local store");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match args.command {
        Command::Generate(generate) => {
            let summary = generate_site(catalog, &generate, &mut rng).await?;
            print_summary(&summary, &generate.out);
        }
        Command::Home(home) => {
            let config = ViewConfig {
                random_count: home.random,
                recents_page_size: home.recents_page_size,
                slideshow_max: home.slideshow_max,
                ..ViewConfig::default()
            };
            let mut view = PageView::new(catalog, store, config, rng, today())?;
            print_json(&home_page(&mut view, &home)?)?;
        }
        Command::Favorites(favorites) => {
            let config = ViewConfig {
                favorites_page_size: favorites.page_size,
                slideshow_max: favorites.slideshow_max,
                ..ViewConfig::default()
            };
            let mut view = PageView::new(catalog, store, config, rng, today())?;
            print_json(&favorites_page(&mut view, &favorites)?)?;
        }
        Command::Favorite { id } => {
            let mut view = PageView::new(catalog, store, ViewConfig::default(), rng, today())?;
            // Removing a stale id is fine, adding an unknown one is most likely a typo.
            if view.catalog().find(&id).is_none() && !view.is_favorite(&id)? {
                warn!("'{id}' is not in the catalog");
            }

            let mut changes = view.subscribe_favorites();
            let favorite = view.toggle_favorite(&id)?;
            while let Ok(change) = changes.try_recv() {
                info!(id = %change.id, favorite = change.favorite, "Favorites changed");
            }

            println!(
                "{id} {}",
                if favorite {
                    "added to favorites"
                } else {
                    "removed from favorites"
                }
            );
        }
        Command::Search {
            query,
            slideshow_max,
        } => {
            let config = ViewConfig {
                slideshow_max,
                ..ViewConfig::default()
            };
            let mut view = PageView::new(catalog, store, config, rng, today())?;
            print_json(&view.search(&query)?)?;
        }
        Command::Random { count, exclude } => {
            let mut view = PageView::new(catalog, store, ViewConfig::default(), rng, today())?;
            print_json(&view.random(count, exclude.as_deref())?)?;
        }
    }

    Ok(())
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Serialize)]
struct HomePage {
    random: Vec<Card>,
    recents: Section,
}

fn home_page(view: &mut PageView<FileStore, StdRng>, args: &HomeArgs) -> Result<HomePage> {
    let random = view.random_block(None)?;

    // Each extra page is one "load more" press.
    for _ in 1..args.pages {
        view.load_more_recents();
    }
    let recents = view.recents()?;

    Ok(HomePage { random, recents })
}

fn favorites_page(
    view: &mut PageView<FileStore, StdRng>,
    args: &FavoritesArgs,
) -> Result<Section> {
    view.open_favorites();
    for _ in 1..args.pages {
        view.load_more_favorites()?;
    }

    Ok(view.favorites()?)
}

async fn generate_site(
    catalog: Arc<Catalog>,
    args: &GenerateArgs,
    rng: &mut StdRng,
) -> Result<Summary> {
    let template = Template::load(&args.template).await?;
    let mut sampler = RandomSampler::new(catalog.clone(), StdRng::from_rng(&mut *rng));

    let options = GenerateOptions {
        out_dir: args.out.clone(),
        overwrite: args.overwrite,
        site_name: args.site_name.clone(),
        related: args.related,
        concurrency: args.concurrency,
    };

    site::generate_pages(&catalog, &template, &options, &mut sampler, rng).await
}

fn print_summary(summary: &Summary, out_dir: &Path) {
    println!("Created: {}", summary.created);
    if summary.skipped > 0 {
        println!("Skipped: {} (already exist, use --overwrite to replace)", summary.skipped);
    }
    if summary.failed > 0 {
        println!("Failed:  {}", summary.failed);
    }
    if summary.created > 0 {
        println!("Pages are in: {}", out_dir.display());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("could not encode view as JSON")?;
    println!("{json}");

    Ok(())
}
