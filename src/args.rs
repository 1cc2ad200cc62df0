use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub fn parse() -> Args {
    Args::parse()
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Path or http(s) URL of the JSON video catalog
    #[arg(long, global = true, default_value_t = String::from("videodata.json"))]
    pub catalog: String,

    /// JSON file holding favorites and thumbnail choices between runs
    #[arg(long, global = true, default_value = ".vidsite-storage.json")]
    pub store: PathBuf,

    /// Seed the random source for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one static page per catalog entry from a template
    Generate(GenerateArgs),

    /// Print the home page view: a random block and the first recents pages
    Home(HomeArgs),

    /// Print the favorites page view
    Favorites(FavoritesArgs),

    /// Add a video to favorites, or remove it if already present
    Favorite {
        /// Video id (file stem of its page url)
        id: String,
    },

    /// Search titles, tags and descriptions
    Search {
        query: String,

        /// Maximum number of images to cycle through on hover
        #[arg(long, default_value_t = 4)]
        slideshow_max: usize,
    },

    /// Draw random videos from a fresh pool
    Random {
        #[arg(short, long, default_value_t = 16)]
        count: usize,

        /// Never return this video id (e.g. the one being watched)
        #[arg(long)]
        exclude: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// HTML template every page is rendered from
    #[arg(long, default_value = "video-template.html")]
    pub template: PathBuf,

    /// Output directory for generated pages
    #[arg(short, long, default_value = "videos")]
    pub out: PathBuf,

    /// Replace pages that already exist
    #[arg(long)]
    pub overwrite: bool,

    #[arg(long, default_value_t = String::from("Video Site"))]
    pub site_name: String,

    /// Number of random videos in each page's sidebar (0 disables it)
    #[arg(long, default_value_t = 8)]
    pub related: usize,

    /// Maximum number of pages written at the same time
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,
}

#[derive(Debug, clap::Args)]
pub struct HomeArgs {
    /// Size of the random block
    #[arg(long, default_value_t = 16)]
    pub random: usize,

    /// Recents shown initially and per "load more"
    #[arg(long, default_value_t = 4)]
    pub recents_page_size: usize,

    /// Number of recents pages to show
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Maximum number of images to cycle through on hover
    #[arg(long, default_value_t = 4)]
    pub slideshow_max: usize,
}

#[derive(Debug, clap::Args)]
pub struct FavoritesArgs {
    /// Favorites shown initially and per "load more"
    #[arg(long, default_value_t = 8)]
    pub page_size: usize,

    /// Number of favorites pages to show
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Maximum number of images to cycle through on hover
    #[arg(long, default_value_t = 4)]
    pub slideshow_max: usize,
}
