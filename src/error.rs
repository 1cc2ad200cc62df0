use std::{io, path::PathBuf};

use color_eyre::eyre::Result;
use thiserror::Error;

pub(crate) fn color_eyre_install() -> Result<()> {
    // Replace the default `color_eyre::install()?` panic and error hooks.
    //
    // Reports end up on the same stderr the log writer uses, so the environment section
    // (which only explains `RUST_BACKTRACE` / `RUST_SPANTRACE`) is dropped to keep them short.
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    let eyre_hook = eyre_hook.into_eyre_hook();
    color_eyre::eyre::set_hook(Box::new(move |e| eyre_hook(e)))?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_hook(panic_info);
    }));

    Ok(())
}

/// The catalog could not be turned into a usable list of videos.
///
/// Reported once per run. Consumers show an empty or error state, nothing retries.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: could not read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog unavailable: could not fetch '{url}'")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog unavailable: malformed JSON")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog unavailable: entry #{index} is invalid ({reason})")]
    InvalidRecord { index: usize, reason: &'static str },
    #[error("catalog unavailable: video id '{0}' is derived from more than one url")]
    DuplicateId(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidConfiguration {
    #[error("invalid configuration: page size must be a positive integer")]
    ZeroPageSize,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored value is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("store key lookup failed")]
    Key(#[from] json_dotpath::Error),
}
