use std::{fs, path::Path};

use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, prelude::*, EnvFilter};

use crate::args::Args;

pub(crate) fn init(args: &Args) -> Result<WorkerGuard> {
    let (non_blocking, guard) = match args.log_file.as_deref() {
        Some(log_file) => tracing_appender::non_blocking(open_log_file(log_file)?),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_line_number(true)
                .with_ansi(args.log_file.is_none())
                .with_writer(non_blocking)
                .with_filter(env_filter(&args.verbosity)),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|_| eyre!("Tracing initialization failed"))?;

    Ok(guard)
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("could not open log file '{}'", path.display()))
}

fn env_filter(verbosity: &Verbosity<InfoLevel>) -> EnvFilter {
    // Use `-q` (warn) through `-vv` (trace) for simple verbosity,
    // or use `RUST_LOG=target[span{field=value}]=level` for fine-grained verbosity control.
    // See https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy()
}
