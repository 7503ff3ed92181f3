//! Sound Recorder: console voice recorder with pause, playback, and a
//! managed recordings folder.

mod app;
mod app_command;
mod config;
mod console_reader;
mod error;
mod render;
#[cfg(test)]
mod tests;
mod virtual_device;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_reader::ConsoleReader,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use tokio::sync::{mpsc, watch};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "sound_recorder=info,sound_recorder_core=info";

/// Application entry point.
fn main() {
    // stdout carries the console UI, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let app = match App::new(&config, command_rx, shutdown_tx) {
            Ok(app) => app,
            Err(e) => {
                error!("Failed to open recordings library: {:?}", e);
                std::process::exit(1);
            }
        };

        let console_reader = ConsoleReader::new(command_tx);

        tokio::join!(
            async {
                if let Err(e) = console_reader.run(shutdown_rx).await {
                    error!(error = ?e, "Console reader error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // The stdin forwarder may still be parked in a blocking read.
    rt.shutdown_background();
}
