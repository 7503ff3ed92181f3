//! Line-oriented command input from stdin.
//!
//! Parses each line into an [`AppCommand`] and forwards it to the main
//! application over an async channel. End of input requests shutdown.

use crate::{AppCommand, AppError, AppResult, app_command::USAGE};

use std::{
    io::{self, BufRead},
    panic::Location,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards console lines to the application as commands.
pub struct ConsoleReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleReader {
    /// Create a reader that sends parsed commands to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the reader until shutdown or end of input.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single blocking task owns stdin. It ends when the next
        // blocking_send fails after line_rx is dropped, or at EOF.
        let handle = tokio::task::spawn_blocking(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console reader shutting down");
                    break;
                }
                line = line_rx.recv() => match line {
                    Some(line) => self.handle_line(&line).await?,
                    None => {
                        info!("End of input");
                        self.command_tx.send(AppCommand::Quit).await.map_err(|e| {
                            AppError::ChannelSendFailed {
                                message: format!("Failed to forward quit at end of input: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            }
                        })?;
                        break;
                    }
                },
            }
        }

        drop(line_rx);

        // stdin may never produce another line; the runtime drops the task
        // on exit.
        match tokio::time::timeout(Duration::from_millis(200), handle).await {
            Ok(Ok(())) => debug!("Console forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console forwarder task panicked"),
            Err(_) => debug!("Console forwarder still blocked on stdin, leaving it to exit"),
        }

        Ok(())
    }

    /// Parse one line and forward the command. Bad input is reported on the
    /// console and otherwise ignored.
    #[instrument(skip(self))]
    pub(crate) async fn handle_line(&self, line: &str) -> AppResult<()> {
        match AppCommand::parse(line) {
            Ok(Some(command)) => {
                self.command_tx
                    .send(command)
                    .await
                    .map_err(|e| AppError::ChannelSendFailed {
                        message: format!("Failed to forward {:?}: {}", e.0, e),
                        location: ErrorLocation::from(Location::caller()),
                    })
            }
            Ok(None) => Ok(()),
            Err(AppError::InvalidCommand { input, reason, .. }) => {
                debug!(input = %input, reason = %reason, "Rejected console input");
                println!("? {input}: {reason}\n{USAGE}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
