//! Background tasks of a playback session: progress polling and
//! end-of-media handling.

use crate::{
    PlaybackState,
    playback::session::{PlayerSlot, lock_slot},
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

/// Poll the play head while the device plays.
///
/// Publishes immediately, then once per `interval`. Ends when the slot's
/// epoch moves on, the device is gone, or the device stops playing.
pub(crate) fn spawn_progress(
    slot: Arc<Mutex<PlayerSlot>>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    epoch: u64,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let guard = lock_slot(&slot);
            if guard.epoch != epoch {
                break;
            }
            let Some(device) = guard.device.as_ref() else {
                break;
            };
            if !device.is_playing() {
                break;
            }

            let position = device.current_position().min(device.duration());
            state_tx.send_modify(|state| state.position = position);
        }

        debug!(epoch, "Progress loop ended");
    })
}

/// Handle end-of-media signals for the device loaded as `load_id`.
///
/// Each completion halts progress polling, rewinds the device, and shows
/// the clip as ready to replay from the start.
pub(crate) fn spawn_completion_watcher(
    slot: Arc<Mutex<PlayerSlot>>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    load_id: u64,
    mut done_rx: mpsc::UnboundedReceiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while done_rx.recv().await.is_some() {
            let mut guard = lock_slot(&slot);
            let player = &mut *guard;
            if player.load_id != load_id {
                break;
            }

            player.epoch += 1;
            if let Some(device) = player.device.as_mut() {
                if let Err(e) = device.seek_to(Duration::ZERO) {
                    warn!(error = ?e, "Failed to rewind after completion");
                }
            }

            state_tx.send_modify(|state| {
                state.is_playing = false;
                state.position = Duration::ZERO;
            });

            info!("Playback completed");
        }

        debug!(load_id, "Completion watcher ended");
    })
}
