//! Periodic amplitude and elapsed-time sampling while a capture runs.

use crate::{
    RecordingState,
    recording::session::{CaptureSlot, lock_slot},
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

/// Spawn the monitor loop for the capture identified by `epoch`.
///
/// Each tick publishes the amplitude. Elapsed time is published only when a
/// whole-second boundary is crossed, truncated to that second. The loop ends
/// itself as soon as the slot's epoch moves on or its device is gone, and it
/// checks both under the slot lock before publishing anything.
pub(crate) fn spawn_monitor(
    slot: Arc<Mutex<CaptureSlot>>,
    state_tx: Arc<watch::Sender<RecordingState>>,
    epoch: u64,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_second = state_tx.borrow().elapsed.as_secs();

        loop {
            ticker.tick().await;

            let mut guard = lock_slot(&slot);
            if guard.epoch != epoch {
                break;
            }
            let Some(segment_start) = guard.segment_start else {
                break;
            };
            let accumulated = guard.accumulated;
            let Some(device) = guard.device.as_mut() else {
                break;
            };

            let amplitude = device.current_amplitude();
            let seconds = (accumulated + segment_start.elapsed()).as_secs();
            let advance = seconds > last_second;

            state_tx.send_modify(|state| {
                state.amplitude = amplitude;
                if advance {
                    state.elapsed = Duration::from_secs(seconds);
                }
            });

            if advance {
                last_second = seconds;
            }
        }

        debug!(epoch, "Monitor loop ended");
    })
}
