use crate::{
    AudioFormat, RecorderError, RecordingPhase, RecordingSession, RecordingState,
    tests::fakes::Fixture,
};

use std::{fs, sync::Arc, time::Duration};

use tokio::time::sleep;

fn session(fixture: &Fixture) -> RecordingSession {
    RecordingSession::new(
        Arc::new(fixture.capture.clone()),
        fixture.library(),
        fixture.options(),
    )
}

/// WHAT: Start acquires a device and enters Recording with zero elapsed
/// WHY: Every capture begins from a clean timer
#[tokio::test(start_paused = true)]
async fn given_idle_session_when_starting_then_recording_into_temp_file() {
    // Given: An idle session
    let fixture = Fixture::new();
    let mut session = session(&fixture);

    // When: Starting
    session.start().unwrap();

    // Then: Recording, device started, temp file outside the library
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Recording);
    assert_eq!(state.elapsed, Duration::ZERO);

    let log = fixture.capture.log();
    assert_eq!(log.acquired, 1);
    assert_eq!(log.started, 1);
    let temp = &log.outputs[0];
    assert!(temp.starts_with(fixture.temp_dir()));
    assert!(
        temp.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("recording_")
    );
}

/// WHAT: Unavailable microphone surfaces DeviceUnavailable and stays Idle
/// WHY: Permission denial must not leave a half-started session
#[tokio::test(start_paused = true)]
async fn given_denied_microphone_when_starting_then_device_unavailable() {
    let fixture = Fixture::new();
    fixture.capture.log().unavailable = true;
    let mut session = session(&fixture);

    let result = session.start();

    assert!(matches!(
        result,
        Err(RecorderError::DeviceUnavailable { .. })
    ));
    assert_eq!(session.snapshot(), RecordingState::default());
}

/// WHAT: The monitor publishes amplitude every tick but elapsed only per second
/// WHY: Sub-second ticks must not redraw the timer
#[tokio::test(start_paused = true)]
async fn given_recording_when_ticks_pass_then_amplitude_live_and_elapsed_whole_seconds() {
    // Given: A recording with a steady input level
    let fixture = Fixture::new();
    fixture.capture.log().amplitude = 1_234;
    let mut session = session(&fixture);
    session.start().unwrap();

    // When: Less than a second passes
    sleep(Duration::from_millis(900)).await;

    // Then: Amplitude sampled, timer still at zero
    let state = session.snapshot();
    assert_eq!(state.amplitude.get(), 1_234);
    assert_eq!(state.elapsed, Duration::ZERO);

    // When: The second boundary and a bit more pass
    sleep(Duration::from_millis(1_300)).await;

    // Then: Timer shows two whole seconds
    let state = session.snapshot();
    assert_eq!(state.elapsed, Duration::from_secs(2));
    assert_eq!(state.elapsed_label(), "00:02");
}

/// WHAT: Pause freezes elapsed at the exact accumulated time
/// WHY: The paused timer must not keep counting
#[tokio::test(start_paused = true)]
async fn given_recording_for_three_seconds_when_pausing_then_elapsed_frozen() {
    // Given: Three seconds of recording
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_millis(3_000)).await;

    // When: Pausing and waiting
    session.pause().unwrap();
    let paused = session.snapshot();
    sleep(Duration::from_secs(5)).await;

    // Then: Paused at 3000 ms and still there later
    assert_eq!(paused.phase, RecordingPhase::Paused);
    assert_eq!(paused.elapsed, Duration::from_millis(3_000));
    assert_eq!(session.snapshot(), paused);
    assert_eq!(fixture.capture.log().paused, 1);
}

/// WHAT: Pausing twice changes nothing the second time
/// WHY: Invalid-phase commands are identity transitions
#[tokio::test(start_paused = true)]
async fn given_paused_session_when_pausing_again_then_state_unchanged() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_millis(1_500)).await;
    session.pause().unwrap();
    let before = session.snapshot();

    session.pause().unwrap();

    assert_eq!(session.snapshot(), before);
    assert_eq!(fixture.capture.log().paused, 1);
}

/// WHAT: Stop while Idle changes nothing
/// WHY: Invalid-phase commands are identity transitions
#[tokio::test(start_paused = true)]
async fn given_idle_session_when_stopping_then_state_unchanged() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);

    session.stop().unwrap();

    assert_eq!(session.snapshot(), RecordingState::default());
    assert!(!fixture.library_root().exists());
}

/// WHAT: Starting again after a pause begins a new capture from zero
/// WHY: Pause is not resumable; a new start means a new recording
#[tokio::test(start_paused = true)]
async fn given_paused_at_three_seconds_when_starting_again_then_elapsed_resets() {
    // Given: Paused at 3000 ms
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_millis(3_000)).await;
    session.pause().unwrap();
    assert_eq!(session.snapshot().elapsed, Duration::from_millis(3_000));

    // When: Starting again
    session.start().unwrap();

    // Then: A fresh device, old one torn down, timer at zero
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Recording);
    assert_eq!(state.elapsed, Duration::ZERO);

    let log = fixture.capture.log();
    assert_eq!(log.acquired, 2);
    assert_eq!(log.stopped, 1);
    assert_eq!(log.released, 1);
}

/// WHAT: Elapsed never decreases within one capture
/// WHY: The timer must only move forward while recording
#[tokio::test(start_paused = true)]
async fn given_recording_when_sampling_repeatedly_then_elapsed_monotonic() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();

    let mut previous = Duration::ZERO;
    for _ in 0..12 {
        sleep(Duration::from_millis(370)).await;
        let elapsed = session.snapshot().elapsed;
        assert!(elapsed >= previous);
        previous = elapsed;
    }

    session.pause().unwrap();
    assert!(session.snapshot().elapsed >= previous);
}

/// WHAT: Stop saves the capture into the library and opens the naming prompt
/// WHY: Every finished capture must be listed and offered for naming
#[tokio::test(start_paused = true)]
async fn given_recording_when_stopping_then_saved_with_pending_file() {
    // Given: Two seconds of recording
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(2)).await;
    let temp = fixture.capture.log().outputs[0].clone();

    // When: Stopping
    session.stop().unwrap();

    // Then: Stopped, timer reset, file moved into the library
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Stopped);
    assert_eq!(state.elapsed, Duration::ZERO);

    let pending = state.pending_file.clone().unwrap();
    assert_eq!(AudioFormat::from_path(pending.path()), Some(AudioFormat::M4a));
    assert!(pending.path().starts_with(fixture.library_root()));
    assert!(pending.name().starts_with("record_"));
    assert_eq!(state.suggested_name(), Some(pending.name()));
    assert!(!temp.exists());

    let listed = fixture.library().list().unwrap();
    assert_eq!(listed, vec![pending]);

    let log = fixture.capture.log();
    assert_eq!(log.stopped, 1);
    assert_eq!(log.released, 1);
}

/// WHAT: Stop from Paused also saves
/// WHY: A paused capture is still a valid recording
#[tokio::test(start_paused = true)]
async fn given_paused_session_when_stopping_then_saved() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    session.pause().unwrap();

    session.stop().unwrap();

    assert_eq!(session.snapshot().phase, RecordingPhase::Stopped);
    assert!(session.snapshot().pending_file.is_some());
}

/// WHAT: A failed save keeps the temp file and a second stop retries it
/// WHY: A persistence failure must never lose recorded audio
#[tokio::test(start_paused = true)]
async fn given_blocked_library_when_stopping_then_temp_kept_and_retry_succeeds() {
    // Given: The library root is occupied by a plain file
    let fixture = Fixture::new();
    fs::write(fixture.library_root(), b"in the way").unwrap();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    let temp = fixture.capture.log().outputs[0].clone();

    // When: Stopping
    let result = session.stop();

    // Then: Failure surfaced, device released, no pending file, audio kept
    assert!(matches!(
        result,
        Err(RecorderError::PersistenceFailure { .. })
    ));
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Stopped);
    assert!(state.pending_file.is_none());
    assert!(temp.exists());
    assert_eq!(fixture.capture.log().released, 1);

    // When: The obstruction is cleared and stop is issued again
    fs::remove_file(fixture.library_root()).unwrap();
    session.stop().unwrap();

    // Then: Saved this time
    let state = session.snapshot();
    assert!(state.pending_file.is_some());
    assert!(!temp.exists());
}

/// WHAT: A failed save survives a failed start and the next stop saves it
/// WHY: Recorded audio must stay reachable until it reaches the library
#[tokio::test(start_paused = true)]
async fn given_failed_save_when_next_start_fails_then_later_stop_still_saves() {
    // Given: A capture whose save failed against a blocked library
    let fixture = Fixture::new();
    fs::write(fixture.library_root(), b"in the way").unwrap();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    let temp = fixture.capture.log().outputs[0].clone();
    assert!(session.stop().is_err());

    // When: The microphone is denied on the next start
    fixture.capture.log().unavailable = true;
    let result = session.start();
    assert!(matches!(
        result,
        Err(RecorderError::DeviceUnavailable { .. })
    ));

    // And: The library is unblocked and stop is issued
    fs::remove_file(fixture.library_root()).unwrap();
    session.stop().unwrap();

    // Then: The earlier capture is saved and offered for naming
    let pending = session.snapshot().pending_file.unwrap();
    assert!(pending.path().starts_with(fixture.library_root()));
    assert!(!temp.exists());
    assert_eq!(fixture.library().list().unwrap(), vec![pending]);
}

/// WHAT: Starting a new capture saves an earlier one whose save failed
/// WHY: A new recording must not strand the previous one in the temp dir
#[tokio::test(start_paused = true)]
async fn given_failed_save_when_starting_again_then_earlier_capture_saved() {
    // Given: A capture whose save failed, then the library is unblocked
    let fixture = Fixture::new();
    fs::write(fixture.library_root(), b"in the way").unwrap();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    let temp = fixture.capture.log().outputs[0].clone();
    assert!(session.stop().is_err());
    fs::remove_file(fixture.library_root()).unwrap();

    // When: Starting a new capture
    session.start().unwrap();

    // Then: The earlier capture is listed and the new one is running
    assert!(!temp.exists());
    assert_eq!(fixture.library().list().unwrap().len(), 1);
    assert_eq!(session.snapshot().phase, RecordingPhase::Recording);

    // And: Stopping saves the new capture on its own
    sleep(Duration::from_secs(1)).await;
    session.stop().unwrap();
    assert!(session.snapshot().pending_file.is_some());
    assert_eq!(fixture.library().list().unwrap().len(), 2);
}

/// WHAT: A device that fails to stop does not block a new capture
/// WHY: Forced teardown swallows device errors but must still release
#[tokio::test(start_paused = true)]
async fn given_failing_stop_when_starting_again_then_new_capture_runs() {
    // Given: A running capture whose device errors on stop
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    fixture.capture.log().fail_stop = true;

    // When: Starting again
    session.start().unwrap();

    // Then: A fresh capture from zero, the old device stopped and released
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Recording);
    assert_eq!(state.elapsed, Duration::ZERO);

    let log = fixture.capture.log();
    assert_eq!(log.acquired, 2);
    assert_eq!(log.stopped, 1);
    assert_eq!(log.released, 1);
}

/// WHAT: A refused pause leaves the capture recording
/// WHY: The timer and meter must keep running while audio is still captured
#[tokio::test(start_paused = true)]
async fn given_refusing_device_when_pausing_then_still_recording() {
    // Given: A running capture whose device refuses to pause
    let fixture = Fixture::new();
    fixture.capture.log().amplitude = 777;
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_millis(500)).await;
    fixture.capture.log().fail_pause = true;

    // When: Pausing
    let result = session.pause();

    // Then: Device error surfaced, phase unchanged
    assert!(matches!(result, Err(RecorderError::DeviceError { .. })));
    assert_eq!(session.snapshot().phase, RecordingPhase::Recording);

    // And: The monitor keeps publishing
    sleep(Duration::from_millis(1_000)).await;
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Recording);
    assert_eq!(state.elapsed, Duration::from_secs(1));
    assert_eq!(state.amplitude.get(), 777);
    assert_eq!(fixture.capture.log().paused, 0);
}

/// WHAT: Naming onto an existing recording is rejected and the prompt stays
/// WHY: Users must be able to pick another name without losing the prompt
#[tokio::test(start_paused = true)]
async fn given_pending_file_when_confirming_taken_name_then_rejected_and_prompt_open() {
    // Given: A just-stopped recording and an existing "meeting.m4a"
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    session.stop().unwrap();
    let taken = fixture.touch("meeting.m4a");
    let pending = session.snapshot().pending_file.unwrap();

    // When: Confirming the taken name
    let result = session.confirm_rename("meeting");

    // Then: Collision, prompt still open, both files intact
    assert!(matches!(result, Err(RecorderError::NameCollision { .. })));
    assert_eq!(session.snapshot().pending_file, Some(pending.clone()));
    assert!(pending.path().exists());
    assert!(taken.exists());
}

/// WHAT: Confirming a free name renames the file and closes the prompt
/// WHY: The saved recording takes the user's name with the m4a extension
#[tokio::test(start_paused = true)]
async fn given_pending_file_when_confirming_free_name_then_renamed_and_cleared() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    session.stop().unwrap();
    let pending = session.snapshot().pending_file.unwrap();

    let renamed = session.confirm_rename("Standup #12").unwrap().unwrap();

    assert_eq!(renamed.file_name(), "Standup _12.m4a");
    assert!(!pending.path().exists());
    assert!(renamed.path().exists());
    let state = session.snapshot();
    assert_eq!(state.phase, RecordingPhase::Stopped);
    assert!(state.pending_file.is_none());
}

/// WHAT: Dismissing the prompt keeps the generated name
/// WHY: Naming is optional
#[tokio::test(start_paused = true)]
async fn given_pending_file_when_dismissing_then_file_kept_and_prompt_cleared() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();
    sleep(Duration::from_secs(1)).await;
    session.stop().unwrap();
    let pending = session.snapshot().pending_file.unwrap();

    session.dismiss_rename();

    assert!(session.snapshot().pending_file.is_none());
    assert!(pending.path().exists());
    assert_eq!(session.confirm_rename("late").unwrap(), None);
}

/// WHAT: Shutdown releases a held device without saving
/// WHY: Owner disposal must not leak the microphone
#[tokio::test(start_paused = true)]
async fn given_recording_when_shutting_down_then_device_released() {
    let fixture = Fixture::new();
    let mut session = session(&fixture);
    session.start().unwrap();

    session.shutdown();

    assert_eq!(session.snapshot(), RecordingState::default());
    assert_eq!(fixture.capture.log().released, 1);
    assert!(!fixture.library_root().exists());
}

/// WHAT: Only Recording counts as recording; Paused still holds the device
/// WHY: The console refuses pause outside a running capture
#[test]
fn given_each_phase_when_querying_then_recording_and_active_distinguished() {
    let in_phase = |phase| RecordingState {
        phase,
        ..RecordingState::default()
    };

    assert!(in_phase(RecordingPhase::Recording).is_recording());
    assert!(!in_phase(RecordingPhase::Paused).is_recording());
    assert!(in_phase(RecordingPhase::Paused).is_active());
    assert!(!in_phase(RecordingPhase::Idle).is_active());
    assert!(!in_phase(RecordingPhase::Stopped).is_recording());
}
