//! Desktop stand-ins for the platform recorder and player.
//!
//! A virtual capture writes no audio. It writes a two-line text header
//! holding the captured length, which the virtual player reads back:
//!
//! ```text
//! sound-recorder virtual audio v1
//! duration_ms=4250
//! ```

mod capture;
mod playback;

pub(crate) use {capture::VirtualCapture, playback::VirtualPlayer};

use std::time::Duration;

const HEADER_MAGIC: &str = "sound-recorder virtual audio v1";
const DURATION_KEY: &str = "duration_ms=";

pub(crate) fn encode_header(duration: Duration) -> String {
    format!(
        "{HEADER_MAGIC}\n{DURATION_KEY}{}\n",
        duration.as_millis()
    )
}

/// Length stored in a header, or `None` if `contents` is not one.
pub(crate) fn decode_header(contents: &str) -> Option<Duration> {
    let mut lines = contents.lines();
    if lines.next()? != HEADER_MAGIC {
        return None;
    }

    let millis = lines.next()?.strip_prefix(DURATION_KEY)?.trim().parse().ok()?;

    Some(Duration::from_millis(millis))
}
