use std::{fmt, time::Duration};

/// Instantaneous capture level reported by a capture device.
///
/// Always within `[0, Amplitude::MAX]`; device readings outside that range
/// are clamped on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amplitude(u16);

impl Amplitude {
    /// Silence.
    pub const ZERO: Amplitude = Amplitude(0);

    /// Peak level of a 16-bit capture path.
    pub const MAX: Amplitude = Amplitude(32_767);

    /// Clamp a raw device reading into the valid range.
    pub fn new(raw: i32) -> Self {
        Self(raw.clamp(0, i32::from(Self::MAX.0)) as u16)
    }

    /// Raw level.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Level as a fraction of [`Amplitude::MAX`], for meters.
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX.0)
    }
}

impl fmt::Display for Amplitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a duration as a `MM:SS` clock label.
///
/// Minutes are not wrapped at the hour, so 75 minutes renders as `75:00`.
pub fn clock_label(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

