use std::{fmt, path::Path};

/// Container formats the library recognizes as recordings.
///
/// Anything else in the storage directory is ignored by listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// MPEG-4 audio, the format new recordings are written in.
    M4a,
    /// Raw ADTS AAC.
    Aac,
    /// Adaptive multi-rate narrowband.
    Amr,
    /// 3GPP container.
    ThreeGpp,
}

impl AudioFormat {
    /// Every recognized format.
    pub const ALL: [AudioFormat; 4] = [
        AudioFormat::M4a,
        AudioFormat::Aac,
        AudioFormat::Amr,
        AudioFormat::ThreeGpp,
    ];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::M4a => "m4a",
            AudioFormat::Aac => "aac",
            AudioFormat::Amr => "amr",
            AudioFormat::ThreeGpp => "3gpp",
        }
    }

    /// Match an extension, ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Format of `path` judged by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
