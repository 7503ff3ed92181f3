use crate::config::{DEFAULT_AMPLITUDE_CEILING, default_amplitude_ceiling};

use serde::{Deserialize, Serialize};

/// Settings of the virtual capture device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Peak of the synthetic level envelope, at most 32767.
    #[serde(default = "default_amplitude_ceiling")]
    pub amplitude_ceiling: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            amplitude_ceiling: DEFAULT_AMPLITUDE_CEILING,
        }
    }
}
