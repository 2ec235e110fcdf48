use serde::{Deserialize, Serialize};

use super::error::PktCaptureError;

/// Packet capture mode.
///
/// `Disabled` doubles as the "unavailable" value returned by every mode
/// getter when the psoc, vdev or their private state cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CaptureMode {
    #[default]
    Disabled = 0,
    MgmtOnly = 1,
    DataOnly = 2,
    DataMgmt = 3,
}

impl CaptureMode {
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Whether management frames are captured in this mode.
    pub fn captures_mgmt(self) -> bool {
        matches!(self, Self::MgmtOnly | Self::DataMgmt)
    }

    /// Whether data frames are captured in this mode.
    pub fn captures_data(self) -> bool {
        matches!(self, Self::DataOnly | Self::DataMgmt)
    }
}

impl TryFrom<u32> for CaptureMode {
    type Error = PktCaptureError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::MgmtOnly),
            2 => Ok(Self::DataOnly),
            3 => Ok(Self::DataMgmt),
            other => Err(PktCaptureError::Config(format!(
                "unsupported packet capture mode: {}",
                other
            ))),
        }
    }
}

impl From<CaptureMode> for u32 {
    fn from(mode: CaptureMode) -> Self {
        mode as u32
    }
}
