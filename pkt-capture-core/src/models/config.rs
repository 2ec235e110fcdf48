use serde::{Deserialize, Serialize};

use super::mode::CaptureMode;
use crate::traits::config_source::ConfigSource;

/// Descriptor of a single integer configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgItem {
    pub key: &'static str,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

/// Packet capture mode (0 disabled, 1 mgmt only, 2 data only, 3 data + mgmt).
pub const CFG_PKT_CAPTURE_MODE: CfgItem = CfgItem {
    key: "packet_capture_mode",
    min: 0,
    max: 3,
    default: 0,
};

/// Read `item` from `source`.
///
/// Missing keys yield the item default. Values outside `min..=max` are
/// reported and replaced by the default.
pub fn cfg_get(source: &dyn ConfigSource, item: &CfgItem) -> u32 {
    match source.get_u32(item.key) {
        None => item.default,
        Some(value) if (item.min..=item.max).contains(&value) => value,
        Some(value) => {
            log::warn!(
                "{}={} out of range [{}, {}], using default {}",
                item.key,
                value,
                item.min,
                item.max,
                item.default
            );
            item.default
        }
    }
}

/// Per-psoc configuration, loaded once at psoc create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PktCaptureConfig {
    pub pkt_capture_mode: CaptureMode,
}

impl PktCaptureConfig {
    pub fn load(source: &dyn ConfigSource) -> Self {
        let raw = cfg_get(source, &CFG_PKT_CAPTURE_MODE);
        // out-of-range values were already replaced by the default
        let pkt_capture_mode = CaptureMode::try_from(raw).unwrap_or_default();
        Self { pkt_capture_mode }
    }
}
