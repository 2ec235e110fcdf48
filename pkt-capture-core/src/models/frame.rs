use chrono::{DateTime, Utc};
use serde::Serialize;

/// A captured frame handed to the registered monitor callback.
///
/// The payload is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedFrame {
    pub vdev_id: u8,
    pub data: Vec<u8>,
    pub received_at: DateTime<Utc>,
}

impl CapturedFrame {
    pub fn new(vdev_id: u8, data: Vec<u8>) -> Self {
        Self {
            vdev_id,
            data,
            received_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
