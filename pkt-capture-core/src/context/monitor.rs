use crate::models::error::{PktCaptureError, Result};
use crate::models::state::MonitorState;
use crate::traits::monitor_thread::MonitorThread;

/// Per-vdev handle on the monitor-thread resource.
///
/// Tracks where the resource is in its alloc → open → close sequence and
/// refuses out-of-order calls.
pub struct MonitorContext {
    vdev_id: u8,
    thread: Box<dyn MonitorThread>,
    state: MonitorState,
}

impl MonitorContext {
    pub fn new(vdev_id: u8, thread: Box<dyn MonitorThread>) -> Self {
        Self {
            vdev_id,
            thread,
            state: MonitorState::Idle,
        }
    }

    pub fn vdev_id(&self) -> u8 {
        self.vdev_id
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn alloc_mon_thread(&mut self) -> Result<()> {
        if !self.state.is_idle() {
            return Err(PktCaptureError::InvalidState(format!(
                "mon thread alloc from {:?}",
                self.state
            )));
        }
        self.thread.alloc()?;
        self.state = MonitorState::Allocated;
        Ok(())
    }

    pub fn open_mon_thread(&mut self) -> Result<()> {
        if self.state != MonitorState::Allocated {
            return Err(PktCaptureError::InvalidState(format!(
                "mon thread open from {:?}",
                self.state
            )));
        }
        self.thread.open()?;
        self.state = MonitorState::Running;
        Ok(())
    }

    /// Stop the thread. A context that never got past alloc is only
    /// drained of its free queue.
    pub fn close_mon_thread(&mut self) -> Result<()> {
        let result = match self.state {
            MonitorState::Running => self.thread.close(),
            MonitorState::Allocated => {
                self.thread.free_pkt_freeq();
                Ok(())
            }
            MonitorState::Idle | MonitorState::Closed => Ok(()),
        };
        self.state = MonitorState::Closed;
        result
    }

    pub fn free_mon_pkt_freeq(&mut self) {
        if self.state == MonitorState::Allocated {
            self.thread.free_pkt_freeq();
            self.state = MonitorState::Idle;
        }
    }
}

impl std::fmt::Debug for MonitorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorContext")
            .field("vdev_id", &self.vdev_id)
            .field("state", &self.state)
            .finish()
    }
}
