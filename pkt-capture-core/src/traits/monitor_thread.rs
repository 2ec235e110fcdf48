use std::sync::Arc;

use crate::context::callback::CallbackContext;
use crate::models::error::Result;

/// Interface to the monitor-thread subsystem that processes captured
/// packets for one vdev.
///
/// Call order is `alloc` → `open` → `close`. If `open` fails, the caller
/// releases the allocated packet descriptors with `free_pkt_freeq`.
pub trait MonitorThread: Send {
    /// Allocate the packet descriptor free list and thread bookkeeping.
    fn alloc(&mut self) -> Result<()>;

    /// Start the thread. Frames are delivered through the callback
    /// context passed to `MonitorThreadFactory::create`.
    fn open(&mut self) -> Result<()>;

    /// Stop the thread and release everything `alloc` and `open` acquired.
    fn close(&mut self) -> Result<()>;

    /// Release the packet descriptor free list without starting the thread.
    fn free_pkt_freeq(&mut self);
}

/// Creates the monitor-thread resource for a vdev.
///
/// Implemented by:
/// - `MonThreadFactory` (pkt-capture-objmgr)
pub trait MonitorThreadFactory: Send + Sync {
    fn create(&self, vdev_id: u8, cb_ctx: Arc<CallbackContext>) -> Box<dyn MonitorThread>;
}
