use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::error::{PktCaptureError, Result};
use crate::models::frame::CapturedFrame;
use crate::models::mode::CaptureMode;

/// Opaque user context handed back to the monitor callback.
pub type MonitorCallbackCtx = Arc<dyn Any + Send + Sync>;

/// Callback invoked for every captured frame.
///
/// Runs on the monitor thread; keep processing minimal.
pub type MonitorCallback =
    Arc<dyn Fn(&MonitorCallbackCtx, CapturedFrame) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
struct Registration {
    mon_cb: MonitorCallback,
    mon_ctx: MonitorCallbackCtx,
}

/// Per-vdev delivery state: the registered callback pair and the
/// active capture mode.
///
/// The callback and its context live in one slot, so they are always
/// set and cleared together.
pub struct CallbackContext {
    registration: RwLock<Option<Registration>>,
    pkt_capture_mode: RwLock<CaptureMode>,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl CallbackContext {
    pub fn new() -> Self {
        Self {
            registration: RwLock::new(None),
            pkt_capture_mode: RwLock::new(CaptureMode::Disabled),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Install the callback pair, replacing any previous one.
    pub fn register(&self, mon_cb: MonitorCallback, mon_ctx: MonitorCallbackCtx) {
        *self.registration.write() = Some(Registration { mon_cb, mon_ctx });
    }

    pub fn deregister(&self) {
        *self.registration.write() = None;
    }

    pub fn is_registered(&self) -> bool {
        self.registration.read().is_some()
    }

    /// Context of the current registration.
    pub fn mon_ctx(&self) -> Option<MonitorCallbackCtx> {
        self.registration.read().as_ref().map(|r| Arc::clone(&r.mon_ctx))
    }

    pub fn mode(&self) -> CaptureMode {
        *self.pkt_capture_mode.read()
    }

    pub fn set_mode(&self, mode: CaptureMode) {
        *self.pkt_capture_mode.write() = mode;
    }

    /// Hand `frame` to the registered callback.
    ///
    /// The registration is cloned out of the lock before the call so a
    /// callback may re-register or deregister itself.
    pub fn deliver(&self, frame: CapturedFrame) -> Result<()> {
        let registration = self.registration.read().clone();
        let Some(registration) = registration else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(PktCaptureError::NoCallback);
        };

        match (registration.mon_cb)(&registration.mon_ctx, frame) {
            Ok(()) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for CallbackContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackContext")
            .field("registered", &self.is_registered())
            .field("pkt_capture_mode", &self.mode())
            .field("delivered", &self.delivered_count())
            .field("dropped", &self.dropped_count())
            .finish()
    }
}
