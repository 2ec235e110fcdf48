use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::context::callback::CallbackContext;
use crate::context::monitor::MonitorContext;
use crate::models::config::PktCaptureConfig;
use crate::models::ids::ComponentId;
use crate::models::mode::CaptureMode;
use crate::traits::object_manager::{ComponentObject, ComponentPriv, PsocObject, VdevObject};

/// Identifier this component attaches its private objects under.
pub const PKT_CAPTURE_COMP_ID: ComponentId = ComponentId::PktCapture;

/// Packet capture private object of a psoc.
///
/// The back-reference and configuration are written once, right after
/// the object is attached.
#[derive(Default)]
pub struct PsocPriv {
    psoc: OnceLock<Weak<dyn PsocObject>>,
    cfg_param: OnceLock<PktCaptureConfig>,
}

impl PsocPriv {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_psoc(&self, psoc: &Arc<dyn PsocObject>) {
        if self.psoc.set(Arc::downgrade(psoc)).is_err() {
            log::warn!("psoc priv back-reference already set");
        }
    }

    pub(crate) fn set_cfg(&self, cfg: PktCaptureConfig) {
        if self.cfg_param.set(cfg).is_err() {
            log::warn!("psoc priv configuration already loaded");
        }
    }

    /// The owning psoc, while it is alive.
    pub fn psoc(&self) -> Option<Arc<dyn PsocObject>> {
        self.psoc.get().and_then(Weak::upgrade)
    }

    pub fn cfg_param(&self) -> PktCaptureConfig {
        self.cfg_param.get().copied().unwrap_or_default()
    }

    pub fn pkt_capture_mode(&self) -> CaptureMode {
        self.cfg_param().pkt_capture_mode
    }
}

/// Packet capture private object of a vdev.
///
/// Owns the vdev's callback and monitor contexts exclusively. The slots
/// are filled in creation order and emptied in reverse order.
#[derive(Default)]
pub struct VdevPriv {
    vdev: OnceLock<Weak<dyn VdevObject>>,
    cb_ctx: RwLock<Option<Arc<CallbackContext>>>,
    mon_ctx: Mutex<Option<MonitorContext>>,
}

impl VdevPriv {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_vdev(&self, vdev: &Arc<dyn VdevObject>) {
        if self.vdev.set(Arc::downgrade(vdev)).is_err() {
            log::warn!("vdev priv back-reference already set");
        }
    }

    /// The owning vdev, while it is alive.
    pub fn vdev(&self) -> Option<Arc<dyn VdevObject>> {
        self.vdev.get().and_then(Weak::upgrade)
    }

    pub fn cb_ctx(&self) -> Option<Arc<CallbackContext>> {
        self.cb_ctx.read().clone()
    }

    pub(crate) fn install_cb_ctx(&self, cb_ctx: Arc<CallbackContext>) {
        *self.cb_ctx.write() = Some(cb_ctx);
    }

    pub(crate) fn take_cb_ctx(&self) -> Option<Arc<CallbackContext>> {
        self.cb_ctx.write().take()
    }

    /// Lock the monitor context slot.
    pub fn mon_ctx(&self) -> MutexGuard<'_, Option<MonitorContext>> {
        self.mon_ctx.lock()
    }

    pub(crate) fn install_mon_ctx(&self, mon_ctx: MonitorContext) {
        *self.mon_ctx.lock() = Some(mon_ctx);
    }

    pub(crate) fn take_mon_ctx(&self) -> Option<MonitorContext> {
        self.mon_ctx.lock().take()
    }

    /// Whether any sub-resource is still owned.
    pub fn has_sub_resources(&self) -> bool {
        self.cb_ctx.read().is_some() || self.mon_ctx.lock().is_some()
    }
}

fn get_priv<T, O>(obj: &O) -> Option<Arc<T>>
where
    T: Send + Sync + 'static,
    O: ComponentObject + ?Sized,
{
    obj.component_obj(PKT_CAPTURE_COMP_ID)?.downcast::<T>().ok()
}

/// Packet capture private object attached to `psoc`.
pub fn psoc_get_priv(psoc: &dyn PsocObject) -> Option<Arc<PsocPriv>> {
    get_priv(psoc)
}

/// Packet capture private object attached to `vdev`.
pub fn vdev_get_priv(vdev: &dyn VdevObject) -> Option<Arc<VdevPriv>> {
    get_priv(vdev)
}

pub(crate) fn as_component_priv<T: Send + Sync + 'static>(obj: &Arc<T>) -> ComponentPriv {
    Arc::clone(obj) as ComponentPriv
}
