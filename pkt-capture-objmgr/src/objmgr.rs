use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use pkt_capture_core::models::error::{ObjMgrError, PktCaptureError, Result};
use pkt_capture_core::models::ids::{ComponentId, OpMode};
use pkt_capture_core::traits::lifecycle_handler::ObjectLifecycleHandler;
use pkt_capture_core::traits::object_manager::{PsocObject, VdevObject};

use crate::cfg_store::CfgStore;
use crate::psoc::Psoc;
use crate::vdev::Vdev;

type Handler = (ComponentId, Arc<dyn ObjectLifecycleHandler>);

/// Object manager: owns psocs and their vdevs and dispatches lifecycle
/// notifications to registered components.
///
/// Create notifications run in registration order, destroy notifications
/// in reverse. If a create handler fails, the handlers that already ran
/// get their destroy notification and the object is not created.
///
/// Create and delete operations are serialised, so a component never sees
/// two lifecycle events at once. Vdev ids are unique across all psocs.
#[derive(Default)]
pub struct ObjMgr {
    handlers: RwLock<Vec<Handler>>,
    psocs: RwLock<HashMap<u8, Arc<Psoc>>>,
    lifecycle: Mutex<()>,
}

impl ObjMgr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_handler(&self, id: ComponentId, handler: Arc<dyn ObjectLifecycleHandler>) -> Result<()> {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|(existing, _)| *existing == id) {
            return Err(ObjMgrError::AlreadyAttached(id).into());
        }
        handlers.push((id, handler));
        log::info!("registered lifecycle handler for {}", id);
        Ok(())
    }

    pub fn unregister_handler(&self, id: ComponentId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        before != handlers.len()
    }

    pub fn handler_ids(&self) -> Vec<ComponentId> {
        self.handlers.read().iter().map(|(id, _)| *id).collect()
    }

    pub fn psoc(&self, psoc_id: u8) -> Option<Arc<Psoc>> {
        self.psocs.read().get(&psoc_id).cloned()
    }

    pub fn psoc_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.psocs.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn create_psoc(&self, psoc_id: u8, cfg: CfgStore) -> Result<Arc<Psoc>> {
        let _serial = self.lifecycle.lock();
        if self.psocs.read().contains_key(&psoc_id) {
            return Err(PktCaptureError::InvalidArgument(format!("psoc {} already exists", psoc_id)));
        }

        let psoc = Psoc::new(psoc_id, cfg);
        let obj: Arc<dyn PsocObject> = psoc.clone();
        notify_create(
            &self.handlers_snapshot(),
            &obj,
            |h, o| h.psoc_create_notification(o, None),
            |h, o| h.psoc_destroy_notification(o, None),
        )
        .map_err(|e| {
            log::error!("psoc {} create failed: {}", psoc_id, e);
            e
        })?;

        self.psocs.write().insert(psoc_id, Arc::clone(&psoc));
        log::info!("psoc {} created", psoc_id);
        Ok(psoc)
    }

    /// Delete a psoc, deleting its remaining vdevs first.
    ///
    /// Every destroy notification runs; the first failure is returned.
    pub fn delete_psoc(&self, psoc_id: u8) -> Result<()> {
        let _serial = self.lifecycle.lock();
        let psoc = self.psoc(psoc_id).ok_or_else(|| no_such_psoc(psoc_id))?;

        let mut status = Ok(());
        for vdev_id in psoc.vdev_ids() {
            keep_first_err(&mut status, self.remove_vdev(&psoc, vdev_id));
        }

        psoc.components().mark_deleting();
        let obj: Arc<dyn PsocObject> = psoc.clone();
        keep_first_err(
            &mut status,
            notify_destroy(&self.handlers_snapshot(), &obj, |h, o| h.psoc_destroy_notification(o, None)),
        );

        self.psocs.write().remove(&psoc_id);
        if !psoc.components().is_empty() {
            log::warn!("psoc {} deleted with components still attached: {:?}", psoc_id, psoc.components().attached_ids());
        }
        log::info!("psoc {} deleted", psoc_id);
        status
    }

    pub fn create_vdev(&self, psoc_id: u8, vdev_id: u8, opmode: OpMode) -> Result<Arc<Vdev>> {
        let _serial = self.lifecycle.lock();
        let psoc = self.psoc(psoc_id).ok_or_else(|| no_such_psoc(psoc_id))?;
        if let Some(owner) = self.vdev_owner(vdev_id) {
            return Err(PktCaptureError::InvalidArgument(format!(
                "vdev {} already exists on psoc {}",
                vdev_id, owner
            )));
        }

        let vdev = Vdev::new(vdev_id, opmode);
        let obj: Arc<dyn VdevObject> = vdev.clone();
        notify_create(
            &self.handlers_snapshot(),
            &obj,
            |h, o| h.vdev_create_notification(o, None),
            |h, o| h.vdev_destroy_notification(o, None),
        )
        .map_err(|e| {
            log::error!("vdev {} create failed: {}", vdev_id, e);
            e
        })?;

        psoc.add_vdev(Arc::clone(&vdev));
        log::info!("vdev {} ({:?}) created on psoc {}", vdev_id, opmode, psoc_id);
        Ok(vdev)
    }

    pub fn delete_vdev(&self, psoc_id: u8, vdev_id: u8) -> Result<()> {
        let _serial = self.lifecycle.lock();
        let psoc = self.psoc(psoc_id).ok_or_else(|| no_such_psoc(psoc_id))?;
        self.remove_vdev(&psoc, vdev_id)
    }

    fn remove_vdev(&self, psoc: &Psoc, vdev_id: u8) -> Result<()> {
        let vdev = psoc.remove_vdev(vdev_id).ok_or_else(|| {
            PktCaptureError::InvalidArgument(format!("no vdev {} on psoc {}", vdev_id, psoc.psoc_id()))
        })?;

        vdev.components().mark_deleting();
        let obj: Arc<dyn VdevObject> = vdev.clone();
        let status = notify_destroy(&self.handlers_snapshot(), &obj, |h, o| h.vdev_destroy_notification(o, None));

        if vdev.total_refs() > 0 {
            log::warn!("vdev {} deleted with {} references outstanding", vdev_id, vdev.total_refs());
        }
        log::info!("vdev {} deleted", vdev_id);
        status
    }

    fn vdev_owner(&self, vdev_id: u8) -> Option<u8> {
        self.psocs
            .read()
            .values()
            .find(|psoc| psoc.vdev(vdev_id).is_some())
            .map(|psoc| psoc.psoc_id())
    }

    fn handlers_snapshot(&self) -> Vec<Handler> {
        self.handlers.read().clone()
    }
}

fn no_such_psoc(psoc_id: u8) -> PktCaptureError {
    PktCaptureError::InvalidArgument(format!("no psoc {}", psoc_id))
}

fn keep_first_err(status: &mut Result<()>, next: Result<()>) {
    if status.is_ok() {
        *status = next;
    }
}

fn notify_create<O: ?Sized>(
    handlers: &[Handler],
    obj: &Arc<O>,
    create: impl Fn(&dyn ObjectLifecycleHandler, &Arc<O>) -> Result<()>,
    destroy: impl Fn(&dyn ObjectLifecycleHandler, &Arc<O>) -> Result<()>,
) -> Result<()> {
    for (index, (id, handler)) in handlers.iter().enumerate() {
        if let Err(e) = create(handler.as_ref(), obj) {
            log::error!("{} create notification failed: {}", id, e);
            for (done_id, done) in handlers[..index].iter().rev() {
                if let Err(e) = destroy(done.as_ref(), obj) {
                    log::warn!("{} destroy notification failed during unwind: {}", done_id, e);
                }
            }
            return Err(e);
        }
    }
    Ok(())
}

fn notify_destroy<O: ?Sized>(
    handlers: &[Handler],
    obj: &Arc<O>,
    destroy: impl Fn(&dyn ObjectLifecycleHandler, &Arc<O>) -> Result<()>,
) -> Result<()> {
    let mut status = Ok(());
    for (id, handler) in handlers.iter().rev() {
        let next = destroy(handler.as_ref(), obj);
        if let Err(e) = &next {
            log::error!("{} destroy notification failed: {}", id, e);
        }
        keep_first_err(&mut status, next);
    }
    status
}
