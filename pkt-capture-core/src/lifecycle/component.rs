use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::context::callback::CallbackContext;
use crate::context::monitor::MonitorContext;
use crate::context::private::{
    as_component_priv, psoc_get_priv, vdev_get_priv, PsocPriv, VdevPriv, PKT_CAPTURE_COMP_ID,
};
use crate::lifecycle::unwind::Unwind;
use crate::models::config::PktCaptureConfig;
use crate::models::error::{PktCaptureError, Result};
use crate::models::ids::ResourceKind;
use crate::traits::allocator::{alloc_or_nomem, ResourceAllocator, SystemAllocator};
use crate::traits::lifecycle_handler::{HandlerArg, ObjectLifecycleHandler};
use crate::traits::monitor_thread::MonitorThreadFactory;
use crate::traits::object_manager::{PsocObject, VdevObject};

/// Packet capture component: psoc/vdev create and destroy handling.
///
/// Registered with the object manager as an `ObjectLifecycleHandler`.
/// Every private allocation goes through `allocator`; monitor-thread
/// resources come from `mon_factory`.
///
/// Vdev creation is staged:
/// ```text
/// vdev priv → attach → callback ctx → mon ctx → mon thread alloc → mon thread open
/// ```
/// A failing stage releases the earlier ones in reverse order before the
/// error is returned.
pub struct PktCaptureComponent {
    allocator: Arc<dyn ResourceAllocator>,
    mon_factory: Arc<dyn MonitorThreadFactory>,
}

impl PktCaptureComponent {
    pub fn new(mon_factory: Arc<dyn MonitorThreadFactory>) -> Self {
        Self::with_allocator(mon_factory, Arc::new(SystemAllocator))
    }

    pub fn with_allocator(
        mon_factory: Arc<dyn MonitorThreadFactory>,
        allocator: Arc<dyn ResourceAllocator>,
    ) -> Self {
        Self {
            allocator,
            mon_factory,
        }
    }

    /// Allocate and attach the psoc private object, then load its
    /// configuration. Leaves nothing behind on failure.
    pub fn psoc_create(&self, psoc: &Arc<dyn PsocObject>) -> Result<()> {
        alloc_or_nomem(self.allocator.as_ref(), ResourceKind::PsocPriv)?;
        let psoc_priv = Arc::new(PsocPriv::new());

        if let Err(e) = psoc.component_obj_attach(PKT_CAPTURE_COMP_ID, as_component_priv(&psoc_priv)) {
            error!("Failed to attach psoc component obj: {}", e);
            drop(psoc_priv);
            self.allocator.free(ResourceKind::PsocPriv);
            return Err(e.into());
        }

        psoc_priv.set_psoc(psoc);
        let cfg = PktCaptureConfig::load(psoc.cfg_source());
        psoc_priv.set_cfg(cfg);

        info!(
            "pkt capture psoc {} attached, mode {:?}",
            psoc.psoc_id(),
            cfg.pkt_capture_mode
        );
        Ok(())
    }

    /// Detach and free the psoc private object.
    ///
    /// A detach failure is logged and returned, but the private object is
    /// released regardless.
    pub fn psoc_destroy(&self, psoc: &Arc<dyn PsocObject>) -> Result<()> {
        let psoc_priv = psoc_get_priv(psoc.as_ref()).ok_or_else(|| {
            error!("psoc priv is NULL");
            PktCaptureError::InvalidState("psoc priv is NULL".into())
        })?;

        let status = psoc.component_obj_detach(PKT_CAPTURE_COMP_ID, &as_component_priv(&psoc_priv));
        if let Err(ref e) = status {
            error!("Failed to detach psoc component obj: {}", e);
        }

        drop(psoc_priv);
        self.allocator.free(ResourceKind::PsocPriv);
        debug!("pkt capture psoc {} released", psoc.psoc_id());

        status.map_err(Into::into)
    }

    /// Build the vdev private object and all of its sub-resources.
    pub fn vdev_create(&self, vdev: &Arc<dyn VdevObject>) -> Result<()> {
        let allocator = self.allocator.as_ref();
        let mut unwind = Unwind::new();

        alloc_or_nomem(allocator, ResourceKind::VdevPriv)?;
        let vdev_priv = Arc::new(VdevPriv::new());
        unwind.push("free vdev priv", move || allocator.free(ResourceKind::VdevPriv));

        vdev.component_obj_attach(PKT_CAPTURE_COMP_ID, as_component_priv(&vdev_priv))
            .map_err(|e| {
                error!("Failed to attach vdev component obj: {}", e);
                e
            })?;
        {
            let vdev_priv = Arc::clone(&vdev_priv);
            unwind.push("detach vdev priv", move || {
                if let Err(e) = vdev.component_obj_detach(PKT_CAPTURE_COMP_ID, &as_component_priv(&vdev_priv)) {
                    warn!("Failed to detach vdev component obj during rollback: {}", e);
                }
            });
        }

        vdev_priv.set_vdev(vdev);

        alloc_or_nomem(allocator, ResourceKind::CallbackContext).map_err(|e| {
            error!("Failed to create callback context");
            e
        })?;
        let cb_ctx = Arc::new(CallbackContext::new());
        vdev_priv.install_cb_ctx(Arc::clone(&cb_ctx));
        {
            let vdev_priv = Arc::clone(&vdev_priv);
            unwind.push("destroy callback context", move || {
                drop(vdev_priv.take_cb_ctx());
                allocator.free(ResourceKind::CallbackContext);
            });
        }

        alloc_or_nomem(allocator, ResourceKind::MonitorContext).map_err(|e| {
            error!("Failed to create mon context");
            e
        })?;
        let thread = self.mon_factory.create(vdev.vdev_id(), cb_ctx);
        vdev_priv.install_mon_ctx(MonitorContext::new(vdev.vdev_id(), thread));
        {
            let vdev_priv = Arc::clone(&vdev_priv);
            unwind.push("destroy mon context", move || {
                drop(vdev_priv.take_mon_ctx());
                allocator.free(ResourceKind::MonitorContext);
            });
        }

        with_mon_ctx(&vdev_priv, MonitorContext::alloc_mon_thread).map_err(|e| {
            error!("Failed to alloc mon thread: {}", e);
            e
        })?;
        {
            let vdev_priv = Arc::clone(&vdev_priv);
            unwind.push("free mon pkt freeq", move || {
                if let Some(mon_ctx) = vdev_priv.mon_ctx().as_mut() {
                    mon_ctx.free_mon_pkt_freeq();
                }
            });
        }

        with_mon_ctx(&vdev_priv, MonitorContext::open_mon_thread).map_err(|e| {
            error!("Failed to open mon thread: {}", e);
            e
        })?;

        unwind.commit();
        info!("pkt capture vdev {} attached", vdev.vdev_id());
        Ok(())
    }

    /// Tear down the vdev private object in reverse creation order.
    ///
    /// A detach failure is logged and returned once everything has been
    /// released.
    pub fn vdev_destroy(&self, vdev: &Arc<dyn VdevObject>) -> Result<()> {
        let vdev_priv = vdev_get_priv(vdev.as_ref()).ok_or_else(|| {
            error!("vdev priv is NULL");
            PktCaptureError::InvalidState("vdev priv is NULL".into())
        })?;

        let status = vdev.component_obj_detach(PKT_CAPTURE_COMP_ID, &as_component_priv(&vdev_priv));
        if let Err(ref e) = status {
            error!("Failed to detach vdev component obj: {}", e);
        }

        if let Some(mut mon_ctx) = vdev_priv.take_mon_ctx() {
            if let Err(e) = mon_ctx.close_mon_thread() {
                warn!("Failed to close mon thread for vdev {}: {}", vdev.vdev_id(), e);
            }
            drop(mon_ctx);
            self.allocator.free(ResourceKind::MonitorContext);
        }

        if let Some(cb_ctx) = vdev_priv.take_cb_ctx() {
            drop(cb_ctx);
            self.allocator.free(ResourceKind::CallbackContext);
        }

        drop(vdev_priv);
        self.allocator.free(ResourceKind::VdevPriv);
        debug!("pkt capture vdev {} released", vdev.vdev_id());

        status.map_err(Into::into)
    }
}

fn with_mon_ctx(vdev_priv: &VdevPriv, op: impl FnOnce(&mut MonitorContext) -> Result<()>) -> Result<()> {
    match vdev_priv.mon_ctx().as_mut() {
        Some(mon_ctx) => op(mon_ctx),
        None => Err(PktCaptureError::InvalidState("mon context is NULL".into())),
    }
}

impl ObjectLifecycleHandler for PktCaptureComponent {
    fn psoc_create_notification(&self, psoc: &Arc<dyn PsocObject>, _arg: HandlerArg<'_>) -> Result<()> {
        self.psoc_create(psoc)
    }

    fn psoc_destroy_notification(&self, psoc: &Arc<dyn PsocObject>, _arg: HandlerArg<'_>) -> Result<()> {
        self.psoc_destroy(psoc)
    }

    fn vdev_create_notification(&self, vdev: &Arc<dyn VdevObject>, _arg: HandlerArg<'_>) -> Result<()> {
        self.vdev_create(vdev)
    }

    fn vdev_destroy_notification(&self, vdev: &Arc<dyn VdevObject>, _arg: HandlerArg<'_>) -> Result<()> {
        self.vdev_destroy(vdev)
    }
}
