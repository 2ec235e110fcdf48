//! Callback registration and capture-mode accessors.
//!
//! Object handles are optional so callers can pass through whatever the
//! object manager handed them. Mode getters never fail: anything that
//! cannot be resolved reads as `CaptureMode::Disabled`.

use log::error;

use crate::context::callback::{MonitorCallback, MonitorCallbackCtx};
use crate::context::private::{psoc_get_priv, vdev_get_priv, PKT_CAPTURE_COMP_ID};
use crate::lifecycle::vdev_ref::VdevRef;
use crate::models::error::{PktCaptureError, Result};
use crate::models::ids::OpMode;
use crate::models::mode::CaptureMode;
use crate::traits::object_manager::{PsocObject, VdevObject};

/// Mode loaded from configuration when `psoc` was created.
pub fn get_mode(psoc: Option<&dyn PsocObject>) -> CaptureMode {
    let Some(psoc) = psoc else {
        error!("psoc is NULL");
        return CaptureMode::Disabled;
    };
    match psoc_get_priv(psoc) {
        Some(psoc_priv) => psoc_priv.pkt_capture_mode(),
        None => {
            error!("psoc_priv is NULL");
            CaptureMode::Disabled
        }
    }
}

/// Register the frame delivery callback for `vdev`, replacing any
/// earlier registration.
pub fn register_callbacks(
    vdev: Option<&dyn VdevObject>,
    mon_cb: MonitorCallback,
    context: MonitorCallbackCtx,
) -> Result<()> {
    let vdev = vdev.ok_or_else(|| {
        error!("vdev is NULL");
        PktCaptureError::InvalidArgument("vdev is NULL".into())
    })?;
    let cb_ctx = vdev_get_priv(vdev)
        .and_then(|vdev_priv| vdev_priv.cb_ctx())
        .ok_or_else(|| {
            error!("vdev priv is NULL");
            PktCaptureError::InvalidArgument("vdev priv is NULL".into())
        })?;

    cb_ctx.register(mon_cb, context);
    Ok(())
}

/// Clear the callback registered for `vdev`. The active mode is kept.
pub fn deregister_callbacks(vdev: Option<&dyn VdevObject>) -> Result<()> {
    let vdev = vdev.ok_or_else(|| {
        error!("vdev is NULL");
        PktCaptureError::InvalidArgument("vdev is NULL".into())
    })?;
    let cb_ctx = vdev_get_priv(vdev)
        .and_then(|vdev_priv| vdev_priv.cb_ctx())
        .ok_or_else(|| {
            error!("vdev priv is NULL");
            PktCaptureError::InvalidArgument("vdev priv is NULL".into())
        })?;

    cb_ctx.deregister();
    Ok(())
}

/// Set the active capture mode on the psoc's STA vdev.
pub fn set_pktcap_mode(psoc: Option<&dyn PsocObject>, mode: CaptureMode) {
    let Some(psoc) = psoc else {
        error!("psoc is NULL");
        return;
    };
    let Some(vdev) = VdevRef::acquire_by_opmode(psoc, OpMode::Sta, PKT_CAPTURE_COMP_ID) else {
        error!("vdev is NULL");
        return;
    };

    match vdev_get_priv(&*vdev).and_then(|vdev_priv| vdev_priv.cb_ctx()) {
        Some(cb_ctx) => cb_ctx.set_mode(mode),
        None => error!("vdev_priv is NULL"),
    }
}

/// Active capture mode of the psoc's STA vdev.
pub fn get_pktcap_mode(psoc: Option<&dyn PsocObject>) -> CaptureMode {
    let Some(psoc) = psoc else {
        error!("psoc is NULL");
        return CaptureMode::Disabled;
    };
    let Some(vdev) = VdevRef::acquire_by_opmode(psoc, OpMode::Sta, PKT_CAPTURE_COMP_ID) else {
        error!("vdev is NULL");
        return CaptureMode::Disabled;
    };

    match vdev_get_priv(&*vdev).and_then(|vdev_priv| vdev_priv.cb_ctx()) {
        Some(cb_ctx) => cb_ctx.mode(),
        None => {
            error!("vdev_priv is NULL");
            CaptureMode::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::context::callback::MonitorCallbackCtx;
    use crate::lifecycle::component::PktCaptureComponent;
    use crate::models::frame::CapturedFrame;
    use crate::test_support::{Journal, MockPsoc, MockVdev, RecordingMonFactory};

    fn noop_callback() -> MonitorCallback {
        Arc::new(|_: &MonitorCallbackCtx, _: CapturedFrame| -> Result<()> { Ok(()) })
    }

    struct Setup {
        psoc: Arc<MockPsoc>,
        sta: Arc<MockVdev>,
        _component: PktCaptureComponent,
    }

    impl Setup {
        fn psoc(&self) -> Option<&dyn PsocObject> {
            Some(&*self.psoc as &dyn PsocObject)
        }

        fn sta(&self) -> Option<&dyn VdevObject> {
            Some(&*self.sta as &dyn VdevObject)
        }
    }

    /// Psoc configured for mgmt-only capture with one STA vdev.
    fn setup_with_sta(create_sta_priv: bool) -> Setup {
        let journal = Arc::new(Journal::default());
        let psoc = MockPsoc::new(HashMap::from([("packet_capture_mode", 1)]), Arc::clone(&journal));
        let sta = MockVdev::new(0, OpMode::Sta, Arc::clone(&journal));
        psoc.add_vdev(Arc::clone(&sta));

        let component = PktCaptureComponent::new(RecordingMonFactory::new(journal));
        let psoc_obj: Arc<dyn PsocObject> = psoc.clone();
        component.psoc_create(&psoc_obj).unwrap();
        if create_sta_priv {
            let vdev_obj: Arc<dyn VdevObject> = sta.clone();
            component.vdev_create(&vdev_obj).unwrap();
        }
        Setup {
            psoc,
            sta,
            _component: component,
        }
    }

    #[test]
    fn get_mode_without_psoc_or_priv_is_disabled() {
        assert_eq!(get_mode(None), CaptureMode::Disabled);

        let psoc = MockPsoc::new(HashMap::from([("packet_capture_mode", 3)]), Arc::new(Journal::default()));
        let psoc: &dyn PsocObject = &*psoc;
        assert_eq!(get_mode(Some(psoc)), CaptureMode::Disabled);
    }

    #[test]
    fn register_requires_vdev_and_priv() {
        assert!(matches!(
            register_callbacks(None, noop_callback(), Arc::new(())),
            Err(PktCaptureError::InvalidArgument(_))
        ));

        let bare = MockVdev::new(4, OpMode::Sta, Arc::new(Journal::default()));
        let bare: &dyn VdevObject = &*bare;
        assert!(matches!(
            register_callbacks(Some(bare), noop_callback(), Arc::new(())),
            Err(PktCaptureError::InvalidArgument(_))
        ));
        assert!(matches!(
            deregister_callbacks(Some(bare)),
            Err(PktCaptureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn register_then_deregister_clears_pair_keeps_mode() {
        let s = setup_with_sta(true);
        set_pktcap_mode(s.psoc(), CaptureMode::DataMgmt);

        register_callbacks(s.sta(), noop_callback(), Arc::new(5u8)).unwrap();
        let cb_ctx = vdev_get_priv(&*s.sta).unwrap().cb_ctx().unwrap();
        assert!(cb_ctx.is_registered());

        deregister_callbacks(s.sta()).unwrap();

        assert!(!cb_ctx.is_registered());
        assert!(cb_ctx.mon_ctx().is_none());
        assert_eq!(get_pktcap_mode(s.psoc()), CaptureMode::DataMgmt);
    }

    #[test]
    fn set_then_get_active_mode() {
        let s = setup_with_sta(true);
        assert_eq!(get_pktcap_mode(s.psoc()), CaptureMode::Disabled);

        set_pktcap_mode(s.psoc(), CaptureMode::DataOnly);

        assert_eq!(get_pktcap_mode(s.psoc()), CaptureMode::DataOnly);
        assert_eq!(get_mode(s.psoc()), CaptureMode::MgmtOnly);
        assert_eq!(s.sta.outstanding_refs(), 0);
    }

    #[test]
    fn sta_vdev_without_priv_reads_disabled_and_releases_ref() {
        let s = setup_with_sta(false);

        set_pktcap_mode(s.psoc(), CaptureMode::DataOnly);
        assert_eq!(get_pktcap_mode(s.psoc()), CaptureMode::Disabled);
        assert_eq!(s.sta.outstanding_refs(), 0);
    }

    #[test]
    fn no_sta_vdev_reads_disabled() {
        let journal = Arc::new(Journal::default());
        let psoc = MockPsoc::new(HashMap::new(), Arc::clone(&journal));
        psoc.add_vdev(MockVdev::new(2, OpMode::Sap, journal));
        let psoc: &dyn PsocObject = &*psoc;

        set_pktcap_mode(Some(psoc), CaptureMode::DataOnly);
        assert_eq!(get_pktcap_mode(Some(psoc)), CaptureMode::Disabled);
        assert_eq!(get_pktcap_mode(None), CaptureMode::Disabled);
    }
}
