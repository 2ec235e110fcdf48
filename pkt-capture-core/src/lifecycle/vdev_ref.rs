use std::ops::Deref;
use std::sync::Arc;

use crate::models::ids::{ComponentId, OpMode};
use crate::traits::object_manager::{PsocObject, VdevObject};

/// A vdev reference taken through the object manager.
///
/// The reference is released when the guard drops, on every exit path.
pub struct VdevRef {
    vdev: Arc<dyn VdevObject>,
    dbg_id: ComponentId,
}

impl VdevRef {
    /// First vdev of `psoc` in `opmode`, with a reference held for `dbg_id`.
    pub fn acquire_by_opmode(psoc: &dyn PsocObject, opmode: OpMode, dbg_id: ComponentId) -> Option<Self> {
        psoc.get_vdev_by_opmode(opmode, dbg_id)
            .map(|vdev| Self { vdev, dbg_id })
    }
}

impl Deref for VdevRef {
    type Target = dyn VdevObject;

    fn deref(&self) -> &Self::Target {
        self.vdev.as_ref()
    }
}

impl Drop for VdevRef {
    fn drop(&mut self) {
        self.vdev.release_ref(self.dbg_id);
    }
}
