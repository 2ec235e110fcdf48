use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use pkt_capture_core::models::error::ObjMgrError;
use pkt_capture_core::models::ids::{ComponentId, OpMode};
use pkt_capture_core::traits::object_manager::{ComponentObject, ComponentPriv, VdevObject};

use crate::component_map::ComponentMap;

/// In-memory vdev object.
///
/// References are counted per debug id so a leaked reference can be
/// traced back to the component that took it.
pub struct Vdev {
    id: u8,
    opmode: OpMode,
    components: ComponentMap,
    refs: Mutex<HashMap<ComponentId, u32>>,
}

impl Vdev {
    pub fn new(id: u8, opmode: OpMode) -> Arc<Self> {
        Arc::new(Self {
            id,
            opmode,
            components: ComponentMap::new(),
            refs: Mutex::new(HashMap::new()),
        })
    }

    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Take a reference on behalf of `dbg_id`.
    pub fn get_ref(&self, dbg_id: ComponentId) {
        *self.refs.lock().entry(dbg_id).or_insert(0) += 1;
    }

    pub fn ref_count(&self, dbg_id: ComponentId) -> u32 {
        self.refs.lock().get(&dbg_id).copied().unwrap_or(0)
    }

    pub fn total_refs(&self) -> u32 {
        self.refs.lock().values().sum()
    }
}

impl ComponentObject for Vdev {
    fn component_obj_attach(&self, id: ComponentId, obj: ComponentPriv) -> Result<(), ObjMgrError> {
        self.components.attach(id, obj)
    }

    fn component_obj_detach(&self, id: ComponentId, obj: &ComponentPriv) -> Result<(), ObjMgrError> {
        self.components.detach(id, obj)
    }

    fn component_obj(&self, id: ComponentId) -> Option<ComponentPriv> {
        self.components.get(id)
    }
}

impl VdevObject for Vdev {
    fn vdev_id(&self) -> u8 {
        self.id
    }

    fn opmode(&self) -> OpMode {
        self.opmode
    }

    fn release_ref(&self, dbg_id: ComponentId) {
        let mut refs = self.refs.lock();
        match refs.get_mut(&dbg_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    refs.remove(&dbg_id);
                }
            }
            _ => log::error!("vdev {}: {} released a reference it does not hold", self.id, dbg_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_are_counted_per_dbg_id() {
        let vdev = Vdev::new(0, OpMode::Sta);
        vdev.get_ref(ComponentId::PktCapture);
        vdev.get_ref(ComponentId::PktCapture);
        vdev.get_ref(ComponentId::Scan);

        assert_eq!(vdev.ref_count(ComponentId::PktCapture), 2);
        vdev.release_ref(ComponentId::PktCapture);
        vdev.release_ref(ComponentId::Scan);

        assert_eq!(vdev.ref_count(ComponentId::PktCapture), 1);
        assert_eq!(vdev.total_refs(), 1);
    }

    #[test]
    fn unbalanced_release_is_ignored() {
        let vdev = Vdev::new(0, OpMode::Sap);
        vdev.release_ref(ComponentId::PktCapture);

        assert_eq!(vdev.total_refs(), 0);
    }
}
