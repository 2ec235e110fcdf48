use std::sync::Arc;

use parking_lot::RwLock;

use pkt_capture_core::models::error::ObjMgrError;
use pkt_capture_core::models::ids::{ComponentId, OpMode};
use pkt_capture_core::traits::config_source::ConfigSource;
use pkt_capture_core::traits::object_manager::{ComponentObject, ComponentPriv, PsocObject, VdevObject};

use crate::cfg_store::CfgStore;
use crate::component_map::ComponentMap;
use crate::vdev::Vdev;

/// In-memory psoc object owning its vdev list and config store.
pub struct Psoc {
    id: u8,
    components: ComponentMap,
    vdevs: RwLock<Vec<Arc<Vdev>>>,
    cfg: CfgStore,
}

impl Psoc {
    pub fn new(id: u8, cfg: CfgStore) -> Arc<Self> {
        Arc::new(Self {
            id,
            components: ComponentMap::new(),
            vdevs: RwLock::new(Vec::new()),
            cfg,
        })
    }

    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    pub fn cfg(&self) -> &CfgStore {
        &self.cfg
    }

    pub fn vdev(&self, vdev_id: u8) -> Option<Arc<Vdev>> {
        self.vdevs
            .read()
            .iter()
            .find(|vdev| vdev.vdev_id() == vdev_id)
            .cloned()
    }

    pub fn vdev_ids(&self) -> Vec<u8> {
        self.vdevs.read().iter().map(|vdev| vdev.vdev_id()).collect()
    }

    pub fn vdev_count(&self) -> usize {
        self.vdevs.read().len()
    }

    pub(crate) fn add_vdev(&self, vdev: Arc<Vdev>) {
        self.vdevs.write().push(vdev);
    }

    pub(crate) fn remove_vdev(&self, vdev_id: u8) -> Option<Arc<Vdev>> {
        let mut vdevs = self.vdevs.write();
        let index = vdevs.iter().position(|vdev| vdev.vdev_id() == vdev_id)?;
        Some(vdevs.remove(index))
    }
}

impl ComponentObject for Psoc {
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

impl PsocObject for Psoc {
    fn psoc_id(&self) -> u8 {
        self.id
    }

    fn get_vdev_by_opmode(&self, opmode: OpMode, dbg_id: ComponentId) -> Option<Arc<dyn VdevObject>> {
        let vdevs = self.vdevs.read();
        let vdev = vdevs.iter().find(|vdev| vdev.opmode() == opmode)?;
        vdev.get_ref(dbg_id);
        let vdev: Arc<dyn VdevObject> = vdev.clone();
        Some(vdev)
    }

    fn cfg_source(&self) -> &dyn ConfigSource {
        &self.cfg
    }
}
