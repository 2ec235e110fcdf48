use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use pkt_capture_core::models::error::ObjMgrError;
use pkt_capture_core::models::ids::ComponentId;
use pkt_capture_core::traits::object_manager::ComponentPriv;

/// Tagged map from component id to the private object that component
/// attached. Embedded in every psoc and vdev.
#[derive(Default)]
pub struct ComponentMap {
    entries: RwLock<HashMap<ComponentId, ComponentPriv>>,
    deleting: AtomicBool,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, id: ComponentId, obj: ComponentPriv) -> Result<(), ObjMgrError> {
        if self.deleting.load(Ordering::SeqCst) {
            return Err(ObjMgrError::ObjectDeleted);
        }
        let mut entries = self.entries.write();
        if entries.contains_key(&id) {
            return Err(ObjMgrError::AlreadyAttached(id));
        }
        entries.insert(id, obj);
        log::debug!("component {} attached", id);
        Ok(())
    }

    /// Remove the object attached under `id`; it must be `obj` itself.
    pub fn detach(&self, id: ComponentId, obj: &ComponentPriv) -> Result<(), ObjMgrError> {
        let mut entries = self.entries.write();
        match entries.get(&id) {
            Some(current) if Arc::ptr_eq(current, obj) => {
                entries.remove(&id);
                log::debug!("component {} detached", id);
                Ok(())
            }
            Some(_) => Err(ObjMgrError::Mismatch(id)),
            None => Err(ObjMgrError::NotAttached(id)),
        }
    }

    pub fn get(&self, id: ComponentId) -> Option<ComponentPriv> {
        self.entries.read().get(&id).cloned()
    }

    /// Reject further attaches; existing entries can still be detached.
    pub fn mark_deleting(&self) {
        self.deleting.store(true, Ordering::SeqCst);
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }

    pub fn attached_ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.entries.read().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
