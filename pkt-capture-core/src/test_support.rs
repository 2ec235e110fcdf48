//! Mock collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::callback::CallbackContext;
use crate::models::error::{ObjMgrError, PktCaptureError, Result};
use crate::models::ids::{ComponentId, OpMode, ResourceKind};
use crate::traits::allocator::ResourceAllocator;
use crate::traits::config_source::ConfigSource;
use crate::traits::monitor_thread::{MonitorThread, MonitorThreadFactory};
use crate::traits::object_manager::{ComponentObject, ComponentPriv, PsocObject, VdevObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Alloc(ResourceKind),
    Free(ResourceKind),
    Attach,
    Detach,
    MonAlloc,
    MonOpen,
    MonClose,
    MonFreeq,
}

#[derive(Default)]
pub struct Journal(Mutex<Vec<Event>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

#[derive(Default)]
struct Components {
    map: Mutex<HashMap<ComponentId, ComponentPriv>>,
    fail_attach: AtomicBool,
    fail_detach: AtomicBool,
}

impl Components {
    fn attach(&self, journal: &Journal, id: ComponentId, obj: ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(ObjMgrError::Failure("attach rejected".into()));
        }
        let mut map = self.map.lock();
        if map.contains_key(&id) {
            return Err(ObjMgrError::AlreadyAttached(id));
        }
        map.insert(id, obj);
        journal.push(Event::Attach);
        Ok(())
    }

    fn detach(&self, journal: &Journal, id: ComponentId, obj: &ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        if self.fail_detach.load(Ordering::SeqCst) {
            return Err(ObjMgrError::Failure("detach rejected".into()));
        }
        let mut map = self.map.lock();
        match map.get(&id) {
            Some(current) if Arc::ptr_eq(current, obj) => {
                map.remove(&id);
                journal.push(Event::Detach);
                Ok(())
            }
            Some(_) => Err(ObjMgrError::Mismatch(id)),
            None => Err(ObjMgrError::NotAttached(id)),
        }
    }

    fn get(&self, id: ComponentId) -> Option<ComponentPriv> {
        self.map.lock().get(&id).cloned()
    }
}

pub struct MockVdev {
    id: u8,
    opmode: OpMode,
    journal: Arc<Journal>,
    components: Components,
    refs: AtomicI32,
}

impl MockVdev {
    pub fn new(id: u8, opmode: OpMode, journal: Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            id,
            opmode,
            journal,
            components: Components::default(),
            refs: AtomicI32::new(0),
        })
    }

    pub fn fail_attach(&self, fail: bool) {
        self.components.fail_attach.store(fail, Ordering::SeqCst);
    }

    pub fn fail_detach(&self, fail: bool) {
        self.components.fail_detach.store(fail, Ordering::SeqCst);
    }

    pub fn outstanding_refs(&self) -> i32 {
        self.refs.load(Ordering::SeqCst)
    }
}

impl ComponentObject for MockVdev {
    fn component_obj_attach(&self, id: ComponentId, obj: ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        self.components.attach(&self.journal, id, obj)
    }

    fn component_obj_detach(&self, id: ComponentId, obj: &ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        self.components.detach(&self.journal, id, obj)
    }

    fn component_obj(&self, id: ComponentId) -> Option<ComponentPriv> {
        self.components.get(id)
    }
}

impl VdevObject for MockVdev {
    fn vdev_id(&self) -> u8 {
        self.id
    }

    fn opmode(&self) -> OpMode {
        self.opmode
    }

    fn release_ref(&self, _dbg_id: ComponentId) {
        self.refs.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MockPsoc {
    journal: Arc<Journal>,
    components: Components,
    vdevs: Mutex<Vec<Arc<MockVdev>>>,
    cfg: HashMap<&'static str, u32>,
}

impl MockPsoc {
    pub fn new(cfg: HashMap<&'static str, u32>, journal: Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            journal,
            components: Components::default(),
            vdevs: Mutex::new(Vec::new()),
            cfg,
        })
    }

    pub fn add_vdev(&self, vdev: Arc<MockVdev>) {
        self.vdevs.lock().push(vdev);
    }

    pub fn fail_attach(&self, fail: bool) {
        self.components.fail_attach.store(fail, Ordering::SeqCst);
    }

    pub fn fail_detach(&self, fail: bool) {
        self.components.fail_detach.store(fail, Ordering::SeqCst);
    }
}

impl ConfigSource for MockPsoc {
    fn get_u32(&self, key: &str) -> Option<u32> {
        self.cfg.get(key).copied()
    }
}

impl ComponentObject for MockPsoc {
    fn component_obj_attach(&self, id: ComponentId, obj: ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        self.components.attach(&self.journal, id, obj)
    }

    fn component_obj_detach(&self, id: ComponentId, obj: &ComponentPriv) -> std::result::Result<(), ObjMgrError> {
        self.components.detach(&self.journal, id, obj)
    }

    fn component_obj(&self, id: ComponentId) -> Option<ComponentPriv> {
        self.components.get(id)
    }
}

impl PsocObject for MockPsoc {
    fn psoc_id(&self) -> u8 {
        0
    }

    fn get_vdev_by_opmode(&self, opmode: OpMode, _dbg_id: ComponentId) -> Option<Arc<dyn VdevObject>> {
        let vdevs = self.vdevs.lock();
        let vdev = vdevs.iter().find(|v| v.opmode == opmode)?;
        vdev.refs.fetch_add(1, Ordering::SeqCst);
        Some(Arc::clone(vdev) as Arc<dyn VdevObject>)
    }

    fn cfg_source(&self) -> &dyn ConfigSource {
        self
    }
}

/// Allocator that counts live objects per kind and can be told to fail.
pub struct CountingAllocator {
    journal: Arc<Journal>,
    live: Mutex<HashMap<ResourceKind, i64>>,
    fail_on: Mutex<Option<ResourceKind>>,
}

impl CountingAllocator {
    pub fn new(journal: Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            journal,
            live: Mutex::new(HashMap::new()),
            fail_on: Mutex::new(None),
        })
    }

    pub fn fail_on(&self, kind: Option<ResourceKind>) {
        *self.fail_on.lock() = kind;
    }

    pub fn live(&self, kind: ResourceKind) -> i64 {
        self.live.lock().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_live(&self) -> i64 {
        self.live.lock().values().sum()
    }
}

impl ResourceAllocator for CountingAllocator {
    fn allocate(&self, kind: ResourceKind) -> Result<()> {
        if *self.fail_on.lock() == Some(kind) {
            return Err(PktCaptureError::OutOfMemory(kind));
        }
        *self.live.lock().entry(kind).or_insert(0) += 1;
        self.journal.push(Event::Alloc(kind));
        Ok(())
    }

    fn free(&self, kind: ResourceKind) {
        *self.live.lock().entry(kind).or_insert(0) -= 1;
        self.journal.push(Event::Free(kind));
    }
}

/// Monitor thread that only records calls.
pub struct RecordingMonThread {
    journal: Arc<Journal>,
    fail_alloc: bool,
    fail_open: bool,
}

impl MonitorThread for RecordingMonThread {
    fn alloc(&mut self) -> Result<()> {
        if self.fail_alloc {
            return Err(PktCaptureError::MonitorThread("alloc failed".into()));
        }
        self.journal.push(Event::MonAlloc);
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        if self.fail_open {
            return Err(PktCaptureError::MonitorThread("open failed".into()));
        }
        self.journal.push(Event::MonOpen);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.journal.push(Event::MonClose);
        Ok(())
    }

    fn free_pkt_freeq(&mut self) {
        self.journal.push(Event::MonFreeq);
    }
}

pub struct RecordingMonFactory {
    journal: Arc<Journal>,
    pub fail_alloc: AtomicBool,
    pub fail_open: AtomicBool,
}

impl RecordingMonFactory {
    pub fn new(journal: Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            journal,
            fail_alloc: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
        })
    }
}

impl MonitorThreadFactory for RecordingMonFactory {
    fn create(&self, _vdev_id: u8, _cb_ctx: Arc<CallbackContext>) -> Box<dyn MonitorThread> {
        Box::new(RecordingMonThread {
            journal: Arc::clone(&self.journal),
            fail_alloc: self.fail_alloc.load(Ordering::SeqCst),
            fail_open: self.fail_open.load(Ordering::SeqCst),
        })
    }
}
