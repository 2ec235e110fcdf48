//! Monitor thread: per-vdev worker that hands captured frames to the
//! registered callback.
//!
//! Frames enter through `MonThreadFactory::indicate_packet`, which takes a
//! descriptor from the vdev's free list, queues it and wakes the worker.
//! The worker delivers in batches and returns descriptors to the free list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use serde::Serialize;

use pkt_capture_core::models::error::{PktCaptureError, Result};
use pkt_capture_core::traits::monitor_thread::{MonitorThread, MonitorThreadFactory};
use pkt_capture_core::{CallbackContext, CapturedFrame, PacketQueue};

/// Packet descriptors pre-allocated per vdev.
pub const MAX_MON_PKT_SIZE: usize = 4000;

pub const MON_THREAD_NAME: &str = "pkt_capture_mon_thread";

const DELIVERY_BATCH: usize = 64;

#[derive(Default)]
struct MonPkt {
    frame: Option<CapturedFrame>,
}

struct MonQueues {
    freeq: Vec<MonPkt>,
    pending: PacketQueue<MonPkt>,
    shutdown: bool,
    no_desc_drops: u64,
}

/// Snapshot of one vdev's monitor thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonStats {
    pub running: bool,
    pub free_descriptors: usize,
    pub pending: usize,
    pub no_desc_drops: u64,
    pub delivered: u64,
    pub dropped: u64,
}

struct MonShared {
    vdev_id: u8,
    cb_ctx: Arc<CallbackContext>,
    queues: Mutex<MonQueues>,
    wake: Condvar,
    running: AtomicBool,
}

impl MonShared {
    fn indicate(&self, data: Vec<u8>) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }

        let mut queues = self.queues.lock();
        let Some(mut pkt) = queues.freeq.pop() else {
            queues.no_desc_drops += 1;
            log::debug!("vdev {}: mon pkt free queue empty, frame dropped", self.vdev_id);
            return false;
        };
        pkt.frame = Some(CapturedFrame::new(self.vdev_id, data));
        if let Some(mut evicted) = queues.pending.push(pkt) {
            evicted.frame = None;
            queues.freeq.push(evicted);
        }
        drop(queues);

        self.wake.notify_one();
        true
    }

    fn stats(&self) -> MonStats {
        let queues = self.queues.lock();
        MonStats {
            running: self.running.load(Ordering::SeqCst),
            free_descriptors: queues.freeq.len(),
            pending: queues.pending.len(),
            no_desc_drops: queues.no_desc_drops,
            delivered: self.cb_ctx.delivered_count(),
            dropped: self.cb_ctx.dropped_count(),
        }
    }
}

fn run_mon_thread(shared: Arc<MonShared>) {
    log::info!("vdev {}: monitor thread started", shared.vdev_id);

    loop {
        let batch = {
            let mut queues = shared.queues.lock();
            while queues.pending.is_empty() && !queues.shutdown {
                shared.wake.wait(&mut queues);
            }
            if queues.shutdown {
                break;
            }
            queues.pending.drain_up_to(DELIVERY_BATCH)
        };

        let mut recycled = Vec::with_capacity(batch.len());
        for mut pkt in batch {
            if let Some(frame) = pkt.frame.take() {
                if let Err(e) = shared.cb_ctx.deliver(frame) {
                    log::debug!("vdev {}: frame not delivered: {}", shared.vdev_id, e);
                }
            }
            recycled.push(pkt);
        }
        shared.queues.lock().freeq.extend(recycled);
    }

    log::info!("vdev {}: monitor thread stopped", shared.vdev_id);
}

/// Monitor thread for one vdev.
pub struct MonThread {
    shared: Arc<MonShared>,
    depth: usize,
    routed: bool,
    allocated: bool,
    handle: Option<JoinHandle<()>>,
}

impl MonitorThread for MonThread {
    fn alloc(&mut self) -> Result<()> {
        if !self.routed {
            return Err(PktCaptureError::MonitorThread(format!(
                "vdev {} already has a monitor thread",
                self.shared.vdev_id
            )));
        }
        if self.depth == 0 {
            return Err(PktCaptureError::MonitorThread(
                "mon pkt free queue depth is zero".into(),
            ));
        }

        let mut queues = self.shared.queues.lock();
        queues.freeq = (0..self.depth).map(|_| MonPkt::default()).collect();
        queues.pending = PacketQueue::new(self.depth);
        queues.shutdown = false;
        self.allocated = true;

        log::debug!("vdev {}: allocated {} mon pkt descriptors", self.shared.vdev_id, self.depth);
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        if !self.allocated {
            return Err(PktCaptureError::MonitorThread("open before alloc".into()));
        }
        if self.handle.is_some() {
            return Err(PktCaptureError::MonitorThread("already running".into()));
        }

        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(MON_THREAD_NAME.into())
            .spawn(move || run_mon_thread(shared))
            .map_err(|e| {
                self.shared.running.store(false, Ordering::SeqCst);
                log::error!("vdev {}: failed to spawn {}: {}", self.shared.vdev_id, MON_THREAD_NAME, e);
                PktCaptureError::MonitorThread(format!("failed to spawn {}: {}", MON_THREAD_NAME, e))
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.queues.lock().shutdown = true;
        self.shared.wake.notify_all();

        let joined = match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PktCaptureError::MonitorThread("monitor thread panicked".into())),
            None => Ok(()),
        };

        self.free_pkt_freeq();
        joined
    }

    fn free_pkt_freeq(&mut self) {
        let mut queues = self.shared.queues.lock();
        let flushed = queues.pending.flush().len();
        let released = queues.freeq.len() + flushed;
        queues.freeq = Vec::new();
        self.allocated = false;

        if flushed > 0 {
            log::warn!("vdev {}: {} pending frames discarded", self.shared.vdev_id, flushed);
        }
        log::debug!("vdev {}: released {} mon pkt descriptors", self.shared.vdev_id, released);
    }
}

impl Drop for MonThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.close();
        }
    }
}

/// Creates `MonThread`s and routes indicated frames to them by vdev id.
///
/// A vdev id routes to at most one live thread. A thread created while
/// another one for the same id is alive is never routed and fails `alloc`.
pub struct MonThreadFactory {
    depth: usize,
    threads: Mutex<HashMap<u8, Weak<MonShared>>>,
}

impl MonThreadFactory {
    pub fn new() -> Self {
        Self::with_queue_depth(MAX_MON_PKT_SIZE)
    }

    pub fn with_queue_depth(depth: usize) -> Self {
        Self {
            depth,
            threads: Mutex::new(HashMap::new()),
        }
    }

    /// Queue a received frame for `vdev_id`.
    ///
    /// Returns `false` if the vdev has no running monitor thread or its
    /// free list is exhausted.
    pub fn indicate_packet(&self, vdev_id: u8, data: Vec<u8>) -> bool {
        match self.shared(vdev_id) {
            Some(shared) => shared.indicate(data),
            None => false,
        }
    }

    pub fn stats(&self, vdev_id: u8) -> Option<MonStats> {
        self.shared(vdev_id).map(|shared| shared.stats())
    }

    /// Vdevs whose monitor thread is currently running.
    pub fn running_vdevs(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self
            .threads
            .lock()
            .iter()
            .filter_map(|(id, weak)| weak.upgrade().map(|shared| (*id, shared)))
            .filter(|(_, shared)| shared.running.load(Ordering::SeqCst))
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn shared(&self, vdev_id: u8) -> Option<Arc<MonShared>> {
        self.threads.lock().get(&vdev_id).and_then(Weak::upgrade)
    }
}

impl Default for MonThreadFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorThreadFactory for MonThreadFactory {
    fn create(&self, vdev_id: u8, cb_ctx: Arc<CallbackContext>) -> Box<dyn MonitorThread> {
        let shared = Arc::new(MonShared {
            vdev_id,
            cb_ctx,
            queues: Mutex::new(MonQueues {
                freeq: Vec::new(),
                pending: PacketQueue::new(0),
                shutdown: false,
                no_desc_drops: 0,
            }),
            wake: Condvar::new(),
            running: AtomicBool::new(false),
        });

        let mut threads = self.threads.lock();
        threads.retain(|_, weak| weak.strong_count() > 0);
        let routed = !threads.contains_key(&vdev_id);
        if routed {
            threads.insert(vdev_id, Arc::downgrade(&shared));
        } else {
            log::warn!("vdev {}: monitor thread already live, new thread not routed", vdev_id);
        }

        Box::new(MonThread {
            shared,
            depth: self.depth,
            routed,
            allocated: false,
            handle: None,
        })
    }
}
