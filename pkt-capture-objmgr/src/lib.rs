//! # pkt-capture-objmgr
//!
//! In-memory object manager and monitor-thread backend for
//! pkt-capture-core.
//!
//! Provides:
//! - `ObjMgr`: owns psocs and vdevs, dispatches lifecycle notifications
//! - `Psoc` / `Vdev`: object-manager objects with a tagged component map
//! - `CfgStore`: JSON-backed platform configuration
//! - `MonThreadFactory`: per-vdev monitor threads fed by `indicate_packet`
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use pkt_capture_core::{ComponentId, OpMode, PktCaptureComponent};
//! use pkt_capture_objmgr::{CfgStore, MonThreadFactory, ObjMgr};
//!
//! let factory = Arc::new(MonThreadFactory::new());
//! let mgr = ObjMgr::new();
//! mgr.register_handler(ComponentId::PktCapture, Arc::new(PktCaptureComponent::new(factory.clone())))?;
//! mgr.create_psoc(0, CfgStore::from_file("wlan.json".as_ref())?)?;
//! mgr.create_vdev(0, 0, OpMode::Sta)?;
//! ```

pub mod cfg_store;
pub mod component_map;
pub mod mon_thread;
pub mod objmgr;
pub mod psoc;
pub mod vdev;

pub use cfg_store::{CfgError, CfgStore};
pub use component_map::ComponentMap;
pub use mon_thread::{MonStats, MonThread, MonThreadFactory, MAX_MON_PKT_SIZE, MON_THREAD_NAME};
pub use objmgr::ObjMgr;
pub use psoc::Psoc;
pub use vdev::Vdev;
