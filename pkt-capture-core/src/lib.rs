//! # pkt-capture-core
//!
//! Packet capture component core.
//!
//! Hangs per-psoc and per-vdev private state off object-manager objects
//! and builds the per-vdev callback and monitor contexts with ordered
//! rollback. The object manager, the monitor thread and the configuration
//! store are reached through traits; `pkt-capture-objmgr` provides
//! in-memory implementations.
//!
//! ## Architecture
//!
//! ```text
//! pkt-capture-core (this crate)
//! ├── traits/       ← ComponentObject, PsocObject, VdevObject, MonitorThread, ResourceAllocator, ...
//! ├── models/       ← PktCaptureError, CaptureMode, PktCaptureConfig, MonitorState, CapturedFrame
//! ├── context/      ← PsocPriv, VdevPriv, CallbackContext, MonitorContext
//! ├── lifecycle/    ← PktCaptureComponent (create/destroy), accessors, unwind list, VdevRef
//! └── processing/   ← PacketQueue
//! ```

pub mod context;
pub mod lifecycle;
pub mod models;
pub mod processing;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use context::callback::{CallbackContext, MonitorCallback, MonitorCallbackCtx};
pub use context::monitor::MonitorContext;
pub use context::private::{psoc_get_priv, vdev_get_priv, PsocPriv, VdevPriv, PKT_CAPTURE_COMP_ID};
pub use lifecycle::accessors::{
    deregister_callbacks, get_mode, get_pktcap_mode, register_callbacks, set_pktcap_mode,
};
pub use lifecycle::component::PktCaptureComponent;
pub use lifecycle::unwind::Unwind;
pub use lifecycle::vdev_ref::VdevRef;
pub use models::config::{cfg_get, CfgItem, PktCaptureConfig, CFG_PKT_CAPTURE_MODE};
pub use models::error::{ObjMgrError, PktCaptureError, Result};
pub use models::frame::CapturedFrame;
pub use models::ids::{ComponentId, OpMode, ResourceKind};
pub use models::mode::CaptureMode;
pub use models::state::MonitorState;
pub use processing::pkt_queue::PacketQueue;
pub use traits::allocator::{ResourceAllocator, SystemAllocator};
pub use traits::config_source::ConfigSource;
pub use traits::lifecycle_handler::{HandlerArg, ObjectLifecycleHandler};
pub use traits::monitor_thread::{MonitorThread, MonitorThreadFactory};
pub use traits::object_manager::{ComponentObject, ComponentPriv, PsocObject, VdevObject};
