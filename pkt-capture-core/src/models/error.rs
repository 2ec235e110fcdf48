use thiserror::Error;

use super::ids::{ComponentId, ResourceKind};

/// Result alias used by every fallible operation of the component.
pub type Result<T> = std::result::Result<T, PktCaptureError>;

/// Errors reported by the object manager when attaching, detaching or
/// looking up component-private state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjMgrError {
    #[error("component {0} already attached")]
    AlreadyAttached(ComponentId),

    #[error("component {0} not attached")]
    NotAttached(ComponentId),

    #[error("component {0} private object does not match the attached one")]
    Mismatch(ComponentId),

    #[error("object is being deleted")]
    ObjectDeleted,

    #[error("object manager failure: {0}")]
    Failure(String),
}

/// Errors that can occur in the packet capture component.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PktCaptureError {
    /// A required object handle was absent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Private state expected by a lifecycle step was missing.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("out of memory allocating {0}")]
    OutOfMemory(ResourceKind),

    #[error(transparent)]
    ObjMgr(#[from] ObjMgrError),

    /// Failure reported by the monitor-thread subsystem.
    #[error("monitor thread: {0}")]
    MonitorThread(String),

    #[error("no callback registered")]
    NoCallback,

    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}
