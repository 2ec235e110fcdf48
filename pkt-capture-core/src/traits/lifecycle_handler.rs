use std::any::Any;
use std::sync::Arc;

use crate::models::error::Result;
use crate::traits::object_manager::{PsocObject, VdevObject};

/// Unused generic argument passed through by the object manager.
pub type HandlerArg<'a> = Option<&'a (dyn Any + Send + Sync)>;

/// Object create/destroy notifications a component registers with the
/// object manager.
///
/// Called synchronously on the dispatching thread; the object manager
/// never runs two notifications for the same object concurrently.
pub trait ObjectLifecycleHandler: Send + Sync {
    fn psoc_create_notification(&self, psoc: &Arc<dyn PsocObject>, arg: HandlerArg<'_>) -> Result<()>;

    fn psoc_destroy_notification(&self, psoc: &Arc<dyn PsocObject>, arg: HandlerArg<'_>) -> Result<()>;

    fn vdev_create_notification(&self, vdev: &Arc<dyn VdevObject>, arg: HandlerArg<'_>) -> Result<()>;

    fn vdev_destroy_notification(&self, vdev: &Arc<dyn VdevObject>, arg: HandlerArg<'_>) -> Result<()>;
}
