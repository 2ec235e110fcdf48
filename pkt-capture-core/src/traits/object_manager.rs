use std::any::Any;
use std::sync::Arc;

use crate::models::error::ObjMgrError;
use crate::models::ids::{ComponentId, OpMode};
use crate::traits::config_source::ConfigSource;

/// Opaque component-private object as stored by the object manager.
pub type ComponentPriv = Arc<dyn Any + Send + Sync>;

/// An object-manager object that components can hang private state on.
///
/// Implementations keep a tagged map from `ComponentId` to the attached
/// handle; at most one handle per id.
pub trait ComponentObject: Send + Sync {
    /// Attach `obj` under `id`. Fails if something is already attached.
    fn component_obj_attach(&self, id: ComponentId, obj: ComponentPriv) -> Result<(), ObjMgrError>;

    /// Detach `obj` from `id`. Fails if nothing, or a different object, is attached.
    fn component_obj_detach(&self, id: ComponentId, obj: &ComponentPriv) -> Result<(), ObjMgrError>;

    /// The handle currently attached under `id`.
    fn component_obj(&self, id: ComponentId) -> Option<ComponentPriv>;
}

/// A vdev (network device object).
pub trait VdevObject: ComponentObject {
    fn vdev_id(&self) -> u8;

    fn opmode(&self) -> OpMode;

    /// Drop a reference previously taken on behalf of `dbg_id`.
    fn release_ref(&self, dbg_id: ComponentId);
}

/// A psoc (device controller object).
pub trait PsocObject: ComponentObject {
    fn psoc_id(&self) -> u8;

    /// Find the first vdev in `opmode`, taking a reference on behalf of
    /// `dbg_id`. The caller must call `VdevObject::release_ref`; prefer
    /// `VdevRef::acquire_by_opmode` which does so on drop.
    fn get_vdev_by_opmode(&self, opmode: OpMode, dbg_id: ComponentId) -> Option<Arc<dyn VdevObject>>;

    /// Configuration store backing this psoc.
    fn cfg_source(&self) -> &dyn ConfigSource;
}
