pub mod accessors;
pub mod component;
pub mod unwind;
pub mod vdev_ref;
