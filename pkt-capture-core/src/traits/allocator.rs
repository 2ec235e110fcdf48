use crate::models::error::{PktCaptureError, Result};
use crate::models::ids::ResourceKind;

/// Accounting hook for the component's private allocations.
///
/// Every `allocate` that succeeds is matched by exactly one `free` of the
/// same kind, on teardown or during rollback.
pub trait ResourceAllocator: Send + Sync {
    /// Reserve one object of `kind`. Returns `OutOfMemory` when exhausted.
    fn allocate(&self, kind: ResourceKind) -> Result<()>;

    fn free(&self, kind: ResourceKind);
}

/// Heap-backed allocator; never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl ResourceAllocator for SystemAllocator {
    fn allocate(&self, _kind: ResourceKind) -> Result<()> {
        Ok(())
    }

    fn free(&self, _kind: ResourceKind) {}
}

/// Map a failed allocation to `OutOfMemory`, whatever the allocator reported.
pub(crate) fn alloc_or_nomem(allocator: &dyn ResourceAllocator, kind: ResourceKind) -> Result<()> {
    allocator
        .allocate(kind)
        .map_err(|_| PktCaptureError::OutOfMemory(kind))
}
