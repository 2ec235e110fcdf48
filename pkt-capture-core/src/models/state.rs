/// Monitor-thread resource state, as tracked by `MonitorContext`.
///
/// State transitions:
/// ```text
/// idle → allocated → running → closed
///            ↓
///          idle   (pending queue released during rollback)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    Allocated,
    Running,
    Closed,
}

impl MonitorState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
