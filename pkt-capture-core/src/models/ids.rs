use std::fmt;

/// Identifier under which a component attaches private state to a
/// psoc or vdev object. Also used as the reference debug id when taking
/// object references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentId {
    ObjMgr,
    Mlme,
    Scan,
    PktCapture,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ObjMgr => "objmgr",
            Self::Mlme => "mlme",
            Self::Scan => "scan",
            Self::PktCapture => "pkt_capture",
        };
        f.write_str(name)
    }
}

/// Operating mode of a vdev.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpMode {
    Sta,
    Sap,
    P2pClient,
    P2pGo,
    Monitor,
    Ndi,
}

/// Allocation classes tracked by the `ResourceAllocator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    PsocPriv,
    VdevPriv,
    CallbackContext,
    MonitorContext,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PsocPriv => "psoc priv",
            Self::VdevPriv => "vdev priv",
            Self::CallbackContext => "callback context",
            Self::MonitorContext => "mon context",
        };
        f.write_str(name)
    }
}
