//! Application messages carried by the queue.

/// Message kinds understood by the dispatch worker.
///
/// Raw values outside the known set decode to [`MessageKind::Unrecognized`]
/// so that newer producers never crash an older worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Start the HTTP frontend. The worker sends this to itself after bring-up.
    BringUpHttpFrontend,
    /// The frontend asked for a station connection.
    StationConnectRequested,
    /// The station interface received an address.
    StationGotAddress,
    /// A raw kind this build does not know.
    Unrecognized(u8),
}

impl MessageKind {
    /// Decode a raw discriminant.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::BringUpHttpFrontend,
            1 => Self::StationConnectRequested,
            2 => Self::StationGotAddress,
            other => Self::Unrecognized(other),
        }
    }

    /// Raw discriminant.
    pub const fn raw(self) -> u8 {
        match self {
            Self::BringUpHttpFrontend => 0,
            Self::StationConnectRequested => 1,
            Self::StationGotAddress => 2,
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Log name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BringUpHttpFrontend => "BRING_UP_HTTP_FRONTEND",
            Self::StationConnectRequested => "STATION_CONNECT_REQUESTED",
            Self::StationGotAddress => "STATION_GOT_ADDRESS",
            Self::Unrecognized(_) => "UNRECOGNIZED",
        }
    }
}

/// One unit of work on the queue. Copied in by value, consumed by the worker.
///
/// `kind` stays the first field; a payload may be appended later.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppMessage {
    /// What the worker should do.
    pub kind: MessageKind,
}

impl AppMessage {
    /// Wrap a kind.
    pub const fn new(kind: MessageKind) -> Self {
        Self { kind }
    }
}

impl From<MessageKind> for AppMessage {
    fn from(kind: MessageKind) -> Self {
        Self::new(kind)
    }
}
