//! Radio and IP event subscription.
//!
//! Events reach the application as raw `(family, id)` pairs on whatever
//! context the radio stack delivers them from. [`EventSource`] is the narrow
//! capability the worker needs from that stack: make sure an event loop exists,
//! then route one family to an [`EventSink`].

use log::debug;

use crate::error::SubscribeError;

/// A named category of asynchronous notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventFamily(&'static str);

impl EventFamily {
    /// Radio lifecycle events
    pub const WIFI: Self = Self("WIFI_EVENT");
    /// Address assignment events
    pub const IP: Self = Self("IP_EVENT");

    /// A family by name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Family name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

/// Radio lifecycle identifiers, numbered as the radio stack numbers them.
pub mod wifi_id {
    /// Station started
    pub const STA_START: i32 = 2;
    /// Station associated with the upstream network
    pub const STA_CONNECTED: i32 = 4;
    /// Station lost the upstream network
    pub const STA_DISCONNECTED: i32 = 5;
    /// Soft-AP started
    pub const AP_START: i32 = 12;
    /// Soft-AP stopped
    pub const AP_STOP: i32 = 13;
    /// A peer joined the soft-AP
    pub const AP_STACONNECTED: i32 = 14;
    /// A peer left the soft-AP
    pub const AP_STADISCONNECTED: i32 = 15;
}

/// Address assignment identifiers.
pub mod ip_id {
    /// Station received an address
    pub const STA_GOT_IP: i32 = 0;
}

/// Every event the application recognises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioEvent {
    /// Soft-AP started
    ApStarted,
    /// Soft-AP stopped
    ApStopped,
    /// A peer joined the soft-AP
    PeerJoinedAp,
    /// A peer left the soft-AP
    PeerLeftAp,
    /// Station started
    StationStarted,
    /// Station connected upstream
    StationConnected,
    /// Station disconnected from upstream
    StationDisconnected,
    /// Station received an address
    StationGotAddress,
}

impl RadioEvent {
    /// Decode a raw pair. Unknown families and identifiers yield `None`.
    pub fn decode(family: EventFamily, id: i32) -> Option<Self> {
        if family == EventFamily::WIFI {
            match id {
                wifi_id::AP_START => Some(Self::ApStarted),
                wifi_id::AP_STOP => Some(Self::ApStopped),
                wifi_id::AP_STACONNECTED => Some(Self::PeerJoinedAp),
                wifi_id::AP_STADISCONNECTED => Some(Self::PeerLeftAp),
                wifi_id::STA_START => Some(Self::StationStarted),
                wifi_id::STA_CONNECTED => Some(Self::StationConnected),
                wifi_id::STA_DISCONNECTED => Some(Self::StationDisconnected),
                _ => None,
            }
        } else if family == EventFamily::IP {
            match id {
                ip_id::STA_GOT_IP => Some(Self::StationGotAddress),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Family and raw identifier of this event.
    pub const fn raw(self) -> (EventFamily, i32) {
        match self {
            Self::ApStarted => (EventFamily::WIFI, wifi_id::AP_START),
            Self::ApStopped => (EventFamily::WIFI, wifi_id::AP_STOP),
            Self::PeerJoinedAp => (EventFamily::WIFI, wifi_id::AP_STACONNECTED),
            Self::PeerLeftAp => (EventFamily::WIFI, wifi_id::AP_STADISCONNECTED),
            Self::StationStarted => (EventFamily::WIFI, wifi_id::STA_START),
            Self::StationConnected => (EventFamily::WIFI, wifi_id::STA_CONNECTED),
            Self::StationDisconnected => (EventFamily::WIFI, wifi_id::STA_DISCONNECTED),
            Self::StationGotAddress => (EventFamily::IP, ip_id::STA_GOT_IP),
        }
    }

    /// Log name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ApStarted => "WIFI_EVENT_AP_START",
            Self::ApStopped => "WIFI_EVENT_AP_STOP",
            Self::PeerJoinedAp => "WIFI_EVENT_AP_STACONNECTED",
            Self::PeerLeftAp => "WIFI_EVENT_AP_STADISCONNECTED",
            Self::StationStarted => "WIFI_EVENT_STA_START",
            Self::StationConnected => "WIFI_EVENT_STA_CONNECTED",
            Self::StationDisconnected => "WIFI_EVENT_STA_DISCONNECTED",
            Self::StationGotAddress => "IP_EVENT_STA_GOT_IP",
        }
    }
}

/// Receiver of raw events.
///
/// Called on the radio stack's own context, once per event, in delivery order
/// within a family. Must return quickly and never wait.
pub trait EventSink: Sync {
    /// Handle one event.
    fn on_event(&self, family: EventFamily, id: i32);
}

/// Something that can deliver radio and IP events.
pub trait EventSource<'a> {
    /// Create the process-wide event loop unless it already exists.
    fn ensure_event_loop(&mut self) -> Result<(), SubscribeError>;

    /// Route every event of `family` to `sink`.
    fn subscribe(&mut self, family: EventFamily, sink: &'a dyn EventSink)
    -> Result<(), SubscribeError>;
}

/// Families the application listens to.
pub const SUBSCRIBED_FAMILIES: [EventFamily; 2] = [EventFamily::WIFI, EventFamily::IP];

/// Install the event loop and register `sink` for radio and IP events.
///
/// Must run before the radio is started, or early events are lost.
pub fn subscribe_events<'a, S>(source: &mut S, sink: &'a dyn EventSink) -> Result<(), SubscribeError>
where
    S: EventSource<'a> + ?Sized,
{
    source.ensure_event_loop()?;
    for family in SUBSCRIBED_FAMILIES {
        source.subscribe(family, sink)?;
        debug!("subscribed to {}", family.name());
    }
    Ok(())
}
