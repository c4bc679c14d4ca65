//! Error types for configuration, event subscription and radio bring-up.

use core::fmt;

use crate::bringup::BringUpStep;
use crate::events::EventFamily;

/// A Bring-Up Configuration value outside what the radio accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SSID is empty or longer than 32 bytes.
    SsidLength(usize),
    /// WPA2 passphrase shorter than 8 or longer than 64 bytes.
    PasswordLength(usize),
    /// Channel outside 1..=13.
    Channel(u8),
    /// Peer count outside 1..=10.
    MaxPeers(u8),
    /// Beacon interval outside 100..=60000 TU.
    BeaconInterval(u16),
    /// Subnet mask bits are not contiguous.
    Netmask,
    /// Gateway is not inside the access point subnet.
    GatewayOutsideSubnet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SsidLength(len) => write!(f, "SSID length {} not in 1..=32", len),
            Self::PasswordLength(len) => write!(f, "passphrase length {} not in 8..=64", len),
            Self::Channel(ch) => write!(f, "channel {} not in 1..=13", ch),
            Self::MaxPeers(n) => write!(f, "max peers {} not in 1..=10", n),
            Self::BeaconInterval(tu) => write!(f, "beacon interval {} TU not in 100..=60000", tu),
            Self::Netmask => write!(f, "netmask is not contiguous"),
            Self::GatewayOutsideSubnet => write!(f, "gateway outside access point subnet"),
        }
    }
}

/// Failure to install the event loop or register the event callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeError {
    /// The process-wide event loop could not be created.
    EventLoop,
    /// The callback could not be registered for this family.
    Registration(EventFamily),
}

impl fmt::Display for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventLoop => write!(f, "event loop creation failed"),
            Self::Registration(family) => {
                write!(f, "event handler registration failed for {}", family.name())
            }
        }
    }
}

/// Radio bring-up failure. Always fatal to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BringUpError<E> {
    /// Event subscription failed before the radio was touched.
    Events(SubscribeError),
    /// The access point configuration was rejected.
    Config(ConfigError),
    /// A driver call failed.
    Driver {
        /// Step that failed
        step: BringUpStep,
        /// Driver error
        source: E,
    },
}

impl<E> BringUpError<E> {
    /// The step that failed.
    pub fn step(&self) -> BringUpStep {
        match self {
            Self::Events(SubscribeError::EventLoop) => BringUpStep::EventLoop,
            Self::Events(SubscribeError::Registration(_)) => BringUpStep::Subscribe,
            Self::Config(_) => BringUpStep::ConfigureAccessPoint,
            Self::Driver { step, .. } => *step,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for BringUpError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events(e) => write!(f, "{}: {}", self.step().name(), e),
            Self::Config(e) => write!(f, "{}: {}", self.step().name(), e),
            Self::Driver { step, source } => write!(f, "{}: {:?}", step.name(), source),
        }
    }
}
