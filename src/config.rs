//! Compile-time Wi-Fi settings for the soft access point and station.
//!
//! Everything here is fixed for the life of the firmware. [`BringUpConfig::DEFAULT`]
//! is what the device boots with; [`BringUpConfig::validate`] checks it against
//! the limits the radio enforces before any of it reaches the driver.

use core::net::Ipv4Addr;

use heapless::String;

use crate::error::ConfigError;

/// IEEE 802.11 maximum SSID length
pub const MAX_SSID_LENGTH: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Minimum WPA2 passphrase length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Soft-AP peer limit of the ESP32 radio
pub const MAX_AP_PEERS: u8 = 10;

/// Access point identity, security and capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApIdentity {
    /// Network name
    pub ssid: &'static str,
    /// WPA2 passphrase; empty for an open network
    pub password: &'static str,
    /// 2.4 GHz channel
    pub channel: u8,
    /// Hide the SSID from beacons
    pub hidden: bool,
    /// Maximum connected peers
    pub max_peers: u8,
    /// Beacon interval in time units (1 TU = 1024 us)
    pub beacon_interval_tu: u16,
}

/// Static addressing of the access point interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApAddressing {
    /// Address of the device on its own network
    pub ip: Ipv4Addr,
    /// Gateway handed to peers
    pub gateway: Ipv4Addr,
    /// Subnet mask
    pub netmask: Ipv4Addr,
}

impl ApAddressing {
    /// Prefix length of the netmask, or `None` if the mask is not contiguous.
    pub fn prefix_len(&self) -> Option<u8> {
        let mask = u32::from(self.netmask);
        let ones = mask.leading_ones();
        if mask.checked_shl(ones).unwrap_or(0) == 0 {
            Some(ones as u8)
        } else {
            None
        }
    }

    fn same_subnet(&self, other: Ipv4Addr) -> bool {
        let mask = u32::from(self.netmask);
        u32::from(self.ip) & mask == u32::from(other) & mask
    }
}

/// Channel width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 20 MHz
    Ht20,
    /// 40 MHz
    Ht40,
}

/// Station modem sleep policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSave {
    /// Modem never sleeps. Lowest latency, highest draw.
    None,
    /// Wake every DTIM period.
    MinModem,
    /// Wake on the listen interval.
    MaxModem,
}

/// Where the driver keeps its own Wi-Fi settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigStorage {
    /// RAM only; nothing survives a reboot.
    Ram,
    /// Persisted to flash.
    Flash,
}

/// Access point authentication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuthMode {
    /// No passphrase
    Open,
    /// WPA2-PSK
    Wpa2Personal,
}

/// Everything the bring-up sequence needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BringUpConfig {
    /// Access point identity
    pub ap: ApIdentity,
    /// Access point addressing
    pub addressing: ApAddressing,
    /// Access point channel width
    pub bandwidth: Bandwidth,
    /// Station power save policy
    pub power_save: PowerSave,
    /// Driver settings storage
    pub storage: ConfigStorage,
}

impl BringUpConfig {
    /// Firmware defaults.
    pub const DEFAULT: Self = Self {
        ap: ApIdentity {
            ssid: "ESP32_AP",
            password: "admin123",
            channel: 1,
            hidden: false,
            max_peers: 5,
            beacon_interval_tu: 100,
        },
        addressing: ApAddressing {
            ip: Ipv4Addr::new(192, 169, 0, 1),
            gateway: Ipv4Addr::new(192, 169, 0, 1),
            netmask: Ipv4Addr::new(255, 255, 255, 0),
        },
        bandwidth: Bandwidth::Ht20,
        power_save: PowerSave::None,
        storage: ConfigStorage::Ram,
    };

    /// Check the configuration and build the access point record the driver applies.
    pub fn validate(&self) -> Result<AccessPointSettings, ConfigError> {
        let ap = &self.ap;

        if ap.ssid.is_empty() || ap.ssid.len() > MAX_SSID_LENGTH {
            return Err(ConfigError::SsidLength(ap.ssid.len()));
        }
        let auth = if ap.password.is_empty() {
            AuthMode::Open
        } else if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&ap.password.len()) {
            AuthMode::Wpa2Personal
        } else {
            return Err(ConfigError::PasswordLength(ap.password.len()));
        };
        if !(1..=13).contains(&ap.channel) {
            return Err(ConfigError::Channel(ap.channel));
        }
        if !(1..=MAX_AP_PEERS).contains(&ap.max_peers) {
            return Err(ConfigError::MaxPeers(ap.max_peers));
        }
        if !(100..=60000).contains(&ap.beacon_interval_tu) {
            return Err(ConfigError::BeaconInterval(ap.beacon_interval_tu));
        }
        if self.addressing.prefix_len().is_none() {
            return Err(ConfigError::Netmask);
        }
        if !self.addressing.same_subnet(self.addressing.gateway) {
            return Err(ConfigError::GatewayOutsideSubnet);
        }

        let mut ssid = String::new();
        let mut password = String::new();
        // Lengths were checked above.
        let _ = ssid.push_str(ap.ssid);
        let _ = password.push_str(ap.password);

        Ok(AccessPointSettings {
            ssid,
            password,
            channel: ap.channel,
            hidden: ap.hidden,
            auth,
            max_peers: ap.max_peers,
            beacon_interval_tu: ap.beacon_interval_tu,
        })
    }
}

impl Default for BringUpConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Validated access point record handed to the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccessPointSettings {
    /// Network name
    pub ssid: String<MAX_SSID_LENGTH>,
    /// Passphrase, empty when open
    pub password: String<MAX_PASSWORD_LENGTH>,
    /// Channel
    pub channel: u8,
    /// Hidden SSID
    pub hidden: bool,
    /// Authentication
    pub auth: AuthMode,
    /// Peer limit
    pub max_peers: u8,
    /// Beacon interval in TU
    pub beacon_interval_tu: u16,
}
