//! Radio driver capability.
//!
//! One method per hardware operation the bring-up sequence performs. Each call
//! either succeeds or reports a driver error; the sequence decides what a
//! failure means.

use core::fmt::Debug;

use crate::config::{AccessPointSettings, ApAddressing, Bandwidth, ConfigStorage, PowerSave};

/// Radio operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMode {
    /// Station only
    Station,
    /// Access point only
    AccessPoint,
    /// Access point and station at once
    AccessPointStation,
}

/// Operations the bring-up sequence needs from the radio and network stack.
#[allow(async_fn_in_trait)]
pub trait RadioDriver {
    /// Handle to one logical network interface.
    type Interface;
    /// Driver error.
    type Error: Debug;

    /// Initialize the TCP/IP stack. Precedes interface creation.
    fn init_network_stack(&mut self) -> Result<(), Self::Error>;

    /// Initialize the radio with default runtime parameters.
    fn init_radio(&mut self, storage: ConfigStorage) -> Result<(), Self::Error>;

    /// Create the station interface.
    fn create_station_interface(&mut self) -> Result<Self::Interface, Self::Error>;

    /// Create the access point interface.
    fn create_access_point_interface(&mut self) -> Result<Self::Interface, Self::Error>;

    /// Stop the DHCP server on `ap`. Stopping a stopped server succeeds.
    fn stop_address_service(&mut self, ap: &Self::Interface) -> Result<(), Self::Error>;

    /// Assign static IP, gateway and mask to `ap`.
    fn set_static_address(
        &mut self,
        ap: &Self::Interface,
        addressing: &ApAddressing,
    ) -> Result<(), Self::Error>;

    /// Start the DHCP server on `ap`.
    fn start_address_service(&mut self, ap: &Self::Interface) -> Result<(), Self::Error>;

    /// Select the operating mode.
    fn set_mode(&mut self, mode: RadioMode) -> Result<(), Self::Error>;

    /// Apply the access point record.
    fn apply_access_point(&mut self, settings: &AccessPointSettings) -> Result<(), Self::Error>;

    /// Set the access point channel width.
    fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Self::Error>;

    /// Set the station power save policy.
    fn set_power_save(&mut self, policy: PowerSave) -> Result<(), Self::Error>;

    /// Start the radio. Events begin to flow after this.
    async fn start(&mut self) -> Result<(), Self::Error>;
}
