//! One-time radio bring-up.
//!
//! The steps run strictly in order and stop at the first failure. There is
//! no rollback: a radio that fails here is unusable, and the caller treats
//! the error as fatal. Interface handles are only returned once the radio
//! has started, so nobody sees a half-initialized radio.

use log::{error, info};

use crate::config::BringUpConfig;
use crate::driver::{RadioDriver, RadioMode};
use crate::error::BringUpError;

/// Steps of the bring-up, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpStep {
    /// Event loop creation (before the radio steps)
    EventLoop,
    /// Event callback registration (before the radio steps)
    Subscribe,
    /// TCP/IP stack initialization
    NetworkStack,
    /// Radio driver initialization
    RadioInit,
    /// Station interface creation
    StationInterface,
    /// Access point interface creation
    AccessPointInterface,
    /// Access point identity and security validation
    ConfigureAccessPoint,
    /// DHCP server stop
    StopAddressService,
    /// Static IP assignment
    StaticAddress,
    /// DHCP server restart
    StartAddressService,
    /// AP+STA mode selection
    Mode,
    /// Access point configuration
    ApplyAccessPoint,
    /// Channel width
    Bandwidth,
    /// Station power save
    PowerSave,
    /// Radio start
    Start,
}

impl BringUpStep {
    /// Log name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EventLoop => "event loop",
            Self::Subscribe => "event subscription",
            Self::NetworkStack => "network stack init",
            Self::RadioInit => "radio init",
            Self::StationInterface => "station interface",
            Self::AccessPointInterface => "access point interface",
            Self::ConfigureAccessPoint => "access point config",
            Self::StopAddressService => "DHCP server stop",
            Self::StaticAddress => "static address",
            Self::StartAddressService => "DHCP server start",
            Self::Mode => "AP+STA mode",
            Self::ApplyAccessPoint => "apply access point",
            Self::Bandwidth => "bandwidth",
            Self::PowerSave => "power save",
            Self::Start => "radio start",
        }
    }
}

/// The two logical interfaces of the radio, created once during bring-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioInterfaces<I> {
    /// Station interface
    pub station: I,
    /// Access point interface
    pub access_point: I,
}

fn check<T, E: core::fmt::Debug>(step: BringUpStep, result: Result<T, E>) -> Result<T, BringUpError<E>> {
    result.map_err(|source| {
        error!("Failed at {}: {:?}", step.name(), source);
        BringUpError::Driver { step, source }
    })
}

/// Run the full bring-up sequence against `driver`.
///
/// # Errors
///
/// Returns the first failing step. No later step is attempted.
pub async fn bring_up<D: RadioDriver>(
    driver: &mut D,
    config: &BringUpConfig,
) -> Result<RadioInterfaces<D::Interface>, BringUpError<D::Error>> {
    check(BringUpStep::NetworkStack, driver.init_network_stack())?;
    check(BringUpStep::RadioInit, driver.init_radio(config.storage))?;
    info!("Radio initialized!");

    let station = check(BringUpStep::StationInterface, driver.create_station_interface())?;
    let access_point = check(
        BringUpStep::AccessPointInterface,
        driver.create_access_point_interface(),
    )?;

    let settings = config.validate().map_err(|e| {
        error!("Invalid access point config: {}", e);
        BringUpError::Config(e)
    })?;

    // The DHCP server must not hand out leases while the AP address changes.
    check(
        BringUpStep::StopAddressService,
        driver.stop_address_service(&access_point),
    )?;
    check(
        BringUpStep::StaticAddress,
        driver.set_static_address(&access_point, &config.addressing),
    )?;
    check(
        BringUpStep::StartAddressService,
        driver.start_address_service(&access_point),
    )?;
    info!("Access point address {}", config.addressing.ip);

    check(BringUpStep::Mode, driver.set_mode(RadioMode::AccessPointStation))?;
    check(BringUpStep::ApplyAccessPoint, driver.apply_access_point(&settings))?;
    check(BringUpStep::Bandwidth, driver.set_bandwidth(config.bandwidth))?;
    check(BringUpStep::PowerSave, driver.set_power_save(config.power_save))?;

    info!("Starting WiFi controller...");
    check(BringUpStep::Start, driver.start().await)?;
    info!("WiFi controller started!");

    Ok(RadioInterfaces {
        station,
        access_point,
    })
}
