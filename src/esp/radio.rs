//! `esp-radio` implementation of the radio driver.
//!
//! Each interface gets its own `embassy-net` stack and runner task. The
//! station stack runs a DHCP client; the access point stack is addressed
//! statically and serves leases through [`super::dhcp`].

use embassy_executor::{SpawnError, Spawner};
use embassy_net::{ConfigV4, Ipv4Cidr, Runner, Stack, StaticConfigV4};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_println::println;
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ClientConfig, ModeConfig, PowerSaveMode, WifiController,
    WifiDevice, WifiError,
};
use log::debug;

use super::dhcp::{DHCP_GATE, ServeOn, dhcp_server_task};
use super::events::address_watch_task;
use super::types::{AP_RESOURCES, RADIO_INIT, STA_RESOURCES};
use crate::config::{
    AccessPointSettings, ApAddressing, AuthMode, Bandwidth, ConfigStorage, PowerSave,
};
use crate::driver::{RadioDriver, RadioMode};

/// Beacon interval the driver uses; it cannot be changed on this radio.
pub const DRIVER_BEACON_INTERVAL_TU: u16 = 100;

/// Errors from the ESP32 radio binding.
#[derive(Debug)]
pub enum EspError {
    /// `esp_radio::init` failed.
    Init(esp_radio::InitializationError),
    /// A Wi-Fi controller call failed.
    Wifi(WifiError),
    /// A runner or server task could not be spawned.
    Spawn(SpawnError),
    /// A one-time resource was already taken.
    AlreadyInitialized,
    /// A step ran before the step it depends on.
    NotInitialized,
    /// The radio cannot do what was asked.
    Unsupported(&'static str),
}

/// Network stack runner, one per interface.
#[embassy_executor::task(pool_size = 2)]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// The ESP32 Wi-Fi radio and its two network stacks.
pub struct EspRadio {
    spawner: Spawner,
    peripheral: Option<WIFI<'static>>,
    seed: u64,
    controller: Option<WifiController<'static>>,
    sta_device: Option<WifiDevice<'static>>,
    ap_device: Option<WifiDevice<'static>>,
    mode: Option<RadioMode>,
    ap_config: Option<AccessPointConfig>,
    ap_channel: u8,
    serve_on: Option<ServeOn>,
    dhcp_running: bool,
}

impl EspRadio {
    /// Driver for the `WIFI` peripheral. Nothing is touched until bring-up.
    pub fn new(spawner: Spawner, peripheral: WIFI<'static>) -> Self {
        Self {
            spawner,
            peripheral: Some(peripheral),
            seed: 0,
            controller: None,
            sta_device: None,
            ap_device: None,
            mode: None,
            ap_config: None,
            ap_channel: 0,
            serve_on: None,
            dhcp_running: false,
        }
    }

    fn controller(&mut self) -> Result<&mut WifiController<'static>, EspError> {
        self.controller.as_mut().ok_or(EspError::NotInitialized)
    }

    /// Push `ap` to the controller in the selected mode.
    fn apply_config(&mut self, ap: AccessPointConfig) -> Result<(), EspError> {
        let mode = match self.mode.ok_or(EspError::NotInitialized)? {
            RadioMode::Station => ModeConfig::Client(ClientConfig::default()),
            RadioMode::AccessPoint => ModeConfig::AccessPoint(ap.clone()),
            RadioMode::AccessPointStation => ModeConfig::ApSta(ClientConfig::default(), ap.clone()),
        };
        self.controller()?.set_config(&mode).map_err(|e| {
            println!("Failed to apply Wi-Fi config: {:?}", e);
            EspError::Wifi(e)
        })?;
        self.ap_config = Some(ap);
        Ok(())
    }
}

impl RadioDriver for EspRadio {
    type Interface = Stack<'static>;
    type Error = EspError;

    fn init_network_stack(&mut self) -> Result<(), EspError> {
        let rng = Rng::new();
        self.seed = (rng.random() as u64) << 32 | rng.random() as u64;
        Ok(())
    }

    fn init_radio(&mut self, storage: ConfigStorage) -> Result<(), EspError> {
        // esp-radio never persists Wi-Fi settings.
        if storage != ConfigStorage::Ram {
            return Err(EspError::Unsupported("flash config storage"));
        }
        let radio_init = esp_radio::init().map_err(|e| {
            println!("Failed to initialize radio controller: {:?}", e);
            EspError::Init(e)
        })?;
        let radio_init = RADIO_INIT
            .try_init(radio_init)
            .ok_or(EspError::AlreadyInitialized)?;

        println!("Creating WiFi controller...");
        let peripheral = self.peripheral.take().ok_or(EspError::AlreadyInitialized)?;
        let (controller, interfaces) =
            esp_radio::wifi::new(radio_init, peripheral, Default::default()).map_err(|e| {
                println!("Failed to create WiFi controller: {:?}", e);
                EspError::Wifi(e)
            })?;
        println!("WiFi controller created!");

        self.controller = Some(controller);
        self.sta_device = Some(interfaces.sta);
        self.ap_device = Some(interfaces.ap);
        Ok(())
    }

    fn create_station_interface(&mut self) -> Result<Stack<'static>, EspError> {
        let device = self.sta_device.take().ok_or(EspError::NotInitialized)?;
        let resources = STA_RESOURCES
            .try_init(embassy_net::StackResources::new())
            .ok_or(EspError::AlreadyInitialized)?;
        let config = embassy_net::Config::dhcpv4(Default::default());
        let (stack, runner) = embassy_net::new(device, config, resources, self.seed);

        self.spawner.spawn(net_task(runner)).map_err(EspError::Spawn)?;
        self.spawner
            .spawn(address_watch_task(stack))
            .map_err(EspError::Spawn)?;
        Ok(stack)
    }

    fn create_access_point_interface(&mut self) -> Result<Stack<'static>, EspError> {
        let device = self.ap_device.take().ok_or(EspError::NotInitialized)?;
        let resources = AP_RESOURCES
            .try_init(embassy_net::StackResources::new())
            .ok_or(EspError::AlreadyInitialized)?;
        // Addressed later, once the DHCP server is stopped.
        let config = embassy_net::Config::default();
        let (stack, runner) = embassy_net::new(device, config, resources, self.seed.rotate_left(32));

        self.spawner.spawn(net_task(runner)).map_err(EspError::Spawn)?;
        self.spawner
            .spawn(dhcp_server_task(stack))
            .map_err(EspError::Spawn)?;
        Ok(stack)
    }

    fn stop_address_service(&mut self, _ap: &Stack<'static>) -> Result<(), EspError> {
        if self.dhcp_running {
            DHCP_GATE.signal(None);
            self.dhcp_running = false;
        } else {
            debug!("DHCP server already stopped");
        }
        Ok(())
    }

    fn set_static_address(
        &mut self,
        ap: &Stack<'static>,
        addressing: &ApAddressing,
    ) -> Result<(), EspError> {
        let prefix = addressing
            .prefix_len()
            .ok_or(EspError::Unsupported("non-contiguous netmask"))?;
        ap.set_config_v4(ConfigV4::Static(StaticConfigV4 {
            address: Ipv4Cidr::new(addressing.ip, prefix),
            gateway: Some(addressing.gateway),
            dns_servers: Default::default(),
        }));
        self.serve_on = Some(ServeOn {
            ip: addressing.ip,
            gateway: addressing.gateway,
        });
        Ok(())
    }

    fn start_address_service(&mut self, _ap: &Stack<'static>) -> Result<(), EspError> {
        let on = self.serve_on.ok_or(EspError::NotInitialized)?;
        DHCP_GATE.signal(Some(on));
        self.dhcp_running = true;
        Ok(())
    }

    fn set_mode(&mut self, mode: RadioMode) -> Result<(), EspError> {
        // esp-radio takes the mode together with the config record.
        self.controller()?;
        debug!("Wi-Fi mode {:?}", mode);
        self.mode = Some(mode);
        Ok(())
    }

    fn apply_access_point(&mut self, settings: &AccessPointSettings) -> Result<(), EspError> {
        if settings.beacon_interval_tu != DRIVER_BEACON_INTERVAL_TU {
            return Err(EspError::Unsupported("beacon interval"));
        }
        let auth = match settings.auth {
            AuthMode::Open => AuthMethod::None,
            AuthMode::Wpa2Personal => AuthMethod::Wpa2Personal,
        };
        let ap = AccessPointConfig::default()
            .with_ssid(settings.ssid.as_str().into())
            .with_password(settings.password.as_str().into())
            .with_channel(settings.channel)
            .with_ssid_hidden(settings.hidden)
            .with_auth_method(auth)
            .with_max_connections(u16::from(settings.max_peers));
        self.ap_channel = settings.channel;
        self.apply_config(ap)
    }

    fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), EspError> {
        let ap = self.ap_config.take().ok_or(EspError::NotInitialized)?;
        let primary = self.ap_channel;
        // HT40 pairs the primary with the channel four above or below it.
        let secondary = match bandwidth {
            Bandwidth::Ht20 => None,
            Bandwidth::Ht40 if primary <= 7 => Some(primary + 4),
            Bandwidth::Ht40 => Some(primary - 4),
        };
        self.apply_config(ap.with_secondary_channel(secondary))
    }

    fn set_power_save(&mut self, policy: PowerSave) -> Result<(), EspError> {
        let ps = match policy {
            PowerSave::None => PowerSaveMode::None,
            PowerSave::MinModem => PowerSaveMode::Minimum,
            PowerSave::MaxModem => PowerSaveMode::Maximum,
        };
        self.controller()?.set_power_saving(ps).map_err(EspError::Wifi)
    }

    async fn start(&mut self) -> Result<(), EspError> {
        self.controller()?.start_async().await.map_err(|e| {
            println!("Failed to start Wi-Fi controller: {:?}", e);
            EspError::Wifi(e)
        })
    }
}
