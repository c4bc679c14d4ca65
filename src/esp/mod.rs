//! ESP32 binding: radio driver, event source, status LED and the worker task.
//!
//! The application context is a plain `static`. Any task may call
//! [`send_message`] at any time; it waits until the worker has finished
//! bring-up and queued its own first message.

/// Heap setup
pub mod allocator;

/// DHCP server for the soft-AP
pub mod dhcp;

/// Radio and IP event delivery
pub mod events;

/// `esp-radio` radio driver
pub mod radio;

/// Static storage for radio state
pub mod types;

use embassy_executor::{SpawnError, Spawner};
use embassy_time::Delay;
use esp_hal::gpio::Output;
use esp_hal::peripherals::WIFI;
use log::info;

use crate::app::{AppContext, Worker};
use crate::config::BringUpConfig;
use crate::message::MessageKind;
use crate::signal::LedSignaler;
use crate::translator::Wiring;

pub use events::EspEventSource;
pub use radio::{EspError, EspRadio};

/// Process-wide queue and event translator.
pub static APP: AppContext = AppContext::new(Wiring::LogOnly);

static CONFIG: BringUpConfig = BringUpConfig::DEFAULT;

/// On-board LED signaler.
pub type Led = LedSignaler<Output<'static>, Delay>;

type EspWorker = Worker<'static, EspRadio, EspEventSource, Led>;

/// Spawn the Wi-Fi worker. It announces Init on `led` once bring-up is done.
///
/// Call once. A second call fails to spawn.
pub fn wifi_app_start(
    spawner: Spawner,
    wifi: WIFI<'static>,
    led: Output<'static>,
) -> Result<(), SpawnError> {
    info!("Spawning wifi worker, status LED on GPIO18");
    let led = LedSignaler::new(led, Delay);

    let worker = Worker::new(
        &APP,
        &CONFIG,
        EspRadio::new(spawner, wifi),
        EspEventSource,
        led,
    );
    spawner.spawn(wifi_app_task(worker))
}

/// Queue a message for the Wi-Fi worker.
///
/// Waits until bring-up has finished, then while the queue is full.
pub async fn send_message(kind: MessageKind) -> bool {
    APP.send_message(kind).await
}

#[embassy_executor::task]
async fn wifi_app_task(worker: EspWorker) {
    match worker.run().await {
        Ok(never) => match never {},
        // A radio that cannot come up leaves the device without a role.
        Err(e) => panic!("Wi-Fi bring-up failed at {}", e),
    }
}
