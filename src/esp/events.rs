//! Event delivery from `esp-radio` and `embassy-net`.
//!
//! Radio lifecycle events come from the driver's per-event handlers, which run
//! on the radio's own context. The bare-metal stack has no IP event loop, so
//! the station stack is watched instead and its first IPv4 configuration after
//! each link-up is reported as `STA_GOT_IP`.

use core::cell::Cell;

use embassy_net::Stack;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_radio::wifi::event::{self, EventExt};
use log::info;

use crate::error::SubscribeError;
use crate::events::{EventFamily, EventSink, EventSource, ip_id, wifi_id};

/// Sink registered for the IP family, read by the address watcher.
static IP_SINK: Mutex<CriticalSectionRawMutex, Cell<Option<&'static dyn EventSink>>> =
    Mutex::new(Cell::new(None));

/// Event source backed by the radio driver's handlers.
pub struct EspEventSource;

impl EventSource<'static> for EspEventSource {
    fn ensure_event_loop(&mut self) -> Result<(), SubscribeError> {
        // esp-radio dispatches its events itself; there is no loop to create.
        Ok(())
    }

    fn subscribe(
        &mut self,
        family: EventFamily,
        sink: &'static dyn EventSink,
    ) -> Result<(), SubscribeError> {
        if family == EventFamily::WIFI {
            install_wifi_handlers(sink);
            Ok(())
        } else if family == EventFamily::IP {
            IP_SINK.lock(|cell| cell.set(Some(sink)));
            Ok(())
        } else {
            Err(SubscribeError::Registration(family))
        }
    }
}

fn install_wifi_handlers(sink: &'static dyn EventSink) {
    event::ApStart::update_handler(move |_| sink.on_event(EventFamily::WIFI, wifi_id::AP_START));
    event::ApStop::update_handler(move |_| sink.on_event(EventFamily::WIFI, wifi_id::AP_STOP));
    event::ApStaConnected::update_handler(move |_| {
        sink.on_event(EventFamily::WIFI, wifi_id::AP_STACONNECTED)
    });
    event::ApStaDisconnected::update_handler(move |_| {
        sink.on_event(EventFamily::WIFI, wifi_id::AP_STADISCONNECTED)
    });
    event::StaStart::update_handler(move |_| sink.on_event(EventFamily::WIFI, wifi_id::STA_START));
    event::StaConnected::update_handler(move |_| {
        sink.on_event(EventFamily::WIFI, wifi_id::STA_CONNECTED)
    });
    event::StaDisconnected::update_handler(move |_| {
        sink.on_event(EventFamily::WIFI, wifi_id::STA_DISCONNECTED)
    });
}

/// Report `STA_GOT_IP` each time the station stack gets an address.
#[embassy_executor::task]
pub(crate) async fn address_watch_task(stack: Stack<'static>) {
    loop {
        stack.wait_config_up().await;
        if let Some(config) = stack.config_v4() {
            info!("Got IP address: {}", config.address);
        }
        if let Some(sink) = IP_SINK.lock(|cell| cell.get()) {
            sink.on_event(EventFamily::IP, ip_id::STA_GOT_IP);
        }
        stack.wait_config_down().await;
    }
}
