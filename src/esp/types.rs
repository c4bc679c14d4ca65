//! Static storage for radio state that must outlive the bring-up call.
//!
//! Embassy tasks and network stacks need `'static` borrows. Each cell is
//! filled at most once; a second bring-up attempt fails instead of panicking.

use embassy_net::StackResources;
use static_cell::StaticCell;

/// Sockets on the station stack: DHCP client and DNS.
pub const STA_SOCKETS: usize = 3;

/// Sockets on the access point stack: DHCP server plus room for the HTTP frontend.
pub const AP_SOCKETS: usize = 4;

/// Radio controller handed out by `esp_radio::init`.
pub static RADIO_INIT: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();

/// Socket storage for the station stack.
pub static STA_RESOURCES: StaticCell<StackResources<STA_SOCKETS>> = StaticCell::new();

/// Socket storage for the access point stack.
pub static AP_RESOURCES: StaticCell<StackResources<AP_SOCKETS>> = StaticCell::new();
