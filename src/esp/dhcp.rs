//! DHCP server for the soft-AP.
//!
//! The server task is spawned with the access point stack and stays parked
//! until the radio driver opens the gate with an address to serve. Closing the
//! gate drops the socket, so no leases go out while the AP address changes.

use core::convert::Infallible;
use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use edge_dhcp::io::{self, DEFAULT_SERVER_PORT};
use edge_dhcp::server::{Server, ServerOptions};
use edge_nal::UdpBind;
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use log::{info, warn};

use crate::config::MAX_AP_PEERS;

/// Leases the server tracks.
const MAX_LEASES: usize = MAX_AP_PEERS as usize;

/// Pause before a failed bind or server loop is retried
const RESTART_DELAY_MS: u64 = 500;

/// Address and gateway the server hands out leases for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServeOn {
    /// Server address on the AP subnet
    pub ip: Ipv4Addr,
    /// Gateway announced to peers
    pub gateway: Ipv4Addr,
}

/// `Some` opens the gate, `None` closes it.
pub(crate) static DHCP_GATE: Signal<CriticalSectionRawMutex, Option<ServeOn>> = Signal::new();

/// Serve leases on the access point stack whenever the gate is open.
#[embassy_executor::task]
pub(crate) async fn dhcp_server_task(stack: Stack<'static>) {
    let mut serving: Option<ServeOn> = None;
    loop {
        let Some(on) = serving else {
            serving = DHCP_GATE.wait().await;
            continue;
        };
        serving = match select(serve(stack, on), DHCP_GATE.wait()).await {
            Either::First(never) => match never {},
            Either::Second(next) => next,
        };
        if serving.is_none() {
            info!("DHCP server stopped");
        }
    }
}

/// Serve until cancelled by the gate. Bind and run errors are retried.
async fn serve(stack: Stack<'static>, on: ServeOn) -> Infallible {
    let buffers = UdpBuffers::<1, 1024, 1024, 2>::new();
    let udp = Udp::new(stack, &buffers);
    let local = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_SERVER_PORT));
    let mut socket = loop {
        match udp.bind(local).await {
            Ok(socket) => break socket,
            Err(e) => {
                warn!("DHCP server bind failed: {:?}", e);
                Timer::after(Duration::from_millis(RESTART_DELAY_MS)).await;
            }
        }
    };

    let mut buf = [0u8; 1500];
    let mut gw_buf = [on.gateway];
    info!("DHCP server started on {}", on.ip);
    loop {
        if let Err(e) = io::server::run(
            &mut Server::<_, MAX_LEASES>::new_with_et(on.ip),
            &ServerOptions::new(on.ip, Some(&mut gw_buf)),
            &mut socket,
            &mut buf,
        )
        .await
        {
            warn!("DHCP server error: {:?}", e);
        }
        Timer::after(Duration::from_millis(RESTART_DELAY_MS)).await;
    }
}
