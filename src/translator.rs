//! The event callback: raw `(family, id)` pairs in, observations or messages out.
//!
//! Runs on the radio stack's dispatch context, so the only thing it may touch
//! on the worker side is the queue, and only through a non-blocking send.

use core::sync::atomic::{AtomicU32, Ordering};

use log::{debug, info, warn};

use crate::events::{EventFamily, RadioEvent};
use crate::message::MessageKind;
use crate::queue::AppQueue;

/// Which events are forwarded into the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wiring {
    /// Every event is only logged.
    LogOnly,
    /// `STATION_GOT_ADDRESS` is additionally enqueued when the station gets an address.
    ///
    /// Lossy: the forward is dropped and counted in
    /// [`EventTranslator::dropped`] when the queue is full or the worker is
    /// not ready yet.
    ForwardStationAddress,
}

/// What the translator did with one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translation {
    /// Recognised and logged.
    Observed(RadioEvent),
    /// Recognised, logged and enqueued.
    Forwarded(RadioEvent, MessageKind),
    /// Recognised, but the message was dropped: queue full or worker not ready.
    Dropped(RadioEvent, MessageKind),
    /// Unknown family or identifier.
    Ignored,
}

/// Maps raw events to actions according to its [`Wiring`].
#[derive(Debug)]
pub struct EventTranslator {
    wiring: Wiring,
    dropped: AtomicU32,
}

impl EventTranslator {
    /// Translator with the given wiring.
    pub const fn new(wiring: Wiring) -> Self {
        Self {
            wiring,
            dropped: AtomicU32::new(0),
        }
    }

    /// Forwards dropped so far.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Current wiring.
    pub const fn wiring(&self) -> Wiring {
        self.wiring
    }

    /// Message an event forwards to, if any, under the current wiring.
    pub fn forward_for(&self, event: RadioEvent) -> Option<MessageKind> {
        match (self.wiring, event) {
            (Wiring::ForwardStationAddress, RadioEvent::StationGotAddress) => {
                Some(MessageKind::StationGotAddress)
            }
            _ => None,
        }
    }

    /// Handle one event. Never waits.
    ///
    /// `queue` is `None` while the worker is not ready to take messages.
    pub fn translate(
        &self,
        queue: Option<&AppQueue>,
        family: EventFamily,
        id: i32,
    ) -> Translation {
        let Some(event) = RadioEvent::decode(family, id) else {
            debug!("ignoring {} id {}", family.name(), id);
            return Translation::Ignored;
        };
        info!("{}", event.name());

        let Some(kind) = self.forward_for(event) else {
            return Translation::Observed(event);
        };
        let Some(queue) = queue else {
            return self.drop_forward(event, kind, "worker not ready");
        };
        match queue.try_send(kind) {
            Ok(()) => Translation::Forwarded(event, kind),
            Err(kind) => self.drop_forward(event, kind, "queue full"),
        }
    }

    fn drop_forward(&self, event: RadioEvent, kind: MessageKind, why: &str) -> Translation {
        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            "{}, dropping {} for {} ({} dropped)",
            why,
            kind.name(),
            event.name(),
            total
        );
        Translation::Dropped(event, kind)
    }
}
