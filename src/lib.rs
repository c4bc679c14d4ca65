//! ESP32 AP+STA Wi-Fi application core
//!
//! This library brings up the radio as a soft access point plus station, and
//! serializes every follow-up action through one bounded message queue drained
//! by a single worker.
//!
//! ## Layout
//!
//! - [`message`] / [`queue`]: the application message and its 3-slot FIFO
//! - [`events`] / [`translator`]: radio and IP event subscription, and the
//!   callback that maps raw events to observations or queued messages
//! - [`bringup`]: the ordered, all-or-nothing radio initialization sequence
//! - [`app`]: the shared context and the dispatch worker state machine
//! - [`signal`]: phase announcements (the on-board LED on hardware)
//! - `esp` (feature `esp32`): the `esp-radio` / `embassy-net` binding
//!
//! ## Example
//!
//! ```no_run
//! use wifi_app::{app::AppContext, message::MessageKind, translator::Wiring};
//!
//! static APP: AppContext = AppContext::new(Wiring::LogOnly);
//!
//! async fn request_station_connect() -> bool {
//!     APP.send_message(MessageKind::StationConnectRequested).await
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

/// Shared context and dispatch worker
pub mod app;

/// Ordered radio bring-up sequence
pub mod bringup;

/// Compile-time bring-up configuration
pub mod config;

/// Radio driver capability used by the bring-up sequence
pub mod driver;

/// Error types
pub mod error;

/// Event families, identifiers and the event source capability
pub mod events;

/// Application messages
pub mod message;

/// Bounded message queue
pub mod queue;

/// Phase announcements
pub mod signal;

/// Event-to-message translation
pub mod translator;

/// ESP32 hardware binding
#[cfg(feature = "esp32")]
pub mod esp;

#[cfg(test)]
pub(crate) mod testing;
