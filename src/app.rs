//! Wi-Fi application context and dispatch worker.
//!
//! [`AppContext`] is the process-wide state shared between producers, the
//! event callback and the worker: the message queue and the translator. It
//! needs no lock, so it can live in a plain `static`.
//!
//! [`Worker`] owns everything else. It subscribes to events, brings the radio
//! up once, queues its own first message, and then dispatches messages one at
//! a time for as long as the process lives.

use core::convert::Infallible;

use embassy_sync::once_lock::OnceLock;
use log::{debug, info, warn};

use crate::bringup::{RadioInterfaces, bring_up};
use crate::config::BringUpConfig;
use crate::driver::RadioDriver;
use crate::error::BringUpError;
use crate::events::{EventFamily, EventSink, EventSource, subscribe_events};
use crate::message::{AppMessage, MessageKind};
use crate::queue::AppQueue;
use crate::signal::{Phase, StatusSignaler};
use crate::translator::{EventTranslator, Wiring};

/// Shared application state.
///
/// Producers are held back until the worker has queued its own first message,
/// so that message is always dispatched first and the worker never waits on
/// its own queue.
pub struct AppContext {
    queue: AppQueue,
    translator: EventTranslator,
    ready: OnceLock<()>,
}

impl AppContext {
    /// Empty queue, translator with `wiring`, worker not ready.
    pub const fn new(wiring: Wiring) -> Self {
        Self {
            queue: AppQueue::new(),
            translator: EventTranslator::new(wiring),
            ready: OnceLock::new(),
        }
    }

    /// Enqueue a message for the worker.
    ///
    /// Waits until the worker is ready, then while the queue is full.
    pub async fn send_message(&self, kind: MessageKind) -> bool {
        self.ready.get().await;
        self.queue.send(kind).await
    }

    /// Enqueue without waiting; `false` if the worker is not ready or the queue is full.
    pub fn try_send_message(&self, kind: MessageKind) -> bool {
        self.is_ready() && self.queue.try_send(kind).is_ok()
    }

    /// `true` once the worker has finished bring-up.
    pub fn is_ready(&self) -> bool {
        self.ready.try_get().is_some()
    }

    /// Number of undelivered messages.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The event translator.
    pub fn translator(&self) -> &EventTranslator {
        &self.translator
    }

    fn open(&self) {
        // Only the worker opens the gate, once.
        let _ = self.ready.init(());
    }
}

impl EventSink for AppContext {
    fn on_event(&self, family: EventFamily, id: i32) {
        let queue = self.is_ready().then_some(&self.queue);
        self.translator.translate(queue, family, id);
    }
}

/// Worker lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerState {
    /// Created, not yet started
    Uninitialized,
    /// Subscribing and running the radio bring-up
    BringingUp,
    /// Waiting for the next message
    ReadyIdle,
    /// Executing a message
    Dispatching,
}

/// What one dispatch did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// A phase was announced.
    Announced(Phase),
    /// Logged only.
    Observed,
    /// Unrecognized kind, nothing done.
    Ignored,
}

/// The single consumer of the message queue.
pub struct Worker<'a, D: RadioDriver, S, L> {
    ctx: &'a AppContext,
    config: &'a BringUpConfig,
    driver: D,
    events: S,
    signaler: L,
    state: WorkerState,
    interfaces: Option<RadioInterfaces<D::Interface>>,
}

impl<'a, D, S, L> Worker<'a, D, S, L>
where
    D: RadioDriver,
    S: EventSource<'a>,
    L: StatusSignaler,
{
    /// Worker over `ctx`, not yet started.
    pub fn new(
        ctx: &'a AppContext,
        config: &'a BringUpConfig,
        driver: D,
        events: S,
        signaler: L,
    ) -> Self {
        Self {
            ctx,
            config,
            driver,
            events,
            signaler,
            state: WorkerState::Uninitialized,
            interfaces: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Interface handles, once bring-up has finished.
    pub fn interfaces(&self) -> Option<&RadioInterfaces<D::Interface>> {
        self.interfaces.as_ref()
    }

    /// Subscribe to events, bring the radio up and queue the first message.
    ///
    /// Subscription happens first so no event raised by the radio start is
    /// missed. Producers are released only after the first message is queued.
    /// On error the worker stays in `BringingUp` and producers stay held.
    pub async fn start(&mut self) -> Result<(), BringUpError<D::Error>> {
        self.state = WorkerState::BringingUp;
        info!("Starting wifi application");

        subscribe_events(&mut self.events, self.ctx).map_err(BringUpError::Events)?;
        let interfaces = bring_up(&mut self.driver, self.config).await?;
        self.interfaces = Some(interfaces);

        // The gate is still closed, so the queue is empty and this cannot fail.
        if self.ctx.queue.try_send(MessageKind::BringUpHttpFrontend).is_err() {
            warn!("queue not empty at bring-up");
        }
        self.signaler.announce(Phase::Init).await;
        self.state = WorkerState::ReadyIdle;
        self.ctx.open();
        Ok(())
    }

    /// Wait for the next message and execute it.
    pub async fn dispatch_next(&mut self) -> Action {
        let msg = self.ctx.queue.receive().await;
        self.state = WorkerState::Dispatching;
        let action = self.dispatch(msg).await;
        self.state = WorkerState::ReadyIdle;
        action
    }

    async fn dispatch(&mut self, msg: AppMessage) -> Action {
        match msg.kind {
            MessageKind::BringUpHttpFrontend => {
                info!("{}", msg.kind.name());
                // The HTTP frontend hooks in here.
                self.signaler.announce(Phase::FrontendStarted).await;
                Action::Announced(Phase::FrontendStarted)
            }
            MessageKind::StationConnectRequested => {
                info!("{}", msg.kind.name());
                Action::Observed
            }
            MessageKind::StationGotAddress => {
                info!("{}", msg.kind.name());
                self.signaler.announce(Phase::StationConnected).await;
                Action::Announced(Phase::StationConnected)
            }
            MessageKind::Unrecognized(raw) => {
                debug!("ignoring message kind {}", raw);
                Action::Ignored
            }
        }
    }

    /// Start, then dispatch forever. Returns only if bring-up fails.
    pub async fn run(mut self) -> Result<Infallible, BringUpError<D::Error>> {
        self.start().await?;
        loop {
            self.dispatch_next().await;
        }
    }
}
