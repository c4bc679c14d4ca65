//! Host-side test doubles for the radio, the event stack and the status LED.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::bringup::BringUpStep;
use crate::config::{AccessPointSettings, ApAddressing, Bandwidth, ConfigStorage, PowerSave};
use crate::driver::{RadioDriver, RadioMode};
use crate::error::SubscribeError;
use crate::events::{EventFamily, EventSink, EventSource, wifi_id};
use crate::signal::{Phase, StatusSignaler};

/// Everything observable that happened, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    EventLoop,
    Subscribe(EventFamily),
    Step(BringUpStep),
    Started,
    /// Family, id, number of sinks reached
    Delivered(EventFamily, i32, usize),
    Announce(Phase),
}

#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.0.borrow().contains(call)
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.0.borrow().iter().position(|c| c == call)
    }

    pub fn steps(&self) -> Vec<BringUpStep> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Step(step) => Some(*step),
                _ => None,
            })
            .collect()
    }

    pub fn announcements(&self) -> Vec<Phase> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Announce(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }
}

/// Synchronous stand-in for the radio stack's event loop.
pub struct EventHub<'a> {
    journal: Journal,
    sinks: RefCell<Vec<(EventFamily, &'a dyn EventSink)>>,
    event_loop: Cell<bool>,
    fail_event_loop: Cell<bool>,
    fail_family: Cell<Option<EventFamily>>,
}

impl<'a> EventHub<'a> {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            sinks: RefCell::new(Vec::new()),
            event_loop: Cell::new(false),
            fail_event_loop: Cell::new(false),
            fail_family: Cell::new(None),
        }
    }

    pub fn fail_event_loop(&self) {
        self.fail_event_loop.set(true);
    }

    pub fn fail_subscribe(&self, family: EventFamily) {
        self.fail_family.set(Some(family));
    }

    pub fn has_event_loop(&self) -> bool {
        self.event_loop.get()
    }

    pub fn subscribed_families(&self) -> Vec<EventFamily> {
        self.sinks.borrow().iter().map(|(family, _)| *family).collect()
    }

    /// Deliver one event to every sink registered for its family.
    pub fn deliver(&self, family: EventFamily, id: i32) {
        let mut reached = 0;
        for (registered, sink) in self.sinks.borrow().iter() {
            if *registered == family {
                sink.on_event(family, id);
                reached += 1;
            }
        }
        self.journal.push(Call::Delivered(family, id, reached));
    }
}

pub struct HubSource<'a> {
    hub: &'a EventHub<'a>,
}

impl<'a> HubSource<'a> {
    pub fn new(hub: &'a EventHub<'a>) -> Self {
        Self { hub }
    }
}

impl<'a> EventSource<'a> for HubSource<'a> {
    fn ensure_event_loop(&mut self) -> Result<(), SubscribeError> {
        self.hub.journal.push(Call::EventLoop);
        if self.hub.fail_event_loop.get() {
            return Err(SubscribeError::EventLoop);
        }
        self.hub.event_loop.set(true);
        Ok(())
    }

    fn subscribe(
        &mut self,
        family: EventFamily,
        sink: &'a dyn EventSink,
    ) -> Result<(), SubscribeError> {
        if self.hub.fail_family.get() == Some(family) {
            return Err(SubscribeError::Registration(family));
        }
        self.hub.sinks.borrow_mut().push((family, sink));
        self.hub.journal.push(Call::Subscribe(family));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError(pub BringUpStep);

/// Records every step, fails on request, and raises the start events through
/// the hub like the real radio does.
pub struct MockDriver<'a> {
    journal: Journal,
    hub: Option<&'a EventHub<'a>>,
    fail_at: Option<BringUpStep>,
    pub storage: Option<ConfigStorage>,
    pub mode: Option<RadioMode>,
    pub addressing: Option<ApAddressing>,
    pub applied: Option<AccessPointSettings>,
    pub bandwidth: Option<Bandwidth>,
    pub power_save: Option<PowerSave>,
    pub address_targets: Vec<&'static str>,
}

impl<'a> MockDriver<'a> {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            hub: None,
            fail_at: None,
            storage: None,
            mode: None,
            addressing: None,
            applied: None,
            bandwidth: None,
            power_save: None,
            address_targets: Vec::new(),
        }
    }

    pub fn with_hub(mut self, hub: &'a EventHub<'a>) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn failing_at(mut self, step: BringUpStep) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn step(&self, step: BringUpStep) -> Result<(), MockError> {
        self.journal.push(Call::Step(step));
        if self.fail_at == Some(step) {
            Err(MockError(step))
        } else {
            Ok(())
        }
    }
}

impl RadioDriver for MockDriver<'_> {
    type Interface = &'static str;
    type Error = MockError;

    fn init_network_stack(&mut self) -> Result<(), MockError> {
        self.step(BringUpStep::NetworkStack)
    }

    fn init_radio(&mut self, storage: ConfigStorage) -> Result<(), MockError> {
        self.step(BringUpStep::RadioInit)?;
        self.storage = Some(storage);
        Ok(())
    }

    fn create_station_interface(&mut self) -> Result<&'static str, MockError> {
        self.step(BringUpStep::StationInterface).map(|_| "sta")
    }

    fn create_access_point_interface(&mut self) -> Result<&'static str, MockError> {
        self.step(BringUpStep::AccessPointInterface).map(|_| "ap")
    }

    fn stop_address_service(&mut self, ap: &&'static str) -> Result<(), MockError> {
        self.address_targets.push(*ap);
        self.step(BringUpStep::StopAddressService)
    }

    fn set_static_address(
        &mut self,
        ap: &&'static str,
        addressing: &ApAddressing,
    ) -> Result<(), MockError> {
        self.address_targets.push(*ap);
        self.step(BringUpStep::StaticAddress)?;
        self.addressing = Some(*addressing);
        Ok(())
    }

    fn start_address_service(&mut self, ap: &&'static str) -> Result<(), MockError> {
        self.address_targets.push(*ap);
        self.step(BringUpStep::StartAddressService)
    }

    fn set_mode(&mut self, mode: RadioMode) -> Result<(), MockError> {
        self.step(BringUpStep::Mode)?;
        self.mode = Some(mode);
        Ok(())
    }

    fn apply_access_point(&mut self, settings: &AccessPointSettings) -> Result<(), MockError> {
        self.step(BringUpStep::ApplyAccessPoint)?;
        self.applied = Some(settings.clone());
        Ok(())
    }

    fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), MockError> {
        self.step(BringUpStep::Bandwidth)?;
        self.bandwidth = Some(bandwidth);
        Ok(())
    }

    fn set_power_save(&mut self, policy: PowerSave) -> Result<(), MockError> {
        self.step(BringUpStep::PowerSave)?;
        self.power_save = Some(policy);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), MockError> {
        self.step(BringUpStep::Start)?;
        self.journal.push(Call::Started);
        if let Some(hub) = self.hub {
            hub.deliver(EventFamily::WIFI, wifi_id::STA_START);
            hub.deliver(EventFamily::WIFI, wifi_id::AP_START);
        }
        Ok(())
    }
}

pub struct RecordingSignaler {
    journal: Journal,
}

impl RecordingSignaler {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl StatusSignaler for RecordingSignaler {
    async fn announce(&mut self, phase: Phase) {
        self.journal.push(Call::Announce(phase));
    }
}
