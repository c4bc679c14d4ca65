//! Phase announcements.
//!
//! The worker reports progress through a [`StatusSignaler`]. On the board this
//! is the on-board LED, blinked with a pattern per phase.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Progress phases worth announcing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Wi-Fi initialization
    Init,
    /// HTTP frontend started
    FrontendStarted,
    /// Station connected and addressed
    StationConnected,
}

/// LED timing for a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkPattern {
    /// Number of on/off pulses
    pub pulses: u8,
    /// On time per pulse
    pub on_ms: u32,
    /// Off time per pulse
    pub off_ms: u32,
}

/// Short single pulse during initialization
pub const INIT_BLINK: BlinkPattern = BlinkPattern {
    pulses: 1,
    on_ms: 30,
    off_ms: 30,
};

/// Single pulse when the frontend starts
pub const FRONTEND_BLINK: BlinkPattern = BlinkPattern {
    pulses: 1,
    on_ms: 100,
    off_ms: 100,
};

/// Double pulse when the station is connected
pub const CONNECTED_BLINK: BlinkPattern = BlinkPattern {
    pulses: 2,
    on_ms: 100,
    off_ms: 100,
};

impl Phase {
    /// LED pattern for this phase.
    pub const fn pattern(self) -> BlinkPattern {
        match self {
            Self::Init => INIT_BLINK,
            Self::FrontendStarted => FRONTEND_BLINK,
            Self::StationConnected => CONNECTED_BLINK,
        }
    }
}

/// Fire-and-forget phase announcement. Returns once the signal has finished.
#[allow(async_fn_in_trait)]
pub trait StatusSignaler {
    /// Announce `phase`.
    async fn announce(&mut self, phase: Phase);
}

/// Blinks an LED pin.
pub struct LedSignaler<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> LedSignaler<P, D> {
    /// Drive `pin`, timing pulses with `delay`.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Give the pin and delay back.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    async fn blink(&mut self, pattern: BlinkPattern) {
        for _ in 0..pattern.pulses {
            // A stuck LED must not stall the worker.
            let _ = self.pin.set_high();
            self.delay.delay_ms(pattern.on_ms).await;
            let _ = self.pin.set_low();
            self.delay.delay_ms(pattern.off_ms).await;
        }
    }
}

impl<P: OutputPin, D: DelayNs> StatusSignaler for LedSignaler<P, D> {
    async fn announce(&mut self, phase: Phase) {
        self.blink(phase.pattern()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;

    #[derive(Debug, PartialEq, Eq)]
    enum Trace {
        High,
        Low,
        Wait(u32),
    }

    #[derive(Default)]
    struct FakePin(Vec<Trace>);

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.push(Trace::High);
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.push(Trace::Low);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDelay(Vec<u32>);

    impl DelayNs for FakeDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.0.push(ns / 1_000_000);
        }
        async fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    fn run(phase: Phase) -> Vec<Trace> {
        let mut led = LedSignaler::new(FakePin::default(), FakeDelay::default());
        block_on(led.announce(phase));
        let (pin, delay) = led.release();
        // Interleave pin edges with the waits that followed them.
        pin.0
            .into_iter()
            .zip(delay.0)
            .flat_map(|(edge, ms)| [edge, Trace::Wait(ms)])
            .collect()
    }

    #[test]
    fn test_init_is_short_single_pulse() {
        assert_eq!(
            run(Phase::Init),
            vec![Trace::High, Trace::Wait(30), Trace::Low, Trace::Wait(30)]
        );
    }

    #[test]
    fn test_frontend_is_single_pulse() {
        assert_eq!(
            run(Phase::FrontendStarted),
            vec![Trace::High, Trace::Wait(100), Trace::Low, Trace::Wait(100)]
        );
    }

    #[test]
    fn test_station_connected_is_double_pulse() {
        assert_eq!(
            run(Phase::StationConnected),
            vec![
                Trace::High,
                Trace::Wait(100),
                Trace::Low,
                Trace::Wait(100),
                Trace::High,
                Trace::Wait(100),
                Trace::Low,
                Trace::Wait(100),
            ]
        );
    }
}
