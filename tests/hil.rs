//! On-device tests. Flash with `cargo test --features esp32 --test hil`.

#![no_std]
#![no_main]

use panic_rtt_target as _;

esp_bootloader_esp_idf::esp_app_desc!();

#[cfg(test)]
#[embedded_test::tests(default_timeout = 30, executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use embassy_executor::Spawner;
    use embassy_time::{Delay, Duration, Instant, Timer};
    use esp_hal::clock::CpuClock;
    use esp_hal::gpio::{Level, Output, OutputConfig};
    use esp_hal::peripherals::Peripherals;
    use esp_hal::timer::timg::TimerGroup;
    use wifi_app::app::{Worker, WorkerState};
    use wifi_app::config::BringUpConfig;
    use wifi_app::esp::{APP, EspEventSource, EspRadio, allocator};
    use wifi_app::signal::{LedSignaler, Phase, StatusSignaler};

    static CONFIG: BringUpConfig = BringUpConfig::DEFAULT;

    #[init]
    fn init() -> Peripherals {
        rtt_target::rtt_init_defmt!();
        let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
        let peripherals = esp_hal::init(config);
        allocator::init_heap();
        let timg0 = TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
        peripherals
    }

    #[test]
    async fn connected_pattern_takes_two_periods(p: Peripherals) {
        let led = Output::new(p.GPIO18, Level::Low, OutputConfig::default());
        let mut signaler = LedSignaler::new(led, Delay);

        let begin = Instant::now();
        signaler.announce(Phase::StationConnected).await;
        assert!(begin.elapsed() >= Duration::from_millis(400));

        let (led, _) = signaler.release();
        assert!(led.is_set_low());
    }

    #[test]
    async fn bring_up_reaches_idle(p: Peripherals) {
        let spawner = Spawner::for_current_executor().await;
        let led = Output::new(p.GPIO18, Level::Low, OutputConfig::default());
        let mut worker = Worker::new(
            &APP,
            &CONFIG,
            EspRadio::new(spawner, p.WIFI),
            EspEventSource,
            LedSignaler::new(led, Delay),
        );

        assert!(worker.start().await.is_ok());
        assert_eq!(worker.state(), WorkerState::ReadyIdle);
        assert!(worker.interfaces().is_some());

        // The frontend message queued by start is waiting and producers are released.
        Timer::after(Duration::from_millis(500)).await;
        assert_eq!(APP.pending(), 1);
        assert!(APP.is_ready());
    }
}
