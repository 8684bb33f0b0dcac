//! Sweeps the upper half of several 300-LED strips around the color wheel while the lower half
//! holds a fixed red, optionally with the Wi-Fi radio associated, and reports slow refreshes.
//!
//! With `wifi` the radio owns PIO0, so four strips run on PIO1. Without it, two more strips run
//! on PIO0.
#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Timer;
use panic_probe as _;
use strip_flicker::led_strip::{Frame, LedStrips};
use strip_flicker::refresh_stats::RefreshStats;
use strip_flicker::shared_constants::{
    CLEAR_TIMEOUT, FRAME_DELAY, HOLD_COLOR, LED_COUNT, LED_CURRENT_BUDGET, REFRESH_BUDGET_US,
    REFRESH_TIMEOUT,
};
use strip_flicker::sweep::{HueSweep, fill_split_frame, sweep_color};
use strip_flicker::{Never, Result, define_led_strips, pio_split};

#[cfg(feature = "wifi")]
const STRIP_COUNT: usize = 4;
#[cfg(not(feature = "wifi"))]
const STRIP_COUNT: usize = 6;

define_led_strips! {
    pio: PIO1,
    strips: [
        Gpio13LedStrip {
            sm: 0,
            dma: DMA_CH1,
            pin: PIN_13,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        },
        Gpio15LedStrip {
            sm: 1,
            dma: DMA_CH2,
            pin: PIN_15,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        },
        Gpio17LedStrip {
            sm: 2,
            dma: DMA_CH3,
            pin: PIN_17,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        },
        Gpio16LedStrip {
            sm: 3,
            dma: DMA_CH4,
            pin: PIN_16,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        }
    ]
}

#[cfg(not(feature = "wifi"))]
define_led_strips! {
    pio: PIO0,
    strips: [
        Gpio4LedStrip {
            sm: 0,
            dma: DMA_CH5,
            pin: PIN_4,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        },
        Gpio2LedStrip {
            sm: 1,
            dma: DMA_CH6,
            pin: PIN_2,
            len: LED_COUNT,
            max_current: LED_CURRENT_BUDGET
        }
    ]
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Never> {
    info!("[APP] Startup..");
    info!("[APP] WS2812 flicker demo v{}", env!("CARGO_PKG_VERSION"));
    let p = embassy_rp::init(Default::default());

    #[cfg(feature = "wifi")]
    {
        use defmt::{Debug2Format, warn};
        use strip_flicker::connection::WifiCredentials;
        use strip_flicker::wifi::{Wifi, WifiNotifier};

        static WIFI_NOTIFIER: WifiNotifier = Wifi::notifier();
        let credentials = WifiCredentials::new(env!("WIFI_SSID"), env!("WIFI_PASS"))?;
        let wifi = Wifi::new(
            &WIFI_NOTIFIER,
            p.PIN_23,
            p.PIN_25,
            p.PIO0,
            p.PIN_24,
            p.PIN_29,
            p.DMA_CH0,
            credentials,
            spawner,
        )?;
        // The strips still run without a network.
        if let Err(err) = wifi.wait().await.into_result() {
            warn!("[APP] {}", Debug2Format(&err));
        }
    }

    let _led_power = Output::new(p.PIN_22, Level::High);

    let (sm0, sm1, sm2, sm3) = pio_split!(p.PIO1);
    let gpio13 = Gpio13LedStrip::new(sm0, p.DMA_CH1, p.PIN_13, spawner)?;
    let gpio15 = Gpio15LedStrip::new(sm1, p.DMA_CH2, p.PIN_15, spawner)?;
    let gpio17 = Gpio17LedStrip::new(sm2, p.DMA_CH3, p.PIN_17, spawner)?;
    let gpio16 = Gpio16LedStrip::new(sm3, p.DMA_CH4, p.PIN_16, spawner)?;

    #[cfg(feature = "wifi")]
    let strips: LedStrips<LED_COUNT, STRIP_COUNT> =
        LedStrips::new([&**gpio13, &**gpio15, &**gpio17, &**gpio16]);

    #[cfg(not(feature = "wifi"))]
    let strips: LedStrips<LED_COUNT, STRIP_COUNT> = {
        let (sm0, sm1, _sm2, _sm3) = pio_split!(p.PIO0);
        let gpio4 = Gpio4LedStrip::new(sm0, p.DMA_CH5, p.PIN_4, spawner)?;
        let gpio2 = Gpio2LedStrip::new(sm1, p.DMA_CH6, p.PIN_2, spawner)?;
        LedStrips::new([
            &**gpio13, &**gpio15, &**gpio17, &**gpio16, &**gpio4, &**gpio2,
        ])
    };

    info!(
        "[APP] {} strips x {} LEDs, brightness cap {}",
        STRIP_COUNT,
        LED_COUNT,
        Gpio13LedStrip::MAX_BRIGHTNESS
    );
    strips.clear_all(CLEAR_TIMEOUT).await?;

    info!("[APP] LED Test Start");
    let mut hue_sweep = HueSweep::new();
    let mut frame = Frame::<LED_COUNT>::new();
    let mut stats = RefreshStats::new(REFRESH_BUDGET_US);
    loop {
        let hue = hue_sweep.advance();
        fill_split_frame(&mut frame, sweep_color(hue), HOLD_COLOR);
        strips.refresh_all(&frame, REFRESH_TIMEOUT, &mut stats).await;

        // One summary per turn of the color wheel.
        if hue == 0 {
            info!(
                "[APP] {} refreshes, {} late, {} timed out, mean {} us, worst {} us (budget {} us)",
                stats.refreshes(),
                stats.late(),
                stats.timeouts(),
                stats.mean_us(),
                stats.worst_us(),
                stats.budget_us()
            );
            stats.reset();
        }

        Timer::after(FRAME_DELAY).await;
    }
}
