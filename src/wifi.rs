//! Wi-Fi station bring-up for the Pico W's CYW43439 radio.
//!
//! [`Wifi::new`] spawns one task that powers up the radio, starts the network stack and then
//! joins the configured access point, retrying a bounded number of times. The task keeps
//! rejoining after the link drops. Callers learn how the first connection attempt settled from
//! [`Wifi::wait`].
//!
//! ```no_run
//! # #![no_std]
//! # #![no_main]
//! # use panic_probe as _;
//! use strip_flicker::connection::WifiCredentials;
//! use strip_flicker::wifi::{Wifi, WifiNotifier};
//!
//! # async fn example(spawner: embassy_executor::Spawner) -> strip_flicker::Result<()> {
//! let p = embassy_rp::init(Default::default());
//! static WIFI_NOTIFIER: WifiNotifier = Wifi::notifier();
//!
//! let credentials = WifiCredentials::new("my-network", "my-password")?;
//! let wifi = Wifi::new(
//!     &WIFI_NOTIFIER,
//!     p.PIN_23,
//!     p.PIN_25,
//!     p.PIO0,
//!     p.PIN_24,
//!     p.PIN_29,
//!     p.DMA_CH0,
//!     credentials,
//!     spawner,
//! )?;
//! wifi.wait().await.into_result()?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::future::pending;
use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::Peri;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::Pio;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;
use embassy_sync::signal::Signal;
use embassy_time::{Timer, with_timeout};
use static_cell::StaticCell;

use crate::connection::{
    Connection, ConnectionAction, ConnectionEvent, ConnectionOutcome, ConnectionState,
    WifiCredentials,
};
use crate::pio_irqs::Pio0Irqs;
use crate::shared_constants::{CONNECT_RETRY_DELAY, DHCP_TIMEOUT, MAX_CONNECT_RETRIES};
use crate::{Error, Result};

/// Signal carrying the one-shot connection outcome.
pub type WifiOutcomeSignal = Signal<CriticalSectionRawMutex, ConnectionOutcome>;

/// Static resources for [`Wifi`]. Create with [`Wifi::notifier`].
pub struct WifiNotifier {
    outcome: WifiOutcomeSignal,
    stack: OnceLock<Stack<'static>>,
    wifi_cell: StaticCell<Wifi>,
}

/// Handle to the station connection and its network stack.
pub struct Wifi {
    outcome: &'static WifiOutcomeSignal,
    stack: &'static OnceLock<Stack<'static>>,
}

impl Wifi {
    #[must_use]
    pub const fn notifier() -> WifiNotifier {
        WifiNotifier {
            outcome: Signal::new(),
            stack: OnceLock::new(),
            wifi_cell: StaticCell::new(),
        }
    }

    /// Starts the radio and the connection task.
    ///
    /// # Arguments
    ///
    /// * `pin_23` - radio power (GPIO 23)
    /// * `pin_25` - radio chip select (GPIO 25)
    /// * `pio0` - PIO block that runs the radio's SPI program
    /// * `pin_24` - radio data (GPIO 24)
    /// * `pin_29` - radio clock (GPIO 29)
    /// * `dma_ch0` - DMA channel for the radio SPI
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskSpawn`] if the connection task cannot be spawned.
    pub fn new(
        notifier: &'static WifiNotifier,
        pin_23: Peri<'static, PIN_23>,
        pin_25: Peri<'static, PIN_25>,
        pio0: Peri<'static, PIO0>,
        pin_24: Peri<'static, PIN_24>,
        pin_29: Peri<'static, PIN_29>,
        dma_ch0: Peri<'static, DMA_CH0>,
        credentials: WifiCredentials,
        spawner: Spawner,
    ) -> Result<&'static Self> {
        let token = wifi_device_loop(
            pin_23,
            pin_25,
            pio0,
            pin_24,
            pin_29,
            dma_ch0,
            credentials,
            &notifier.outcome,
            &notifier.stack,
            spawner,
        )
        .map_err(Error::TaskSpawn)?;
        spawner.spawn(token);
        Ok(notifier.wifi_cell.init(Self {
            outcome: &notifier.outcome,
            stack: &notifier.stack,
        }))
    }

    /// Waits for the first connection attempt to settle.
    ///
    /// Resolves once, with either `Connected` or `Failed` after the retry budget is spent.
    pub async fn wait(&self) -> ConnectionOutcome {
        self.outcome.wait().await
    }

    /// Waits for the network stack to exist and returns it.
    pub async fn stack(&self) -> Stack<'static> {
        *self.stack.get().await
    }
}

#[embassy_executor::task]
async fn wifi_device_loop(
    pin_23: Peri<'static, PIN_23>,
    pin_25: Peri<'static, PIN_25>,
    pio0: Peri<'static, PIO0>,
    pin_24: Peri<'static, PIN_24>,
    pin_29: Peri<'static, PIN_29>,
    dma_ch0: Peri<'static, DMA_CH0>,
    credentials: WifiCredentials,
    outcome: &'static WifiOutcomeSignal,
    stack_lock: &'static OnceLock<Stack<'static>>,
    spawner: Spawner,
) -> ! {
    info!("[WIFI] station init, {}", credentials);

    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let pwr = Output::new(pin_23, Level::Low);
    let cs = Output::new(pin_25, Level::High);
    let mut pio = Pio::new(pio0, Pio0Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        pin_24,
        pin_29,
        dma_ch0,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    let wifi_token = unwrap!(wifi_task(runner));
    spawner.spawn(wifi_token);

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = Config::dhcpv4(Default::default());
    let seed = 0x5f3a_c19e_72d4_0b86;

    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::<3>::new()),
        seed,
    );
    let net_token = unwrap!(net_task(runner));
    spawner.spawn(net_token);
    if stack_lock.init(stack).is_err() {
        warn!("[WIFI] network stack was already published");
    }

    info!("[WIFI] radio up, joining");

    let mut connection = Connection::new(MAX_CONNECT_RETRIES);
    let mut action = connection.handle(ConnectionEvent::Started);
    loop {
        match action {
            ConnectionAction::Connect | ConnectionAction::None => {}
            ConnectionAction::Complete(ConnectionOutcome::Connected) => {
                info!("[WIFI] connected to ap SSID:{}", credentials.ssid.as_str());
                outcome.signal(ConnectionOutcome::Connected);
            }
            ConnectionAction::Complete(ConnectionOutcome::Failed { attempts }) => {
                warn!(
                    "[WIFI] Failed to connect to SSID:{} after {} attempts",
                    credentials.ssid.as_str(),
                    attempts
                );
                outcome.signal(ConnectionOutcome::Failed { attempts });
            }
        }

        let event = match connection.state() {
            ConnectionState::Connecting { .. } => {
                join(&mut control, stack, &credentials).await
            }
            ConnectionState::Connected => {
                stack.wait_link_down().await;
                warn!("[WIFI] link down");
                ConnectionEvent::Disconnected
            }
            ConnectionState::Disconnected | ConnectionState::Failed { .. } => pending().await,
        };

        action = connection.handle(event);
        if action == ConnectionAction::Connect {
            info!("[WIFI] retry to connect to the AP");
            Timer::after(CONNECT_RETRY_DELAY).await;
        }
    }
}

/// One join attempt, including the wait for a DHCP lease.
async fn join(
    control: &mut cyw43::Control<'static>,
    stack: Stack<'static>,
    credentials: &WifiCredentials,
) -> ConnectionEvent {
    let options = if credentials.is_open() {
        JoinOptions::new_open()
    } else {
        JoinOptions::new(credentials.password.as_bytes())
    };
    if let Err(err) = control.join(credentials.ssid.as_str(), options).await {
        warn!("[WIFI] connect to the AP fail (status {})", err.status);
        return ConnectionEvent::Disconnected;
    }

    if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
        warn!("[WIFI] connect to the AP fail (no DHCP lease)");
        control.leave().await;
        return ConnectionEvent::Disconnected;
    }

    if let Some(config) = stack.config_v4() {
        info!("[WIFI] got ip:{}", config.address);
    }
    ConnectionEvent::GotIp
}

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
