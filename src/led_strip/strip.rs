// PIO bus sharing and the per-strip driver loop.
//
// See [`define_led_strips!`] for the main usage example.

use core::cell::RefCell;
use embassy_rp::pio::{Common, Instance};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program, RgbColorOrder};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;

use super::{
    LedStripCommand, LedStripCommandSignal, LedStripCompletionSignal, apply_max_brightness,
};

// ============================================================================
// PIO Bus - Shared PIO resource for multiple LED strips
// ============================================================================

/// Trait for PIO peripherals that can be used with LED strips.
///
/// Implemented below for PIO0 and PIO1 with the crate-level interrupt bindings.
#[doc(hidden)] // Required pub for macro expansion in the demo crate
pub trait LedStripPio: Instance {
    type Irqs: embassy_rp::interrupt::typelevel::Binding<
            <Self as Instance>::Interrupt,
            embassy_rp::pio::InterruptHandler<Self>,
        >;

    fn irqs() -> Self::Irqs;
}

/// A state machine bundled with the PIO bus it belongs to.
///
/// Returned by the generated `pioN_split` functions and passed to strip constructors.
#[doc(hidden)]
pub struct PioStateMachine<PIO: Instance + 'static, const SM: usize> {
    pio_bus: &'static PioBus<'static, PIO>,
    state_machine: embassy_rp::pio::StateMachine<'static, PIO, SM>,
}

impl<PIO: Instance + 'static, const SM: usize> PioStateMachine<PIO, SM> {
    pub fn new(
        pio_bus: &'static PioBus<'static, PIO>,
        state_machine: embassy_rp::pio::StateMachine<'static, PIO, SM>,
    ) -> Self {
        Self {
            pio_bus,
            state_machine,
        }
    }

    pub fn into_parts(
        self,
    ) -> (
        &'static PioBus<'static, PIO>,
        embassy_rp::pio::StateMachine<'static, PIO, SM>,
    ) {
        (self.pio_bus, self.state_machine)
    }
}

/// Shared PIO `Common` plus the WS2812 program, loaded once per PIO block.
#[doc(hidden)]
pub struct PioBus<'d, PIO: Instance> {
    common: Mutex<CriticalSectionRawMutex, RefCell<Common<'d, PIO>>>,
    ws2812_program: OnceLock<PioWs2812Program<'d, PIO>>,
}

impl<'d, PIO: Instance> PioBus<'d, PIO> {
    pub fn new(common: Common<'d, PIO>) -> Self {
        Self {
            common: Mutex::new(RefCell::new(common)),
            ws2812_program: OnceLock::new(),
        }
    }

    /// Get or load the WS2812 program. Every state machine on this PIO shares it.
    pub fn program(&'static self) -> &'static PioWs2812Program<'d, PIO> {
        self.ws2812_program
            .get_or_init(|| self.with_common(|common| PioWs2812Program::new(common)))
    }

    pub fn with_common<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Common<'d, PIO>) -> R,
    {
        self.common.lock(|common_cell: &RefCell<Common<'d, PIO>>| {
            let mut common = common_cell.borrow_mut();
            f(&mut common)
        })
    }
}

impl LedStripPio for embassy_rp::peripherals::PIO0 {
    type Irqs = crate::pio_irqs::Pio0Irqs;

    fn irqs() -> Self::Irqs {
        crate::pio_irqs::Pio0Irqs
    }
}

impl LedStripPio for embassy_rp::peripherals::PIO1 {
    type Irqs = crate::pio_irqs::Pio1Irqs;

    fn irqs() -> Self::Irqs {
        crate::pio_irqs::Pio1Irqs
    }
}

// ============================================================================
// Driver loop
// ============================================================================

/// Body of every generated strip task: wait for a frame, cap it, shift it out, echo its sequence
/// number.
#[doc(hidden)] // Required pub for macro expansion in the demo crate
pub async fn led_strip_driver_loop<PIO, const SM: usize, const N: usize, ORDER>(
    mut driver: PioWs2812<'static, PIO, SM, N, ORDER>,
    command_signal: &'static LedStripCommandSignal<N>,
    completion_signal: &'static LedStripCompletionSignal,
    max_brightness: u8,
) -> !
where
    PIO: Instance,
    ORDER: RgbColorOrder,
{
    loop {
        let LedStripCommand {
            sequence,
            mut frame,
        } = command_signal.wait().await;
        apply_max_brightness(&mut frame, max_brightness);
        driver.write(&frame).await;
        completion_signal.signal(sequence);
    }
}

// ============================================================================
// Macros
// ============================================================================

/// Creates PIO-based strip types with per-strip driver tasks and brightness limiting.
///
/// The macro generates:
/// - a `pio0_split()` / `pio1_split()` function that splits the PIO into its four state machines
/// - one type per strip with a `new()` constructor that spawns the strip's driver task
///
/// Each generated type derefs to [`LedStrip`](crate::led_strip::LedStrip), so `refresh` and
/// `clear` are called directly.
///
/// ```ignore
/// define_led_strips! {
///     pio: PIO1,
///     strips: [
///         Gpio13LedStrip { sm: 0, dma: DMA_CH1, pin: PIN_13, len: 300, max_current: Milliamps(18_000) },
///     ]
/// }
///
/// let (sm0, _sm1, _sm2, _sm3) = pio_split!(p.PIO1);
/// let strip = Gpio13LedStrip::new(sm0, p.DMA_CH1, p.PIN_13, spawner)?;
/// strip.clear(Duration::from_millis(100)).await?;
/// ```
#[macro_export]
macro_rules! define_led_strips {
    (
        pio: $pio:ident,
        strips: [
            $(
                $module:ident {
                    sm: $sm_index:tt,
                    dma: $dma:ident,
                    pin: $pin:ident,
                    len: $len:expr,
                    max_current: $max_current:expr $(,)?
                }
            ),+ $(,)?
        ] $(,)?
    ) => {
        paste::paste! {
            static [<$pio _BUS>]: ::static_cell::StaticCell<
                $crate::led_strip::PioBus<'static, ::embassy_rp::peripherals::$pio>
            > = ::static_cell::StaticCell::new();

            /// Split the PIO into its shared bus and four state machines.
            pub fn [<$pio:lower _split>](
                pio: ::embassy_rp::Peri<'static, ::embassy_rp::peripherals::$pio>,
            ) -> (
                $crate::led_strip::PioStateMachine<::embassy_rp::peripherals::$pio, 0>,
                $crate::led_strip::PioStateMachine<::embassy_rp::peripherals::$pio, 1>,
                $crate::led_strip::PioStateMachine<::embassy_rp::peripherals::$pio, 2>,
                $crate::led_strip::PioStateMachine<::embassy_rp::peripherals::$pio, 3>,
            ) {
                let ::embassy_rp::pio::Pio { common, sm0, sm1, sm2, sm3, .. } = ::embassy_rp::pio::Pio::new(
                    pio,
                    <::embassy_rp::peripherals::$pio as $crate::led_strip::LedStripPio>::irqs(),
                );
                let pio_bus = [<$pio _BUS>].init($crate::led_strip::PioBus::new(common));
                (
                    $crate::led_strip::PioStateMachine::new(pio_bus, sm0),
                    $crate::led_strip::PioStateMachine::new(pio_bus, sm1),
                    $crate::led_strip::PioStateMachine::new(pio_bus, sm2),
                    $crate::led_strip::PioStateMachine::new(pio_bus, sm3),
                )
            }

            $(
                #[doc = concat!(
                    "LED strip on `", stringify!($pin), "` generated by `define_led_strips!`. ",
                    "Derefs to `LedStrip`."
                )]
                pub struct $module {
                    strip: $crate::led_strip::LedStrip<{ $len }>,
                }

                impl $module {
                    pub const LEN: usize = $len;
                    pub const MAX_BRIGHTNESS: u8 = $max_current.max_brightness($len);

                    pub fn new(
                        state_machine: $crate::led_strip::PioStateMachine<::embassy_rp::peripherals::$pio, $sm_index>,
                        dma: ::embassy_rp::Peri<'static, ::embassy_rp::peripherals::$dma>,
                        pin: ::embassy_rp::Peri<'static, ::embassy_rp::peripherals::$pin>,
                        spawner: ::embassy_executor::Spawner,
                    ) -> $crate::Result<&'static Self> {
                        static STRIP_STATIC: $crate::led_strip::LedStripStatic<{ $len }> =
                            $crate::led_strip::LedStrip::new_static();
                        static STRIP_CELL: ::static_cell::StaticCell<$module> =
                            ::static_cell::StaticCell::new();
                        let (pio_bus, sm) = state_machine.into_parts();
                        let token = [<$module:snake _driver_task>](
                            pio_bus,
                            sm,
                            dma,
                            pin,
                            STRIP_STATIC.command_signal(),
                            STRIP_STATIC.completion_signal(),
                        )
                        .map_err($crate::Error::TaskSpawn)?;
                        spawner.spawn(token);
                        let strip = $crate::led_strip::LedStrip::new(&STRIP_STATIC);
                        Ok(STRIP_CELL.init(Self { strip }))
                    }
                }

                impl ::core::ops::Deref for $module {
                    type Target = $crate::led_strip::LedStrip<{ $len }>;

                    fn deref(&self) -> &Self::Target {
                        &self.strip
                    }
                }

                #[::embassy_executor::task]
                async fn [<$module:snake _driver_task>](
                    pio_bus: &'static $crate::led_strip::PioBus<'static, ::embassy_rp::peripherals::$pio>,
                    sm: ::embassy_rp::pio::StateMachine<'static, ::embassy_rp::peripherals::$pio, $sm_index>,
                    dma: ::embassy_rp::Peri<'static, ::embassy_rp::peripherals::$dma>,
                    pin: ::embassy_rp::Peri<'static, ::embassy_rp::peripherals::$pin>,
                    command_signal: &'static $crate::led_strip::LedStripCommandSignal<{ $len }>,
                    completion_signal: &'static $crate::led_strip::LedStripCompletionSignal,
                ) -> ! {
                    let program = pio_bus.program();
                    let driver = pio_bus.with_common(|common| {
                        ::embassy_rp::pio_programs::ws2812::PioWs2812::<
                            ::embassy_rp::peripherals::$pio,
                            $sm_index,
                            { $len },
                            _
                        >::new(common, sm, dma, pin, program)
                    });
                    $crate::led_strip::led_strip_driver_loop(
                        driver,
                        command_signal,
                        completion_signal,
                        $module::MAX_BRIGHTNESS,
                    )
                    .await
                }
            )+
        }
    };
}

/// Calls the `pio0_split` / `pio1_split` function generated by [`define_led_strips!`].
#[macro_export]
macro_rules! pio_split {
    ($p:ident . PIO0) => {
        pio0_split($p.PIO0)
    };
    ($p:ident . PIO1) => {
        pio1_split($p.PIO1)
    };
}
