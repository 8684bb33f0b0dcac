//! PIO interrupt bindings shared by the strip drivers and the cyw43 radio driver.
//!
//! `bind_interrupts!` defines the interrupt handler symbols, so each PIO block is bound exactly
//! once here and every user takes its binding from this module.

::embassy_rp::bind_interrupts! {
    pub struct Pio0Irqs {
        PIO0_IRQ_0 => ::embassy_rp::pio::InterruptHandler<::embassy_rp::peripherals::PIO0>;
    }
}

::embassy_rp::bind_interrupts! {
    pub struct Pio1Irqs {
        PIO1_IRQ_0 => ::embassy_rp::pio::InterruptHandler<::embassy_rp::peripherals::PIO1>;
    }
}
