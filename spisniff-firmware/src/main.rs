//! spisniff - passive display-bus sniffer firmware
//!
//! Listens to the SPI link between a host and a monochrome panel, decodes
//! the row-update protocol into an in-memory framebuffer and reports
//! diagnostics over defmt.
//!
//! Capture runs entirely in interrupt context:
//!
//! - `DMA_IRQ_1` services completed ring halves
//! - the boundary task, on an interrupt executor at the same priority,
//!   services chip-select edges
//!
//! The thread-mode executor only runs the report task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Common, Pio};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use spisniff_core::Sniffer;
use spisniff_hal_rp2040::{CaptureBuffer, ChipSelectEdge, PingPongDma, SpiCapture};

#[macro_use]
mod config;
mod capture;
mod tasks;

use crate::config::{CS_PIN, HALF_CAPACITY, REPORT_INTERVAL_MS};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

/// Executor for the boundary task, driven by `SWI_IRQ_1`
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

// Static cells for capture hardware (must live forever)
static CAPTURE_BUFFER: StaticCell<CaptureBuffer<HALF_CAPACITY>> = StaticCell::new();
static PIO_COMMON: StaticCell<Common<'static, PIO0>> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("spisniff firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let sniffer_config = config::sniffer_config();
    info!(
        "Screen {}x{}, ring 2x{} bytes",
        sniffer_config.geometry.width,
        sniffer_config.geometry.height,
        HALF_CAPACITY
    );

    // Pin assignments come from sniffer.toml
    let (mosi, sck, cs) = take_capture_pins!(p);

    // Setup PIO0 as the passive SPI receiver
    let Pio { common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let common = PIO_COMMON.init(common);
    let mut spi = SpiCapture::new(common, sm0, mosi, sck);

    info!("PIO receiver initialized");

    // Chain DMA channels 0 and 1 into the capture ring
    let buffer = CAPTURE_BUFFER.init(CaptureBuffer::new());
    let dma = PingPongDma::new(p.DMA_CH0, p.DMA_CH1, buffer, spi.rx_source());

    let sniffer = unwrap!(Sniffer::new(dma, sniffer_config));
    capture::install(sniffer);
    capture::enable_half_complete_irq();

    info!("Capture ring armed");

    // Chip-select edges drive the boundary monitor
    let cs = Input::new(cs, Pull::Up);
    let edge = ChipSelectEdge::new(CS_PIN);

    interrupt::SWI_IRQ_1.set_priority(capture::CAPTURE_PRIORITY);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    // Spawn tasks
    high_spawner.spawn(tasks::boundary_task(cs, edge)).unwrap();
    spawner.spawn(tasks::report_task(REPORT_INTERVAL_MS)).unwrap();

    // Start sampling only once every consumer is in place
    spi.enable();

    info!("All tasks spawned, sniffer running");

    // The receiver must outlive capture; dropping it stops the state machine
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
