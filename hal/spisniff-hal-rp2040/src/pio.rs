//! PIO-based passive SPI receiver
//!
//! One state machine watches MOSI and SCK as inputs and shifts in one bit
//! per rising clock edge. Every 8 bits are autopushed into the RX FIFO,
//! where the capture DMA picks them up.
//!
//! # Pins
//!
//! The program addresses SCK relative to the input base, so SCK must be
//! the GPIO directly after MOSI. The firmware build script checks this.
//!
//! # Bit order
//!
//! Bits shift in to the right, so the first bit on the wire ends up as the
//! least significant bit of the byte, in the top byte of the pushed word.

use embassy_rp::pac;
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;

/// Bits per captured byte
pub const BITS_PER_BYTE: u8 = 8;

/// PIO cycles spent per bus bit (two waits and one `in`)
pub const CYCLES_PER_BIT: u32 = 3;

/// Highest SCK rate the program follows at a given system clock
///
/// Each SCK phase must last longer than the wait loop that watches it.
pub const fn max_sck_hz(sys_clk_hz: u32) -> u32 {
    sys_clk_hz / (2 * CYCLES_PER_BIT)
}

/// PIO blocks that can host the capture program
pub trait CapturePio: Instance {
    /// Block number, used for the DREQ and register lookup
    const NUMBER: u8;

    /// Register block
    fn regs() -> pac::pio::Pio;
}

impl CapturePio for PIO0 {
    const NUMBER: u8 = 0;

    fn regs() -> pac::pio::Pio {
        pac::PIO0
    }
}

impl CapturePio for PIO1 {
    const NUMBER: u8 = 1;

    fn regs() -> pac::pio::Pio {
        pac::PIO1
    }
}

/// Where the capture DMA reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxSource {
    /// Address of the captured byte within the RX FIFO register
    pub address: u32,
    /// Data request line that paces the DMA
    pub dreq: u8,
}

/// Passive SPI receiver on one PIO state machine
pub struct SpiCapture<'d, P: CapturePio, const SM: usize> {
    sm: StateMachine<'d, P, SM>,
}

impl<'d, P: CapturePio, const SM: usize> SpiCapture<'d, P, SM> {
    /// Load the capture program and configure `sm`
    ///
    /// The state machine stays disabled until [`SpiCapture::enable`], so
    /// the DMA can be armed first.
    pub fn new<MOSI: PioPin, SCK: PioPin>(
        common: &mut Common<'d, P>,
        mut sm: StateMachine<'d, P, SM>,
        mosi: Peri<'d, MOSI>,
        sck: Peri<'d, SCK>,
    ) -> Self {
        // Sample MOSI on every rising SCK edge (SPI mode 0)
        let prg = pio::pio_asm!(
            ".wrap_target",
            "wait 0 pin 1", // SCK low
            "wait 1 pin 1", // SCK rising edge
            "in pins, 1",   // Shift in MOSI
            ".wrap"
        );

        let installed = common.load_program(&prg.program);

        let mosi_pin = common.make_pio_pin(mosi);
        let sck_pin = common.make_pio_pin(sck);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[]);
        cfg.set_in_pins(&[&mosi_pin, &sck_pin]);
        cfg.shift_in = ShiftConfig {
            auto_fill: true,
            threshold: BITS_PER_BYTE,
            direction: ShiftDirection::Right,
        };
        // Capture only, so the TX FIFO depth goes to RX
        cfg.fifo_join = FifoJoin::RxOnly;
        // Full system clock: integer 1, no fraction
        cfg.clock_divider = U24F8::from_bits(1 << 8);

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::In, &[&mosi_pin, &sck_pin]);

        Self { sm }
    }

    /// DMA source for this state machine's RX FIFO
    pub fn rx_source(&self) -> RxSource {
        let fifo = P::regs().rxf(SM).as_ptr() as u32;
        RxSource {
            // Right-shifted bytes land in the top byte of the word
            address: fifo + 3,
            dreq: P::NUMBER * 8 + 4 + SM as u8,
        }
    }

    /// Start sampling the bus
    pub fn enable(&mut self) {
        self.sm.clear_fifos();
        self.sm.set_enable(true);
    }
}
