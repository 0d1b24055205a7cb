//! Chained DMA channel pair as a ping-pong transfer engine
//!
//! Each channel owns one half of a [`CaptureBuffer`] and chains to the
//! other when its count runs out, so capture moves between halves without
//! CPU help. Completion of either channel raises `DMA_IRQ_1`.
//!
//! RP2040 channels count down from the loaded transfer count to zero.
//! [`PingPongDma::remaining_count`] maps that onto the n-minus-1 register
//! convention the capture ring expects: `0` once complete, otherwise one
//! less than the transfers left.

use core::marker::PhantomData;

use embassy_rp::dma::Channel;
use embassy_rp::pac;
use embassy_rp::pac::dma::regs::CtrlTrig;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::Peri;
use spisniff_hal::{Half, TransferEngine};

use crate::pio::RxSource;

/// DMA interrupt line used for half-complete events
///
/// Line 0 belongs to embassy-rp's own DMA driver.
pub const DMA_IRQ_INDEX: usize = 1;

/// Capture memory for both halves
#[repr(C, align(4))]
pub struct CaptureBuffer<const H: usize> {
    halves: [[u8; H]; 2],
}

impl<const H: usize> CaptureBuffer<H> {
    /// Zeroed buffer
    pub const fn new() -> Self {
        Self {
            halves: [[0; H]; 2],
        }
    }
}

impl<const H: usize> Default for CaptureBuffer<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Halves whose channel finished since the last acknowledge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Completed {
    pub primary: bool,
    pub alternate: bool,
}

impl Completed {
    /// Whether `half` completed
    pub fn contains(self, half: Half) -> bool {
        match half {
            Half::Primary => self.primary,
            Half::Alternate => self.alternate,
        }
    }

    /// Completed halves, starting with `first`
    ///
    /// If both halves finished before the interrupt was serviced, the one
    /// the ring was waiting on has to be drained first.
    pub fn in_order(self, first: Half) -> impl Iterator<Item = Half> {
        [first, first.other()]
            .into_iter()
            .filter(move |half| self.contains(*half))
    }
}

/// Two chained DMA channels filling a [`CaptureBuffer`] from a PIO RX FIFO
pub struct PingPongDma<'d, const H: usize> {
    /// Channel numbers, indexed by `Half::index`
    channels: [u8; 2],
    /// Start of the capture buffer
    base: *mut u8,
    _channels: PhantomData<&'d mut ()>,
}

// SAFETY: the buffer pointer comes from a `&'static mut` that this engine
// owns exclusively. Access from interrupt context goes through the
// sniffer's critical-section mutex.
unsafe impl<const H: usize> Send for PingPongDma<'_, H> {}

impl<'d, const H: usize> PingPongDma<'d, H> {
    /// Configure `primary` and `alternate` to capture from `source`
    ///
    /// Nothing moves until the ring arms both halves and
    /// [`PingPongDma::begin`] triggers the primary channel.
    pub fn new<A: Channel, B: Channel>(
        primary: Peri<'d, A>,
        alternate: Peri<'d, B>,
        buffer: &'static mut CaptureBuffer<H>,
        source: RxSource,
    ) -> Self {
        let channels = [primary.number(), alternate.number()];
        let base = buffer.halves.as_mut_ptr().cast::<u8>();

        for half in [Half::Primary, Half::Alternate] {
            let ch = pac::DMA.ch(channels[half.index()] as usize);

            ch.read_addr().write_value(source.address);

            let mut ctrl = CtrlTrig(0);
            ctrl.set_treq_sel(TreqSel::from(source.dreq));
            ctrl.set_data_size(DataSize::SIZE_BYTE);
            ctrl.set_incr_read(false);
            ctrl.set_incr_write(true);
            ctrl.set_chain_to(channels[half.other().index()]);
            ctrl.set_en(true);

            // Non-triggering alias, the pair starts in `begin`
            ch.al1_ctrl().write_value(ctrl.0);
        }

        let mask = Self::mask_for(channels);
        // Keep embassy's handler on line 0 from clearing our status bits
        pac::DMA.inte(0).modify(|w| *w &= !mask);
        pac::DMA.inte(DMA_IRQ_INDEX).modify(|w| *w |= mask);

        Self {
            channels,
            base,
            _channels: PhantomData,
        }
    }

    fn mask_for(channels: [u8; 2]) -> u32 {
        (1 << channels[0]) | (1 << channels[1])
    }

    fn channel(&self, half: Half) -> pac::dma::Channel {
        pac::DMA.ch(self.channels[half.index()] as usize)
    }

    fn half_address(&self, half: Half) -> u32 {
        self.base.wrapping_add(half.index() * H) as u32
    }

    /// Trigger the primary channel
    ///
    /// Call once, after the ring has armed both halves.
    pub fn begin(&mut self) {
        let ch = self.channel(Half::Primary);
        let ctrl = ch.ctrl_trig().read();
        ch.ctrl_trig().write_value(ctrl);
    }

    /// Read and clear the half-complete status of both channels
    pub fn acknowledge(&mut self) -> Completed {
        let ints = pac::DMA.ints(DMA_IRQ_INDEX).read() & Self::mask_for(self.channels);
        pac::DMA.ints(DMA_IRQ_INDEX).write_value(ints);

        Completed {
            primary: ints & (1 << self.channels[0]) != 0,
            alternate: ints & (1 << self.channels[1]) != 0,
        }
    }
}

impl<const H: usize> TransferEngine for PingPongDma<'_, H> {
    const HALF_CAPACITY: usize = H;

    fn arm(&mut self, half: Half) {
        let ch = self.channel(half);
        ch.write_addr().write_value(self.half_address(half));
        // Sets the reload value; the chain trigger copies it into the counter
        ch.trans_count().write_value(H as u32);
    }

    fn remaining_count(&self, half: Half) -> u32 {
        self.channel(half).trans_count().read().saturating_sub(1)
    }

    fn read(&self, half: Half, offset: usize) -> u8 {
        debug_assert!(offset < H);
        // SAFETY: `offset < H`, so the address lies inside the buffer. The
        // DMA only writes bytes the ring has not drained yet, and a volatile
        // read keeps the compiler from caching them.
        unsafe { core::ptr::read_volatile(self.base.add(half.index() * H + offset)) }
    }
}
