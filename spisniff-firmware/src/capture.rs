//! Shared sniffer context and the half-complete interrupt
//!
//! The sniffer is installed once at start-up and then only touched from
//! `DMA_IRQ_1`, the boundary task and the report task, always inside a
//! critical section.
//!
//! # Boundary latency
//!
//! The chip-select edge is serviced by a task, not directly by the GPIO
//! interrupt: the edge wakes the interrupt executor, which then polls the
//! task. Bytes of the next transaction that arrive within that window are
//! drained before the reset and land in a decoder that is already `Done`
//! (ignored) or mid-row (counted as incomplete). Hosts that start the next
//! transaction sooner than the executor wake-up lose its first bytes.
//! Edges that arrive while one is being serviced are not lost; the
//! boundary task polls the latch until it reads clear.

use core::cell::RefCell;

use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use spisniff_core::Sniffer;
use spisniff_hal_rp2040::PingPongDma;

use crate::config::{HALF_CAPACITY, ROWS, ROW_BYTES};

/// Priority shared by both capture interrupts, so neither preempts the other
pub const CAPTURE_PRIORITY: Priority = Priority::P1;

/// Sniffer type for this board
pub type FirmwareSniffer = Sniffer<PingPongDma<'static, HALF_CAPACITY>, ROW_BYTES, ROWS>;

static SNIFFER: Mutex<CriticalSectionRawMutex, RefCell<Option<FirmwareSniffer>>> =
    Mutex::new(RefCell::new(None));

/// Arm the ring, start the DMA pair and publish the sniffer
pub fn install(mut sniffer: FirmwareSniffer) {
    sniffer.start();
    sniffer.engine_mut().begin();
    SNIFFER.lock(|cell| cell.replace(Some(sniffer)));
}

/// Run `f` on the installed sniffer inside a critical section
pub fn with_sniffer<R>(f: impl FnOnce(&mut FirmwareSniffer) -> R) -> Option<R> {
    SNIFFER.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Unmask the half-complete interrupt
pub fn enable_half_complete_irq() {
    interrupt::DMA_IRQ_1.set_priority(CAPTURE_PRIORITY);
    // SAFETY: the handler only touches the sniffer through `with_sniffer`
    unsafe { interrupt::DMA_IRQ_1.enable() };
}

#[interrupt]
fn DMA_IRQ_1() {
    with_sniffer(|sniffer| {
        let completed = sniffer.engine_mut().acknowledge();
        let first = sniffer.ring().active_half();
        for half in completed.in_order(first) {
            sniffer.on_half_complete(half);
        }
    });
}
