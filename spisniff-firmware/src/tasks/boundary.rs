//! Transaction-boundary task
//!
//! Woken by the chip-select falling edge. The raw edge latch decides
//! whether a boundary really happened, so a spurious wake-up does not
//! close a transaction.
//!
//! Every new wait clears the latch before arming, so the latch is polled
//! until it reads clear before waiting again. An edge that lands while the
//! previous one is being serviced is picked up by that poll instead of
//! being wiped by the next wait.

use defmt::*;
use embassy_rp::gpio::Input;
use spisniff_hal_rp2040::ChipSelectEdge;

use crate::capture;

#[embassy_executor::task]
pub async fn boundary_task(mut cs: Input<'static>, mut edge: ChipSelectEdge) {
    info!("Boundary task started on GPIO{}", edge.pin());

    loop {
        cs.wait_for_falling_edge().await;

        // One critical section per edge so DMA_IRQ_1 can run in between
        let mut serviced = 0u32;
        while capture::with_sniffer(|sniffer| sniffer.on_boundary_irq(&mut edge)) == Some(true) {
            serviced += 1;
        }

        match serviced {
            0 => trace!("Chip-select wake-up without a latched edge"),
            1 => {}
            n => debug!("{} boundaries serviced in one wake-up", n),
        }
    }
}
