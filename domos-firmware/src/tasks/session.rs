//! Console session task
//!
//! Polls the UART and runs one command line at a time. Activating a
//! peripheral blocks this task for the whole turn sequence.

use defmt::*;
use embassy_time::Timer;

use domos_core::{Activity, LinkError};
use domos_hal_rp2040::{ConsoleRx, ConsoleTx};

use crate::boot::FirmwareSession;

/// Console poll interval
const POLL_INTERVAL_MS: u64 = 2;

#[embassy_executor::task]
pub async fn session_task(mut session: FirmwareSession, mut rx: ConsoleRx, mut tx: ConsoleTx) {
    info!("Session task started");

    if let Err(e) = session.announce(&mut tx) {
        warn!("UART write error: {:?}", e);
    }

    while session.is_on() {
        match session.work(&mut rx, &mut tx) {
            Ok(Activity::Idle) => Timer::after_millis(POLL_INTERVAL_MS).await,
            Ok(Activity::Executed) => {
                debug!(
                    "Line executed, {} peripherals",
                    session.registry().count()
                );
            }
            Ok(Activity::ReportedError(kind)) => {
                warn!("Reported error {}: {}", kind.code(), kind.message());
            }
            Ok(Activity::Off) => break,
            Err(LinkError::Rx(e)) => {
                warn!("UART read error: {:?}", e);
                Timer::after_millis(POLL_INTERVAL_MS).await;
            }
            Err(LinkError::Tx(e)) => warn!("UART write error: {:?}", e),
        }
    }

    info!("Session closed by exit, power-cycle to restart");
}
