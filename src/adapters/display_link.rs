//! Serial link to the display controller.
//!
//! The display board renders the balance and the coin animation on its own;
//! this side only ships [`DisplayFrame`]s.  Each frame is postcard-encoded
//! and COBS-framed, so a `0x00` byte always terminates a frame and the
//! receiver can resynchronise after line noise.
//!
//! ```text
//!   FrameService ──present()──▶ DisplayLink ──postcard+COBS──▶ UART1 ──▶ display
//! ```

use embedded_io::Write;
use log::{trace, warn};

use crate::app::events::DisplayFrame;
use crate::app::ports::DisplayPort;

/// Worst-case encoded frame: three varints plus COBS overhead.
const FRAME_BUF_LEN: usize = 24;

pub struct DisplayLink<W> {
    tx: W,
    sent: u32,
    failed: u32,
}

impl<W: Write> DisplayLink<W> {
    pub fn new(tx: W) -> Self {
        Self {
            tx,
            sent: 0,
            failed: 0,
        }
    }

    /// Frames written successfully.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Frames dropped by an encode or write error.
    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.tx
    }
}

impl<W: Write> DisplayPort for DisplayLink<W> {
    fn present(&mut self, frame: &DisplayFrame) {
        let mut buf = [0u8; FRAME_BUF_LEN];
        let bytes = match postcard::to_slice_cobs(frame, &mut buf) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                warn!("Display: encode failed: {:?}", e);
                return;
            }
        };
        match self.tx.write_all(bytes) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                trace!("Display: frame #{} sent ({} bytes)", frame.animation_frame, bytes.len());
            }
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                warn!("Display: UART write failed: {:?}", e);
            }
        }
    }
}
