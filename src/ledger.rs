//! Coin balance ledger.
//!
//! The balance is written from the coin-pulse path and read/consumed from
//! the dispensing state machine.  On the current board both run on the
//! main loop, but the pulse line can also be wired to a GPIO interrupt, so
//! every access goes through a critical-section mutex: an `accumulate` from
//! an ISR can never interleave with a `try_consume` on the main loop.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Accumulated credit in cents.  Never negative (unsigned), never wraps.
pub struct BalanceLedger {
    cents: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl BalanceLedger {
    pub const fn new() -> Self {
        Self {
            cents: Mutex::new(Cell::new(0)),
        }
    }

    /// Credit `cents`.  Saturates at `u32::MAX`.
    pub fn accumulate(&self, cents: u32) -> u32 {
        self.cents.lock(|c| {
            let next = c.get().saturating_add(cents);
            c.set(next);
            next
        })
    }

    /// Debit `price` if the balance covers it.
    ///
    /// `None` means the frame is not monetized: always succeeds and leaves
    /// the balance untouched.
    pub fn try_consume(&self, price: Option<u32>) -> bool {
        let Some(price) = price else {
            return true;
        };
        self.cents.lock(|c| {
            let current = c.get();
            if current >= price {
                c.set(current - price);
                true
            } else {
                false
            }
        })
    }

    pub fn balance(&self) -> u32 {
        self.cents.lock(Cell::get)
    }
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
