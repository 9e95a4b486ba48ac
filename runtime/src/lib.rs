//! Async plumbing around the `pairmatch-core` engine: the ports to the outside world, face
//! loading, the high score tracker and a driver that owns the mismatch timer.

use pairmatch_core::DEFAULT_REVERSAL_DELAY;
use std::time::Duration;

pub use driver::*;
pub use error::*;
pub use faces::*;
pub use memory::*;
pub use ports::*;
pub use records::*;
pub use tracker::*;

mod driver;
mod error;
mod faces;
mod memory;
mod ports;
mod records;
mod tracker;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// How long a mismatched pair stays face up.
    pub reversal_delay: Duration,
    /// How many times the image supplier is asked before board setup is abandoned.
    pub max_acquire_attempts: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reversal_delay: DEFAULT_REVERSAL_DELAY,
            max_acquire_attempts: 3,
        }
    }
}
