//! LTE downlink channel estimator
//!
//! Given a received OFDM resource grid and the known cell-specific
//! reference signal (CRS) values, [`ChannelEstimator`] produces a
//! per-antenna-port channel estimate at every resource element together
//! with RSRP/RSSI/RSRQ/SNR quality metrics.

pub mod cell;
pub mod error;
pub mod estimator;
pub mod pilot;

pub use cell::{CellDescriptor, CyclicPrefix};
pub use error::{ChestError, Result};
pub use estimator::{ChannelEstimator, NoisePolicy};

/// Subcarriers per physical resource block.
pub const RE_X_RB: usize = 12;
/// Longest frequency-smoothing filter the estimator will accept.
pub const MAX_FREQ_FILTER: usize = 9;
/// Longest time-smoothing filter the estimator will accept.
pub const MAX_TIME_FILTER: usize = 8;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        cell::{CellDescriptor, CyclicPrefix},
        error::{ChestError, Result},
        estimator::{ChannelEstimator, NoisePolicy},
    };
}
