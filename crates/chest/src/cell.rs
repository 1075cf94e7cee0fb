//! Cell descriptor: the handful of parameters that fix every buffer size
//! and pilot position the estimator works with.

use crate::error::{ChestError, Result};
use crate::RE_X_RB;
use serde::{Deserialize, Serialize};

/// Cyclic prefix length, which fixes the number of OFDM symbols per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclicPrefix {
    Normal,
    Extended,
}

impl CyclicPrefix {
    pub fn nof_symbols_per_slot(self) -> usize {
        match self {
            CyclicPrefix::Normal => 7,
            CyclicPrefix::Extended => 6,
        }
    }

    pub fn nof_symbols_per_subframe(self) -> usize {
        2 * self.nof_symbols_per_slot()
    }
}

/// Immutable description of the cell a [`ChannelEstimator`](crate::estimator::ChannelEstimator)
/// is configured for. Every working buffer is sized from these four fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellDescriptor {
    pub nof_prb: usize,
    pub nof_ports: usize,
    pub cp: CyclicPrefix,
    pub id: u16,
}

impl CellDescriptor {
    pub fn new(nof_prb: usize, nof_ports: usize, cp: CyclicPrefix, id: u16) -> Result<Self> {
        if !(6..=110).contains(&nof_prb) {
            return Err(ChestError::InvalidCell {
                reason: format!("nof_prb {} out of range 6..=110", nof_prb),
            });
        }
        if !matches!(nof_ports, 1 | 2 | 4) {
            return Err(ChestError::InvalidCell {
                reason: format!("nof_ports {} must be 1, 2 or 4", nof_ports),
            });
        }
        if id > 503 {
            return Err(ChestError::InvalidCell {
                reason: format!("cell id {} out of range 0..=503", id),
            });
        }
        Ok(Self { nof_prb, nof_ports, cp, id })
    }

    pub fn nof_subcarriers(&self) -> usize {
        self.nof_prb * RE_X_RB
    }

    pub fn nof_symbols_per_subframe(&self) -> usize {
        self.cp.nof_symbols_per_subframe()
    }

    pub fn symbol_sz(&self) -> usize {
        symbol_sz(self.nof_prb)
    }
}

/// FFT size (`symbol_sz`) for a given bandwidth, taken from the standard
/// table of LTE channel bandwidths.
pub fn symbol_sz(nof_prb: usize) -> usize {
    const TABLE: [(usize, usize); 6] = [
        (6, 128),
        (15, 256),
        (25, 512),
        (50, 1024),
        (75, 1536),
        (100, 2048),
    ];
    for (max_prb, sz) in TABLE {
        if nof_prb <= max_prb {
            return sz;
        }
    }
    2048
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bandwidth_out_of_range() {
        assert!(CellDescriptor::new(5, 1, CyclicPrefix::Normal, 0).is_err());
        assert!(CellDescriptor::new(111, 1, CyclicPrefix::Normal, 0).is_err());
    }

    #[test]
    fn rejects_unsupported_port_count() {
        assert!(CellDescriptor::new(25, 3, CyclicPrefix::Normal, 0).is_err());
    }

    #[test]
    fn rejects_cell_id_out_of_range() {
        assert!(CellDescriptor::new(25, 1, CyclicPrefix::Normal, 504).is_err());
    }

    #[test]
    fn symbol_sz_matches_standard_table() {
        assert_eq!(symbol_sz(6), 128);
        assert_eq!(symbol_sz(25), 512);
        assert_eq!(symbol_sz(100), 2048);
    }
}

/// Boundary property over cell descriptors: `new` accepts exactly the
/// (nof_prb, nof_ports, id) combinations the invariants in §3 describe,
/// regardless of which field pushes it out of range.
#[cfg(test)]
mod proptests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn new_accepts_exactly_the_valid_range(raw_nof_prb: u16, port_sel: u8, id: u16) -> bool {
        let nof_prb = raw_nof_prb as usize;
        let nof_ports = match port_sel % 4 {
            0 => 1,
            1 => 2,
            2 => 4,
            _ => 3, // the one unsupported count, exercised deliberately
        };
        let expect_ok = (6..=110).contains(&nof_prb) && matches!(nof_ports, 1 | 2 | 4) && id <= 503;
        CellDescriptor::new(nof_prb, nof_ports, CyclicPrefix::Normal, id).is_ok() == expect_ok
    }
}
