//! CRS pilot layout: which OFDM symbols and subcarriers carry reference
//! signals for a given antenna port, derived purely from the cell
//! descriptor (no dependency on the actual pilot *values*, which are
//! generated elsewhere and handed in as a slice).

use crate::cell::CyclicPrefix;

/// Number of pilot-bearing OFDM symbols per subframe for `port`.
pub fn nof_pilot_symbols(port: usize) -> usize {
    if port < 2 {
        4
    } else {
        2
    }
}

/// Time index (within the subframe) of the `l`-th pilot-bearing OFDM
/// symbol for `port`.
pub fn pilot_symbol_time_index(cp: CyclicPrefix, port: usize, l: usize) -> usize {
    match (cp, port < 2) {
        (CyclicPrefix::Normal, true) => [0, 4, 7, 11][l],
        (CyclicPrefix::Normal, false) => [1, 8][l],
        (CyclicPrefix::Extended, true) => [0, 3, 6, 9][l],
        (CyclicPrefix::Extended, false) => [1, 7][l],
    }
}

/// `v` shift term from TS 36.211 Table 6.10.1.2-1, selecting which of the
/// two pilot sub-lattices within a PRB a given (port, slot-local pilot
/// symbol) combination uses.
fn pilot_v(port: usize, pilot_index_in_slot: usize) -> usize {
    match port {
        0 => if pilot_index_in_slot == 0 { 0 } else { 3 },
        1 => if pilot_index_in_slot == 0 { 3 } else { 0 },
        2 => 0,
        3 => 3,
        _ => unreachable!("port out of range"),
    }
}

/// Subcarrier offset (0..6) of the first pilot within a PRB, for the
/// `l`-th pilot-bearing symbol of `port` in a cell with the given id.
pub fn pilot_freq_offset(port: usize, l: usize, cell_id: u16) -> usize {
    let pilot_index_in_slot = l % 2;
    (pilot_v(port, pilot_index_in_slot) + cell_id as usize % 6) % 6
}

/// Flat index into a per-port pilot buffer (shape `[nof_pilot_symbols][2*nof_prb]`).
pub fn pilot_idx(nof_prb: usize, symbol_l: usize, pilot_k: usize) -> usize {
    symbol_l * 2 * nof_prb + pilot_k
}

/// Subcarrier index within a full OFDM-symbol row that pilot `pilot_k`
/// (`0..2*nof_prb`) of symbol `l` occupies.
pub fn pilot_subcarrier(pilot_k: usize, freq_offset: usize) -> usize {
    (pilot_k / 2) * crate::RE_X_RB + freq_offset + (pilot_k % 2) * 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilot_symbol_count_matches_port() {
        assert_eq!(nof_pilot_symbols(0), 4);
        assert_eq!(nof_pilot_symbols(1), 4);
        assert_eq!(nof_pilot_symbols(2), 2);
        assert_eq!(nof_pilot_symbols(3), 2);
    }

    #[test]
    fn normal_cp_time_indices() {
        assert_eq!(pilot_symbol_time_index(CyclicPrefix::Normal, 0, 0), 0);
        assert_eq!(pilot_symbol_time_index(CyclicPrefix::Normal, 0, 3), 11);
        assert_eq!(pilot_symbol_time_index(CyclicPrefix::Normal, 2, 1), 8);
    }

    #[test]
    fn extended_cp_time_indices() {
        assert_eq!(pilot_symbol_time_index(CyclicPrefix::Extended, 0, 2), 6);
        assert_eq!(pilot_symbol_time_index(CyclicPrefix::Extended, 3, 0), 1);
    }

    #[test]
    fn pilot_subcarriers_stay_in_bounds_for_every_prb() {
        let nof_prb = 25;
        for pilot_k in 0..2 * nof_prb {
            for freq_offset in 0..6 {
                let sc = pilot_subcarrier(pilot_k, freq_offset);
                assert!(sc < nof_prb * 12);
            }
        }
    }

    #[test]
    fn pilot_v_alternates_between_ports_0_and_1() {
        assert_eq!(pilot_v(0, 0) + pilot_v(1, 0), 3);
        assert_eq!(pilot_v(0, 1) + pilot_v(1, 1), 3);
    }
}
