//! Synthetic resource-grid generation for the demo tool
//!
//! Builds a resource grid carrying only CRS pilots under a flat complex
//! channel gain, so the demo has something to feed the estimator without
//! depending on a real radio front end or a captured IQ file.

use ltephy_chest::pilot::{nof_pilot_symbols, pilot_freq_offset, pilot_subcarrier, pilot_symbol_time_index};
use ltephy_chest::CellDescriptor;
use ltephy_core::Complex32;

/// Returns `(grid, csr_per_port)` for a flat channel of gain `gain`.
pub fn flat_channel_grid(cell: &CellDescriptor, gain: Complex32) -> (Vec<Complex32>, Vec<Vec<Complex32>>) {
    let row_width = cell.nof_subcarriers();
    let total_symbols = cell.nof_symbols_per_subframe();
    let mut grid = vec![Complex32::new(0.0, 0.0); row_width * total_symbols];

    let csrs = (0..cell.nof_ports)
        .map(|port| {
            let n = nof_pilot_symbols(port);
            let nref = 2 * cell.nof_prb;
            let mut csr = Vec::with_capacity(n * nref);
            for l in 0..n {
                let time_idx = pilot_symbol_time_index(cell.cp, port, l);
                let freq_offset = pilot_freq_offset(port, l, cell.id);
                for k in 0..nref {
                    let sc = pilot_subcarrier(k, freq_offset);
                    let pilot = Complex32::new(1.0, 0.0);
                    grid[time_idx * row_width + sc] = pilot * gain;
                    csr.push(pilot);
                }
            }
            csr
        })
        .collect();

    (grid, csrs)
}
