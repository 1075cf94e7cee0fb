//! The downlink CRS channel estimator
//!
//! One [`ChannelEstimator`] is built per cell and reused subframe after
//! subframe. It owns every working buffer; callers only ever hand it
//! borrowed slices (the received grid, the known pilot sequence, and
//! optionally an output estimate grid).

use crate::cell::{CellDescriptor, CyclicPrefix};
use crate::error::{ChestError, Result};
use crate::pilot::{nof_pilot_symbols, pilot_freq_offset, pilot_idx, pilot_subcarrier, pilot_symbol_time_index};
use crate::{MAX_FREQ_FILTER, MAX_TIME_FILTER, RE_X_RB};
use ltephy_core::complex::Complex32;
use ltephy_core::{conv, interp, vector};
use tracing::{debug, trace, warn};

/// How per-port noise power is estimated each subframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoisePolicy {
    /// Residual power between the raw and frequency-smoothed LS estimates.
    /// Requires no particular subframe and is the default.
    ResidualBased,
    /// Power measured on the guard subcarriers around PSS/SSS. Only
    /// meaningful in subframes 0 and 5; elsewhere the previous estimate is
    /// kept and a warning is logged.
    GuardSubcarrier,
}

const DEFAULT_FREQ_TAPS: [f32; 5] = [0.05, 0.15, 0.6, 0.15, 0.05];
const DEFAULT_TIME_TAPS: [f32; 2] = [0.1, 0.9];

struct PortState {
    recv_pilots: Vec<Complex32>,
    ls_estimates: Vec<Complex32>,
    freq_avg: Vec<Complex32>,
    ls_smoothed: Vec<Complex32>,
    time_history: Vec<Vec<Complex32>>,
    /// Scratch for the residual-based noise estimator, sized once at
    /// construction so `estimate_port` never allocates on the hot path.
    noise_tmp: Vec<Complex32>,
    rsrp: f32,
    rssi: f32,
    noise_power: f32,
}

impl PortState {
    fn new(nof_prb: usize, nof_pilot_symbols: usize) -> Self {
        let pilot_count = 2 * nof_prb * nof_pilot_symbols;
        let nref = 2 * nof_prb;
        Self {
            recv_pilots: vec![Complex32::new(0.0, 0.0); pilot_count],
            ls_estimates: vec![Complex32::new(0.0, 0.0); pilot_count],
            freq_avg: vec![Complex32::new(0.0, 0.0); pilot_count],
            ls_smoothed: vec![Complex32::new(0.0, 0.0); pilot_count],
            time_history: vec![vec![Complex32::new(0.0, 0.0); nref]; MAX_TIME_FILTER],
            noise_tmp: vec![Complex32::new(0.0, 0.0); pilot_count],
            rsrp: 0.0,
            rssi: 0.0,
            noise_power: 0.0,
        }
    }
}

/// The downlink CRS-based channel estimator for one cell.
pub struct ChannelEstimator {
    cell: CellDescriptor,
    freq_taps: Vec<f32>,
    time_taps: Vec<f32>,
    noise_policy: NoisePolicy,
    ports: Vec<PortState>,
    /// Time-domain interpolation scratch, sized once at construction from
    /// the cell's row width and symbol count: `time_fill_row_a`/`_row_b`
    /// hold a snapshot of the two pilot-bearing rows bounding the current
    /// gap, `time_fill_interior` the interpolated rows between them.
    time_fill_row_a: Vec<Complex32>,
    time_fill_row_b: Vec<Complex32>,
    time_fill_interior: Vec<Complex32>,
}

impl ChannelEstimator {
    /// Allocate every working buffer for `cell`. Installs the standard
    /// default frequency and time filters.
    pub fn new(cell: CellDescriptor) -> Result<Self> {
        let ports = (0..cell.nof_ports)
            .map(|p| PortState::new(cell.nof_prb, nof_pilot_symbols(p)))
            .collect();

        debug!(nof_prb = cell.nof_prb, nof_ports = cell.nof_ports, id = cell.id, "channel estimator initialised");

        let row_width = cell.nof_subcarriers();
        let total_symbols = cell.nof_symbols_per_subframe();

        Ok(Self {
            cell,
            freq_taps: DEFAULT_FREQ_TAPS.to_vec(),
            time_taps: DEFAULT_TIME_TAPS.to_vec(),
            noise_policy: NoisePolicy::ResidualBased,
            ports,
            time_fill_row_a: vec![Complex32::new(0.0, 0.0); row_width],
            time_fill_row_b: vec![Complex32::new(0.0, 0.0); row_width],
            time_fill_interior: vec![Complex32::new(0.0, 0.0); row_width * total_symbols],
        })
    }

    pub fn cell(&self) -> &CellDescriptor {
        &self.cell
    }

    /// Replace the frequency-smoothing filter taps. An empty slice disables
    /// frequency smoothing (pass-through). Leaves the previous filter intact
    /// on error.
    pub fn set_filter_freq(&mut self, taps: &[f32]) -> Result<()> {
        if taps.len() > MAX_FREQ_FILTER {
            return Err(ChestError::FilterTooLong { len: taps.len(), max: MAX_FREQ_FILTER });
        }
        self.freq_taps = taps.to_vec();
        debug!(len = taps.len(), "frequency filter updated");
        Ok(())
    }

    /// Replace the time-smoothing filter taps and reset the time-smoothing
    /// history (a running average over the old filter's length is not
    /// meaningful once the filter changes shape).
    pub fn set_filter_time(&mut self, taps: &[f32]) -> Result<()> {
        if taps.len() > MAX_TIME_FILTER {
            return Err(ChestError::FilterTooLong { len: taps.len(), max: MAX_TIME_FILTER });
        }
        self.time_taps = taps.to_vec();
        for port in &mut self.ports {
            for h in &mut port.time_history {
                h.iter_mut().for_each(|c| *c = Complex32::new(0.0, 0.0));
            }
        }
        debug!(len = taps.len(), "time filter updated, history reset");
        Ok(())
    }

    pub fn set_noise_policy(&mut self, policy: NoisePolicy) {
        self.noise_policy = policy;
    }

    /// Aggregate RSRP across all configured ports.
    pub fn rsrp(&self) -> f32 {
        self.ports.iter().map(|p| p.rsrp).sum()
    }

    pub fn rssi(&self) -> f32 {
        let rssi0 = self.ports.first().map(|p| p.rssi).unwrap_or(0.0);
        4.0 * rssi0 / (self.cell.nof_prb as f32 * RE_X_RB as f32)
    }

    pub fn rsrq(&self) -> f32 {
        let rsrp0 = self.ports.first().map(|p| p.rsrp).unwrap_or(0.0);
        let rssi0 = self.ports.first().map(|p| p.rssi).unwrap_or(0.0);
        self.cell.nof_prb as f32 * rsrp0 / rssi0
    }

    pub fn noise_estimate(&self) -> f32 {
        let mean: f32 = self.ports.iter().map(|p| p.noise_power).sum::<f32>() / self.cell.nof_ports as f32;
        mean * (self.cell.symbol_sz() as f32).sqrt()
    }

    pub fn snr(&self) -> f32 {
        self.rsrp() / self.noise_estimate() / std::f32::consts::SQRT_2 / self.cell.nof_ports as f32
    }

    /// Run the full pipeline for one antenna port over one subframe.
    /// `input_grid` and, if present, `out_ce_grid` must be
    /// `nof_symbols_per_subframe * nof_subcarriers` complex samples,
    /// row-major by OFDM symbol. `csr` holds the known transmitted pilots
    /// for this port and subframe, `2*nof_prb*nof_pilot_symbols(port)`
    /// samples laid out the same way as the internal pilot buffers.
    pub fn estimate_port(
        &mut self,
        input_grid: &[Complex32],
        csr: &[Complex32],
        mut out_ce_grid: Option<&mut [Complex32]>,
        subframe_idx: usize,
        port: usize,
    ) {
        let nof_prb = self.cell.nof_prb;
        let nref = 2 * nof_prb;
        let row_width = self.cell.nof_subcarriers();
        let n_pilot_sym = nof_pilot_symbols(port);
        debug_assert_eq!(input_grid.len(), row_width * self.cell.nof_symbols_per_subframe());
        debug_assert_eq!(csr.len(), nref * n_pilot_sym);

        trace!(port, subframe_idx, "estimating channel");

        // 1. pilot extraction
        {
            let state = &mut self.ports[port];
            for l in 0..n_pilot_sym {
                let time_idx = pilot_symbol_time_index(self.cell.cp, port, l);
                let freq_offset = pilot_freq_offset(port, l, self.cell.id);
                for k in 0..nref {
                    let sc = pilot_subcarrier(k, freq_offset);
                    state.recv_pilots[pilot_idx(nof_prb, l, k)] = input_grid[time_idx * row_width + sc];
                }
            }

            // 2. LS estimation
            vector::mul_conj(&state.recv_pilots, csr, &mut state.ls_estimates);
        }

        // 3. frequency smoothing, with linear-extrapolation edge correction
        {
            let state = &mut self.ports[port];
            let k = self.freq_taps.len();
            for l in 0..n_pilot_sym {
                let lo = pilot_idx(nof_prb, l, 0);
                let hi = lo + nref;
                if k == 0 {
                    state.freq_avg[lo..hi].copy_from_slice(&state.ls_estimates[lo..hi]);
                    continue;
                }
                conv::conv_same(&state.ls_estimates[lo..hi], &self.freq_taps, &mut state.freq_avg[lo..hi]);
                if k >= 3 {
                    let half = k / 2;
                    let first = interp::extrap(state.ls_estimates[lo + 1], state.ls_estimates[lo]);
                    state.freq_avg[lo] += first * self.freq_taps[half - 1];
                    let last = interp::extrap(state.ls_estimates[hi - 2], state.ls_estimates[hi - 1]);
                    state.freq_avg[hi - 1] += last * self.freq_taps[half + 1];
                }
            }
        }

        // 4. noise estimation
        match self.noise_policy {
            NoisePolicy::ResidualBased => {
                let state = &mut self.ports[port];
                let (freq_avg, ls_estimates, noise_tmp) = (&state.freq_avg, &state.ls_estimates, &mut state.noise_tmp);
                vector::sub(freq_avg, ls_estimates, noise_tmp);
                state.noise_power = vector::mean_power(&state.noise_tmp);
            }
            NoisePolicy::GuardSubcarrier => {
                if let Some(power) = estimate_noise_guard_subcarrier(input_grid, &self.cell, subframe_idx) {
                    self.ports[port].noise_power = power;
                } else {
                    warn!(subframe_idx, "guard-subcarrier noise policy requested outside subframe 0/5, keeping previous estimate");
                }
            }
        }

        // 5. time smoothing
        {
            let state = &mut self.ports[port];
            let taps = &self.time_taps;
            for l in 0..n_pilot_sym {
                let lo = pilot_idx(nof_prb, l, 0);
                let hi = lo + nref;

                state.time_history.rotate_left(1);
                state.time_history[MAX_TIME_FILTER - 1].copy_from_slice(&state.freq_avg[lo..hi]);

                let out = &mut state.ls_smoothed[lo..hi];
                if taps.is_empty() {
                    out.copy_from_slice(&state.freq_avg[lo..hi]);
                    continue;
                }
                out.iter_mut().for_each(|c| *c = Complex32::new(0.0, 0.0));
                for (i, &tap) in taps.iter().enumerate() {
                    let hist = &state.time_history[MAX_TIME_FILTER - taps.len() + i];
                    for k in 0..nref {
                        out[k] += hist[k] * tap;
                    }
                }
            }
        }

        // 6. RSRP
        {
            let state = &mut self.ports[port];
            state.rsrp = vector::mean_power(&state.ls_smoothed);
        }

        // 7. RSSI (port 0 only)
        if port == 0 {
            let mut acc = 0.0f32;
            for l in 0..n_pilot_sym {
                let time_idx = pilot_symbol_time_index(self.cell.cp, port, l);
                let row = &input_grid[time_idx * row_width..(time_idx + 1) * row_width];
                acc += row.iter().map(|c| c.norm_sqr()).sum::<f32>();
            }
            self.ports[0].rssi = acc / n_pilot_sym as f32;
        }

        // 8. interpolation
        if let Some(ce_grid) = out_ce_grid.as_deref_mut() {
            debug_assert_eq!(ce_grid.len(), row_width * self.cell.nof_symbols_per_subframe());
            let state = &self.ports[port];
            let mut pilot_rows = Vec::with_capacity(n_pilot_sym);

            for l in 0..n_pilot_sym {
                let time_idx = pilot_symbol_time_index(self.cell.cp, port, l);
                let freq_offset = pilot_freq_offset(port, l, self.cell.id);
                let lo = pilot_idx(nof_prb, l, 0);
                let row = &mut ce_grid[time_idx * row_width..(time_idx + 1) * row_width];
                interp::linear_interp_offset(&state.ls_smoothed[lo..lo + nref], RE_X_RB / 2, freq_offset, row);
                pilot_rows.push(time_idx);
            }

            let total_symbols = self.cell.nof_symbols_per_subframe();
            self.time_domain_fill(&pilot_rows, row_width, total_symbols, ce_grid);
        }
    }

    /// Fill the non-pilot OFDM symbols of a port's estimate grid by linear
    /// interpolation between, and extrapolation beyond, the already-computed
    /// pilot-bearing rows in `pilot_rows` (sorted, length >= 2).
    ///
    /// This is geometry-agnostic: it interpolates strictly between
    /// consecutive known rows and extrapolates past the first/last known
    /// row, so it never writes back over a pilot-bearing row itself. Uses
    /// the estimator's own `time_fill_*` scratch buffers rather than
    /// allocating on this hot path.
    fn time_domain_fill(&mut self, pilot_rows: &[usize], row_width: usize, total_symbols: usize, ce_grid: &mut [Complex32]) {
        debug_assert!(pilot_rows.len() >= 2);
        debug_assert_eq!(ce_grid.len(), row_width * total_symbols);

        for w in pilot_rows.windows(2) {
            let (idx_a, idx_b) = (w[0], w[1]);
            let steps = idx_b - idx_a - 1;
            if steps == 0 {
                continue;
            }
            self.time_fill_row_a[..row_width].copy_from_slice(&ce_grid[idx_a * row_width..(idx_a + 1) * row_width]);
            self.time_fill_row_b[..row_width].copy_from_slice(&ce_grid[idx_b * row_width..(idx_b + 1) * row_width]);
            let interior_len = steps * row_width;
            {
                let row_a = &self.time_fill_row_a[..row_width];
                let row_b = &self.time_fill_row_b[..row_width];
                let interior = &mut self.time_fill_interior[..interior_len];
                interp::linear_interp_segment(row_a, row_b, steps, interior);
            }
            for s in 0..steps {
                let t = idx_a + 1 + s;
                ce_grid[t * row_width..(t + 1) * row_width]
                    .copy_from_slice(&self.time_fill_interior[s * row_width..(s + 1) * row_width]);
            }
        }

        let first = pilot_rows[0];
        if first > 0 {
            let idx_a = pilot_rows[0];
            let idx_b = pilot_rows[1];
            self.time_fill_row_a[..row_width].copy_from_slice(&ce_grid[idx_a * row_width..(idx_a + 1) * row_width]);
            self.time_fill_row_b[..row_width].copy_from_slice(&ce_grid[idx_b * row_width..(idx_b + 1) * row_width]);
            let span = (idx_b - idx_a) as f32;
            for t in 0..first {
                let frac = (t as isize - idx_a as isize) as f32 / span;
                let row = &mut ce_grid[t * row_width..(t + 1) * row_width];
                for k in 0..row_width {
                    row[k] = self.time_fill_row_a[k] + (self.time_fill_row_b[k] - self.time_fill_row_a[k]) * frac;
                }
            }
        }

        let last = *pilot_rows.last().unwrap();
        if last + 1 < total_symbols {
            let n = pilot_rows.len();
            let idx_a = pilot_rows[n - 2];
            let idx_b = pilot_rows[n - 1];
            self.time_fill_row_a[..row_width].copy_from_slice(&ce_grid[idx_a * row_width..(idx_a + 1) * row_width]);
            self.time_fill_row_b[..row_width].copy_from_slice(&ce_grid[idx_b * row_width..(idx_b + 1) * row_width]);
            let span = (idx_b - idx_a) as f32;
            for t in (last + 1)..total_symbols {
                let frac = (t as isize - idx_b as isize) as f32 / span;
                let row = &mut ce_grid[t * row_width..(t + 1) * row_width];
                for k in 0..row_width {
                    row[k] = self.time_fill_row_b[k] + (self.time_fill_row_b[k] - self.time_fill_row_a[k]) * frac;
                }
            }
        }
    }

    /// Run [`estimate_port`](Self::estimate_port) for every configured port.
    pub fn estimate(
        &mut self,
        input_grid: &[Complex32],
        csr: &[&[Complex32]],
        out_ce_grids: &mut [&mut [Complex32]],
        subframe_idx: usize,
    ) {
        debug_assert_eq!(csr.len(), self.cell.nof_ports);
        debug_assert_eq!(out_ce_grids.len(), self.cell.nof_ports);
        for port in 0..self.cell.nof_ports {
            self.estimate_port(input_grid, csr[port], Some(out_ce_grids[port]), subframe_idx, port);
        }
    }
}

/// Pushes the guard-subcarrier samples flanking the sync-signal band of
/// `row` (5 empty subcarriers on each side of the 62-subcarrier PSS/SSS
/// allocation centered on DC) into `samples`.
fn push_guard_samples(row: &[Complex32], row_width: usize, samples: &mut Vec<Complex32>) {
    let center = row_width / 2;
    let half_sync = 31;
    let guard = 5;
    let lo_start = center.saturating_sub(half_sync + guard);
    let lo_end = center.saturating_sub(half_sync);
    let hi_start = (center + half_sync).min(row_width);
    let hi_end = (center + half_sync + guard).min(row_width);

    samples.extend_from_slice(&row[lo_start..lo_end]);
    samples.extend_from_slice(&row[hi_start..hi_end]);
}

/// Guard-subcarrier noise estimate around the PSS/SSS band, valid only in
/// subframes 0 and 5 (the only subframes carrying primary/secondary sync).
/// Pools the guard samples from *both* sync positions — SSS on the
/// second-to-last symbol of the first slot, PSS on the last — per SPEC_FULL
/// §4.6.
fn estimate_noise_guard_subcarrier(input_grid: &[Complex32], cell: &CellDescriptor, subframe_idx: usize) -> Option<f32> {
    if subframe_idx != 0 && subframe_idx != 5 {
        return None;
    }
    let row_width = cell.nof_subcarriers();
    let nof_symbols_per_slot = cell.cp.nof_symbols_per_slot();
    let sss_symbol_idx = nof_symbols_per_slot - 2;
    let pss_symbol_idx = nof_symbols_per_slot - 1;

    let mut samples = Vec::new();
    push_guard_samples(&input_grid[sss_symbol_idx * row_width..(sss_symbol_idx + 1) * row_width], row_width, &mut samples);
    push_guard_samples(&input_grid[pss_symbol_idx * row_width..(pss_symbol_idx + 1) * row_width], row_width, &mut samples);

    if samples.is_empty() {
        return None;
    }
    Some(vector::mean_power(&samples))
}

/// Builds a resource grid carrying only CRS pilots under a flat complex
/// channel gain, and the matching per-port CSR tables — shared by the unit
/// tests and the property tests below.
#[cfg(test)]
fn flat_channel_grid(cell: &CellDescriptor, gain: Complex32) -> (Vec<Complex32>, Vec<Vec<Complex32>>) {
    let row_width = cell.nof_subcarriers();
    let total_symbols = cell.nof_symbols_per_subframe();
    let mut grid = vec![Complex32::new(0.0, 0.0); row_width * total_symbols];

    let csrs: Vec<Vec<Complex32>> = (0..cell.nof_ports)
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
