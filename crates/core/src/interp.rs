//! Linear interpolation and extrapolation kernels
//!
//! Two distinct shapes are needed by pilot processing: stretching a sparse
//! pilot vector across a dense frequency axis (`linear_interp_offset`), and
//! filling the OFDM symbols between two already-interpolated rows
//! (`linear_interp_segment`).

use crate::complex::Complex32;

/// One-sample linear extrapolation: the next sample after `x1`, given the
/// trend from `x0` to `x1`.
pub fn extrap(x0: Complex32, x1: Complex32) -> Complex32 {
    x1 * 2.0 - x0
}

/// Stretch `x` (length `m >= 2`) to `out` (length `rate * m`) by linear
/// interpolation, placing `x[0]` at `out[freq_offset]` rather than `out[0]`.
/// Samples before `freq_offset` and after the last interpolated segment are
/// filled by linear extrapolation from the nearest pair of input samples.
pub fn linear_interp_offset(x: &[Complex32], rate: usize, freq_offset: usize, out: &mut [Complex32]) {
    let m = x.len();
    debug_assert!(rate > 0 && m >= 2);
    debug_assert_eq!(out.len(), rate * m);
    debug_assert!(freq_offset < rate);

    for k in 0..freq_offset.min(out.len()) {
        let t = (freq_offset - k) as f32 / rate as f32;
        out[k] = x[0] - (x[1] - x[0]) * t;
    }

    for i in 0..m - 1 {
        for s in 0..rate {
            let idx = freq_offset + i * rate + s;
            if idx >= out.len() {
                break;
            }
            let t = s as f32 / rate as f32;
            out[idx] = x[i] + (x[i + 1] - x[i]) * t;
        }
    }

    let tail_start = freq_offset + (m - 1) * rate;
    if tail_start < out.len() {
        out[tail_start] = x[m - 1];
    }
    for idx in (tail_start + 1)..out.len() {
        let s = (idx - tail_start) as f32;
        out[idx] = x[m - 1] + (x[m - 1] - x[m - 2]) * (s / rate as f32);
    }
}

/// Fill `steps` rows linearly interpolated between `a` and `b` (both length
/// `len`), writing `steps * len` complex samples into `out`: row `t`
/// (1-indexed) holds `a + t*(b-a)/(steps+1)`.
pub fn linear_interp_segment(a: &[Complex32], b: &[Complex32], steps: usize, out: &mut [Complex32]) {
    let len = a.len();
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(out.len(), steps * len);

    for t in 1..=steps {
        let frac = t as f32 / (steps + 1) as f32;
        let row = &mut out[(t - 1) * len..t * len];
        for k in 0..len {
            row[k] = a[k] + (b[k] - a[k]) * frac;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrap_of_constant_is_constant() {
        let c = Complex32::new(1.0, -2.0);
        assert_eq!(extrap(c, c), c);
    }

    #[test]
    fn offset_interp_reproduces_input_at_anchor_points() {
        let x = vec![
            Complex32::new(0.0, 0.0),
            Complex32::new(6.0, 0.0),
            Complex32::new(12.0, 0.0),
        ];
        let mut out = vec![Complex32::new(0.0, 0.0); 6 * 3];
        linear_interp_offset(&x, 6, 0, &mut out);
        assert_eq!(out[0], x[0]);
        assert_eq!(out[6], x[1]);
        assert_eq!(out[12], x[2]);
        // midpoint between x[0] and x[1]
        assert!((out[3].re - 3.0).abs() < 1e-5);
    }

    #[test]
    fn offset_shifts_anchor_into_interior() {
        let x = vec![Complex32::new(0.0, 0.0), Complex32::new(6.0, 0.0)];
        let mut out = vec![Complex32::new(0.0, 0.0); 12];
        linear_interp_offset(&x, 6, 2, &mut out);
        assert_eq!(out[2], x[0]);
        assert_eq!(out[8], x[1]);
    }

    #[test]
    fn segment_interp_evenly_spaces_rows() {
        let a = vec![Complex32::new(0.0, 0.0)];
        let b = vec![Complex32::new(3.0, 0.0)];
        let mut out = vec![Complex32::new(0.0, 0.0); 2];
        linear_interp_segment(&a, &b, 2, &mut out);
        assert!((out[0].re - 1.0).abs() < 1e-5);
        assert!((out[1].re - 2.0).abs() < 1e-5);
    }
}
