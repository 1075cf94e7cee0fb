//! Same-length 1-D FIR convolution used for frequency-domain pilot smoothing

use crate::complex::Complex32;

/// Convolve `x` (length N) with the real FIR `h` (length K), producing N
/// output samples. Tap `h[K/2]` aligns with `x[i]`; samples that would fall
/// outside `x` are treated as zero (the convolution is *not* circular).
///
/// Edge correction (linear extrapolation instead of implicit zeros) is the
/// caller's responsibility — see `interp::extrap` — since only the caller
/// knows which edge samples represent a pilot sequence worth extrapolating.
pub fn conv_same(x: &[Complex32], h: &[f32], out: &mut [Complex32]) {
    debug_assert_eq!(x.len(), out.len());
    if h.is_empty() {
        out.copy_from_slice(x);
        return;
    }
    let half = h.len() / 2;
    for i in 0..x.len() {
        let mut acc = Complex32::new(0.0, 0.0);
        for (j, &tap) in h.iter().enumerate() {
            let src = i as isize + j as isize - half as isize;
            if src >= 0 && (src as usize) < x.len() {
                acc += x[src as usize] * tap;
            }
        }
        out[i] = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_tap_is_passthrough() {
        let x = vec![Complex32::new(1.0, 0.0), Complex32::new(2.0, -1.0)];
        let mut out = vec![Complex32::new(0.0, 0.0); 2];
        conv_same(&x, &[1.0], &mut out);
        assert_eq!(out, x);
    }

    #[test]
    fn empty_filter_is_passthrough() {
        let x = vec![Complex32::new(1.0, 0.0), Complex32::new(2.0, -1.0)];
        let mut out = vec![Complex32::new(0.0, 0.0); 2];
        conv_same(&x, &[], &mut out);
        assert_eq!(out, x);
    }

    #[test]
    fn five_tap_smooths_constant_vector_to_itself() {
        let x = vec![Complex32::new(3.0, 0.0); 10];
        let h = [0.05, 0.15, 0.6, 0.15, 0.05];
        let mut out = vec![Complex32::new(0.0, 0.0); 10];
        conv_same(&x, &h, &mut out);
        // interior samples see the full constant neighbourhood
        for i in 2..8 {
            assert!((out[i].re - 3.0).abs() < 1e-5);
        }
        // edge samples see implicit zeros and so undershoot
        assert!(out[0].re < 3.0);
    }
}
