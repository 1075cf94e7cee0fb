//! Element-wise complex vector kernels
//!
//! These are the hot-path building blocks for pilot processing: no
//! allocation, no error handling, equal-length slices assumed (debug-checked
//! only, since callers own all sizing).

use crate::complex::Complex32;

/// `out[i] = a[i] * conj(b[i])`
pub fn mul_conj(a: &[Complex32], b: &[Complex32], out: &mut [Complex32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    for i in 0..a.len() {
        out[i] = a[i] * b[i].conj();
    }
}

/// `out[i] = a[i] - b[i]`
pub fn sub(a: &[Complex32], b: &[Complex32], out: &mut [Complex32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    for i in 0..a.len() {
        out[i] = a[i] - b[i];
    }
}

/// `out[i] = k * v[i]`
pub fn scale(v: &[Complex32], k: f32, out: &mut [Complex32]) {
    debug_assert_eq!(v.len(), out.len());
    for i in 0..v.len() {
        out[i] = v[i] * k;
    }
}

/// `out[i] = a[i] + b[i]`
pub fn sum(a: &[Complex32], b: &[Complex32], out: &mut [Complex32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    for i in 0..a.len() {
        out[i] = a[i] + b[i];
    }
}

/// Mean of `|v[i]|^2`. Zero for an empty slice.
pub fn mean_power(v: &[Complex32]) -> f32 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().map(|c| c.norm_sqr()).sum::<f32>() / v.len() as f32
}

/// `sum_i a[i] * conj(b[i])`
pub fn dot_conj(a: &[Complex32], b: &[Complex32]) -> Complex32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| *x * y.conj()).sum()
}

/// Real sum of a real-valued vector.
pub fn acc(v: &[f32]) -> f32 {
    v.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_conj_matches_definition() {
        let a = vec![Complex32::new(2.0, 1.0)];
        let b = vec![Complex32::new(1.0, 1.0)];
        let mut out = vec![Complex32::new(0.0, 0.0)];
        mul_conj(&a, &b, &mut out);
        assert_eq!(out[0], Complex32::new(3.0, -1.0));
    }

    #[test]
    fn mean_power_of_empty_is_zero() {
        assert_eq!(mean_power(&[]), 0.0);
    }

    #[test]
    fn mean_power_unit_vector() {
        let v = vec![Complex32::new(1.0, 0.0); 4];
        assert_eq!(mean_power(&v), 1.0);
    }

    #[test]
    fn dot_conj_self_equals_mean_power_times_len() {
        let v = vec![Complex32::new(1.0, 2.0), Complex32::new(0.0, 1.0)];
        let d = dot_conj(&v, &v);
        assert!((d.re - (5.0 + 1.0)).abs() < 1e-6);
        assert!(d.im.abs() < 1e-6);
    }
}
