//! The single-precision complex sample type used throughout this workspace

/// Complex baseband sample, shared with `rustfft` so no conversion is needed
/// if a caller ever feeds FFT-domain data straight into this crate.
pub type Complex32 = rustfft::num_complex::Complex32;
