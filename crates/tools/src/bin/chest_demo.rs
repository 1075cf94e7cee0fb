//! Channel-estimator demo driver
//!
//! Loads a cell configuration from TOML, builds a `ChannelEstimator`, runs
//! it over a synthetic flat-channel resource grid, and prints the resulting
//! quality metrics. Exercises the estimator end to end without needing a
//! radio front end or a captured IQ file.

use anyhow::{Context, Result};
use clap::Parser;
use ltephy_chest::ChannelEstimator;
use ltephy_core::Complex32;
use ltephy_tools::synth::flat_channel_grid;
use ltephy_tools::EstimatorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chest-demo", about = "Run the LTE downlink channel estimator on a synthetic grid")]
struct Cli {
    /// Path to a TOML cell/filter configuration file
    #[arg(long)]
    config: PathBuf,

    /// Subframe index (0-9) to report the synthetic channel for
    #[arg(long, default_value_t = 0)]
    subframe: usize,

    /// Real part of the synthetic flat channel gain
    #[arg(long, default_value_t = 1.0)]
    gain_re: f32,

    /// Imaginary part of the synthetic flat channel gain
    #[arg(long, default_value_t = 0.0)]
    gain_im: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let config = EstimatorConfig::from_file(&cli.config).context("loading estimator config")?;
    let cell = config.cell()?;

    let mut estimator = ChannelEstimator::new(cell)?;
    if let Some(taps) = &config.freq_taps {
        estimator.set_filter_freq(taps)?;
    }
    if let Some(taps) = &config.time_taps {
        estimator.set_filter_time(taps)?;
    }

    let gain = Complex32::new(cli.gain_re, cli.gain_im);
    let (grid, csrs) = flat_channel_grid(&cell, gain);

    for port in 0..cell.nof_ports {
        estimator.estimate_port(&grid, &csrs[port], None, cli.subframe, port);
    }

    println!("rsrp  = {:.6}", estimator.rsrp());
    println!("rssi  = {:.6}", estimator.rssi());
    println!("rsrq  = {:.6}", estimator.rsrq());
    println!("noise = {:.6}", estimator.noise_estimate());
    println!("snr   = {:.6}", estimator.snr());

    Ok(())
}
