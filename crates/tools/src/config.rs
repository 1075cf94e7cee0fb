//! Configuration for the channel-estimator demo tool

use anyhow::{Context, Result};
use ltephy_chest::{CellDescriptor, CyclicPrefix};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk representation of a cell and filter configuration, loaded from
/// TOML so a run can be reproduced without re-typing command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub nof_prb: usize,
    pub nof_ports: usize,
    pub cyclic_prefix: CpKind,
    pub cell_id: u16,
    #[serde(default)]
    pub freq_taps: Option<Vec<f32>>,
    #[serde(default)]
    pub time_taps: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpKind {
    Normal,
    Extended,
}

impl From<CpKind> for CyclicPrefix {
    fn from(value: CpKind) -> Self {
        match value {
            CpKind::Normal => CyclicPrefix::Normal,
            CpKind::Extended => CyclicPrefix::Extended,
        }
    }
}

impl EstimatorConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {:?}", path))?;
        let config: Self = toml::from_str(&content).context("failed to parse config file")?;
        Ok(config)
    }

    pub fn cell(&self) -> Result<CellDescriptor> {
        CellDescriptor::new(self.nof_prb, self.nof_ports, self.cyclic_prefix.into(), self.cell_id)
            .context("invalid cell descriptor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let toml_src = r#"
            nof_prb = 25
            nof_ports = 2
            cyclic_prefix = "normal"
            cell_id = 17
        "#;
        let config: EstimatorConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.nof_prb, 25);
        assert_eq!(config.nof_ports, 2);
        assert!(config.cell().is_ok());
    }
}
