use serde::{Deserialize, Serialize};

use std::{fs, ops::RangeInclusive, path::Path};

use crate::candidates::check_inputs;
use crate::{
    CandidateSet, Divider, MeasuredNode, Objective, Optimizer, RSeries, Result, SearchResult,
    Wiring,
};

/// The base series, either the name of a standard series or an explicit list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesSpec {
    Named(String),
    Values(Vec<f64>),
}

impl Default for SeriesSpec {
    fn default() -> Self {
        SeriesSpec::Named("E12".to_string())
    }
}

impl SeriesSpec {
    pub fn resolve(&self) -> Result<Vec<f64>> {
        match self {
            SeriesSpec::Named(name) => Ok(RSeries::by_name(name)?.values().to_vec()),
            SeriesSpec::Values(values) => Ok(values.clone()),
        }
    }
}

/// Everything a search needs, loadable from YAML. Missing fields take their default.
///
/// ```yaml
/// series: E12
/// decades: { start: 0, end: 5 }
/// tolerance: 0.05
/// ucc: 36.0
/// max_power_loss_mw: 20.0
/// targets: [4.8, 3.2, 1.6, 0.0]
/// objective: squared
/// node: across_switches
/// wiring: straight
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub series: SeriesSpec,
    pub decades: RangeInclusive<i32>,
    /// Relative closeness below which two candidate values count as duplicates.
    pub tolerance: f64,
    /// Supply voltage in volts.
    pub ucc: f64,
    pub max_power_loss_mw: f64,
    /// Target voltages for idle, button 1, button 2 and both buttons.
    pub targets: [f64; 4],
    pub objective: Objective,
    pub node: MeasuredNode,
    pub wiring: Wiring,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            series: SeriesSpec::default(),
            decades: 0..=5,
            tolerance: 0.05,
            ucc: 36.0,
            max_power_loss_mw: 20.0,
            targets: [4.8, 3.2, 1.6, 0.0],
            objective: Objective::Squared,
            node: MeasuredNode::AcrossSwitches,
            wiring: Wiring::Straight,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every parameter without generating candidates.
    pub fn validate(&self) -> Result<()> {
        check_inputs(&self.series.resolve()?, &self.decades, self.tolerance)?;
        self.optimizer()?;
        Ok(())
    }

    pub fn divider(&self) -> Result<Divider> {
        Divider::new(self.ucc, self.node, self.wiring)
    }

    pub fn candidates(&self) -> Result<CandidateSet> {
        CandidateSet::generate(&self.series.resolve()?, self.decades.clone(), self.tolerance)
    }

    pub fn optimizer(&self) -> Result<Optimizer> {
        Ok(Optimizer::new(self.divider()?, self.targets, self.max_power_loss_mw)?
            .objective(self.objective))
    }

    /// Generates the candidates and searches them.
    pub fn run(&self) -> Result<Option<SearchResult>> {
        let optimizer = self.optimizer()?;
        let candidates = self.candidates()?;
        Ok(optimizer.search(&candidates))
    }
}
