use itertools::Itertools;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use std::fmt;

use crate::circuit::stress_mw;
use crate::{
    Candidate, CandidateSet, Deviation, Divider, Error, Objective, PowerLoss, Result, State,
};

/// The best triple found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub r0: Candidate,
    pub r1: Candidate,
    pub r2: Candidate,
    /// Score under the optimiser's objective, lower is better.
    pub score: f64,
    /// Realised voltages in `State::ALL` order.
    pub voltages: [f64; 4],
    pub deviations: [Deviation; 4],
    pub power_loss: PowerLoss,
}

impl SearchResult {
    /// The chosen resistances (R0, R1, R2) in ohms.
    pub fn values(&self) -> (f64, f64, f64) {
        (self.r0.value, self.r1.value, self.r2.value)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = if f.alternate() { "\n" } else { ", " };
        writeln!(f, "Best resistor combination:")?;
        writeln!(
            f,
            "{}",
            [&self.r0, &self.r1, &self.r2]
                .iter()
                .enumerate()
                .map(|(i, r)| format!("R{}: {}", i, r))
                .join(sep)
        )?;
        writeln!(f, "Score: {:.5}", self.score)?;
        writeln!(f, "Voltages with deviations:")?;
        for (state, dev) in State::ALL.iter().zip(self.deviations.iter()) {
            writeln!(f, "    {}: {}", state, dev)?;
        }
        write!(
            f,
            "Power losses: R0: {:.1}mW, R1: {:.1}mW, R2: {:.1}mW",
            self.power_loss.r0, self.power_loss.r1, self.power_loss.r2
        )
    }
}

/// Best score seen so far and the (R0, R1, R2) candidate indices that produced it.
#[derive(Debug, Clone, Copy)]
struct Best {
    score: f64,
    idx: (usize, usize, usize),
}

impl Best {
    /// Lower score wins, equal scores go to the triple met first in R0, R1, R2 loop order.
    fn min(self, other: Best) -> Best {
        if other.score < self.score || (other.score == self.score && other.idx < self.idx) {
            other
        } else {
            self
        }
    }
}

/// Exhaustive search over every (R0, R1, R2) triple of a candidate set.
///
/// Triples in which any resistor would dissipate more than the power limit in some button state
/// are rejected, a loss exactly at the limit is allowed. Of the rest the triple with the lowest
/// objective score is kept.
#[derive(Debug, Clone)]
pub struct Optimizer {
    divider: Divider,
    targets: [f64; 4],
    max_power_loss_mw: f64,
    objective: Objective,
    parallel: bool,
}

impl Optimizer {
    /// Creates an optimiser matching `targets` (in `State::ALL` order) under a per resistor power
    /// limit in mW, scoring with the squared error objective.
    pub fn new(divider: Divider, targets: [f64; 4], max_power_loss_mw: f64) -> Result<Self> {
        for (state, &value) in State::ALL.iter().zip(targets.iter()) {
            if !value.is_finite() {
                return Err(Error::InvalidTarget {
                    state: state.name(),
                    value,
                });
            }
        }
        if !(max_power_loss_mw > 0.0) {
            return Err(Error::InvalidPowerLimit(max_power_loss_mw));
        }
        Ok(Optimizer {
            divider,
            targets,
            max_power_loss_mw,
            objective: Objective::default(),
            parallel: cfg!(feature = "parallel"),
        })
    }

    /// Selects the objective used to score triples.
    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Runs the search on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Returns the number of triples the search will visit for `candidates`.
    pub fn iterations(&self, candidates: &CandidateSet) -> u128 {
        (candidates.len() as u128).pow(3)
    }

    /// Finds the best triple, or `None` when every triple breaks the power limit.
    pub fn search(&self, candidates: &CandidateSet) -> Option<SearchResult> {
        let values = candidates.values();
        info!(
            candidates = values.len(),
            iterations = %format!("{:.2e}", self.iterations(candidates) as f64),
            parallel = self.parallel,
            "Searching resistor combinations"
        );

        let best = match self.best(&values) {
            Some(best) => best,
            None => {
                info!("No combination within the power limit");
                return None;
            }
        };
        let (i, j, k) = best.idx;
        let (r0, r1, r2) = (values[i], values[j], values[k]);
        let (voltages, power_loss) = self.divider.evaluate(r0, r1, r2);
        let (score, deviations) = self.objective.evaluate(&voltages, &self.targets);
        info!(score, r0, r1, r2, "Found best combination");

        Some(SearchResult {
            r0: candidates.get(i)?.clone(),
            r1: candidates.get(j)?.clone(),
            r2: candidates.get(k)?.clone(),
            score,
            voltages,
            deviations,
            power_loss,
        })
    }

    #[cfg(feature = "parallel")]
    fn best(&self, values: &[f64]) -> Option<Best> {
        if self.parallel {
            (0..values.len())
                .into_par_iter()
                .filter_map(|i| self.best_for_r0(values, i))
                .reduce_with(Best::min)
        } else {
            self.best_sequential(values)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn best(&self, values: &[f64]) -> Option<Best> {
        self.best_sequential(values)
    }

    fn best_sequential(&self, values: &[f64]) -> Option<Best> {
        (0..values.len())
            .filter_map(|i| self.best_for_r0(values, i))
            .reduce(Best::min)
    }

    /// Best triple with R0 fixed to `values[i]`.
    fn best_for_r0(&self, values: &[f64], i: usize) -> Option<Best> {
        let ucc = self.divider.ucc();
        let limit = self.max_power_loss_mw;
        let r0 = values[i];
        if stress_mw(ucc, r0, r0) > limit {
            return None;
        }
        // R1 and R2 peak with the other one shorted, which depends on R0 alone.
        let allowed: Vec<usize> = (0..values.len())
            .filter(|&k| stress_mw(ucc, values[k], r0 + values[k]) <= limit)
            .collect();
        debug!(r0, allowed = allowed.len(), "Searching R0 row");

        let mut best: Option<Best> = None;
        let mut best_score = f64::INFINITY;
        for &j in &allowed {
            let r1 = values[j];
            for &k in &allowed {
                let voltages = self.divider.voltages(r0, r1, values[k]);
                let score = self.objective.score(&voltages, &self.targets);
                if score < best_score {
                    best_score = score;
                    best = Some(Best {
                        score,
                        idx: (i, j, k),
                    });
                }
            }
        }
        best
    }
}
