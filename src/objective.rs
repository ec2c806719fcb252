use serde::{Deserialize, Serialize};

use std::fmt;

/// How the distance between realised and target voltages is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Sum of squared differences, which favours an even spread of small errors.
    Squared,
    /// Sum of absolute differences.
    Absolute,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::Squared
    }
}

impl Objective {
    /// Total badness of `voltages` against `targets`. Always non-negative.
    #[inline]
    pub fn score(self, voltages: &[f64; 4], targets: &[f64; 4]) -> f64 {
        let mut total = 0.0;
        for (v, t) in voltages.iter().zip(targets.iter()) {
            let diff = (v - t).abs();
            total += match self {
                Objective::Squared => diff * diff,
                Objective::Absolute => diff,
            };
        }
        total
    }

    /// The score together with the deviation of each state.
    pub fn evaluate(self, voltages: &[f64; 4], targets: &[f64; 4]) -> (f64, [Deviation; 4]) {
        let mut deviations = [Deviation::default(); 4];
        for (d, (&v, &t)) in deviations
            .iter_mut()
            .zip(voltages.iter().zip(targets.iter()))
        {
            *d = Deviation::new(v, t);
        }
        (self.score(voltages, targets), deviations)
    }
}

/// Deviation relative to the target, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelativeDeviation {
    Percent(f64),
    /// The target is 0V and the voltage is not, so no relative figure exists.
    Undefined,
}

impl fmt::Display for RelativeDeviation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelativeDeviation::Percent(p) => write!(f, "{:.1}%", p),
            RelativeDeviation::Undefined => f.write_str("n/a"),
        }
    }
}

/// How far one realised voltage is from its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub voltage: f64,
    pub target: f64,
    pub absolute: f64,
    pub relative: RelativeDeviation,
}

impl Default for Deviation {
    fn default() -> Self {
        Deviation {
            voltage: 0.0,
            target: 0.0,
            absolute: 0.0,
            relative: RelativeDeviation::Percent(0.0),
        }
    }
}

impl Deviation {
    pub fn new(voltage: f64, target: f64) -> Self {
        let absolute = (voltage - target).abs();
        let relative = if target != 0.0 {
            RelativeDeviation::Percent(absolute / target.abs() * 100.0)
        } else if absolute == 0.0 {
            RelativeDeviation::Percent(0.0)
        } else {
            RelativeDeviation::Undefined
        };
        Deviation {
            voltage,
            target,
            absolute,
            relative,
        }
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2}V ({})", self.voltage, self.relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TARGETS: [f64; 4] = [4.8, 3.2, 1.6, 0.0];

    #[test]
    fn squared_and_absolute_scores() {
        let v = [5.0, 3.0, 1.6, 0.0];
        assert_relative_eq!(Objective::Squared.score(&v, &TARGETS), 0.08, epsilon = 1e-12);
        assert_relative_eq!(Objective::Absolute.score(&v, &TARGETS), 0.4, epsilon = 1e-12);
        assert_eq!(Objective::Squared.score(&TARGETS, &TARGETS), 0.0);
    }

    #[test]
    fn squared_prefers_even_errors() {
        let even = [4.9, 3.3, 1.6, 0.0];
        let lumped = [5.0, 3.2, 1.6, 0.0];
        assert!(Objective::Squared.score(&even, &TARGETS) < Objective::Squared.score(&lumped, &TARGETS));
    }

    #[test]
    fn relative_deviation() {
        let d = Deviation::new(4.32, 4.8);
        assert_relative_eq!(d.absolute, 0.48, epsilon = 1e-12);
        match d.relative {
            RelativeDeviation::Percent(p) => assert_relative_eq!(p, 10.0, epsilon = 1e-9),
            RelativeDeviation::Undefined => panic!("target is not zero"),
        }
    }

    #[test]
    fn zero_target() {
        assert_eq!(Deviation::new(0.0, 0.0).relative, RelativeDeviation::Percent(0.0));
        assert_eq!(Deviation::new(0.1, 0.0).relative, RelativeDeviation::Undefined);
        assert_eq!(format!("{}", Deviation::new(0.1, 0.0)), "0.10V (n/a)");
    }

    #[test]
    fn evaluate_reports_every_state() {
        let (score, devs) = Objective::Absolute.evaluate(&[5.0, 3.0, 1.6, 0.0], &TARGETS);
        assert_relative_eq!(score, 0.4, epsilon = 1e-12);
        assert_eq!(devs[3].relative, RelativeDeviation::Percent(0.0));
        assert_eq!(format!("{}", devs[0]), "5.00V (4.2%)");
    }
}
