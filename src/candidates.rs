use itertools::{iproduct, Itertools};
use tracing::{debug, info};

use std::{fmt, ops::RangeInclusive};

use crate::{format_value, Error, Result};

/// How a candidate value is built from physical parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateKind {
    Single,
    Series(f64, f64),
    Parallel(f64, f64),
}

/// One resistor option available to the optimiser, either a single part or a pair of parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub value: f64,
    pub label: String,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn single(value: f64) -> Self {
        Candidate {
            value,
            label: format_value(value),
            kind: CandidateKind::Single,
        }
    }

    pub fn series(r1: f64, r2: f64) -> Self {
        Candidate {
            value: r1 + r2,
            label: format!("{} + {} (series)", format_value(r1), format_value(r2)),
            kind: CandidateKind::Series(r1, r2),
        }
    }

    pub fn parallel(r1: f64, r2: f64) -> Self {
        Candidate {
            value: 1.0 / (1.0 / r1 + 1.0 / r2),
            label: format!("{} || {} (parallel)", format_value(r1), format_value(r2)),
            kind: CandidateKind::Parallel(r1, r2),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Validates generator inputs without generating anything.
pub(crate) fn check_inputs(series: &[f64], decades: &RangeInclusive<i32>, tolerance: f64) -> Result<()> {
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }
    if let Some((index, &value)) = series
        .iter()
        .find_position(|v| !(v.is_finite() && **v > 0.0))
    {
        return Err(Error::InvalidSeriesValue { index, value });
    }
    if decades.is_empty() {
        return Err(Error::EmptyDecades {
            start: *decades.start(),
            end: *decades.end(),
        });
    }
    if !(tolerance > 0.0 && tolerance < 1.0) {
        return Err(Error::InvalidTolerance(tolerance));
    }
    Ok(())
}

/// An ordered set of candidates in which no two values lie within `tolerance` of each other.
///
/// Closeness is measured relative to the value already in the set, and the value inserted first
/// is the one that is kept.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    tolerance: f64,
}

impl CandidateSet {
    /// Creates an empty set with the given relative dedup tolerance, which must lie in (0, 1).
    pub fn new(tolerance: f64) -> Result<Self> {
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(Error::InvalidTolerance(tolerance));
        }
        Ok(CandidateSet {
            candidates: Vec::new(),
            tolerance,
        })
    }

    /// Builds the candidate set for a decade normalised base series.
    ///
    /// Every base value is first scaled over `decades` and inserted as a single part. Then every
    /// ordered pair of scaled values is proposed, first in series and then in parallel. Proposals
    /// closer than `tolerance` to an existing candidate are dropped.
    /// # Examples
    /// ```
    ///     # use divider_calc::*;
    ///     let set = CandidateSet::generate(E12.values(), 0..=5, 0.2).unwrap();
    ///     assert_eq!(set.len(), 60);
    /// ```
    pub fn generate(series: &[f64], decades: RangeInclusive<i32>, tolerance: f64) -> Result<Self> {
        check_inputs(series, &decades, tolerance)?;

        let mut set = Self::new(tolerance)?;

        for (val, exp) in series.iter().cartesian_product(decades.clone()) {
            set.insert_if_unique(Candidate::single(val * 10f64.powi(exp)));
        }
        debug!(singles = set.len(), "Inserted single resistor values");

        let pairs = iproduct!(series.iter(), series.iter(), decades.clone(), decades.clone());
        for (v1, v2, e1, e2) in pairs {
            let r1 = v1 * 10f64.powi(e1);
            let r2 = v2 * 10f64.powi(e2);
            set.insert_if_unique(Candidate::series(r1, r2));
            set.insert_if_unique(Candidate::parallel(r1, r2));
        }

        info!(
            count = set.len(),
            tolerance_pct = tolerance * 100.0,
            "Calculated simple/series/parallel resistor combinations"
        );
        Ok(set)
    }

    /// Adds `candidate` unless an existing value lies within the tolerance of it. Returns whether
    /// the candidate was added.
    pub fn insert_if_unique(&mut self, candidate: Candidate) -> bool {
        let tolerance = self.tolerance;
        let close = self
            .candidates
            .iter()
            .any(|c| (c.value - candidate.value).abs() / c.value < tolerance);
        if close {
            false
        } else {
            self.candidates.push(candidate);
            true
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Candidate> {
        self.candidates.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> + Clone {
        self.candidates.iter()
    }

    /// The candidate values as a flat array, in insertion order.
    pub fn values(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.value).collect()
    }
}
