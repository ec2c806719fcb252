//! A resistor value optimiser for two button voltage divider ladders.
//!
//! Three resistors R0, R1 and R2 sit in series across a supply Ucc. Button 1 shorts R1 and button 2
//! shorts R2, so the measured node of the ladder takes one of four voltages depending on which
//! buttons are held. Reading that node with a single ADC input distinguishes all four states, as
//! long as the voltages sit close enough to the levels the firmware expects.
//!
//! This crate searches every (R0, R1, R2) triple drawn from a set of candidate values, built from a
//! standard series both as single parts and as series/parallel pairs, and reports the triple whose
//! voltages best match a set of targets without any resistor exceeding a power limit.
//!
//! # Example
//! An Arduino input protected by a zener, fed from a 36V supply, where the idle state should read
//! 4.8V and each button press should step down by 1.6V:
//! ```rust no_run
//! use divider_calc::*;
//!
//! fn main() -> Result<()> {
//!     let candidates = CandidateSet::generate(E12.values(), 0..=5, 0.05)?;
//!
//!     let divider = Divider::new(36.0, MeasuredNode::AcrossSwitches, Wiring::Straight)?;
//!     let optimizer = Optimizer::new(divider, [4.8, 3.2, 1.6, 0.0], 20.0)?;
//!
//!     println!("Number of iterations: {}", optimizer.iterations(&candidates));
//!
//!     match optimizer.search(&candidates) {
//!         Some(best) => println!("{}", best),
//!         None => println!("No matching combination found!"),
//!     }
//!     Ok(())
//! }
//! ```
//! Running this example produces the results:
//! ```text
//! Number of iterations: 9800344
//! Best resistor combination:
//! R0: 560K + 820K (series), R1: 68K, R2: 100K + 39K (series)
//! ...
//! ```

#[macro_use]
extern crate lazy_static;

mod candidates;
mod circuit;
mod config;
mod error;
mod objective;
mod search;

pub use candidates::{Candidate, CandidateKind, CandidateSet};
pub use circuit::{Divider, MeasuredNode, PowerLoss, State, Wiring};
pub use config::{Config, SeriesSpec};
pub use error::{Error, Result};
pub use objective::{Deviation, Objective, RelativeDeviation};
pub use search::{Optimizer, SearchResult};

lazy_static! {
    /// RSeries constant for the E3 standard series
    pub static ref E3: RSeries = RSeries::new(&[1.0, 2.2, 4.7]);
    /// RSeries constant for the E6 standard series
    pub static ref E6: RSeries = RSeries::extend(&E3, &[1.5, 3.3, 6.8]);
    /// RSeries constant for the E12 standard series
    pub static ref E12: RSeries = RSeries::extend(&E6, &[1.2, 1.8, 2.7, 3.9, 5.6, 8.2]);
    /// RSeries constant for the E24 standard series
    pub static ref E24: RSeries = RSeries::extend(
        &E12,
        &[1.1, 1.3, 1.6, 2.0, 2.4, 3.0, 3.6, 4.3, 5.1, 6.2, 7.5, 9.1]
    );
}

/// A decade normalised series of resistor values, constants are provided for the standard series.
///
/// Candidate generation walks the series in order, so the order decides which of two near
/// duplicate values survives. The standard series are kept in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct RSeries {
    values: Box<[f64]>,
}

impl RSeries {
    /// Defines a new series of resistor values. Only the decade needs to be provided, the
    /// candidate generator scales it over the configured decades.
    /// # Example
    /// ```
    ///     # use divider_calc::*;
    ///     let piher = RSeries::new(&[1.0, 2.0, 2.2, 2.5, 4.7, 5.0]);
    ///     assert_eq!(piher.len(), 6);
    /// ```
    pub fn new(series: &[f64]) -> Self {
        RSeries {
            values: series.to_vec().into_boxed_slice(),
        }
    }

    fn extend(base: &RSeries, add: &[f64]) -> Self {
        let mut values: Vec<f64> = base.iter().chain(add.iter()).cloned().collect();
        values.sort_by(f64::total_cmp);
        RSeries {
            values: values.into_boxed_slice(),
        }
    }

    /// Looks up one of the standard series by name, e.g. `"E12"` (case insensitive).
    pub fn by_name(name: &str) -> Result<&'static RSeries> {
        match name.to_ascii_uppercase().as_str() {
            "E3" => Ok(&E3),
            "E6" => Ok(&E6),
            "E12" => Ok(&E12),
            "E24" => Ok(&E24),
            _ => Err(Error::UnknownSeries(name.to_string())),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn format_scaled(r: f64, unit: &str) -> String {
    // `{:.1}` sends exact ties (x.25, x.75) to even, part labels round them up.
    let quarters = r * 4.0;
    let r = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        r + 0.05
    } else {
        r
    };
    let val = format!("{:.1}", r);
    match val.strip_suffix(".0") {
        Some(whole) => format!("{}{}", whole, unit),
        None => val.replacen('.', unit, 1),
    }
}

/// Renders a resistance as a short part label, with the unit marker standing in for the decimal
/// point: `4.7` becomes `4R7`, `4700` becomes `4K7` and `1e6` becomes `1M`. Values that are not
/// preferred values (series or parallel pairs) are rounded to one decimal place.
pub fn format_value(r: f64) -> String {
    if r < 1000.0 {
        format_scaled(r, "R")
    } else if r < 1_000_000.0 {
        format_scaled(r / 1000.0, "K")
    } else {
        format_scaled(r / 1_000_000.0, "M")
    }
}
