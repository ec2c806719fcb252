use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{Error, Result};

/// The four button states of the ladder, in the order targets and voltages are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Idle,
    Button1,
    Button2,
    Both,
}

impl State {
    pub const ALL: [State; 4] = [State::Idle, State::Button1, State::Button2, State::Both];

    pub fn name(self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::Button1 => "button 1",
            State::Button2 => "button 2",
            State::Both => "both buttons",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of the R0 junction the input reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuredNode {
    /// The voltage across R0. Holding both buttons reads the full supply.
    AcrossR0,
    /// The voltage across R1 and R2 together. Holding both buttons reads 0V.
    AcrossSwitches,
}

impl Default for MeasuredNode {
    fn default() -> Self {
        MeasuredNode::AcrossSwitches
    }
}

/// Which resistor each button shorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wiring {
    /// Button 1 shorts R1, button 2 shorts R2.
    Straight,
    /// Button 1 shorts R2, button 2 shorts R1.
    Crossed,
}

impl Default for Wiring {
    fn default() -> Self {
        Wiring::Straight
    }
}

/// Worst case power dissipated in each resistor over all button states, in milliwatts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLoss {
    pub r0: f64,
    pub r1: f64,
    pub r2: f64,
}

impl PowerLoss {
    pub fn max(&self) -> f64 {
        self.r0.max(self.r1).max(self.r2)
    }

    pub fn within(&self, limit_mw: f64) -> bool {
        self.r0 <= limit_mw && self.r1 <= limit_mw && self.r2 <= limit_mw
    }
}

/// Power in mW dissipated by `r` when it shares the supply with the rest of a chain totalling
/// `total` ohms.
#[inline]
pub(crate) fn stress_mw(ucc: f64, r: f64, total: f64) -> f64 {
    let u = ucc * r / total;
    u * u / r * 1000.0
}

/// Three resistor ladder R0, R1, R2 in series across `ucc`, with a button across each of R1 and R2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    ucc: f64,
    node: MeasuredNode,
    wiring: Wiring,
}

impl Divider {
    pub fn new(ucc: f64, node: MeasuredNode, wiring: Wiring) -> Result<Self> {
        if !(ucc.is_finite() && ucc > 0.0) {
            return Err(Error::InvalidSupply(ucc));
        }
        Ok(Divider { ucc, node, wiring })
    }

    pub fn ucc(&self) -> f64 {
        self.ucc
    }

    /// Which of (R1, R2) the buttons short in `state`.
    fn shorted(&self, state: State) -> (bool, bool) {
        match (state, self.wiring) {
            (State::Idle, _) => (false, false),
            (State::Both, _) => (true, true),
            (State::Button1, Wiring::Straight) | (State::Button2, Wiring::Crossed) => (true, false),
            (State::Button2, Wiring::Straight) | (State::Button1, Wiring::Crossed) => (false, true),
        }
    }

    /// Resistance left in series with R0 in `state`.
    fn rest(&self, state: State, r1: f64, r2: f64) -> f64 {
        let (s1, s2) = self.shorted(state);
        (if s1 { 0.0 } else { r1 }) + (if s2 { 0.0 } else { r2 })
    }

    #[inline]
    fn node_voltage(&self, r0: f64, rest: f64) -> f64 {
        let across_r0 = self.ucc * (r0 / (r0 + rest));
        match self.node {
            MeasuredNode::AcrossR0 => across_r0,
            MeasuredNode::AcrossSwitches => self.ucc - across_r0,
        }
    }

    /// Voltage at the measured node in `state`.
    pub fn voltage(&self, state: State, r0: f64, r1: f64, r2: f64) -> f64 {
        self.node_voltage(r0, self.rest(state, r1, r2))
    }

    /// Voltages at the measured node for all four states, in `State::ALL` order.
    #[inline]
    pub fn voltages(&self, r0: f64, r1: f64, r2: f64) -> [f64; 4] {
        let (first, second) = match self.wiring {
            Wiring::Straight => (r2, r1),
            Wiring::Crossed => (r1, r2),
        };
        [
            self.node_voltage(r0, r1 + r2),
            self.node_voltage(r0, first),
            self.node_voltage(r0, second),
            self.node_voltage(r0, 0.0),
        ]
    }

    /// Power dissipated in each resistor in `state`, in mW. A shorted resistor dissipates nothing.
    pub fn power_in_state(&self, state: State, r0: f64, r1: f64, r2: f64) -> PowerLoss {
        let (s1, s2) = self.shorted(state);
        let total = r0 + self.rest(state, r1, r2);
        let p = |r: f64, shorted: bool| {
            if shorted {
                0.0
            } else {
                stress_mw(self.ucc, r, total)
            }
        };
        PowerLoss {
            r0: p(r0, false),
            r1: p(r1, s1),
            r2: p(r2, s2),
        }
    }

    /// Worst case power in each resistor over all four states.
    ///
    /// R0 carries the full supply with both buttons held. R1 and R2 are each most stressed when
    /// the other one is shorted, whichever button that takes.
    pub fn power_loss(&self, r0: f64, r1: f64, r2: f64) -> PowerLoss {
        PowerLoss {
            r0: stress_mw(self.ucc, r0, r0),
            r1: stress_mw(self.ucc, r1, r0 + r1),
            r2: stress_mw(self.ucc, r2, r0 + r2),
        }
    }

    /// Voltages and worst case power losses for a triple.
    pub fn evaluate(&self, r0: f64, r1: f64, r2: f64) -> ([f64; 4], PowerLoss) {
        (self.voltages(r0, r1, r2), self.power_loss(r0, r1, r2))
    }
}
