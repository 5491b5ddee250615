//! Single-pass variance via Welford's algorithm
//!
//! Both the unweighted and the weighted variance are written as
//! [`Step`] processes: the running quantities are local state carried
//! from one observation to the next, and the produced value after each
//! step is the current sample variance. The incremental formulation
//! avoids the catastrophic cancellation of the naive sum-of-squares
//! approach.

use crate::process::{Step, StepAccumulator};
use crate::traits::{Params, Value};

#[cfg(feature = "std")]
use std::{string::String, vec, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

/// Welford's single-pass sample variance
///
/// State carried across steps: observation count `n`, running mean, and
/// the running sum of squared deviations `m2`. The produced value is
/// the Bessel-corrected sample variance `m2 / (n − 1)` once `n > 1`,
/// and [`Value::Empty`] before that.
#[derive(Debug, Clone, Default)]
pub struct Welford;

/// Locals of the Welford process
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelfordState {
    pub n: u64,
    pub mean: f64,
    pub m2: f64,
}

impl Step for Welford {
    type State = WelfordState;

    fn name(&self) -> &str {
        "variance"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["var".into()]
    }

    fn start(&self) -> (WelfordState, Value) {
        (WelfordState::default(), Value::Empty)
    }

    fn step(&self, state: &mut WelfordState, datum: f64, _params: &Params) -> Value {
        state.n += 1;
        let delta = datum - state.mean;
        state.mean += delta / state.n as f64;
        let delta2 = datum - state.mean;
        state.m2 += delta * delta2;

        if state.n > 1 {
            Value::Float(state.m2 / (state.n - 1) as f64)
        } else {
            Value::Empty
        }
    }
}

/// Sample variance of the observed stream (alias `var`)
pub type Variance = StepAccumulator<Welford>;

/// Final-division scheme for the weighted variance
///
/// The running quantities are identical across schemes; only the
/// denominator of the final division differs. The three results are
/// distinct statistics, not interchangeable estimates of one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Correction {
    /// Frequency weights (each weight counts whole occurrences):
    /// divide by `Σw − 1`, the weighted analogue of Bessel's correction
    #[default]
    Frequency,
    /// Population variance: divide by `Σw`
    Population,
    /// Reliability weights (weights express relative precision):
    /// divide by `Σw − Σw²/Σw`
    Reliability,
}

/// Weighted generalization of Welford's algorithm
///
/// State carried across steps: cumulative weight `w_sum`, cumulative
/// squared weight `w_sum2`, the running weighted mean, and the running
/// weighted sum of squared deviations `s`. Observations without an
/// explicit weight count as weight 1; zero-weight observations leave
/// the state untouched.
#[derive(Debug, Clone, Default)]
pub struct WeightedWelford {
    correction: Correction,
}

impl WeightedWelford {
    pub fn new(correction: Correction) -> WeightedWelford {
        WeightedWelford { correction }
    }

    /// The configured final-division scheme
    pub fn correction(&self) -> Correction {
        self.correction
    }

    fn current(&self, state: &WeightedWelfordState) -> Value {
        let denominator = match self.correction {
            Correction::Frequency => state.w_sum - 1.0,
            Correction::Population => state.w_sum,
            Correction::Reliability => state.w_sum - state.w_sum2 / state.w_sum,
        };
        if denominator > 0.0 {
            Value::Float(state.s / denominator)
        } else {
            Value::Empty
        }
    }
}

/// Locals of the weighted Welford process
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedWelfordState {
    pub w_sum: f64,
    pub w_sum2: f64,
    pub mean: f64,
    pub s: f64,
}

impl Step for WeightedWelford {
    type State = WeightedWelfordState;

    fn name(&self) -> &str {
        "weighted_variance"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["wvar".into()]
    }

    fn start(&self) -> (WeightedWelfordState, Value) {
        (WeightedWelfordState::default(), Value::Empty)
    }

    fn step(&self, state: &mut WeightedWelfordState, datum: f64, params: &Params) -> Value {
        let weight = params.weight_or(1.0);
        if weight != 0.0 {
            state.w_sum += weight;
            state.w_sum2 += weight * weight;
            let mean_old = state.mean;
            state.mean = mean_old + (weight / state.w_sum) * (datum - mean_old);
            state.s += weight * (datum - mean_old) * (datum - state.mean);
        }
        self.current(state)
    }
}

/// Weighted sample variance of the observed stream (alias `wvar`)
pub type WeightedVariance = StepAccumulator<WeightedWelford>;

impl StepAccumulator<WeightedWelford> {
    /// Weighted variance with an explicit final-division scheme
    pub fn with_correction(correction: Correction) -> WeightedVariance {
        StepAccumulator::new(WeightedWelford::new(correction))
    }
}
