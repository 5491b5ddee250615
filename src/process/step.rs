//! Step-function adapter for sequential-process accumulators

use crate::traits::{Accumulator, Link, Params, QueryError, Siblings, Spec, Value};

use core::fmt::Debug;

#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// A sequential update process
///
/// `State` holds the local variables carried between observations;
/// [`start`](Step::start) produces the initial state together with the
/// value reported before anything is observed, and
/// [`step`](Step::step) folds one `(datum, params)` pair into the state
/// and produces the updated value.
///
/// The process definition itself (`&self`) is read-only during
/// stepping; anything that changes per observation belongs in `State`.
pub trait Step: Debug {
    /// Local variables carried between observations
    type State: Debug;

    /// Primary name of the resulting accumulator
    fn name(&self) -> &str;

    /// Extra identifiers for the resulting accumulator
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Dependency specs for the resulting accumulator
    fn dependencies(&self) -> Vec<Spec> {
        Vec::new()
    }

    /// Initial state and the value produced before any observation
    fn start(&self) -> (Self::State, Value);

    /// Fold one observation into `state`, producing the updated value
    fn step(&self, state: &mut Self::State, datum: f64, params: &Params) -> Value;
}

/// Adapter exposing a [`Step`] process as an accumulator
///
/// Construction drives the process to its starting point exactly once:
/// the initial value exists before any observation can arrive. Each
/// `observe` call then resumes the process with one `(datum, params)`
/// pair and stores the value it produces; `&mut self` makes resumption
/// strictly one observation at a time.
///
/// # Example
///
/// ```
/// use accumstats::prelude::*;
///
/// /// Most recent observation.
/// #[derive(Debug, Default)]
/// struct Last;
///
/// impl Step for Last {
///     type State = ();
///
///     fn name(&self) -> &str {
///         "last"
///     }
///
///     fn start(&self) -> ((), Value) {
///         ((), Value::Empty)
///     }
///
///     fn step(&self, _state: &mut (), datum: f64, _params: &Params) -> Value {
///         Value::Float(datum)
///     }
/// }
///
/// let mut last = StepAccumulator::new(Last);
/// assert_eq!(last.value(&Detached).unwrap(), Value::Empty);
///
/// last.observe(2.5, &Params::NONE);
/// assert_eq!(last.value(&Detached).unwrap(), Value::Float(2.5));
/// ```
#[derive(Debug)]
pub struct StepAccumulator<S: Step> {
    process: S,
    state: S::State,
    value: Value,
    link: Link,
}

impl<S: Step> StepAccumulator<S> {
    /// Start `process` and wrap it as an accumulator
    pub fn new(process: S) -> StepAccumulator<S> {
        let (state, value) = process.start();
        StepAccumulator { process, state, value, link: Link::new() }
    }

    /// The process definition
    pub fn process(&self) -> &S {
        &self.process
    }
}

impl<S: Step + Default> Default for StepAccumulator<S> {
    fn default() -> StepAccumulator<S> {
        StepAccumulator::new(S::default())
    }
}

impl<S: Step> Accumulator for StepAccumulator<S> {
    fn name(&self) -> &str {
        self.process.name()
    }

    fn aliases(&self) -> Vec<String> {
        self.process.aliases()
    }

    fn dependencies(&self) -> Vec<Spec> {
        self.process.dependencies()
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, params: &Params) {
        self.value = self.process.step(&mut self.state, datum, params);
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(self.value.clone())
    }
}
