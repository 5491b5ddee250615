//! Order-independent reductions over a single stored value

use crate::traits::{Accumulator, Link, Params, QueryError, Siblings, Value};

#[cfg(feature = "std")]
use std::{string::String, vec, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

/// Smallest observed datum
///
/// Starts at `+∞`, so any real input improves it.
#[derive(Debug, Clone)]
pub struct Min {
    current: f64,
    link: Link,
}

impl Min {
    pub fn new() -> Min {
        Min { current: f64::INFINITY, link: Link::new() }
    }
}

impl Default for Min {
    fn default() -> Min {
        Min::new()
    }
}

impl Accumulator for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, _params: &Params) {
        if datum < self.current {
            self.current = datum;
        }
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Float(self.current))
    }
}

/// Largest observed datum
///
/// Starts at `−∞`, so any real input improves it.
#[derive(Debug, Clone)]
pub struct Max {
    current: f64,
    link: Link,
}

impl Max {
    pub fn new() -> Max {
        Max { current: f64::NEG_INFINITY, link: Link::new() }
    }
}

impl Default for Max {
    fn default() -> Max {
        Max::new()
    }
}

impl Accumulator for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, _params: &Params) {
        if datum > self.current {
            self.current = datum;
        }
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Float(self.current))
    }
}

/// Number of observations
#[derive(Debug, Clone, Default)]
pub struct Count {
    count: u64,
    link: Link,
}

impl Count {
    pub fn new() -> Count {
        Count::default()
    }
}

impl Accumulator for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, _datum: f64, _params: &Params) {
        self.count += 1;
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Int(self.count))
    }
}

/// Plain sum of the observed data
#[derive(Debug, Clone, Default)]
pub struct Sum {
    total: f64,
    link: Link,
}

impl Sum {
    pub fn new() -> Sum {
        Sum::default()
    }
}

impl Accumulator for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, _params: &Params) {
        self.total += datum;
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Float(self.total))
    }
}

/// Cumulative observation weight
///
/// Observations without an explicit weight count as weight 1, so on a
/// weightless stream this equals the count.
#[derive(Debug, Clone, Default)]
pub struct Weight {
    total: f64,
    link: Link,
}

impl Weight {
    pub fn new() -> Weight {
        Weight::default()
    }
}

impl Accumulator for Weight {
    fn name(&self) -> &str {
        "weight"
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, _datum: f64, params: &Params) {
        self.total += params.weight_or(1.0);
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Float(self.total))
    }
}

/// Sum of the observed data scaled by observation weight
#[derive(Debug, Clone, Default)]
pub struct WeightedSum {
    total: f64,
    link: Link,
}

impl WeightedSum {
    pub fn new() -> WeightedSum {
        WeightedSum::default()
    }
}

impl Accumulator for WeightedSum {
    fn name(&self) -> &str {
        "weighted_sum"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["wsum".into()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, params: &Params) {
        self.total += datum * params.weight_or(1.0);
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Float(self.total))
    }
}
