//! Statistics derived from sibling values at read time
//!
//! None of these hold state of their own. Observation is a no-op; the
//! value is recomputed from the declared dependencies on every read, so
//! it can never go stale no matter how reads interleave with
//! observations.

use crate::math;
use crate::statistics::simple::{Count, Max, Min, Sum, Weight, WeightedSum};
use crate::statistics::variance::{Variance, WeightedVariance};
use crate::traits::{Accumulator, Link, QueryError, Siblings, Spec, Value};

#[cfg(feature = "std")]
use std::{string::String, vec, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

/// Quotient of two sibling values, empty while the divisor is zero
fn ratio(siblings: &dyn Siblings, numerator: &str, divisor: &str) -> Result<Value, QueryError> {
    let numerator = siblings.value_of(numerator)?;
    let divisor = siblings.value_of(divisor)?;
    Ok(match (numerator.as_f64(), divisor.as_f64()) {
        (Some(numerator), Some(divisor)) if divisor > 0.0 => Value::Float(numerator / divisor),
        _ => Value::Empty,
    })
}

/// Square root of a sibling value, empty while the sibling is
fn root(siblings: &dyn Siblings, identifier: &str) -> Result<Value, QueryError> {
    Ok(match siblings.value_of(identifier)?.as_f64() {
        Some(x) => Value::Float(math::sqrt(x)),
        None => Value::Empty,
    })
}

/// Spread of the observed data, `max − min`
///
/// Empty until both extrema are finite, i.e. until the first finite
/// observation arrives.
#[derive(Debug, Clone, Default)]
pub struct Range {
    link: Link,
}

impl Range {
    pub fn new() -> Range {
        Range::default()
    }
}

impl Accumulator for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn dependencies(&self) -> Vec<Spec> {
        vec![Spec::of::<Min>(), Spec::of::<Max>()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError> {
        let min = siblings.value_of("min")?;
        let max = siblings.value_of("max")?;
        Ok(match (min.as_f64(), max.as_f64()) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() => {
                Value::Float(max - min)
            }
            _ => Value::Empty,
        })
    }
}

/// Arithmetic mean, `sum / count` (alias `avg`)
#[derive(Debug, Clone, Default)]
pub struct Mean {
    link: Link,
}

impl Mean {
    pub fn new() -> Mean {
        Mean::default()
    }
}

impl Accumulator for Mean {
    fn name(&self) -> &str {
        "mean"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["avg".into()]
    }

    fn dependencies(&self) -> Vec<Spec> {
        vec![Spec::of::<Sum>(), Spec::of::<Count>()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError> {
        ratio(siblings, "sum", "count")
    }
}

/// Weighted mean, `weighted_sum / weight` (alias `wmean`)
#[derive(Debug, Clone, Default)]
pub struct WeightedMean {
    link: Link,
}

impl WeightedMean {
    pub fn new() -> WeightedMean {
        WeightedMean::default()
    }
}

impl Accumulator for WeightedMean {
    fn name(&self) -> &str {
        "weighted_mean"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["wmean".into()]
    }

    fn dependencies(&self) -> Vec<Spec> {
        vec![Spec::of::<WeightedSum>(), Spec::of::<Weight>()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError> {
        ratio(siblings, "weighted_sum", "weight")
    }
}

/// Sample standard deviation, `√variance` (aliases `std`, `stdev`)
#[derive(Debug, Clone, Default)]
pub struct StandardDeviation {
    link: Link,
}

impl StandardDeviation {
    pub fn new() -> StandardDeviation {
        StandardDeviation::default()
    }
}

impl Accumulator for StandardDeviation {
    fn name(&self) -> &str {
        "standard_deviation"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["std".into(), "stdev".into()]
    }

    fn dependencies(&self) -> Vec<Spec> {
        vec![Spec::of::<Variance>()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError> {
        root(siblings, "variance")
    }
}

/// Weighted sample standard deviation, `√weighted_variance` (alias `wstd`)
#[derive(Debug, Clone, Default)]
pub struct WeightedStandardDeviation {
    link: Link,
}

impl WeightedStandardDeviation {
    pub fn new() -> WeightedStandardDeviation {
        WeightedStandardDeviation::default()
    }
}

impl Accumulator for WeightedStandardDeviation {
    fn name(&self) -> &str {
        "weighted_standard_deviation"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["wstd".into()]
    }

    fn dependencies(&self) -> Vec<Spec> {
        vec![Spec::of::<WeightedVariance>()]
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError> {
        root(siblings, "weighted_variance")
    }
}
