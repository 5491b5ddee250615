//! Bundled statistical accumulators
//!
//! Concrete statistics built on the accumulator contract, in three
//! styles:
//!
//! - simple reductions that fold each datum into a single stored value
//!   ([`Min`], [`Max`], [`Count`], [`Sum`], [`Weight`], [`WeightedSum`]);
//! - derived reads with no state of their own, recomputed from sibling
//!   values on every read ([`Range`], [`Mean`], [`WeightedMean`],
//!   [`StandardDeviation`], [`WeightedStandardDeviation`]);
//! - sequential processes for the numerically delicate running
//!   statistics ([`Variance`], [`WeightedVariance`], built on Welford's
//!   algorithm).
//!
//! # Example
//!
//! ```
//! use accumstats::prelude::*;
//!
//! let mut stats = AccumulatorSet::new(accumstats::statistics::descriptive()).unwrap();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     stats.add(value);
//! }
//!
//! assert_eq!(stats.get("count").unwrap(), Value::Int(5));
//! assert_eq!(stats.get("mean").unwrap(), Value::Float(3.0));
//! assert_eq!(stats.get("variance").unwrap(), Value::Float(2.5));
//! ```

mod derived;
mod simple;
mod variance;

pub use derived::{Mean, Range, StandardDeviation, WeightedMean, WeightedStandardDeviation};
pub use simple::{Count, Max, Min, Sum, Weight, WeightedSum};
pub use variance::{
    Correction, Variance, WeightedVariance, WeightedWelford, WeightedWelfordState, Welford,
    WelfordState,
};

use crate::traits::Spec;

#[cfg(feature = "std")]
use std::{vec, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Specs for the full bundled catalog, weighted variants included
pub fn descriptive() -> Vec<Spec> {
    vec![
        Spec::of::<Min>(),
        Spec::of::<Max>(),
        Spec::of::<Range>(),
        Spec::of::<Count>(),
        Spec::of::<Sum>(),
        Spec::of::<Mean>(),
        Spec::of::<Weight>(),
        Spec::of::<WeightedSum>(),
        Spec::of::<WeightedMean>(),
        Spec::of::<Variance>(),
        Spec::of::<StandardDeviation>(),
        Spec::of::<WeightedVariance>(),
        Spec::of::<WeightedStandardDeviation>(),
    ]
}
