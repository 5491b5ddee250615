//! # Accumstats
//!
//! Composable accumulators for single-pass streaming statistics.
//!
//! Accumstats computes statistics from a stream of values in one pass,
//! without retaining the stream. Each statistic is a named, composable
//! accumulator; derived statistics (mean, variance, their weighted
//! variants) declare the primitives they read (sum, count, weight), and
//! the registry resolves that dependency graph so shared primitives are
//! computed exactly once no matter how many statistics need them.
//!
//! ## Features
//!
//! - **Dependency resolution**: attach `Mean` and `Variance`; `sum` and
//!   `count` appear once, automatically
//! - **Always-fresh derived values**: derived statistics store nothing
//!   and read their dependencies on demand, so they can never go stale
//! - **Numerical stability**: variance uses Welford's single-pass
//!   algorithm instead of the cancellation-prone sum of squares
//! - **Weighted statistics**: weighted mean and variance with an
//!   explicit choice of variance correction
//! - **Open contract**: any type implementing [`Accumulator`]
//!   participates, including whole nested sets
//!
//! ## Quick Start
//!
//! ```rust
//! use accumstats::prelude::*;
//!
//! let mut stats = AccumulatorSet::new([
//!     Spec::of::<Mean>(),
//!     Spec::of::<Variance>(),
//!     Spec::of::<Min>(),
//!     Spec::of::<Max>(),
//! ]).unwrap();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     stats.add(value);
//! }
//!
//! assert_eq!(stats.get("mean").unwrap(), Value::Float(3.0));
//! assert_eq!(stats.get("variance").unwrap(), Value::Float(2.5));
//! assert_eq!(stats.get("count").unwrap(), Value::Int(5)); // auto-attached
//! ```
//!
//! Weighted observations carry a `weight` parameter; statistics that do
//! not care about it ignore it:
//!
//! ```rust
//! use accumstats::prelude::*;
//!
//! let mut stats = AccumulatorSet::new([Spec::of::<WeightedMean>()]).unwrap();
//!
//! stats.add_weighted(10.0, 1.0);
//! stats.add_weighted(20.0, 3.0);
//!
//! assert_eq!(stats.get("weighted_mean").unwrap(), Value::Float(17.5));
//! ```
//!
//! A set is itself an accumulator, so sets nest:
//!
//! ```rust
//! use accumstats::prelude::*;
//!
//! let latency = AccumulatorSet::named("latency", [Spec::of::<Mean>()]).unwrap();
//! let mut stats = AccumulatorSet::new([Spec::instance(latency)]).unwrap();
//!
//! stats.add(4.0);
//! assert!(matches!(stats.get("latency").unwrap(), Value::Group(_)));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): standard library support
//! - `statistics` (default): the bundled statistics catalog; the
//!   framework core is always available
//! - `serde`: serialization of value, parameter, and process-state types

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod traits;

pub mod process;
pub mod set;

#[cfg(feature = "statistics")]
pub(crate) mod math;

#[cfg(feature = "statistics")]
#[cfg_attr(docsrs, doc(cfg(feature = "statistics")))]
pub mod statistics;

pub mod prelude {
    pub use crate::process::{Step, StepAccumulator};
    pub use crate::set::AccumulatorSet;
    pub use crate::traits::{
        Accumulator, AttachError, Detached, Params, QueryError, Siblings, Spec, Value,
    };

    #[cfg(feature = "statistics")]
    pub use crate::statistics::{
        Correction, Count, Max, Mean, Min, Range, StandardDeviation, Sum, Variance, Weight,
        WeightedMean, WeightedStandardDeviation, WeightedSum, WeightedVariance,
    };
}

pub use process::{Step, StepAccumulator};
pub use set::AccumulatorSet;
pub use traits::{Accumulator, Params, Spec, Value};
