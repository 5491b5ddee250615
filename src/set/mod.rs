//! Accumulator registry and dispatcher
//!
//! An [`AccumulatorSet`] owns a closed, deduplicated collection of
//! accumulators, resolves their dependency closure at attach time, fans
//! out each observed datum to every member, and exposes value lookup by
//! name or alias.
//!
//! # Example
//!
//! ```
//! use accumstats::prelude::*;
//!
//! // Mean pulls in its dependencies (sum, count) automatically.
//! let mut stats = AccumulatorSet::new([Spec::of::<Mean>()]).unwrap();
//!
//! for value in [1.0, 2.0, 3.0] {
//!     stats.add(value);
//! }
//!
//! assert_eq!(stats.get("mean").unwrap(), Value::Float(2.0));
//! assert_eq!(stats.get("count").unwrap(), Value::Int(3));
//! ```

mod accum_set;

pub use accum_set::AccumulatorSet;
