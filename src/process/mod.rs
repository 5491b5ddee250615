//! Stepwise accumulators
//!
//! Some statistics are most clearly written as a short sequential
//! process: a few local variables carried from one observation to the
//! next, with the updated value produced after each step. The [`Step`]
//! trait captures that shape as an explicit state struct plus a step
//! function, and [`StepAccumulator`] adapts any such process to the
//! [`Accumulator`](crate::traits::Accumulator) contract.
//!
//! Welford-style variance is the canonical example; see
//! [`Welford`](crate::statistics::Welford).

mod step;

pub use step::{Step, StepAccumulator};
