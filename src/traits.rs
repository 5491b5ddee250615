//! Core contract for streaming accumulators
//!
//! Every statistic implements the base [`Accumulator`] trait. An
//! [`AccumulatorSet`](crate::set::AccumulatorSet) wires accumulators
//! together, resolves their dependencies, and exposes their values by
//! name; accumulators whose update logic reads as a sequential process
//! are built on [`StepAccumulator`](crate::process::StepAccumulator).

use core::cell::RefCell;
use core::fmt::Debug;
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "std")]
use std::{boxed::Box, rc::Rc, string::String, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, rc::Rc, string::String, vec::Vec};

/// Error raised while attaching accumulators to a set
///
/// Both variants are configuration errors in the caller's accumulator
/// list. They are detected eagerly at attach time; a set that returned
/// one of these must be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The instance is already owned by another accumulator set
    AlreadyLinked {
        name: String,
    },
    /// A name or alias collides with an identifier already in the set
    DuplicateIdentifier {
        identifier: String,
    },
}

impl core::fmt::Display for AttachError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttachError::AlreadyLinked { name } => {
                write!(f, "accumulator {:?} is already linked to an accumulator set", name)
            }
            AttachError::DuplicateIdentifier { identifier } => {
                write!(f, "conflicting accumulator identifier {:?}", identifier)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AttachError {}

/// Error raised when reading values out of a set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The identifier was never registered
    UnknownIdentifier {
        identifier: String,
    },
    /// A computed value read re-entered an accumulator that is already
    /// being read, directly or through a chain of dependencies
    DependencyCycle {
        identifier: String,
    },
}

impl core::fmt::Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueryError::UnknownIdentifier { identifier } => {
                write!(f, "unknown accumulator identifier {:?}", identifier)
            }
            QueryError::DependencyCycle { identifier } => {
                write!(f, "dependency cycle while reading accumulator {:?}", identifier)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueryError {}

/// Current value of an accumulator
///
/// Statistics that have not seen enough data yet report [`Value::Empty`]
/// instead of raising: an empty stream has no mean, a single observation
/// has no sample variance. These are expected transient states, not
/// errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Not enough data yet
    Empty,
    /// Integer-valued statistic (counts)
    Int(u64),
    /// Real-valued statistic
    Float(f64),
    /// Ordered snapshot of a nested accumulator set
    Group(Vec<(String, Value)>),
}

impl Value {
    /// Whether this is the "no value yet" sentinel
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Numeric view of the value
    ///
    /// Integers are promoted to `f64`; [`Value::Empty`] and
    /// [`Value::Group`] have no numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Empty | Value::Group(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Value {
        Value::Int(n)
    }
}

/// Per-observation parameters passed alongside each datum
///
/// The parameter set is open-ended in principle, but the only key the
/// bundled statistics understand is `weight`. Accumulators that do not
/// care about a parameter simply ignore it.
///
/// # Example
///
/// ```
/// use accumstats::traits::Params;
///
/// let p = Params::weighted(3.0);
/// assert_eq!(p.weight_or(1.0), 3.0);
/// assert_eq!(Params::NONE.weight_or(1.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Observation weight, a non-negative real number
    pub weight: Option<f64>,
}

impl Params {
    /// Parameters of a plain, weightless observation
    pub const NONE: Params = Params { weight: None };

    /// Parameters carrying an observation weight
    pub fn weighted(weight: f64) -> Params {
        Params { weight: Some(weight) }
    }

    /// The observation weight, or `default` if none was given
    pub fn weight_or(&self, default: f64) -> f64 {
        self.weight.unwrap_or(default)
    }
}

/// Identity of an accumulator set
///
/// Minted once per set from a process-wide counter and used only to
/// enforce single ownership of accumulator instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetId(u64);

impl SetId {
    pub(crate) fn next() -> SetId {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One-time binding of an accumulator to its owning set
///
/// Every accumulator embeds a `Link` and hands it out through
/// [`Accumulator::link_state`]; the owning set claims it during attach.
/// An instance can be claimed at most once for its lifetime; attaching
/// it to a second set is a fatal configuration error.
#[derive(Debug, Clone, Default)]
pub struct Link {
    owner: Option<SetId>,
}

impl Link {
    /// A fresh, unclaimed link
    pub fn new() -> Link {
        Link { owner: None }
    }

    /// The owning set, if the accumulator has been attached
    pub fn owner(&self) -> Option<SetId> {
        self.owner
    }

    /// Whether the accumulator has been attached to a set
    pub fn is_linked(&self) -> bool {
        self.owner.is_some()
    }

    /// Claim the slot for `owner`; `false` if some set already owns it
    pub(crate) fn bind(&mut self, owner: SetId) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(owner);
        true
    }
}

/// Read-time lookup capability handed to computed accumulators
///
/// Implemented by [`AccumulatorSet`](crate::set::AccumulatorSet), which
/// passes itself to every member's [`Accumulator::value`] call. Computed
/// accumulators use it to read the current values of their dependencies
/// by identifier; stateful accumulators ignore it.
pub trait Siblings {
    /// Current value of the sibling registered under `identifier`
    fn value_of(&self, identifier: &str) -> Result<Value, QueryError>;
}

/// Lookup used when an accumulator is read outside any set
///
/// Every query answers [`QueryError::UnknownIdentifier`], so a computed
/// accumulator read standalone propagates an error instead of producing
/// a plausible-looking number.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Siblings for Detached {
    fn value_of(&self, identifier: &str) -> Result<Value, QueryError> {
        Err(QueryError::UnknownIdentifier { identifier: identifier.into() })
    }
}

/// A named, composable unit computing one statistic from a stream
///
/// Accumulators update incrementally as each datum arrives and never
/// retain the stream. They come in two flavors:
///
/// - **stateful**: [`observe`](Accumulator::observe) folds the datum
///   into internal state, and [`value`](Accumulator::value) reports
///   whatever the last observation produced;
/// - **computed**: `observe` is a no-op, and `value` is evaluated
///   freshly on every read from sibling values looked up through the
///   owning set, so reads always reflect the latest state of the
///   dependencies, no matter when they are made.
///
/// [`aliases`](Accumulator::aliases) and
/// [`dependencies`](Accumulator::dependencies) are called exactly once,
/// when the accumulator is accepted into a set.
pub trait Accumulator: Debug {
    /// Primary identifier, unique within an owning set
    fn name(&self) -> &str;

    /// Additional identifiers resolving to this accumulator
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Specs for the accumulators this one reads at value time
    ///
    /// Each spec is attached to the same set unless an accumulator with
    /// the same name is already present.
    fn dependencies(&self) -> Vec<Spec> {
        Vec::new()
    }

    /// Binding slot used by the owning set to claim this instance
    fn link_state(&mut self) -> &mut Link;

    /// Fold one observation into the accumulator's state
    ///
    /// Computed accumulators keep no state and use the default no-op.
    /// Implementations must not read sibling values here; sibling reads
    /// belong in [`value`](Accumulator::value).
    fn observe(&mut self, _datum: f64, _params: &Params) {}

    /// Current value of the statistic
    fn value(&self, siblings: &dyn Siblings) -> Result<Value, QueryError>;
}

/// An accumulator instance shared between a set and outside callers
pub type SharedAccumulator = Rc<RefCell<dyn Accumulator>>;

/// Recipe for obtaining an accumulator during attach
///
/// A spec is either a ready instance or a zero-argument factory,
/// invoked when the spec is dequeued during closure resolution. An
/// instance whose name is already present in the set is discarded
/// without being linked.
///
/// # Example
///
/// ```
/// use accumstats::prelude::*;
///
/// let stats = AccumulatorSet::new([
///     Spec::of::<Mean>(),           // factory over a Default type
///     Min::new().into(),            // ready instance
///     Spec::factory(|| Max::new()), // explicit factory
/// ]).unwrap();
/// assert!(stats.contains("mean"));
/// ```
pub enum Spec {
    /// A ready instance, possibly shared with the caller
    Ready(SharedAccumulator),
    /// Invoked with no arguments when first dequeued during closure
    /// resolution
    Factory(Box<dyn FnOnce() -> SharedAccumulator>),
}

impl Spec {
    /// Factory spec for a `Default`-constructible accumulator type
    pub fn of<A>() -> Spec
    where
        A: Accumulator + Default + 'static,
    {
        Spec::Factory(Box::new(|| {
            let accum: SharedAccumulator = Rc::new(RefCell::new(A::default()));
            accum
        }))
    }

    /// Spec wrapping a ready instance
    pub fn instance<A>(accum: A) -> Spec
    where
        A: Accumulator + 'static,
    {
        Spec::Ready(Rc::new(RefCell::new(accum)))
    }

    /// Spec wrapping a shared instance
    ///
    /// The caller keeps a handle for direct inspection; the instance can
    /// still only ever belong to one set.
    pub fn shared(accum: SharedAccumulator) -> Spec {
        Spec::Ready(accum)
    }

    /// Spec deferring construction to a zero-argument factory
    pub fn factory<A, F>(build: F) -> Spec
    where
        A: Accumulator + 'static,
        F: FnOnce() -> A + 'static,
    {
        Spec::Factory(Box::new(move || {
            let accum: SharedAccumulator = Rc::new(RefCell::new(build()));
            accum
        }))
    }
}

impl Debug for Spec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Spec::Ready(accum) => f.debug_tuple("Ready").field(accum).finish(),
            Spec::Factory(_) => f.debug_tuple("Factory").field(&"..").finish(),
        }
    }
}

impl<A: Accumulator + 'static> From<A> for Spec {
    fn from(accum: A) -> Spec {
        Spec::instance(accum)
    }
}
