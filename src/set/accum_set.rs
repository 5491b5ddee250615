//! Dependency-resolving accumulator registry
//!
//! Attaching specs runs a breadth-first closure over the dependency
//! graph, so shared primitives are instantiated exactly once no matter
//! how many derived statistics request them.

use crate::traits::{
    Accumulator, AttachError, Link, Params, QueryError, SetId, SharedAccumulator, Siblings, Spec,
    Value,
};

#[cfg(feature = "std")]
use std::{
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    string::String,
    vec::Vec,
};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    string::{String, ToString},
    vec::Vec,
};

/// A member slot: the primary name is kept outside the cell so that
/// snapshots and error messages never need a borrow to learn it.
#[derive(Debug)]
struct Member {
    name: String,
    accum: SharedAccumulator,
}

/// A registry joining a collection of accumulators
///
/// The set resolves the full dependency closure once at attach time,
/// dispatches every observation to each distinct member, and serves
/// value lookups by name or alias. Sets implement [`Accumulator`]
/// themselves, so they nest.
///
/// A set is the single logical owner of its members. It is not
/// synchronized; concurrent observation requires an external lock or
/// sharding across independent sets.
///
/// # Example
///
/// ```
/// use accumstats::prelude::*;
///
/// let mut stats = AccumulatorSet::new([
///     Spec::of::<Mean>(),
///     Spec::of::<Variance>(),
/// ]).unwrap();
///
/// for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     stats.add(value);
/// }
///
/// assert_eq!(stats.get("mean").unwrap(), Value::Float(3.0));
/// assert_eq!(stats.get("var").unwrap(), Value::Float(2.5)); // by alias
/// ```
#[derive(Debug)]
pub struct AccumulatorSet {
    id: SetId,
    name: String,
    aliases: Vec<String>,
    /// Members in closure-discovery order; fan-out and snapshots follow it
    members: Vec<Member>,
    /// Primary name -> member slot
    by_name: BTreeMap<String, usize>,
    /// Every identifier (names and aliases) -> member slot
    index: BTreeMap<String, usize>,
    link: Link,
}

impl AccumulatorSet {
    /// Build a set named `"stats"` from an ordered list of specs
    ///
    /// The full attach algorithm runs before this returns; all
    /// configuration errors surface here.
    pub fn new<I>(specs: I) -> Result<AccumulatorSet, AttachError>
    where
        I: IntoIterator,
        I::Item: Into<Spec>,
    {
        AccumulatorSet::named("stats", specs)
    }

    /// Build a named set, for nesting inside another set
    pub fn named<N, I>(name: N, specs: I) -> Result<AccumulatorSet, AttachError>
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<Spec>,
    {
        let mut set = AccumulatorSet {
            id: SetId::next(),
            name: name.into(),
            aliases: Vec::new(),
            members: Vec::new(),
            by_name: BTreeMap::new(),
            index: BTreeMap::new(),
            link: Link::new(),
        };
        set.attach(specs)?;
        Ok(set)
    }

    /// Identifiers this set answers to when nested in a parent set
    pub fn with_aliases<I, S>(mut self, aliases: I) -> AccumulatorSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Attach more accumulators, resolving their dependency closure
    ///
    /// Specs are processed through a FIFO queue: factories are realized
    /// when dequeued, an instance whose primary name is already present
    /// is discarded (so the same dependency may be requested by several
    /// dependents), and every accepted instance has its dependencies
    /// pushed onto the back of the queue.
    ///
    /// Returns the newly attached primary names in discovery order.
    ///
    /// # Errors
    ///
    /// [`AttachError::AlreadyLinked`] if an instance is owned by another
    /// set, [`AttachError::DuplicateIdentifier`] if a name or alias
    /// collides with an identifier already registered. Both are fatal:
    /// the set may be left partially extended and must be discarded.
    pub fn attach<I>(&mut self, specs: I) -> Result<Vec<String>, AttachError>
    where
        I: IntoIterator,
        I::Item: Into<Spec>,
    {
        let mut queue: VecDeque<Spec> = specs.into_iter().map(Into::into).collect();
        let mut attached = Vec::new();

        while let Some(spec) = queue.pop_front() {
            let accum = match spec {
                Spec::Ready(accum) => accum,
                Spec::Factory(build) => build(),
            };

            let name = accum.borrow().name().to_string();
            if self.by_name.contains_key(&name) {
                continue;
            }

            if !accum.borrow_mut().link_state().bind(self.id) {
                return Err(AttachError::AlreadyLinked { name });
            }

            let aliases = accum.borrow().aliases();
            let dependencies = accum.borrow().dependencies();

            let slot = self.members.len();
            self.members.push(Member { name: name.clone(), accum });
            self.by_name.insert(name.clone(), slot);
            for identifier in core::iter::once(name.clone()).chain(aliases) {
                if self.index.contains_key(&identifier) {
                    return Err(AttachError::DuplicateIdentifier { identifier });
                }
                self.index.insert(identifier, slot);
            }

            queue.extend(dependencies);
            attached.push(name);
        }

        Ok(attached)
    }

    /// Fold one weightless observation into every member
    pub fn add(&mut self, datum: f64) {
        self.observe_with(datum, &Params::NONE);
    }

    /// Fold one weighted observation into every member
    pub fn add_weighted(&mut self, datum: f64, weight: f64) {
        self.observe_with(datum, &Params::weighted(weight));
    }

    /// Fold one observation with explicit parameters into every member
    ///
    /// Members are updated in discovery order. Dependencies may be
    /// updated before or after their dependents within the same call;
    /// this is safe because values are only read on demand, after the
    /// whole fan-out completed.
    pub fn observe_with(&mut self, datum: f64, params: &Params) {
        for member in &self.members {
            member.accum.borrow_mut().observe(datum, params);
        }
    }

    /// Current value registered under `identifier` (name or alias)
    ///
    /// Computed members read their dependencies through this set at
    /// call time, so the result always reflects every observation made
    /// so far.
    pub fn get(&self, identifier: &str) -> Result<Value, QueryError> {
        let slot = match self.index.get(identifier) {
            Some(slot) => *slot,
            None => {
                return Err(QueryError::UnknownIdentifier { identifier: identifier.into() });
            }
        };
        let member = &self.members[slot];
        let guard = member
            .accum
            .try_borrow()
            .map_err(|_| QueryError::DependencyCycle { identifier: identifier.into() })?;
        guard.value(self)
    }

    /// Ordered snapshot mapping each member's primary name to its value
    ///
    /// Freshly computed on every call, never cached; the order is the
    /// closure-discovery order of the members.
    pub fn snapshot(&self) -> Result<Vec<(String, Value)>, QueryError> {
        let mut values = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let guard = member
                .accum
                .try_borrow()
                .map_err(|_| QueryError::DependencyCycle { identifier: member.name.clone() })?;
            values.push((member.name.clone(), guard.value(self)?));
        }
        Ok(values)
    }

    /// Number of distinct accumulators in the set
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `identifier` (name or alias) is registered
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Primary names in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|member| member.name.as_str())
    }

    /// Shared handle to the member registered under `identifier`
    pub fn handle(&self, identifier: &str) -> Option<SharedAccumulator> {
        self.index.get(identifier).map(|slot| Rc::clone(&self.members[*slot].accum))
    }
}

impl Siblings for AccumulatorSet {
    fn value_of(&self, identifier: &str) -> Result<Value, QueryError> {
        self.get(identifier)
    }
}

impl Accumulator for AccumulatorSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> Vec<String> {
        self.aliases.clone()
    }

    fn link_state(&mut self) -> &mut Link {
        &mut self.link
    }

    fn observe(&mut self, datum: f64, params: &Params) {
        self.observe_with(datum, params);
    }

    fn value(&self, _siblings: &dyn Siblings) -> Result<Value, QueryError> {
        Ok(Value::Group(self.snapshot()?))
    }
}
