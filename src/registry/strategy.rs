//! Ordered candidate tables.
//!
//! A family lists its backends from most native to most degraded. The first
//! candidate whose predicate accepts the descriptor is built; the last one
//! is expected to accept anything.

use std::fmt;
use std::sync::Arc;

use crate::binder::HostRuntime;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::probe::{CapabilityDescriptor, FeatureFlag, TypeLocator};

/// Everything a backend constructor may look at.
#[derive(Clone, Copy)]
pub struct BindContext<'a> {
    pub host: &'a dyn HostRuntime,
    pub config: &'a BridgeConfig,
    pub descriptor: &'a CapabilityDescriptor,
}

impl<'a> BindContext<'a> {
    pub fn locator(&self) -> TypeLocator<'a> {
        TypeLocator::new(
            self.host,
            &self.config.layout,
            self.descriptor.implementation_tag(),
            self.descriptor.has(FeatureFlag::FlattenedInternalNamespace),
        )
    }

    pub fn has(&self, flag: FeatureFlag) -> bool {
        self.descriptor.has(flag)
    }
}

type Predicate = Arc<dyn Fn(&CapabilityDescriptor) -> bool + Send + Sync>;
type Builder<B> = Arc<dyn Fn(&BindContext<'_>) -> Result<B, BridgeError> + Send + Sync>;

/// A named `(predicate, constructor)` pair.
pub struct Candidate<B> {
    name: &'static str,
    predicate: Predicate,
    build: Builder<B>,
}

impl<B> Candidate<B> {
    pub fn new<P, F>(name: &'static str, predicate: P, build: F) -> Self
    where
        P: Fn(&CapabilityDescriptor) -> bool + Send + Sync + 'static,
        F: Fn(&BindContext<'_>) -> Result<B, BridgeError> + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Arc::new(predicate),
            build: Arc::new(build),
        }
    }

    /// Candidate selected whenever the descriptor has `flag`.
    pub fn when<F>(name: &'static str, flag: FeatureFlag, build: F) -> Self
    where
        F: Fn(&BindContext<'_>) -> Result<B, BridgeError> + Send + Sync + 'static,
    {
        Self::new(name, move |descriptor| descriptor.has(flag), build)
    }

    /// Unconditional candidate.
    pub fn fallback<F>(name: &'static str, build: F) -> Self
    where
        F: Fn(&BindContext<'_>) -> Result<B, BridgeError> + Send + Sync + 'static,
    {
        Self::new(name, |_| true, build)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn accepts(&self, descriptor: &CapabilityDescriptor) -> bool {
        (self.predicate)(descriptor)
    }

    pub fn build(&self, context: &BindContext<'_>) -> Result<B, BridgeError> {
        (self.build)(context)
    }
}

impl<B> Clone for Candidate<B> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            predicate: Arc::clone(&self.predicate),
            build: Arc::clone(&self.build),
        }
    }
}

impl<B> fmt::Debug for Candidate<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

/// Candidates in priority order.
pub struct StrategyTable<B> {
    candidates: Vec<Candidate<B>>,
}

impl<B> StrategyTable<B> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn candidate(mut self, candidate: Candidate<B>) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// The first candidate accepting `descriptor`.
    pub fn select(&self, descriptor: &CapabilityDescriptor) -> Option<&Candidate<B>> {
        self.candidates.iter().find(|c| c.accepts(descriptor))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.candidates.iter().map(Candidate::name).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<B> Default for StrategyTable<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for StrategyTable<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
