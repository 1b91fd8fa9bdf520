//! # Strategy registry
//!
//! Resolves one backend per capability family and freezes it. The host is
//! probed on first use; each family then walks its [`StrategyTable`] and
//! keeps the outcome (backend or failure) for the registry's lifetime.
//!
//! The registry is an ordinary value. Tests build one with a fixed
//! descriptor or replacement tables instead of a real host.

pub mod memo;
pub mod strategy;

use std::sync::Arc;

pub use memo::MemoizedSingleton;
pub use strategy::{BindContext, Candidate, StrategyTable};

use crate::binder::HostRuntime;
use crate::bridge::item::{ItemTextBackend, ItemTextFamily};
use crate::bridge::objective::{ObjectiveTextBackend, ObjectiveTextFamily};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::probe::{CapabilityDescriptor, CapabilityProbe};

/// A backend family resolved by the registry.
pub trait CapabilityFamily: 'static {
    /// Human-readable family name used in logs and errors.
    const NAME: &'static str;

    type Backend: Send + Sync + 'static;

    /// Candidates in priority order, ending with an unconditional fallback.
    fn default_table() -> StrategyTable<Self::Backend>;

    /// The registry's storage for this family.
    fn slot(registry: &StrategyRegistry) -> &FamilySlot<Self::Backend>;
}

/// Candidate table plus the frozen outcome of one family.
pub struct FamilySlot<B> {
    table: StrategyTable<B>,
    handle: MemoizedSingleton<Result<Arc<B>, Arc<BridgeError>>>,
}

impl<B> FamilySlot<B> {
    fn new(table: StrategyTable<B>) -> Self {
        Self {
            table,
            handle: MemoizedSingleton::new(),
        }
    }

    pub fn table(&self) -> &StrategyTable<B> {
        &self.table
    }

    pub fn is_resolved(&self) -> bool {
        self.handle.is_resolved()
    }
}

/// Probes the host once and resolves each family once.
pub struct StrategyRegistry {
    host: Arc<dyn HostRuntime>,
    config: BridgeConfig,
    descriptor: MemoizedSingleton<CapabilityDescriptor>,
    pub(crate) item: FamilySlot<ItemTextBackend>,
    pub(crate) objective: FamilySlot<ObjectiveTextBackend>,
}

impl StrategyRegistry {
    pub fn new(host: Arc<dyn HostRuntime>) -> Self {
        Self {
            host,
            config: BridgeConfig::default(),
            descriptor: MemoizedSingleton::new(),
            item: FamilySlot::new(ItemTextFamily::default_table()),
            objective: FamilySlot::new(ObjectiveTextFamily::default_table()),
        }
    }

    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Skips probing and uses `descriptor` as is.
    pub fn with_descriptor(mut self, descriptor: CapabilityDescriptor) -> Self {
        self.descriptor = MemoizedSingleton::resolved(descriptor);
        self
    }

    pub fn with_item_table(mut self, table: StrategyTable<ItemTextBackend>) -> Self {
        self.item = FamilySlot::new(table);
        self
    }

    pub fn with_objective_table(mut self, table: StrategyTable<ObjectiveTextBackend>) -> Self {
        self.objective = FamilySlot::new(table);
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn HostRuntime {
        self.host.as_ref()
    }

    /// The host's capabilities, probed on first call.
    pub fn descriptor(&self) -> &CapabilityDescriptor {
        self.descriptor
            .get_or_init(|| CapabilityProbe::new(self.host.as_ref(), &self.config).detect())
    }

    /// The frozen backend of family `F`.
    ///
    /// Every successful call returns the same instance. A family that failed
    /// to resolve keeps failing with [`BridgeError::BackendUnavailable`].
    pub fn resolve<F: CapabilityFamily>(&self) -> Result<Arc<F::Backend>, BridgeError> {
        let slot = F::slot(self);
        match slot.handle.get_or_init(|| self.build::<F>(slot)) {
            Ok(backend) => Ok(Arc::clone(backend)),
            Err(cause) => Err(BridgeError::BackendUnavailable {
                family: F::NAME,
                source: Arc::clone(cause),
            }),
        }
    }

    fn build<F: CapabilityFamily>(
        &self,
        slot: &FamilySlot<F::Backend>,
    ) -> Result<Arc<F::Backend>, Arc<BridgeError>> {
        let descriptor = self.descriptor();
        let Some(candidate) = slot.table.select(descriptor) else {
            log::error!(
                "No {} backend among {:?} supports host {}",
                F::NAME,
                slot.table.names(),
                descriptor
            );
            return Err(Arc::new(BridgeError::NoMatchingBackend {
                family: F::NAME,
                descriptor: descriptor.to_string(),
            }));
        };

        let context = BindContext {
            host: self.host.as_ref(),
            config: &self.config,
            descriptor,
        };
        match candidate.build(&context) {
            Ok(backend) => {
                log::info!(
                    "Using {} backend `{}` for host {}",
                    F::NAME,
                    candidate.name(),
                    descriptor
                );
                Ok(Arc::new(backend))
            }
            Err(e) => {
                log::error!(
                    "Failed to set up {} backend `{}`: {}",
                    F::NAME,
                    candidate.name(),
                    e
                );
                Err(Arc::new(e))
            }
        }
    }
}
