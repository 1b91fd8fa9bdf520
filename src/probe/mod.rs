//! # Capability probe
//!
//! Inspects a live host once and condenses what it finds into an immutable
//! [`CapabilityDescriptor`]: the parsed version plus a set of
//! [`FeatureFlag`]s. Symbols are tested through the binder, and a missing
//! symbol simply leaves its flag unset.

pub mod descriptor;
pub mod detect;
pub mod locator;
pub mod version;

pub use descriptor::{CapabilityDescriptor, FeatureFlag};
pub use detect::CapabilityProbe;
pub use locator::{symbols, TypeLocator};
pub use version::{ExactVersion, HostVersion};
