//! # textbridge
//!
//! Rich text for hosts whose text storage changes from version to version.
//!
//! The host is probed once at runtime, the most capable backend for each
//! capability family (item metadata text, scoreboard objective titles) is
//! picked and frozen, and every later read or write goes straight to that
//! backend through pre-bound member handles.
//!
//! ```text
//! TextBridge ──► StrategyRegistry ──► CapabilityProbe ──► HostRuntime
//!                     │                    (once)
//!                     ▼
//!        ItemTextBackend / ObjectiveTextBackend  (frozen per family)
//!                     │
//!                     ▼
//!        Accessor (binder) + JsonTextCodec / LegacyTextCodec
//! ```

pub mod binder;
pub mod bridge;
pub mod config;
pub mod error;
pub mod probe;
pub mod registry;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use binder::{HostRuntime, HostValue, ObjectRef};
pub use bridge::{BackendKind, ItemText, ObjectiveText, TextBridge};
pub use config::BridgeConfig;
pub use error::{BindingError, BridgeError, InvocationError, Result, UnsupportedOperation};
pub use probe::{CapabilityDescriptor, CapabilityProbe, FeatureFlag};
pub use registry::{CapabilityFamily, StrategyRegistry};
pub use text::{Decoration, JsonTextCodec, LegacyTextCodec, RichText, Style, TextColor};

/// Library version.
pub const VERSION: &str = "0.3.0";
