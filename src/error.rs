//! Error types for the bridge.
//!
//! Binding failures are reported when a backend is built, invocation
//! failures when a bound member is actually called. Capability probing never
//! produces errors; a missing symbol is recorded as an absent feature flag.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::binder::host::{MemberKind, Signature};
use crate::text::CodecError;

/// Crate-wide result alias.
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// A failure raised by the host itself while running a member.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostFault {
    message: String,
}

impl HostFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a member could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingFailure {
    /// The declaring type is not known to the host.
    TypeNotFound,
    /// No member with that name, kind and signature exists.
    MemberNotFound,
    /// The member exists but the host refused to open it up.
    Inaccessible(String),
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNotFound => f.write_str("type not found"),
            Self::MemberNotFound => f.write_str("member not found"),
            Self::Inaccessible(reason) => write!(f, "member not accessible: {reason}"),
        }
    }
}

/// A declared member could not be located or made accessible.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot bind {kind} `{member}{signature}` on `{type_name}`: {reason}")]
pub struct BindingError {
    pub type_name: String,
    pub member: String,
    pub kind: MemberKind,
    pub signature: Signature,
    pub reason: BindingFailure,
}

impl BindingError {
    pub fn new(
        type_name: impl Into<String>,
        member: impl Into<String>,
        kind: MemberKind,
        signature: Signature,
        reason: BindingFailure,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            member: member.into(),
            kind,
            signature,
            reason,
        }
    }

    /// The type itself is missing, so no member on it can be bound.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        Self::new(
            type_name,
            "<type>",
            MemberKind::Method,
            Signature::empty(),
            BindingFailure::TypeNotFound,
        )
    }
}

/// A located member failed when it was invoked.
#[derive(Debug, Clone, Error)]
#[error(
    "invoking `{member}` declared on `{declaring_type}` failed (receiver: {}): {source}",
    .receiver_type.as_deref().unwrap_or("<none>")
)]
pub struct InvocationError {
    pub member: String,
    pub declaring_type: String,
    pub receiver_type: Option<String>,
    #[source]
    pub source: HostFault,
}

/// The direction an accessor was asked to operate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Get,
    Set,
    Invoke,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Invoke => "invoke",
        })
    }
}

/// An accessor was used in a direction it was not built for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("`{member}` does not support {direction}")]
pub struct UnsupportedOperation {
    pub member: String,
    pub direction: Direction,
}

/// Errors surfaced by the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),

    /// No candidate predicate accepted the host. Fatal for the family.
    #[error("no {family} backend supports host {descriptor}")]
    NoMatchingBackend {
        family: &'static str,
        descriptor: String,
    },

    /// The family failed to resolve earlier; the failure is permanent.
    #[error("{family} backend unavailable: {source}")]
    BackendUnavailable {
        family: &'static str,
        #[source]
        source: Arc<BridgeError>,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The host handed back a value of the wrong shape.
    #[error("`{member}` returned {found}, expected {expected}")]
    UnexpectedValue {
        member: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised while loading a [`crate::config::BridgeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_error_names_member_and_signature() {
        let err = BindingError::new(
            "org.bukkit.inventory.meta.ItemMeta",
            "displayName",
            MemberKind::Method,
            Signature::new(["Component"]),
            BindingFailure::MemberNotFound,
        );
        assert_eq!(
            err.to_string(),
            "cannot bind method `displayName(Component)` on `org.bukkit.inventory.meta.ItemMeta`: member not found"
        );
    }

    #[test]
    fn test_invocation_error_carries_context() {
        let err = InvocationError {
            member: "Objective#getDisplayName()".to_string(),
            declaring_type: "Objective".to_string(),
            receiver_type: Some("CraftObjective".to_string()),
            source: HostFault::new("objective unregistered"),
        };
        let text = err.to_string();
        assert!(text.contains("CraftObjective"));
        assert!(text.contains("objective unregistered"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_backend_unavailable_keeps_source() {
        let cause = Arc::new(BridgeError::NoMatchingBackend {
            family: "item text",
            descriptor: "protocol 0".to_string(),
        });
        let err = BridgeError::BackendUnavailable {
            family: "item text",
            source: cause,
        };
        assert!(err.to_string().starts_with("item text backend unavailable"));
    }
}
