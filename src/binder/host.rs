//! The host surface as seen by the binder.
//!
//! A host exposes named types ([`HostType`]) whose members are methods or
//! fields. Hosts with runtime introspection implement these traits over
//! their own metadata; hosts without it hand-write tables with
//! [`super::table::TypeTable`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{BridgeError, HostFault};
use crate::text::RichText;

/// An object living inside the host.
pub trait HostObject: Any + Send + Sync + fmt::Debug {
    /// Runtime type name, used in error context.
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a host object. Equality of handles is identity.
pub type ObjectRef = Arc<dyn HostObject>;

/// A value crossing the host boundary.
#[derive(Debug, Clone)]
pub enum HostValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Text(RichText),
    List(Vec<HostValue>),
    Object(ObjectRef),
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl HostValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Wraps an optional value, mapping `None` to the host's null.
    pub fn from_option<T>(value: Option<T>, wrap: impl FnOnce(T) -> HostValue) -> Self {
        value.map(wrap).unwrap_or(Self::Null)
    }

    fn unexpected(&self, member: &str, expected: &'static str) -> BridgeError {
        BridgeError::UnexpectedValue {
            member: member.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// `Null` becomes `None`; anything but a string is an error.
    pub fn into_opt_string(self, member: &str) -> Result<Option<String>, BridgeError> {
        match self {
            Self::Null => Ok(None),
            Self::Str(value) => Ok(Some(value)),
            other => Err(other.unexpected(member, "string")),
        }
    }

    pub fn into_opt_text(self, member: &str) -> Result<Option<RichText>, BridgeError> {
        match self {
            Self::Null => Ok(None),
            Self::Text(value) => Ok(Some(value)),
            other => Err(other.unexpected(member, "text")),
        }
    }

    pub fn into_opt_list(self, member: &str) -> Result<Option<Vec<HostValue>>, BridgeError> {
        match self {
            Self::Null => Ok(None),
            Self::List(items) => Ok(Some(items)),
            other => Err(other.unexpected(member, "list")),
        }
    }

    pub fn into_object(self, member: &str) -> Result<ObjectRef, BridgeError> {
        match self {
            Self::Object(object) => Ok(object),
            other => Err(other.unexpected(member, "object")),
        }
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<RichText> for HostValue {
    fn from(value: RichText) -> Self {
        Self::Text(value)
    }
}

impl From<ObjectRef> for HostValue {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

/// Whether a member is a method or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Field,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Method => "method",
            Self::Field => "field",
        })
    }
}

/// Parameter type names of a method. Fields use the empty signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(Vec<String>);

impl Signature {
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(params.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Host implementation of a method.
pub trait HostMethod: Send + Sync {
    fn call(&self, receiver: Option<&ObjectRef>, args: &[HostValue]) -> Result<HostValue, HostFault>;
}

impl<F> HostMethod for F
where
    F: Fn(Option<&ObjectRef>, &[HostValue]) -> Result<HostValue, HostFault> + Send + Sync,
{
    fn call(&self, receiver: Option<&ObjectRef>, args: &[HostValue]) -> Result<HostValue, HostFault> {
        self(receiver, args)
    }
}

/// Host implementation of a field.
pub trait HostField: Send + Sync {
    fn read(&self, receiver: Option<&ObjectRef>) -> Result<HostValue, HostFault>;

    fn write(&self, receiver: Option<&ObjectRef>, value: HostValue) -> Result<(), HostFault>;
}

/// The callable part of a member.
#[derive(Clone)]
pub enum MemberImpl {
    Method(Arc<dyn HostMethod>),
    Field(Arc<dyn HostField>),
}

impl fmt::Debug for MemberImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => f.write_str("MemberImpl::Method"),
            Self::Field(_) => f.write_str("MemberImpl::Field"),
        }
    }
}

/// Metadata and implementation of one member of a host type.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: String,
    /// Parameter types for methods; empty for fields.
    pub signature: Signature,
    /// Return type for methods, declared type for fields.
    pub value_type: String,
    pub is_static: bool,
    /// Public members need no accessibility override.
    pub public: bool,
    pub imp: MemberImpl,
}

impl MemberInfo {
    pub fn kind(&self) -> MemberKind {
        match self.imp {
            MemberImpl::Method(_) => MemberKind::Method,
            MemberImpl::Field(_) => MemberKind::Field,
        }
    }

    /// Fields match on name alone; methods also on their signature.
    pub fn matches(&self, name: &str, kind: MemberKind, signature: &Signature) -> bool {
        self.name == name
            && self.kind() == kind
            && (kind == MemberKind::Field || self.signature == *signature)
    }
}

/// A type known to the host.
pub trait HostType: Send + Sync {
    fn name(&self) -> &str;

    /// Members declared directly on this type, public or not.
    fn declared_members(&self) -> &[MemberInfo];

    fn supertype(&self) -> Option<TypeRef> {
        None
    }

    /// Opens a non-public member for use. Hosts may refuse.
    fn grant_access(&self, member: &MemberInfo) -> Result<(), HostFault> {
        let _ = member;
        Ok(())
    }
}

pub type TypeRef = Arc<dyn HostType>;

/// The live host: version reporting plus type lookup.
pub trait HostRuntime: Send + Sync {
    /// Implementation package tag such as `v1_16_R3`, if the host has one.
    fn implementation_tag(&self) -> Option<String>;

    /// Release string such as `1.16.5-R0.1-SNAPSHOT`.
    fn release_version(&self) -> Option<String>;

    fn find_type(&self, qualified_name: &str) -> Option<TypeRef>;
}
