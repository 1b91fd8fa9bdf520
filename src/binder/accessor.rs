//! Located members as reusable call handles.
//!
//! [`locate`] is the only place names are resolved. It runs once, when a
//! backend is built, and either fails with a [`BindingError`] or returns an
//! [`Accessor`] whose calls go straight to the resolved implementation.

use std::fmt;
use std::sync::{Arc, Weak};

use super::host::{
    HostObject, HostType, HostValue, MemberImpl, MemberInfo, MemberKind, ObjectRef, Signature,
    TypeRef,
};
use crate::error::{
    BindingError, BindingFailure, BridgeError, Direction, HostFault, InvocationError,
    UnsupportedOperation,
};

/// Which directions a field accessor allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

/// Finds `name` on `ty`: declared members first (any visibility), then
/// public members of each supertype. Non-public members are opened through
/// [`super::host::HostType::grant_access`].
pub fn locate(
    ty: &TypeRef,
    name: &str,
    kind: MemberKind,
    signature: &Signature,
) -> Result<Accessor, BindingError> {
    let not_found = || {
        BindingError::new(
            ty.name(),
            name,
            kind,
            signature.clone(),
            BindingFailure::MemberNotFound,
        )
    };

    let (owner, member) = find_member(ty, name, kind, signature).ok_or_else(not_found)?;
    if !member.public {
        owner.grant_access(&member).map_err(|fault| {
            BindingError::new(
                ty.name(),
                name,
                kind,
                signature.clone(),
                BindingFailure::Inaccessible(fault.to_string()),
            )
        })?;
    }

    log::trace!("Bound {} `{}{}` on `{}`", kind, name, signature, owner.name());
    Ok(Accessor {
        inner: Arc::new(AccessorInner {
            target_type: owner.name().to_string(),
            member_name: member.name,
            signature: member.signature,
            value_type: member.value_type,
            is_static: member.is_static,
            imp: member.imp,
        }),
        mode: AccessMode::ReadWrite,
    })
}

/// The member [`locate`] would bind, and the type declaring it. Lookup
/// only: no accessibility override is requested.
pub fn find_member(
    ty: &TypeRef,
    name: &str,
    kind: MemberKind,
    signature: &Signature,
) -> Option<(TypeRef, MemberInfo)> {
    if let Some(member) = ty
        .declared_members()
        .iter()
        .find(|m| m.matches(name, kind, signature))
    {
        return Some((ty.clone(), member.clone()));
    }

    let mut current = ty.supertype();
    while let Some(parent) = current {
        if let Some(member) = parent
            .declared_members()
            .iter()
            .find(|m| m.public && m.matches(name, kind, signature))
        {
            return Some((parent.clone(), member.clone()));
        }
        current = parent.supertype();
    }
    None
}

struct AccessorInner {
    target_type: String,
    member_name: String,
    signature: Signature,
    value_type: String,
    is_static: bool,
    imp: MemberImpl,
}

/// A resolved method or field. Cloning shares the resolved handle.
#[derive(Clone)]
pub struct Accessor {
    inner: Arc<AccessorInner>,
    mode: AccessMode,
}

impl Accessor {
    pub fn method(ty: &TypeRef, name: &str, signature: Signature) -> Result<Self, BindingError> {
        locate(ty, name, MemberKind::Method, &signature)
    }

    /// Field accessor allowing both directions.
    pub fn field(ty: &TypeRef, name: &str) -> Result<Self, BindingError> {
        locate(ty, name, MemberKind::Field, &Signature::empty())
    }

    /// Field accessor that refuses `set`.
    pub fn getter(ty: &TypeRef, name: &str) -> Result<Self, BindingError> {
        Ok(Self::field(ty, name)?.with_mode(AccessMode::ReadOnly))
    }

    /// Field accessor that refuses `get`.
    pub fn setter(ty: &TypeRef, name: &str) -> Result<Self, BindingError> {
        Ok(Self::field(ty, name)?.with_mode(AccessMode::WriteOnly))
    }

    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn target_type(&self) -> &str {
        &self.inner.target_type
    }

    pub fn member_name(&self) -> &str {
        &self.inner.member_name
    }

    pub fn kind(&self) -> MemberKind {
        match self.inner.imp {
            MemberImpl::Method(_) => MemberKind::Method,
            MemberImpl::Field(_) => MemberKind::Field,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Return type for methods, declared type for fields.
    pub fn value_type(&self) -> &str {
        &self.inner.value_type
    }

    pub fn is_static(&self) -> bool {
        self.inner.is_static
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Calls a method. The receiver is ignored for static methods.
    pub fn invoke(
        &self,
        receiver: Option<&ObjectRef>,
        args: &[HostValue],
    ) -> Result<HostValue, BridgeError> {
        let MemberImpl::Method(method) = &self.inner.imp else {
            return Err(self.unsupported(Direction::Invoke));
        };
        let receiver = self.receiver(receiver)?;
        method
            .call(receiver, args)
            .map_err(|fault| self.invocation_error(receiver, fault).into())
    }

    /// Reads a field.
    pub fn get(&self, receiver: Option<&ObjectRef>) -> Result<HostValue, BridgeError> {
        let MemberImpl::Field(field) = &self.inner.imp else {
            return Err(self.unsupported(Direction::Get));
        };
        if self.mode == AccessMode::WriteOnly {
            return Err(self.unsupported(Direction::Get));
        }
        let receiver = self.receiver(receiver)?;
        field
            .read(receiver)
            .map_err(|fault| self.invocation_error(receiver, fault).into())
    }

    /// Writes a field.
    pub fn set(&self, receiver: Option<&ObjectRef>, value: HostValue) -> Result<(), BridgeError> {
        let MemberImpl::Field(field) = &self.inner.imp else {
            return Err(self.unsupported(Direction::Set));
        };
        if self.mode == AccessMode::ReadOnly {
            return Err(self.unsupported(Direction::Set));
        }
        let receiver = self.receiver(receiver)?;
        field
            .write(receiver, value)
            .map_err(|fault| self.invocation_error(receiver, fault).into())
    }

    /// Binds to `receiver` without keeping it alive.
    pub fn bind_to(&self, receiver: &ObjectRef) -> BoundAccessor {
        BoundAccessor {
            accessor: self.clone(),
            receiver: Some(Arc::downgrade(receiver)),
        }
    }

    /// Binds a static member; calls pass no receiver.
    pub fn bind_static(&self) -> BoundAccessor {
        BoundAccessor {
            accessor: self.clone(),
            receiver: None,
        }
    }

    fn receiver<'a>(
        &self,
        receiver: Option<&'a ObjectRef>,
    ) -> Result<Option<&'a ObjectRef>, BridgeError> {
        if self.inner.is_static {
            return Ok(None);
        }
        match receiver {
            Some(receiver) => Ok(Some(receiver)),
            None => Err(self
                .invocation_error(None, HostFault::new("instance member called without a receiver"))
                .into()),
        }
    }

    fn unsupported(&self, direction: Direction) -> BridgeError {
        UnsupportedOperation {
            member: self.to_string(),
            direction,
        }
        .into()
    }

    fn invocation_error(&self, receiver: Option<&ObjectRef>, source: HostFault) -> InvocationError {
        InvocationError {
            member: self.to_string(),
            declaring_type: self.inner.target_type.clone(),
            receiver_type: receiver.map(|r| r.type_name().to_string()),
            source,
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            MemberKind::Method => write!(
                f,
                "{}#{}{}",
                self.inner.target_type, self.inner.member_name, self.inner.signature
            ),
            MemberKind::Field => write!(f, "{}#{}", self.inner.target_type, self.inner.member_name),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("member", &self.to_string())
            .field("mode", &self.mode)
            .finish()
    }
}

/// An [`Accessor`] with its receiver supplied up front.
#[derive(Clone)]
pub struct BoundAccessor {
    accessor: Accessor,
    receiver: Option<Weak<dyn HostObject>>,
}

impl BoundAccessor {
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    pub fn call(&self, args: &[HostValue]) -> Result<HostValue, BridgeError> {
        let receiver = self.upgrade()?;
        self.accessor.invoke(receiver.as_ref(), args)
    }

    pub fn get(&self) -> Result<HostValue, BridgeError> {
        let receiver = self.upgrade()?;
        self.accessor.get(receiver.as_ref())
    }

    pub fn set(&self, value: HostValue) -> Result<(), BridgeError> {
        let receiver = self.upgrade()?;
        self.accessor.set(receiver.as_ref(), value)
    }

    /// True while the bound receiver is still alive (always for static binds).
    pub fn is_live(&self) -> bool {
        self.receiver
            .as_ref()
            .map_or(true, |weak| weak.strong_count() > 0)
    }

    fn upgrade(&self) -> Result<Option<ObjectRef>, BridgeError> {
        match &self.receiver {
            None => Ok(None),
            Some(weak) => weak.upgrade().map(Some).ok_or_else(|| {
                self.accessor
                    .invocation_error(None, HostFault::new("bound receiver was dropped"))
                    .into()
            }),
        }
    }
}

impl fmt::Debug for BoundAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAccessor")
            .field("accessor", &self.accessor.to_string())
            .field("live", &self.is_live())
            .finish()
    }
}
