//! Hand-written host adapters.
//!
//! For hosts without runtime introspection, [`TypeTable`] declares a type's
//! members up front, [`DynamicObject`] provides slot-backed instances and
//! [`HostDirectory`] serves as the [`HostRuntime`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::host::{
    HostField, HostMethod, HostObject, HostRuntime, HostType, HostValue, MemberImpl, MemberInfo,
    ObjectRef, Signature, TypeRef,
};
use crate::error::HostFault;

/// An object whose state lives in named slots.
pub struct DynamicObject {
    type_name: String,
    slots: RwLock<HashMap<String, HostValue>>,
}

impl DynamicObject {
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.into(),
            slots: RwLock::new(HashMap::new()),
        })
    }

    /// Unset slots read as `Null`.
    pub fn slot(&self, name: &str) -> HostValue {
        self.slots.read().get(name).cloned().unwrap_or(HostValue::Null)
    }

    pub fn set_slot(&self, name: &str, value: HostValue) {
        let mut slots = self.slots.write();
        if value.is_null() {
            slots.remove(name);
        } else {
            slots.insert(name.to_string(), value);
        }
    }

    /// Downcasts a receiver to a slot object.
    pub fn of(receiver: Option<&ObjectRef>) -> Result<&DynamicObject, HostFault> {
        let receiver = receiver.ok_or_else(|| HostFault::new("missing receiver"))?;
        receiver
            .as_any()
            .downcast_ref::<DynamicObject>()
            .ok_or_else(|| {
                HostFault::new(format!("`{}` is not a slot object", receiver.type_name()))
            })
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("slots", &self.slots.read().len())
            .finish()
    }
}

impl HostObject for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Field reading and writing a [`DynamicObject`] slot of the same name.
struct SlotField {
    slot: String,
}

impl HostField for SlotField {
    fn read(&self, receiver: Option<&ObjectRef>) -> Result<HostValue, HostFault> {
        Ok(DynamicObject::of(receiver)?.slot(&self.slot))
    }

    fn write(&self, receiver: Option<&ObjectRef>, value: HostValue) -> Result<(), HostFault> {
        DynamicObject::of(receiver)?.set_slot(&self.slot, value);
        Ok(())
    }
}

/// A host type declared member by member.
pub struct TypeTable {
    name: String,
    members: Vec<MemberInfo>,
    supertype: Option<TypeRef>,
    access_override: bool,
}

impl TypeTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            supertype: None,
            access_override: true,
        }
    }

    pub fn extends(mut self, supertype: TypeRef) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Refuse to open non-public members, as a locked-down host would.
    pub fn deny_access_override(mut self) -> Self {
        self.access_override = false;
        self
    }

    pub fn member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    /// Public instance method.
    pub fn method<F>(self, name: &str, signature: Signature, returns: &str, f: F) -> Self
    where
        F: Fn(Option<&ObjectRef>, &[HostValue]) -> Result<HostValue, HostFault>
            + Send
            + Sync
            + 'static,
    {
        self.member(MemberInfo {
            name: name.to_string(),
            signature,
            value_type: returns.to_string(),
            is_static: false,
            public: true,
            imp: MemberImpl::Method(Arc::new(f) as Arc<dyn HostMethod>),
        })
    }

    /// Public static method.
    pub fn static_method<F>(self, name: &str, signature: Signature, returns: &str, f: F) -> Self
    where
        F: Fn(Option<&ObjectRef>, &[HostValue]) -> Result<HostValue, HostFault>
            + Send
            + Sync
            + 'static,
    {
        self.member(MemberInfo {
            name: name.to_string(),
            signature,
            value_type: returns.to_string(),
            is_static: true,
            public: true,
            imp: MemberImpl::Method(Arc::new(f) as Arc<dyn HostMethod>),
        })
    }

    /// Private instance field stored in the receiver's slot of the same name.
    pub fn slot_field(self, name: &str, value_type: &str) -> Self {
        self.member(MemberInfo {
            name: name.to_string(),
            signature: Signature::empty(),
            value_type: value_type.to_string(),
            is_static: false,
            public: false,
            imp: MemberImpl::Field(Arc::new(SlotField {
                slot: name.to_string(),
            })),
        })
    }

    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }
}

impl HostType for TypeTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_members(&self) -> &[MemberInfo] {
        &self.members
    }

    fn supertype(&self) -> Option<TypeRef> {
        self.supertype.clone()
    }

    fn grant_access(&self, member: &MemberInfo) -> Result<(), HostFault> {
        if self.access_override {
            Ok(())
        } else {
            Err(HostFault::new(format!(
                "access to `{}` on `{}` denied",
                member.name, self.name
            )))
        }
    }
}

/// A [`HostRuntime`] backed by a fixed set of type tables.
#[derive(Default)]
pub struct HostDirectory {
    implementation_tag: Option<String>,
    release_version: Option<String>,
    types: HashMap<String, TypeRef>,
}

impl HostDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_implementation_tag(mut self, tag: impl Into<String>) -> Self {
        self.implementation_tag = Some(tag.into());
        self
    }

    pub fn with_release_version(mut self, release: impl Into<String>) -> Self {
        self.release_version = Some(release.into());
        self
    }

    /// Registers a type under its own name.
    pub fn register(mut self, table: TypeTable) -> Self {
        let ty = table.into_ref();
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    pub fn register_ref(mut self, ty: TypeRef) -> Self {
        self.types.insert(ty.name().to_string(), ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl HostRuntime for HostDirectory {
    fn implementation_tag(&self) -> Option<String> {
        self.implementation_tag.clone()
    }

    fn release_version(&self) -> Option<String> {
        self.release_version.clone()
    }

    fn find_type(&self, qualified_name: &str) -> Option<TypeRef> {
        self.types.get(qualified_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::host::MemberKind;

    #[test]
    fn test_slot_field_reads_and_clears() {
        let table = TypeTable::new("Meta").slot_field("lore", "List");
        let field = match &table.declared_members()[0].imp {
            MemberImpl::Field(field) => field.clone(),
            MemberImpl::Method(_) => panic!("expected field"),
        };
        let object: ObjectRef = DynamicObject::new("Meta");

        field.write(Some(&object), HostValue::from("x")).unwrap();
        assert_eq!(field.read(Some(&object)).unwrap(), HostValue::from("x"));
        field.write(Some(&object), HostValue::Null).unwrap();
        assert!(field.read(Some(&object)).unwrap().is_null());
        assert!(field.read(None).is_err());
    }

    #[test]
    fn test_directory_lookup() {
        let host = HostDirectory::new()
            .with_implementation_tag("v1_12_R1")
            .register(TypeTable::new("a.B").method(
                "m",
                Signature::empty(),
                "void",
                |_, _| Ok(HostValue::Null),
            ));
        assert_eq!(host.len(), 1);
        let ty = host.find_type("a.B").unwrap();
        assert_eq!(ty.declared_members()[0].kind(), MemberKind::Method);
        assert!(host.find_type("a.C").is_none());
        assert_eq!(host.implementation_tag().as_deref(), Some("v1_12_R1"));
    }
}
