//! # Dynamic binder
//!
//! Locates host members by name and signature and turns them into reusable
//! call handles.
//!
//! ```text
//! HostRuntime::find_type("...CraftMetaItem")
//!   ↓  locate(type, "displayName", Field, ())     # once, may fail
//! Accessor                                         # immutable, cheap to clone
//!   ↓  bind_to(&meta)                              # optional, weak receiver
//! BoundAccessor::get() / set() / call()            # no further lookups
//! ```
//!
//! The host is only ever reached through the [`HostRuntime`], [`HostType`]
//! and [`HostObject`] traits, so a host can be described by hand with
//! [`TypeTable`] and [`HostDirectory`].

pub mod accessor;
pub mod host;
pub mod table;

pub use accessor::{find_member, locate, AccessMode, Accessor, BoundAccessor};
pub use host::{
    HostField, HostMethod, HostObject, HostRuntime, HostType, HostValue, MemberImpl, MemberInfo,
    MemberKind, ObjectRef, Signature, TypeRef,
};
pub use table::{DynamicObject, HostDirectory, TypeTable};
