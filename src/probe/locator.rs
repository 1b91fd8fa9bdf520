//! Host type naming.
//!
//! API types live at a fixed path. Implementation types sit under a package
//! carrying the implementation tag (`v1_16_R3`), and internal types moved
//! from a tagged flat package into a hierarchical one at the flattening
//! version.

use crate::binder::{HostRuntime, TypeRef};
use crate::config::HostLayout;
use crate::error::BindingError;

/// Well-known type paths, relative to their package root.
pub mod symbols {
    pub const ITEM_META: &str = "inventory.meta.ItemMeta";
    pub const SCOREBOARD: &str = "scoreboard.Scoreboard";
    pub const OBJECTIVE: &str = "scoreboard.Objective";

    pub const CRAFT_META_ITEM: &str = "inventory.CraftMetaItem";
    pub const CRAFT_OBJECTIVE: &str = "scoreboard.CraftObjective";

    /// `(before flattening, after flattening)`
    pub const COMPONENT: (&str, &str) = ("IChatBaseComponent", "network.chat.IChatBaseComponent");
    pub const CHAT_SERIALIZER: (&str, &str) = (
        "IChatBaseComponent$ChatSerializer",
        "network.chat.IChatBaseComponent$ChatSerializer",
    );
    pub const SCOREBOARD_OBJECTIVE: (&str, &str) =
        ("ScoreboardObjective", "world.scores.ScoreboardObjective");
}

/// Resolves relative type paths against the host's layout.
#[derive(Clone, Copy)]
pub struct TypeLocator<'a> {
    host: &'a dyn HostRuntime,
    layout: &'a HostLayout,
    tag: Option<&'a str>,
    flattened: bool,
}

impl<'a> TypeLocator<'a> {
    pub fn new(
        host: &'a dyn HostRuntime,
        layout: &'a HostLayout,
        tag: Option<&'a str>,
        flattened: bool,
    ) -> Self {
        Self {
            host,
            layout,
            tag,
            flattened,
        }
    }

    pub fn layout(&self) -> &HostLayout {
        self.layout
    }

    /// `org.bukkit.inventory.meta.ItemMeta`
    pub fn api(&self, name: &str) -> String {
        format!("{}.{}", self.layout.api_package, name)
    }

    /// `org.bukkit.craftbukkit.v1_16_R3.inventory.CraftMetaItem`, or the
    /// untagged path on hosts without an implementation tag.
    pub fn implementation(&self, name: &str) -> String {
        match self.tag {
            Some(tag) => format!("{}.{}.{}", self.layout.implementation_package, tag, name),
            None => format!("{}.{}", self.layout.implementation_package, name),
        }
    }

    /// `net.minecraft.server.v1_16_R3.IChatBaseComponent` before flattening,
    /// `net.minecraft.network.chat.IChatBaseComponent` after.
    pub fn internal(&self, (legacy, modern): (&str, &str)) -> String {
        if self.flattened {
            return format!("{}.{}", self.layout.flattened_internal_package, modern);
        }
        match self.tag {
            Some(tag) => format!("{}.{}.{}", self.layout.internal_package, tag, legacy),
            None => format!("{}.{}", self.layout.internal_package, legacy),
        }
    }

    pub fn find(&self, qualified_name: &str) -> Option<TypeRef> {
        self.host.find_type(qualified_name)
    }

    /// Like [`find`](Self::find), but a missing type is a binding failure.
    pub fn require(&self, qualified_name: &str) -> Result<TypeRef, BindingError> {
        self.find(qualified_name)
            .ok_or_else(|| BindingError::type_not_found(qualified_name))
    }
}
