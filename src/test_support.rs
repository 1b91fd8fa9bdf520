//! Simulated hosts for unit tests.
//!
//! Each host is a [`HostDirectory`] of hand-written type tables whose
//! objects keep their state in [`DynamicObject`] slots. Internal tree
//! objects are `IChatBaseComponent` objects holding their JSON in a `json`
//! slot.

use serde_json::json;

use crate::binder::{DynamicObject, HostDirectory, HostValue, ObjectRef, Signature, TypeTable};
use crate::error::HostFault;

pub type Host = HostDirectory;

const ITEM_META: &str = "org.bukkit.inventory.meta.ItemMeta";
const OBJECTIVE: &str = "org.bukkit.scoreboard.Objective";
const SCOREBOARD: &str = "org.bukkit.scoreboard.Scoreboard";

fn arg(args: &[HostValue], index: usize) -> HostValue {
    args.get(index).cloned().unwrap_or(HostValue::Null)
}

fn object(type_name: &str, slots: Vec<(&str, HostValue)>) -> ObjectRef {
    let object = DynamicObject::new(type_name);
    for (name, value) in slots {
        object.set_slot(name, value);
    }
    object
}

fn read_slot(
    slot: &'static str,
) -> impl Fn(Option<&ObjectRef>, &[HostValue]) -> Result<HostValue, HostFault> + Send + Sync + 'static
{
    move |receiver, _| Ok(DynamicObject::of(receiver)?.slot(slot))
}

fn write_slot(
    slot: &'static str,
) -> impl Fn(Option<&ObjectRef>, &[HostValue]) -> Result<HostValue, HostFault> + Send + Sync + 'static
{
    move |receiver, args| {
        DynamicObject::of(receiver)?.set_slot(slot, arg(args, 0));
        Ok(HostValue::Null)
    }
}

fn tree(json: String) -> HostValue {
    HostValue::Object(object("IChatBaseComponent", vec![("json", HostValue::Str(json))]))
}

fn plain_json(title: &HostValue) -> String {
    match title {
        HostValue::Str(title) => json!({ "text": title }).to_string(),
        _ => json!({ "text": "" }).to_string(),
    }
}

/// The host's `ChatSerializer` with both static `a` overloads.
fn chat_serializer(name: &str, component: &str) -> TypeTable {
    TypeTable::new(name)
        .static_method("a", Signature::new([component]), "String", |_, args| {
            match arg(args, 0) {
                HostValue::Null => Ok(HostValue::Null),
                HostValue::Object(tree) => Ok(DynamicObject::of(Some(&tree))?.slot("json")),
                other => Err(HostFault::new(format!("not a component: {}", other.kind()))),
            }
        })
        .static_method("a", Signature::new(["String"]), component, |_, args| {
            match arg(args, 0) {
                HostValue::Null => Ok(HostValue::Null),
                HostValue::Str(json) => Ok(tree(json)),
                other => Err(HostFault::new(format!("not a string: {}", other.kind()))),
            }
        })
}

/// `registerNewObjective(String, String, String)` creating a `CraftObjective`
/// around an internal objective whose title is built by `title`.
fn string_scoreboard<F>(title: F) -> TypeTable
where
    F: Fn(&HostValue) -> HostValue + Send + Sync + 'static,
{
    TypeTable::new(SCOREBOARD).method(
        "registerNewObjective",
        Signature::new(["String", "String", "String"]),
        "Objective",
        move |_, args| {
            let internal = object(
                "ScoreboardObjective",
                vec![("name", arg(args, 0)), ("displayName", title(&arg(args, 2)))],
            );
            Ok(HostValue::Object(object(
                "CraftObjective",
                vec![("objective", HostValue::Object(internal))],
            )))
        },
    )
}

/// 1.18.2 with rich text on the API types.
pub fn native_host() -> Host {
    HostDirectory::new()
        .with_implementation_tag("v1_18_R2")
        .with_release_version("1.18.2-R0.1-SNAPSHOT")
        .register(
            TypeTable::new(ITEM_META)
                .method("displayName", Signature::empty(), "Component", read_slot("displayName"))
                .method("displayName", Signature::new(["Component"]), "void", write_slot("displayName"))
                .method("lore", Signature::empty(), "List", read_slot("lore"))
                .method("lore", Signature::new(["List"]), "void", write_slot("lore")),
        )
        .register(
            TypeTable::new(OBJECTIVE)
                .method("displayName", Signature::empty(), "Component", read_slot("displayName"))
                .method("displayName", Signature::new(["Component"]), "void", write_slot("displayName")),
        )
        .register(TypeTable::new(SCOREBOARD).method(
            "registerNewObjective",
            Signature::new(["String", "String", "Component"]),
            "Objective",
            |_, args| {
                Ok(HostValue::Object(object(
                    "CraftObjective",
                    vec![("name", arg(args, 0)), ("displayName", arg(args, 2))],
                )))
            },
        ))
}

/// 1.16.5: item text and the internal objective title are JSON strings.
pub fn json_host() -> Host {
    let internal_objective = "net.minecraft.server.v1_16_R3.ScoreboardObjective";
    HostDirectory::new()
        .with_implementation_tag("v1_16_R3")
        .with_release_version("1.16.5-R0.1-SNAPSHOT")
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_16_R3.inventory.CraftMetaItem")
                .slot_field("displayName", "String")
                .slot_field("lore", "List"),
        )
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_16_R3.scoreboard.CraftObjective")
                .slot_field("objective", internal_objective),
        )
        .register(TypeTable::new(internal_objective).slot_field("displayName", "String"))
        .register(string_scoreboard(|title| HostValue::Str(plain_json(title))))
}

/// 1.15.2: text is stored as internal tree objects.
pub fn tree_host() -> Host {
    let component = "net.minecraft.server.v1_15_R1.IChatBaseComponent";
    let internal_objective = "net.minecraft.server.v1_15_R1.ScoreboardObjective";
    HostDirectory::new()
        .with_implementation_tag("v1_15_R1")
        .with_release_version("1.15.2-R0.1-SNAPSHOT")
        .register(TypeTable::new(component))
        .register(chat_serializer(
            "net.minecraft.server.v1_15_R1.IChatBaseComponent$ChatSerializer",
            component,
        ))
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_15_R1.inventory.CraftMetaItem")
                .slot_field("displayName", component)
                .slot_field("lore", "List"),
        )
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_15_R1.scoreboard.CraftObjective")
                .slot_field("objective", internal_objective),
        )
        .register(
            TypeTable::new(internal_objective)
                .method("getDisplayName", Signature::empty(), component, read_slot("displayName"))
                .method(
                    "setDisplayName",
                    Signature::new([component]),
                    "void",
                    write_slot("displayName"),
                ),
        )
        .register(string_scoreboard(|title| tree(plain_json(title))))
}

/// 1.18.1 without native text: flattened internal names, obfuscated
/// objective members, JSON item text.
pub fn obfuscated_tree_host() -> Host {
    let component = "net.minecraft.network.chat.IChatBaseComponent";
    let internal_objective = "net.minecraft.world.scores.ScoreboardObjective";
    HostDirectory::new()
        .with_implementation_tag("v1_18_R1")
        .with_release_version("1.18.1-R0.1-SNAPSHOT")
        .register(TypeTable::new(component))
        .register(chat_serializer(
            "net.minecraft.network.chat.IChatBaseComponent$ChatSerializer",
            component,
        ))
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_18_R1.inventory.CraftMetaItem")
                .slot_field("displayName", "String")
                .slot_field("lore", "List"),
        )
        .register(
            TypeTable::new("org.bukkit.craftbukkit.v1_18_R1.scoreboard.CraftObjective")
                .slot_field("objective", internal_objective),
        )
        .register(
            TypeTable::new(internal_objective)
                .method("d", Signature::empty(), component, read_slot("displayName"))
                .method("a", Signature::new([component]), "void", write_slot("displayName")),
        )
        .register(string_scoreboard(|title| tree(plain_json(title))))
}

/// 1.12.2: only legacy formatted strings.
pub fn legacy_host() -> Host {
    HostDirectory::new()
        .with_implementation_tag("v1_12_R1")
        .with_release_version("1.12.2-R0.1-SNAPSHOT")
        .register(
            TypeTable::new(ITEM_META)
                .method("getDisplayName", Signature::empty(), "String", read_slot("displayName"))
                .method("setDisplayName", Signature::new(["String"]), "void", write_slot("displayName"))
                .method("getLore", Signature::empty(), "List", read_slot("lore"))
                .method("setLore", Signature::new(["List"]), "void", write_slot("lore")),
        )
        .register(
            TypeTable::new(OBJECTIVE)
                .method("getDisplayName", Signature::empty(), "String", read_slot("displayName"))
                .method("setDisplayName", Signature::new(["String"]), "void", write_slot("displayName")),
        )
        .register(TypeTable::new(SCOREBOARD).method(
            "registerNewObjective",
            Signature::new(["String", "String"]),
            "Objective",
            |_, args| {
                Ok(HostValue::Object(object(
                    "CraftObjective",
                    vec![("name", arg(args, 0)), ("displayName", arg(args, 0))],
                )))
            },
        ))
}

pub fn all_hosts() -> Vec<Host> {
    vec![
        native_host(),
        json_host(),
        tree_host(),
        obfuscated_tree_host(),
        legacy_host(),
    ]
}

pub fn item_meta() -> ObjectRef {
    DynamicObject::new("CraftMetaItem")
}

pub fn scoreboard() -> ObjectRef {
    DynamicObject::new("CraftScoreboard")
}

/// A `CraftObjective` whose internal objective was never set.
pub fn craft_objective_without_internal() -> ObjectRef {
    DynamicObject::new("CraftObjective")
}

/// Raw slot contents of a simulated object.
pub fn slot(object: &ObjectRef, name: &str) -> HostValue {
    DynamicObject::of(Some(object))
        .map(|object| object.slot(name))
        .unwrap_or(HostValue::Null)
}

/// The host-side encoding of a stored value, with tree objects replaced by
/// their JSON so encodings can be compared.
pub fn encoding(value: HostValue) -> HostValue {
    match value {
        HostValue::Object(tree) => slot(&tree, "json"),
        HostValue::List(items) => HostValue::List(items.into_iter().map(encoding).collect()),
        other => other,
    }
}
