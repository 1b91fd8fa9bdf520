//! Capability detection against a live host.

use std::collections::BTreeSet;

use super::descriptor::{CapabilityDescriptor, FeatureFlag};
use super::locator::{symbols, TypeLocator};
use super::version::HostVersion;
use crate::binder::{find_member, HostRuntime, MemberKind, Signature, TypeRef};
use crate::config::BridgeConfig;

/// Builds a [`CapabilityDescriptor`] from a host.
///
/// Detection never fails. A missing type or member only leaves the
/// corresponding flag unset.
pub struct CapabilityProbe<'a> {
    host: &'a dyn HostRuntime,
    config: &'a BridgeConfig,
}

impl<'a> CapabilityProbe<'a> {
    pub fn new(host: &'a dyn HostRuntime, config: &'a BridgeConfig) -> Self {
        Self { host, config }
    }

    pub fn detect(&self) -> CapabilityDescriptor {
        let tag = self.host.implementation_tag();
        let release = self.host.release_version();
        let version = HostVersion::from_reports(tag.as_deref(), release.as_deref());
        let thresholds = &self.config.versions;

        if !version.recognized {
            log::warn!(
                "Unrecognized host version (tag: {:?}, release: {:?}); assuming no version features",
                tag,
                release
            );
        } else if version.protocol > thresholds.newest_known_protocol {
            log::warn!(
                "Host protocol {} is newer than the newest known protocol {}; using the closest known layout",
                version.protocol,
                thresholds.newest_known_protocol
            );
        }

        let mut flags = BTreeSet::new();
        if version.recognized {
            let protocol = version.protocol;
            for (flag, since) in [
                (FeatureFlag::HexColors, thresholds.hex_colors_since),
                (FeatureFlag::FlattenedInternalNamespace, thresholds.flattened_namespace_since),
                (FeatureFlag::ObfuscatedObjectiveMembers, thresholds.obfuscated_objective_since),
            ] {
                if protocol >= since {
                    flags.insert(flag);
                }
            }
        }

        let locator = TypeLocator::new(
            self.host,
            &self.config.layout,
            version.implementation_tag.as_deref(),
            flags.contains(&FeatureFlag::FlattenedInternalNamespace),
        );

        let mut record = |flag: FeatureFlag, present: bool| {
            log::debug!("Probe {}: {}", flag, present);
            if present {
                flags.insert(flag);
            }
        };

        record(FeatureFlag::NativeItemText, self.native_item_text(&locator));
        record(FeatureFlag::NativeObjectiveText, self.native_objective_text(&locator));

        let protocol = version.protocol;
        if version.recognized {
            record(
                FeatureFlag::ItemTextAsJson,
                version.exact >= thresholds.json_item_text_since
                    && self.item_meta_field_is(&locator, "String"),
            );
            record(
                FeatureFlag::ItemTextAsTree,
                thresholds.tree_item_text.contains(protocol)
                    && self.item_meta_field_is(&locator, &locator.internal(symbols::COMPONENT)),
            );

            let objective_layer = protocol >= thresholds.tree_objective_text_since;
            record(
                FeatureFlag::ObjectiveTextAsJson,
                objective_layer && self.internal_objective_stores_json(&locator),
            );
            record(
                FeatureFlag::ObjectiveTextAsTree,
                objective_layer
                    && locator.find(&locator.internal(symbols::CHAT_SERIALIZER)).is_some(),
            );
        }

        let descriptor = CapabilityDescriptor::from_version(version, flags);
        log::debug!("Detected host capabilities: {}", descriptor);
        descriptor
    }

    fn text_type(&self) -> &str {
        &self.config.layout.text_type
    }

    /// `ItemMeta.displayName()` returning the host's text type.
    fn native_item_text(&self, locator: &TypeLocator<'_>) -> bool {
        locator
            .find(&locator.api(symbols::ITEM_META))
            .and_then(|meta| method_type(&meta, "displayName", Signature::empty()))
            .is_some_and(|returns| returns == self.text_type())
    }

    /// `Scoreboard.registerNewObjective(String, String, Component)` and both
    /// `Objective.displayName` overloads.
    fn native_objective_text(&self, locator: &TypeLocator<'_>) -> bool {
        let text = self.text_type();
        let register = locator
            .find(&locator.api(symbols::SCOREBOARD))
            .and_then(|scoreboard| {
                method_type(
                    &scoreboard,
                    "registerNewObjective",
                    Signature::new(["String", "String", text]),
                )
            })
            .is_some();
        let display = locator
            .find(&locator.api(symbols::OBJECTIVE))
            .is_some_and(|objective| {
                method_type(&objective, "displayName", Signature::empty()).is_some()
                    && method_type(&objective, "displayName", Signature::new([text])).is_some()
            });
        register && display
    }

    fn item_meta_field_is(&self, locator: &TypeLocator<'_>, value_type: &str) -> bool {
        locator
            .find(&locator.implementation(symbols::CRAFT_META_ITEM))
            .and_then(|meta| field_type(&meta, "displayName"))
            .is_some_and(|declared| declared == value_type)
    }

    fn internal_objective_stores_json(&self, locator: &TypeLocator<'_>) -> bool {
        locator
            .find(&locator.internal(symbols::SCOREBOARD_OBJECTIVE))
            .and_then(|objective| field_type(&objective, "displayName"))
            .is_some_and(|declared| declared == "String")
    }
}

fn method_type(ty: &TypeRef, name: &str, signature: Signature) -> Option<String> {
    find_member(ty, name, MemberKind::Method, &signature).map(|(_, member)| member.value_type)
}

fn field_type(ty: &TypeRef, name: &str) -> Option<String> {
    find_member(ty, name, MemberKind::Field, &Signature::empty()).map(|(_, member)| member.value_type)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::binder::{HostDirectory, HostType, MemberInfo, TypeTable};
    use crate::error::HostFault;
    use crate::probe::version::ExactVersion;
    use crate::test_support;

    /// Counts accessibility overrides requested on the wrapped type.
    struct GrantCounting {
        table: TypeTable,
        grants: Arc<AtomicUsize>,
    }

    impl HostType for GrantCounting {
        fn name(&self) -> &str {
            self.table.name()
        }

        fn declared_members(&self) -> &[MemberInfo] {
            self.table.declared_members()
        }

        fn grant_access(&self, member: &MemberInfo) -> Result<(), HostFault> {
            self.grants.fetch_add(1, Ordering::SeqCst);
            self.table.grant_access(member)
        }
    }

    fn detect(host: &dyn HostRuntime) -> CapabilityDescriptor {
        CapabilityProbe::new(host, &BridgeConfig::default()).detect()
    }

    #[test]
    fn test_native_host() {
        let descriptor = detect(&test_support::native_host());
        assert!(descriptor.has(FeatureFlag::NativeItemText));
        assert!(descriptor.has(FeatureFlag::NativeObjectiveText));
        assert!(descriptor.has(FeatureFlag::HexColors));
        assert_eq!(descriptor.protocol(), 18);
    }

    #[test]
    fn test_json_host() {
        let descriptor = detect(&test_support::json_host());
        assert_eq!(descriptor.exact(), ExactVersion::new(16, 5));
        assert!(descriptor.has(FeatureFlag::ItemTextAsJson));
        assert!(descriptor.has(FeatureFlag::ObjectiveTextAsJson));
        assert!(!descriptor.has(FeatureFlag::ItemTextAsTree));
        assert!(!descriptor.has(FeatureFlag::NativeItemText));
        assert!(!descriptor.has(FeatureFlag::FlattenedInternalNamespace));
    }

    #[test]
    fn test_tree_host() {
        let descriptor = detect(&test_support::tree_host());
        assert!(descriptor.has(FeatureFlag::ItemTextAsTree));
        assert!(descriptor.has(FeatureFlag::ObjectiveTextAsTree));
        assert!(!descriptor.has(FeatureFlag::ItemTextAsJson));
        assert!(!descriptor.has(FeatureFlag::ObjectiveTextAsJson));
        assert!(!descriptor.has(FeatureFlag::HexColors));
    }

    #[test]
    fn test_legacy_host() {
        let descriptor = detect(&test_support::legacy_host());
        assert_eq!(descriptor.protocol(), 12);
        assert_eq!(descriptor.flags().count(), 0);
    }

    #[test]
    fn test_unparseable_version_is_conservative() {
        let host = HostDirectory::new()
            .with_implementation_tag("craftbukkit")
            .with_release_version("git-Unknown");
        let descriptor = detect(&host);
        assert!(!descriptor.is_recognized());
        assert_eq!(descriptor.protocol(), 0);
        assert_eq!(descriptor.flags().count(), 0);
    }

    #[test]
    fn test_newer_version_follows_table() {
        let host = HostDirectory::new().with_release_version("1.21.1-R0.1-SNAPSHOT");
        let descriptor = detect(&host);
        assert!(descriptor.is_recognized());
        assert!(descriptor.has(FeatureFlag::HexColors));
        assert!(descriptor.has(FeatureFlag::ObfuscatedObjectiveMembers));
        assert!(!descriptor.has(FeatureFlag::ItemTextAsJson));
    }

    #[test]
    fn test_detection_opens_no_members() {
        let grants = Arc::new(AtomicUsize::new(0));
        let counting = |table: TypeTable| -> TypeRef {
            Arc::new(GrantCounting {
                table,
                grants: grants.clone(),
            })
        };
        let host = HostDirectory::new()
            .with_implementation_tag("v1_16_R3")
            .with_release_version("1.16.5-R0.1-SNAPSHOT")
            .register_ref(counting(
                TypeTable::new("org.bukkit.craftbukkit.v1_16_R3.inventory.CraftMetaItem")
                    .slot_field("displayName", "String"),
            ))
            .register_ref(counting(
                TypeTable::new("net.minecraft.server.v1_16_R3.ScoreboardObjective")
                    .slot_field("displayName", "String"),
            ));

        let descriptor = detect(&host);
        assert!(descriptor.has(FeatureFlag::ItemTextAsJson));
        assert!(descriptor.has(FeatureFlag::ObjectiveTextAsJson));
        assert_eq!(grants.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let host = test_support::tree_host();
        assert_eq!(detect(&host), detect(&host));
    }
}
