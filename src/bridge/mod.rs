//! # Encoding bridges
//!
//! One backend per family converts between [`RichText`] and whatever the
//! host stores:
//!
//! | Backend            | Host representation                 | Loss            |
//! |--------------------|-------------------------------------|-----------------|
//! | `Native`           | rich text object                    | none            |
//! | `StructuredString` | JSON string                         | none            |
//! | `InternalTree`     | internal tree built from JSON       | RGB before 1.16 |
//! | `RawString`        | legacy `§` formatted string         | structure       |
//!
//! [`TextBridge`] is the entry point. It resolves the backends lazily through
//! a [`StrategyRegistry`] and forwards every call to the frozen backend.

pub mod item;
pub mod objective;
pub mod tree;

use std::fmt;
use std::sync::Arc;

pub use item::{ItemText, ItemTextBackend, ItemTextFamily};
pub use objective::{ObjectiveText, ObjectiveTextBackend, ObjectiveTextFamily};
pub use tree::TreeCodec;

use crate::binder::{HostRuntime, HostValue, ObjectRef};
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::probe::CapabilityDescriptor;
use crate::registry::StrategyRegistry;
use crate::text::RichText;

/// Which representation a backend targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Native,
    StructuredString,
    InternalTree,
    RawString,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::StructuredString => "structured string",
            Self::InternalTree => "internal tree",
            Self::RawString => "raw string",
        })
    }
}

/// Decodes a host list. Null stays absent; null elements read as empty text.
fn read_lines<F>(value: HostValue, member: &str, mut decode: F) -> Result<Option<Vec<RichText>>>
where
    F: FnMut(HostValue) -> Result<Option<RichText>>,
{
    let Some(items) = value.into_opt_list(member)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| Ok(decode(item)?.unwrap_or_default()))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Encodes lines into a host list; `None` becomes the host's null.
fn write_lines<F>(lines: Option<&[RichText]>, encode: F) -> Result<HostValue>
where
    F: FnMut(&RichText) -> Result<HostValue>,
{
    match lines {
        Some(lines) => Ok(HostValue::List(
            lines.iter().map(encode).collect::<Result<Vec<_>>>()?,
        )),
        None => Ok(HostValue::Null),
    }
}

/// Rich text access for item metadata and scoreboard objectives.
///
/// # Example
///
/// ```rust,ignore
/// let bridge = TextBridge::new(host);
/// bridge.set_display_name(&meta, Some(&RichText::text("Excalibur").decorate(Decoration::Bold)))?;
/// assert!(bridge.display_name(&meta)?.is_some());
/// ```
pub struct TextBridge {
    registry: StrategyRegistry,
}

impl TextBridge {
    pub fn new(host: Arc<dyn HostRuntime>) -> Self {
        Self::from_registry(StrategyRegistry::new(host))
    }

    pub fn with_config(host: Arc<dyn HostRuntime>, config: BridgeConfig) -> Self {
        Self::from_registry(StrategyRegistry::new(host).with_config(config))
    }

    pub fn from_registry(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn descriptor(&self) -> &CapabilityDescriptor {
        self.registry.descriptor()
    }

    pub fn items(&self) -> Result<Arc<ItemTextBackend>> {
        self.registry.resolve::<ItemTextFamily>()
    }

    pub fn objectives(&self) -> Result<Arc<ObjectiveTextBackend>> {
        self.registry.resolve::<ObjectiveTextFamily>()
    }

    pub fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.items()?.display_name(meta)
    }

    pub fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        self.items()?.set_display_name(meta, name)
    }

    pub fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        self.items()?.lore(meta)
    }

    pub fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        self.items()?.set_lore(meta, lore)
    }

    pub fn objective_display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        self.objectives()?.display_name(objective)
    }

    pub fn set_objective_display_name(
        &self,
        objective: &ObjectRef,
        name: Option<&RichText>,
    ) -> Result<()> {
        self.objectives()?.set_display_name(objective, name)
    }

    pub fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        self.objectives()?
            .register_new_objective(scoreboard, name, criteria, display_name)
    }

    /// True when item text is handled natively by the host. A family that
    /// failed to resolve counts as not native.
    pub fn is_natively_supported(&self) -> bool {
        self.items()
            .map(|backend| backend.kind() == BackendKind::Native)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FeatureFlag;
    use crate::test_support;
    use crate::text::{Decoration, NamedColor, TextColor};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn bridge(host: test_support::Host) -> TextBridge {
        init_logger();
        TextBridge::new(Arc::new(host))
    }

    fn rich() -> RichText {
        RichText::text("Sword of ")
            .color(NamedColor::Gold)
            .decoration(Decoration::Italic, Some(false))
            .append(RichText::text("Ember").color(TextColor::Rgb(0xE25822)).decorate(Decoration::Bold))
            .append(RichText::text(" +3").color(NamedColor::Green))
    }

    #[test]
    fn test_scenario_native_host() {
        let bridge = bridge(test_support::native_host());
        assert!(bridge.descriptor().has(FeatureFlag::NativeItemText));
        assert_eq!(bridge.items().unwrap().kind(), BackendKind::Native);
        assert!(bridge.is_natively_supported());
    }

    #[test]
    fn test_scenario_json_host_keeps_bold() {
        let bridge = bridge(test_support::json_host());
        assert_eq!(bridge.items().unwrap().kind(), BackendKind::StructuredString);
        assert!(!bridge.is_natively_supported());

        let meta = test_support::item_meta();
        let hello = RichText::text("Hello").decorate(Decoration::Bold);
        bridge.set_display_name(&meta, Some(&hello)).unwrap();
        let read = bridge.display_name(&meta).unwrap().unwrap();
        assert_eq!(read.style().decoration(Decoration::Bold), Some(true));
        assert_eq!(read.plain_text(), "Hello");
    }

    #[test]
    fn test_scenario_legacy_lore() {
        let bridge = bridge(test_support::legacy_host());
        assert_eq!(bridge.items().unwrap().kind(), BackendKind::RawString);

        let meta = test_support::item_meta();
        let lore = vec![rich(), RichText::text("Forged in ").append(RichText::text("fire").color(NamedColor::Red))];
        bridge.set_lore(&meta, Some(&lore)).unwrap();
        let written = test_support::slot(&meta, "lore");

        let read = bridge.lore(&meta).unwrap().unwrap();
        assert_eq!(read.len(), 2);
        bridge.set_lore(&meta, Some(&read)).unwrap();
        assert_eq!(test_support::slot(&meta, "lore"), written);
    }

    #[test]
    fn test_null_clears_on_every_backend() {
        for host in test_support::all_hosts() {
            let bridge = bridge(host);
            let kind = bridge.items().unwrap().kind();
            let meta = test_support::item_meta();

            bridge.set_display_name(&meta, Some(&rich())).unwrap();
            bridge.set_display_name(&meta, None).unwrap();
            assert_eq!(bridge.display_name(&meta).unwrap(), None, "{kind}");
            assert!(test_support::slot(&meta, "displayName").is_null(), "{kind}");

            bridge.set_lore(&meta, Some(&[rich()])).unwrap();
            bridge.set_lore(&meta, None).unwrap();
            assert_eq!(bridge.lore(&meta).unwrap(), None, "{kind}");

            let scoreboard = test_support::scoreboard();
            let objective = bridge
                .register_new_objective(&scoreboard, "obj", "dummy", &rich())
                .unwrap();
            bridge.set_objective_display_name(&objective, None).unwrap();
            assert_eq!(bridge.objective_display_name(&objective).unwrap(), None, "{kind}");
        }
    }

    #[test]
    fn test_empty_text_is_not_absent() {
        for host in test_support::all_hosts() {
            let bridge = bridge(host);
            let meta = test_support::item_meta();
            bridge.set_display_name(&meta, Some(&RichText::empty())).unwrap();
            let read = bridge.display_name(&meta).unwrap();
            assert!(read.is_some_and(|text| text.is_empty()));
        }
    }

    #[test]
    fn test_lossless_backends_round_trip_exactly() {
        for host in [test_support::native_host(), test_support::json_host()] {
            let bridge = bridge(host);
            let meta = test_support::item_meta();
            let lore = vec![rich(), RichText::empty(), RichText::text("plain")];

            bridge.set_display_name(&meta, Some(&rich())).unwrap();
            assert_eq!(bridge.display_name(&meta).unwrap(), Some(rich()));
            bridge.set_lore(&meta, Some(&lore)).unwrap();
            assert_eq!(bridge.lore(&meta).unwrap(), Some(lore));

            let objective = bridge
                .register_new_objective(&test_support::scoreboard(), "obj", "dummy", &rich())
                .unwrap();
            assert_eq!(bridge.objective_display_name(&objective).unwrap(), Some(rich()));
        }
    }

    #[test]
    fn test_lossy_backends_are_stable_on_second_pass() {
        for host in [test_support::tree_host(), test_support::legacy_host()] {
            let bridge = bridge(host);
            let meta = test_support::item_meta();

            bridge.set_display_name(&meta, Some(&rich())).unwrap();
            let first = test_support::encoding(test_support::slot(&meta, "displayName"));
            let decoded = bridge.display_name(&meta).unwrap().unwrap();
            bridge.set_display_name(&meta, Some(&decoded)).unwrap();
            let second = test_support::encoding(test_support::slot(&meta, "displayName"));
            assert_eq!(first, second);

            let lore = [rich(), rich().decorate(Decoration::Underlined)];
            bridge.set_lore(&meta, Some(&lore)).unwrap();
            let first = test_support::encoding(test_support::slot(&meta, "lore"));
            let decoded = bridge.lore(&meta).unwrap().unwrap();
            bridge.set_lore(&meta, Some(&decoded)).unwrap();
            let second = test_support::encoding(test_support::slot(&meta, "lore"));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_tree_backend_downsamples_without_hex_colors() {
        let bridge = bridge(test_support::tree_host());
        let meta = test_support::item_meta();
        bridge
            .set_display_name(&meta, Some(&RichText::text("x").color(TextColor::Rgb(0x00ABAA))))
            .unwrap();
        let read = bridge.display_name(&meta).unwrap().unwrap();
        assert_eq!(read.style().color(), Some(TextColor::Named(NamedColor::DarkAqua)));
    }

    #[test]
    fn test_objective_title_round_trip_on_tree_host() {
        let bridge = bridge(test_support::obfuscated_tree_host());
        let objective = bridge
            .register_new_objective(&test_support::scoreboard(), "kills", "playerKillCount", &rich())
            .unwrap();
        // 1.18 supports RGB, so nothing is lost through the tree.
        assert_eq!(bridge.objective_display_name(&objective).unwrap(), Some(rich()));
    }

    #[test]
    fn test_failed_family_is_not_native() {
        let bridge = bridge(test_support::Host::new());
        assert!(!bridge.descriptor().is_recognized());
        assert!(!bridge.is_natively_supported());
        assert!(bridge.display_name(&test_support::item_meta()).is_err());
    }
}
