//! Item display name and lore.

use super::tree::TreeCodec;
use super::{read_lines, write_lines, BackendKind};
use crate::binder::{Accessor, HostValue, ObjectRef, Signature};
use crate::error::{BindingError, Result};
use crate::probe::{symbols, FeatureFlag};
use crate::registry::{BindContext, CapabilityFamily, Candidate, FamilySlot, StrategyRegistry, StrategyTable};
use crate::text::{JsonTextCodec, LegacyTextCodec, RichText};

/// Text operations on an item metadata object.
pub trait ItemText: Send + Sync {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>>;

    /// `None` clears the display name.
    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()>;

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>>;

    /// `None` removes the lore; an empty slice leaves an empty lore.
    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()>;
}

// ============================================================================
// Native
// ============================================================================

/// The API metadata type takes rich text directly.
#[derive(Debug, Clone)]
pub struct NativeItemText {
    get_name: Accessor,
    set_name: Accessor,
    get_lore: Accessor,
    set_lore: Accessor,
}

impl NativeItemText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let text = context.config.layout.text_type.as_str();
        let meta = locator.require(&locator.api(symbols::ITEM_META))?;
        Ok(Self {
            get_name: Accessor::method(&meta, "displayName", Signature::empty())?,
            set_name: Accessor::method(&meta, "displayName", Signature::new([text]))?,
            get_lore: Accessor::method(&meta, "lore", Signature::empty())?,
            set_lore: Accessor::method(&meta, "lore", Signature::new(["List"]))?,
        })
    }
}

impl ItemText for NativeItemText {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.get_name
            .invoke(Some(meta), &[])?
            .into_opt_text(self.get_name.member_name())
    }

    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = HostValue::from_option(name.cloned(), HostValue::Text);
        self.set_name.invoke(Some(meta), &[value])?;
        Ok(())
    }

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        let member = self.get_lore.member_name();
        read_lines(self.get_lore.invoke(Some(meta), &[])?, member, |line| {
            line.into_opt_text(member)
        })
    }

    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        let value = write_lines(lore, |line| Ok(HostValue::Text(line.clone())))?;
        self.set_lore.invoke(Some(meta), &[value])?;
        Ok(())
    }
}

// ============================================================================
// StructuredString
// ============================================================================

/// The implementation metadata type stores JSON strings.
#[derive(Debug, Clone)]
pub struct JsonItemText {
    name: Accessor,
    lore: Accessor,
    json: JsonTextCodec,
}

impl JsonItemText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let meta = locator.require(&locator.implementation(symbols::CRAFT_META_ITEM))?;
        Ok(Self {
            name: Accessor::field(&meta, "displayName")?,
            lore: Accessor::field(&meta, "lore")?,
            json: JsonTextCodec::new(),
        })
    }

    fn decode(&self, value: HostValue, member: &str) -> Result<Option<RichText>> {
        match value.into_opt_string(member)? {
            Some(json) => Ok(Some(self.json.deserialize(&json)?)),
            None => Ok(None),
        }
    }
}

impl ItemText for JsonItemText {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.decode(self.name.get(Some(meta))?, self.name.member_name())
    }

    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = HostValue::from_option(name, |text| HostValue::Str(self.json.serialize(text)));
        self.name.set(Some(meta), value)
    }

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        let member = self.lore.member_name();
        read_lines(self.lore.get(Some(meta))?, member, |line| self.decode(line, member))
    }

    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        let value = write_lines(lore, |line| Ok(HostValue::Str(self.json.serialize(line))))?;
        self.lore.set(Some(meta), value)
    }
}

// ============================================================================
// InternalTree
// ============================================================================

/// The implementation metadata type stores internal tree objects.
#[derive(Debug, Clone)]
pub struct TreeItemText {
    name: Accessor,
    lore: Accessor,
    codec: TreeCodec,
}

impl TreeItemText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let meta = locator.require(&locator.implementation(symbols::CRAFT_META_ITEM))?;
        Ok(Self {
            name: Accessor::field(&meta, "displayName")?,
            lore: Accessor::field(&meta, "lore")?,
            codec: TreeCodec::bind(context)?,
        })
    }
}

impl ItemText for TreeItemText {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.codec.decode(self.name.get(Some(meta))?)
    }

    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = self.codec.encode_opt(name)?;
        self.name.set(Some(meta), value)
    }

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        read_lines(self.lore.get(Some(meta))?, self.lore.member_name(), |line| {
            self.codec.decode(line)
        })
    }

    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        let value = write_lines(lore, |line| self.codec.encode(line))?;
        self.lore.set(Some(meta), value)
    }
}

// ============================================================================
// RawString
// ============================================================================

/// The API metadata type only takes legacy formatted strings.
#[derive(Debug, Clone)]
pub struct RawItemText {
    get_name: Accessor,
    set_name: Accessor,
    get_lore: Accessor,
    set_lore: Accessor,
    legacy: LegacyTextCodec,
}

impl RawItemText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let meta = locator.require(&locator.api(symbols::ITEM_META))?;
        Ok(Self {
            get_name: Accessor::method(&meta, "getDisplayName", Signature::empty())?,
            set_name: Accessor::method(&meta, "setDisplayName", Signature::new(["String"]))?,
            get_lore: Accessor::method(&meta, "getLore", Signature::empty())?,
            set_lore: Accessor::method(&meta, "setLore", Signature::new(["List"]))?,
            legacy: LegacyTextCodec::section().with_hex_colors(context.has(FeatureFlag::HexColors)),
        })
    }

    fn decode(&self, value: HostValue, member: &str) -> Result<Option<RichText>> {
        Ok(value
            .into_opt_string(member)?
            .map(|raw| self.legacy.deserialize(&raw)))
    }
}

impl ItemText for RawItemText {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.decode(
            self.get_name.invoke(Some(meta), &[])?,
            self.get_name.member_name(),
        )
    }

    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = HostValue::from_option(name, |text| HostValue::Str(self.legacy.serialize(text)));
        self.set_name.invoke(Some(meta), &[value])?;
        Ok(())
    }

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        let member = self.get_lore.member_name();
        read_lines(self.get_lore.invoke(Some(meta), &[])?, member, |line| {
            self.decode(line, member)
        })
    }

    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        let value = write_lines(lore, |line| Ok(HostValue::Str(self.legacy.serialize(line))))?;
        self.set_lore.invoke(Some(meta), &[value])?;
        Ok(())
    }
}

// ============================================================================
// Backend and family
// ============================================================================

/// The item text backend chosen for a host.
#[derive(Debug, Clone)]
pub enum ItemTextBackend {
    Native(NativeItemText),
    StructuredString(JsonItemText),
    InternalTree(TreeItemText),
    RawString(RawItemText),
}

impl ItemTextBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Native(_) => BackendKind::Native,
            Self::StructuredString(_) => BackendKind::StructuredString,
            Self::InternalTree(_) => BackendKind::InternalTree,
            Self::RawString(_) => BackendKind::RawString,
        }
    }

    fn inner(&self) -> &dyn ItemText {
        match self {
            Self::Native(backend) => backend,
            Self::StructuredString(backend) => backend,
            Self::InternalTree(backend) => backend,
            Self::RawString(backend) => backend,
        }
    }
}

impl ItemText for ItemTextBackend {
    fn display_name(&self, meta: &ObjectRef) -> Result<Option<RichText>> {
        self.inner().display_name(meta)
    }

    fn set_display_name(&self, meta: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        self.inner().set_display_name(meta, name)
    }

    fn lore(&self, meta: &ObjectRef) -> Result<Option<Vec<RichText>>> {
        self.inner().lore(meta)
    }

    fn set_lore(&self, meta: &ObjectRef, lore: Option<&[RichText]>) -> Result<()> {
        self.inner().set_lore(meta, lore)
    }
}

/// Display name and lore on item metadata.
pub struct ItemTextFamily;

impl CapabilityFamily for ItemTextFamily {
    const NAME: &'static str = "item text";

    type Backend = ItemTextBackend;

    fn default_table() -> StrategyTable<ItemTextBackend> {
        StrategyTable::new()
            .candidate(Candidate::when("native", FeatureFlag::NativeItemText, |context| {
                Ok(ItemTextBackend::Native(NativeItemText::bind(context)?))
            }))
            .candidate(Candidate::when("json string", FeatureFlag::ItemTextAsJson, |context| {
                Ok(ItemTextBackend::StructuredString(JsonItemText::bind(context)?))
            }))
            .candidate(Candidate::when("internal tree", FeatureFlag::ItemTextAsTree, |context| {
                Ok(ItemTextBackend::InternalTree(TreeItemText::bind(context)?))
            }))
            .candidate(Candidate::fallback("raw string", |context| {
                Ok(ItemTextBackend::RawString(RawItemText::bind(context)?))
            }))
    }

    fn slot(registry: &StrategyRegistry) -> &FamilySlot<ItemTextBackend> {
        &registry.item
    }
}
