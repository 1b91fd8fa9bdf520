//! Scoreboard objective titles.
//!
//! Only the native backend registers objectives with rich text in one call.
//! The others register through the string-based API and then write the
//! title. Backends that go through the internal objective register with a
//! `"."` placeholder, which is overwritten immediately.

use super::tree::TreeCodec;
use super::BackendKind;
use crate::binder::{Accessor, HostValue, ObjectRef, Signature};
use crate::error::{BindingError, Result};
use crate::probe::{symbols, FeatureFlag};
use crate::registry::{BindContext, CapabilityFamily, Candidate, FamilySlot, StrategyRegistry, StrategyTable};
use crate::text::{JsonTextCodec, LegacyTextCodec, RichText};

const PLACEHOLDER_TITLE: &str = ".";

/// Text operations on scoreboard objectives.
pub trait ObjectiveText: Send + Sync {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>>;

    /// `None` clears the title.
    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()>;

    /// Registers a new objective on `scoreboard` titled `display_name`.
    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef>;
}

/// `Scoreboard.registerNewObjective(String, String, String)` with the
/// placeholder title.
fn register_with_placeholder(
    register: &Accessor,
    scoreboard: &ObjectRef,
    name: &str,
    criteria: &str,
) -> Result<ObjectRef> {
    register
        .invoke(
            Some(scoreboard),
            &[
                HostValue::from(name),
                HostValue::from(criteria),
                HostValue::from(PLACEHOLDER_TITLE),
            ],
        )?
        .into_object(register.member_name())
}

fn string_register(context: &BindContext<'_>) -> std::result::Result<Accessor, BindingError> {
    let locator = context.locator();
    let scoreboard = locator.require(&locator.api(symbols::SCOREBOARD))?;
    Accessor::method(
        &scoreboard,
        "registerNewObjective",
        Signature::new(["String", "String", "String"]),
    )
}

/// Read-only access from the API objective to the internal one.
fn internal_objective(context: &BindContext<'_>) -> std::result::Result<Accessor, BindingError> {
    let locator = context.locator();
    let craft = locator.require(&locator.implementation(symbols::CRAFT_OBJECTIVE))?;
    Accessor::getter(&craft, "objective")
}

fn unwrap_internal(handle: &Accessor, objective: &ObjectRef) -> Result<ObjectRef> {
    handle
        .get(Some(objective))?
        .into_object(handle.member_name())
}

// ============================================================================
// Native
// ============================================================================

#[derive(Debug, Clone)]
pub struct NativeObjectiveText {
    get_name: Accessor,
    set_name: Accessor,
    register: Accessor,
}

impl NativeObjectiveText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let text = context.config.layout.text_type.as_str();
        let objective = locator.require(&locator.api(symbols::OBJECTIVE))?;
        let scoreboard = locator.require(&locator.api(symbols::SCOREBOARD))?;
        Ok(Self {
            get_name: Accessor::method(&objective, "displayName", Signature::empty())?,
            set_name: Accessor::method(&objective, "displayName", Signature::new([text]))?,
            register: Accessor::method(
                &scoreboard,
                "registerNewObjective",
                Signature::new(["String", "String", text]),
            )?,
        })
    }
}

impl ObjectiveText for NativeObjectiveText {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        self.get_name
            .invoke(Some(objective), &[])?
            .into_opt_text(self.get_name.member_name())
    }

    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = HostValue::from_option(name.cloned(), HostValue::Text);
        self.set_name.invoke(Some(objective), &[value])?;
        Ok(())
    }

    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        self.register
            .invoke(
                Some(scoreboard),
                &[
                    HostValue::from(name),
                    HostValue::from(criteria),
                    HostValue::Text(display_name.clone()),
                ],
            )?
            .into_object(self.register.member_name())
    }
}

// ============================================================================
// StructuredString
// ============================================================================

/// The internal objective keeps its title as a JSON string.
#[derive(Debug, Clone)]
pub struct JsonObjectiveText {
    internal: Accessor,
    name: Accessor,
    register: Accessor,
    json: JsonTextCodec,
}

impl JsonObjectiveText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let objective = locator.require(&locator.internal(symbols::SCOREBOARD_OBJECTIVE))?;
        Ok(Self {
            internal: internal_objective(context)?,
            name: Accessor::field(&objective, "displayName")?,
            register: string_register(context)?,
            json: JsonTextCodec::new(),
        })
    }
}

impl ObjectiveText for JsonObjectiveText {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        let internal = unwrap_internal(&self.internal, objective)?;
        match self
            .name
            .get(Some(&internal))?
            .into_opt_string(self.name.member_name())?
        {
            Some(json) => Ok(Some(self.json.deserialize(&json)?)),
            None => Ok(None),
        }
    }

    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let internal = unwrap_internal(&self.internal, objective)?;
        let value = HostValue::from_option(name, |text| HostValue::Str(self.json.serialize(text)));
        self.name.set(Some(&internal), value)
    }

    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        let objective = register_with_placeholder(&self.register, scoreboard, name, criteria)?;
        self.set_display_name(&objective, Some(display_name))?;
        Ok(objective)
    }
}

// ============================================================================
// InternalTree
// ============================================================================

/// The internal objective keeps its title as an internal tree object.
#[derive(Debug, Clone)]
pub struct TreeObjectiveText {
    internal: Accessor,
    get_name: Accessor,
    set_name: Accessor,
    register: Accessor,
    codec: TreeCodec,
}

impl TreeObjectiveText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let objective = locator.require(&locator.internal(symbols::SCOREBOARD_OBJECTIVE))?;
        let component = locator.internal(symbols::COMPONENT);
        let (getter, setter) = if context.has(FeatureFlag::ObfuscatedObjectiveMembers) {
            ("d", "a")
        } else {
            ("getDisplayName", "setDisplayName")
        };
        Ok(Self {
            internal: internal_objective(context)?,
            get_name: Accessor::method(&objective, getter, Signature::empty())?,
            set_name: Accessor::method(&objective, setter, Signature::new([component]))?,
            register: string_register(context)?,
            codec: TreeCodec::bind(context)?,
        })
    }
}

impl ObjectiveText for TreeObjectiveText {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        let internal = unwrap_internal(&self.internal, objective)?;
        let tree = self.get_name.invoke(Some(&internal), &[])?;
        self.codec.decode(tree)
    }

    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let internal = unwrap_internal(&self.internal, objective)?;
        let tree = self.codec.encode_opt(name)?;
        self.set_name.invoke(Some(&internal), &[tree])?;
        Ok(())
    }

    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        let objective = register_with_placeholder(&self.register, scoreboard, name, criteria)?;
        self.set_display_name(&objective, Some(display_name))?;
        Ok(objective)
    }
}

// ============================================================================
// RawString
// ============================================================================

/// Only the legacy string API is available.
#[derive(Debug, Clone)]
pub struct RawObjectiveText {
    get_name: Accessor,
    set_name: Accessor,
    register: Accessor,
    legacy: LegacyTextCodec,
}

impl RawObjectiveText {
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let objective = locator.require(&locator.api(symbols::OBJECTIVE))?;
        let scoreboard = locator.require(&locator.api(symbols::SCOREBOARD))?;
        Ok(Self {
            get_name: Accessor::method(&objective, "getDisplayName", Signature::empty())?,
            set_name: Accessor::method(&objective, "setDisplayName", Signature::new(["String"]))?,
            register: Accessor::method(
                &scoreboard,
                "registerNewObjective",
                Signature::new(["String", "String"]),
            )?,
            legacy: LegacyTextCodec::section().with_hex_colors(context.has(FeatureFlag::HexColors)),
        })
    }
}

impl ObjectiveText for RawObjectiveText {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        Ok(self
            .get_name
            .invoke(Some(objective), &[])?
            .into_opt_string(self.get_name.member_name())?
            .map(|raw| self.legacy.deserialize(&raw)))
    }

    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        let value = HostValue::from_option(name, |text| HostValue::Str(self.legacy.serialize(text)));
        self.set_name.invoke(Some(objective), &[value])?;
        Ok(())
    }

    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        let objective = self
            .register
            .invoke(Some(scoreboard), &[HostValue::from(name), HostValue::from(criteria)])?
            .into_object(self.register.member_name())?;
        self.set_display_name(&objective, Some(display_name))?;
        Ok(objective)
    }
}

// ============================================================================
// Backend and family
// ============================================================================

/// The objective text backend chosen for a host.
#[derive(Debug, Clone)]
pub enum ObjectiveTextBackend {
    Native(NativeObjectiveText),
    StructuredString(JsonObjectiveText),
    InternalTree(TreeObjectiveText),
    RawString(RawObjectiveText),
}

impl ObjectiveTextBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Native(_) => BackendKind::Native,
            Self::StructuredString(_) => BackendKind::StructuredString,
            Self::InternalTree(_) => BackendKind::InternalTree,
            Self::RawString(_) => BackendKind::RawString,
        }
    }

    fn inner(&self) -> &dyn ObjectiveText {
        match self {
            Self::Native(backend) => backend,
            Self::StructuredString(backend) => backend,
            Self::InternalTree(backend) => backend,
            Self::RawString(backend) => backend,
        }
    }
}

impl ObjectiveText for ObjectiveTextBackend {
    fn display_name(&self, objective: &ObjectRef) -> Result<Option<RichText>> {
        self.inner().display_name(objective)
    }

    fn set_display_name(&self, objective: &ObjectRef, name: Option<&RichText>) -> Result<()> {
        self.inner().set_display_name(objective, name)
    }

    fn register_new_objective(
        &self,
        scoreboard: &ObjectRef,
        name: &str,
        criteria: &str,
        display_name: &RichText,
    ) -> Result<ObjectRef> {
        self.inner()
            .register_new_objective(scoreboard, name, criteria, display_name)
    }
}

/// Titles of scoreboard objectives.
pub struct ObjectiveTextFamily;

impl CapabilityFamily for ObjectiveTextFamily {
    const NAME: &'static str = "objective text";

    type Backend = ObjectiveTextBackend;

    fn default_table() -> StrategyTable<ObjectiveTextBackend> {
        StrategyTable::new()
            .candidate(Candidate::when("native", FeatureFlag::NativeObjectiveText, |context| {
                Ok(ObjectiveTextBackend::Native(NativeObjectiveText::bind(context)?))
            }))
            .candidate(Candidate::when(
                "json string",
                FeatureFlag::ObjectiveTextAsJson,
                |context| Ok(ObjectiveTextBackend::StructuredString(JsonObjectiveText::bind(context)?)),
            ))
            .candidate(Candidate::when(
                "internal tree",
                FeatureFlag::ObjectiveTextAsTree,
                |context| Ok(ObjectiveTextBackend::InternalTree(TreeObjectiveText::bind(context)?)),
            ))
            .candidate(Candidate::fallback("raw string", |context| {
                Ok(ObjectiveTextBackend::RawString(RawObjectiveText::bind(context)?))
            }))
    }

    fn slot(registry: &StrategyRegistry) -> &FamilySlot<ObjectiveTextBackend> {
        &registry.objective
    }
}
