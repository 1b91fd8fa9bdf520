//! The immutable result of probing a host.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::version::{ExactVersion, HostVersion};

/// A boolean capability of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    /// The API metadata type reads and writes rich text directly.
    NativeItemText,
    /// The API objective and scoreboard types take rich text directly.
    NativeObjectiveText,
    /// Item metadata stores text as JSON strings.
    ItemTextAsJson,
    /// Item metadata stores text as internal tree objects.
    ItemTextAsTree,
    /// The internal objective stores its title as a JSON string.
    ObjectiveTextAsJson,
    /// The internal objective stores its title as an internal tree object.
    ObjectiveTextAsTree,
    HexColors,
    FlattenedInternalNamespace,
    ObfuscatedObjectiveMembers,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 9] = [
        FeatureFlag::NativeItemText,
        FeatureFlag::NativeObjectiveText,
        FeatureFlag::ItemTextAsJson,
        FeatureFlag::ItemTextAsTree,
        FeatureFlag::ObjectiveTextAsJson,
        FeatureFlag::ObjectiveTextAsTree,
        FeatureFlag::HexColors,
        FeatureFlag::FlattenedInternalNamespace,
        FeatureFlag::ObfuscatedObjectiveMembers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeItemText => "native_item_text",
            Self::NativeObjectiveText => "native_objective_text",
            Self::ItemTextAsJson => "item_text_as_json",
            Self::ItemTextAsTree => "item_text_as_tree",
            Self::ObjectiveTextAsJson => "objective_text_as_json",
            Self::ObjectiveTextAsTree => "objective_text_as_tree",
            Self::HexColors => "hex_colors",
            Self::FlattenedInternalNamespace => "flattened_internal_namespace",
            Self::ObfuscatedObjectiveMembers => "obfuscated_objective_members",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host version plus feature flags. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    protocol: u32,
    exact: ExactVersion,
    implementation_tag: Option<String>,
    recognized: bool,
    flags: BTreeSet<FeatureFlag>,
}

impl CapabilityDescriptor {
    /// A descriptor for a known version with no member-probed flags.
    pub fn new(protocol: u32, exact: ExactVersion) -> Self {
        Self {
            protocol,
            exact,
            implementation_tag: None,
            recognized: true,
            flags: BTreeSet::new(),
        }
    }

    /// The descriptor of a host nothing could be learned about.
    pub fn unrecognized() -> Self {
        Self {
            protocol: 0,
            exact: ExactVersion::UNKNOWN,
            implementation_tag: None,
            recognized: false,
            flags: BTreeSet::new(),
        }
    }

    pub(crate) fn from_version(version: HostVersion, flags: BTreeSet<FeatureFlag>) -> Self {
        Self {
            protocol: version.protocol,
            exact: version.exact,
            implementation_tag: version.implementation_tag,
            recognized: version.recognized,
            flags,
        }
    }

    pub fn with_flag(mut self, flag: FeatureFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = FeatureFlag>) -> Self {
        self.flags.extend(flags);
        self
    }

    pub fn with_implementation_tag(mut self, tag: impl Into<String>) -> Self {
        self.implementation_tag = Some(tag.into());
        self
    }

    pub fn protocol(&self) -> u32 {
        self.protocol
    }

    pub fn exact(&self) -> ExactVersion {
        self.exact
    }

    pub fn implementation_tag(&self) -> Option<&str> {
        self.implementation_tag.as_deref()
    }

    /// False when the host version could not be parsed.
    pub fn is_recognized(&self) -> bool {
        self.recognized
    }

    pub fn has(&self, flag: FeatureFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn flags(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        self.flags.iter().copied()
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.recognized {
            write!(f, "1.{}", self.exact)?;
        } else {
            f.write_str("<unrecognized>")?;
        }
        if let Some(tag) = &self.implementation_tag {
            write!(f, " ({})", tag)?;
        }
        let flags: Vec<&str> = self.flags.iter().map(FeatureFlag::as_str).collect();
        write!(f, " [{}]", flags.join(", "))
    }
}
