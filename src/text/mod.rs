//! # Rich text model
//!
//! The structured, formatting-aware value exchanged at the bridge boundary,
//! plus the two canonical serializers the backends rely on:
//!
//! - [`JsonTextCodec`]: the self-describing JSON tree (`{"text": .., "extra": [..]}`)
//! - [`LegacyTextCodec`]: flattened strings with inline `§` format codes
//!
//! A [`RichText`] is a node with literal content, a [`Style`] and ordered
//! children. Children inherit every style property they leave unset.

pub mod color;
pub mod json;
pub mod legacy;

pub use color::{NamedColor, TextColor};
pub use json::JsonTextCodec;
pub use legacy::LegacyTextCodec;

use thiserror::Error;

/// Errors raised while decoding text.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed text JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported text node: {0}")]
    Shape(String),
}

/// Boolean text decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Obfuscated,
    Bold,
    Strikethrough,
    Underlined,
    Italic,
}

impl Decoration {
    /// Ordered as the legacy codes `k` through `o`.
    pub const ALL: [Decoration; 5] = [
        Self::Obfuscated,
        Self::Bold,
        Self::Strikethrough,
        Self::Underlined,
        Self::Italic,
    ];

    pub fn json_key(self) -> &'static str {
        match self {
            Self::Obfuscated => "obfuscated",
            Self::Bold => "bold",
            Self::Strikethrough => "strikethrough",
            Self::Underlined => "underlined",
            Self::Italic => "italic",
        }
    }

    pub fn legacy_code(self) -> char {
        match self {
            Self::Obfuscated => 'k',
            Self::Bold => 'l',
            Self::Strikethrough => 'm',
            Self::Underlined => 'n',
            Self::Italic => 'o',
        }
    }

    pub fn from_legacy_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|d| d.legacy_code() == code)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Style of a single node. `None` means "inherit from the parent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    color: Option<TextColor>,
    decorations: [Option<bool>; 5],
}

impl Style {
    pub fn color(&self) -> Option<TextColor> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<TextColor>) {
        self.color = color.map(TextColor::normalized);
    }

    pub fn decoration(&self, decoration: Decoration) -> Option<bool> {
        self.decorations[decoration.index()]
    }

    pub fn set_decoration(&mut self, decoration: Decoration, state: Option<bool>) {
        self.decorations[decoration.index()] = state;
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.decorations.iter().all(Option::is_none)
    }

    /// Fills every unset property from `parent`.
    pub fn inherit(&self, parent: &Style) -> Style {
        let mut merged = *self;
        if merged.color.is_none() {
            merged.color = parent.color;
        }
        for (own, inherited) in merged.decorations.iter_mut().zip(parent.decorations) {
            if own.is_none() {
                *own = inherited;
            }
        }
        merged
    }
}

/// A structured text value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    content: String,
    style: Style,
    children: Vec<RichText>,
}

impl RichText {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn children(&self) -> &[RichText] {
        &self.children
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: impl Into<TextColor>) -> Self {
        self.style.set_color(Some(color.into()));
        self
    }

    pub fn decorate(self, decoration: Decoration) -> Self {
        self.decoration(decoration, Some(true))
    }

    pub fn decoration(mut self, decoration: Decoration, state: Option<bool>) -> Self {
        self.style.set_decoration(decoration, state);
        self
    }

    pub fn append(mut self, child: RichText) -> Self {
        self.children.push(child);
        self
    }

    /// True when the node carries no content and no children.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.iter().all(RichText::is_empty)
    }

    /// Content of this node and its descendants, without formatting.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain(&mut out);
        out
    }

    fn collect_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.collect_plain(out);
        }
    }

    /// Depth-first `(content, effective style)` pairs, skipping empty content.
    pub fn flatten(&self) -> Vec<(&str, Style)> {
        let mut segments = Vec::new();
        self.flatten_into(&Style::default(), &mut segments);
        segments
    }

    fn flatten_into<'a>(&'a self, parent: &Style, out: &mut Vec<(&'a str, Style)>) {
        let effective = self.style.inherit(parent);
        if !self.content.is_empty() {
            out.push((self.content.as_str(), effective));
        }
        for child in &self.children {
            child.flatten_into(&effective, out);
        }
    }
}

impl From<&str> for RichText {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}
