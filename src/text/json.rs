//! JSON tree codec.
//!
//! Serializes each node as an object with `text`, the style keys it sets and
//! an optional `extra` array of children. Decoding also accepts the shorthand
//! forms hosts emit: bare strings, primitives and arrays whose first element
//! is the parent of the rest.

use serde_json::{Map, Value};

use super::{CodecError, Decoration, RichText, Style, TextColor};

/// Converts [`RichText`] to and from the JSON tree representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonTextCodec {
    downsample_colors: bool,
}

impl JsonTextCodec {
    /// Codec that keeps RGB colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that writes RGB colors as their nearest named color.
    pub fn downsampling() -> Self {
        Self {
            downsample_colors: true,
        }
    }

    /// Picks the downsampling variant when the host lacks RGB support.
    pub fn for_host(hex_colors: bool) -> Self {
        if hex_colors {
            Self::new()
        } else {
            Self::downsampling()
        }
    }

    pub fn downsamples_colors(&self) -> bool {
        self.downsample_colors
    }

    pub fn serialize(&self, text: &RichText) -> String {
        self.to_value(text).to_string()
    }

    pub fn to_value(&self, text: &RichText) -> Value {
        let mut node = Map::new();
        node.insert("text".to_string(), Value::String(text.content().to_string()));
        if let Some(color) = text.style().color() {
            let color = if self.downsample_colors {
                color.downsample()
            } else {
                color
            };
            node.insert("color".to_string(), Value::String(color.to_string()));
        }
        for decoration in Decoration::ALL {
            if let Some(state) = text.style().decoration(decoration) {
                node.insert(decoration.json_key().to_string(), Value::Bool(state));
            }
        }
        if !text.children().is_empty() {
            let extra = text.children().iter().map(|c| self.to_value(c)).collect();
            node.insert("extra".to_string(), Value::Array(extra));
        }
        Value::Object(node)
    }

    pub fn deserialize(&self, json: &str) -> Result<RichText, CodecError> {
        let value: Value = serde_json::from_str(json)?;
        self.from_value(&value)
    }

    pub fn from_value(&self, value: &Value) -> Result<RichText, CodecError> {
        match value {
            Value::String(content) => Ok(RichText::text(content.as_str())),
            Value::Bool(_) | Value::Number(_) => Ok(RichText::text(value.to_string())),
            Value::Array(items) => {
                let (first, rest) = items
                    .split_first()
                    .ok_or_else(|| CodecError::Shape("empty component array".to_string()))?;
                let mut parent = self.from_value(first)?;
                for item in rest {
                    parent = parent.append(self.from_value(item)?);
                }
                Ok(parent)
            }
            Value::Object(node) => self.from_object(node),
            Value::Null => Err(CodecError::Shape("null component".to_string())),
        }
    }

    fn from_object(&self, node: &Map<String, Value>) -> Result<RichText, CodecError> {
        let content = match node.get("text") {
            None => String::new(),
            Some(Value::String(content)) => content.clone(),
            Some(other) => other.to_string(),
        };

        let mut style = Style::default();
        if let Some(color) = node.get("color").and_then(Value::as_str) {
            match TextColor::parse(color) {
                Some(parsed) => style.set_color(Some(parsed)),
                None => log::debug!("Ignoring unknown text color `{}`", color),
            }
        }
        for decoration in Decoration::ALL {
            if let Some(state) = node.get(decoration.json_key()).and_then(Value::as_bool) {
                style.set_decoration(decoration, Some(state));
            }
        }

        let mut text = RichText::text(content).with_style(style);
        match node.get("extra") {
            None => {}
            Some(Value::Array(extra)) => {
                for child in extra {
                    text = text.append(self.from_value(child)?);
                }
            }
            Some(_) => return Err(CodecError::Shape("`extra` must be an array".to_string())),
        }
        Ok(text)
    }
}
