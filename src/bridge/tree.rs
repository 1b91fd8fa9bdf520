//! Conversion through the host's internal text tree.
//!
//! The host ships its own serializer between JSON strings and its internal
//! tree objects. Rich text takes two hops: model to JSON with
//! [`JsonTextCodec`], then JSON to tree with the host's serializer.

use crate::binder::{Accessor, BoundAccessor, HostValue, Signature};
use crate::error::{BindingError, Result};
use crate::probe::{symbols, FeatureFlag};
use crate::registry::BindContext;
use crate::text::{JsonTextCodec, RichText};

/// Pre-bound access to the host's tree serializer.
#[derive(Debug, Clone)]
pub struct TreeCodec {
    tree_to_json: BoundAccessor,
    json_to_tree: BoundAccessor,
    json: JsonTextCodec,
}

impl TreeCodec {
    /// Binds both static serializer overloads named `a`.
    pub fn bind(context: &BindContext<'_>) -> std::result::Result<Self, BindingError> {
        let locator = context.locator();
        let component = locator.internal(symbols::COMPONENT);
        let serializer = locator.require(&locator.internal(symbols::CHAT_SERIALIZER))?;

        let tree_to_json = Accessor::method(&serializer, "a", Signature::new([component]))?;
        let json_to_tree = Accessor::method(&serializer, "a", Signature::new(["String"]))?;
        Ok(Self {
            tree_to_json: tree_to_json.bind_static(),
            json_to_tree: json_to_tree.bind_static(),
            json: JsonTextCodec::for_host(context.has(FeatureFlag::HexColors)),
        })
    }

    pub fn json(&self) -> &JsonTextCodec {
        &self.json
    }

    /// Model to host tree object.
    pub fn encode(&self, text: &RichText) -> Result<HostValue> {
        let json = self.json.serialize(text);
        self.json_to_tree.call(&[HostValue::Str(json)])
    }

    /// Host tree object to model. A null tree is absent.
    pub fn decode(&self, tree: HostValue) -> Result<Option<RichText>> {
        if tree.is_null() {
            return Ok(None);
        }
        let member = self.tree_to_json.accessor().to_string();
        let json = self.tree_to_json.call(&[tree])?.into_opt_string(&member)?;
        match json {
            Some(json) => Ok(Some(self.json.deserialize(&json)?)),
            None => Ok(None),
        }
    }

    /// Encodes an optional value, mapping `None` to the host's null.
    pub fn encode_opt(&self, text: Option<&RichText>) -> Result<HostValue> {
        match text {
            Some(text) => self.encode(text),
            None => Ok(HostValue::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::probe::CapabilityProbe;
    use crate::test_support;
    use crate::text::{NamedColor, TextColor};

    #[test]
    fn test_encode_goes_through_host_serializer() {
        let host = test_support::tree_host();
        let config = BridgeConfig::default();
        let descriptor = CapabilityProbe::new(&host, &config).detect();
        let context = BindContext {
            host: &host,
            config: &config,
            descriptor: &descriptor,
        };
        let codec = TreeCodec::bind(&context).unwrap();
        assert!(codec.json().downsamples_colors());

        let text = RichText::text("Sale").color(TextColor::Rgb(0xFF5554));
        let tree = codec.encode(&text).unwrap();
        assert!(matches!(tree, HostValue::Object(_)));

        let decoded = codec.decode(tree).unwrap().unwrap();
        assert_eq!(decoded.style().color(), Some(TextColor::Named(NamedColor::Red)));
        assert_eq!(codec.decode(HostValue::Null).unwrap(), None);
    }

    #[test]
    fn test_bind_fails_without_serializer() {
        let host = test_support::legacy_host();
        let config = BridgeConfig::default();
        let descriptor = CapabilityProbe::new(&host, &config).detect();
        let context = BindContext {
            host: &host,
            config: &config,
            descriptor: &descriptor,
        };
        let err = TreeCodec::bind(&context).unwrap_err();
        assert_eq!(err.reason, crate::error::BindingFailure::TypeNotFound);
    }
}
