//! [`Layer`]: the typed fields behind one vertex.
//!
//! A layer owns an ordered set of [`ValueWrapper`] fields. Some are
//! read-only: they are derived by [`Layer::update`] from the others and can
//! only be written by propagation ([`Layer::assign_field`]) or by the update
//! itself. Ports map onto fields; the model uses that mapping to move values
//! along edges.
//!
//! `Clone` deep-copies every field, which is what speculative updates rely
//! on: mutate a clone, and only replace the live layer if the clone succeeds.

use indexmap::{IndexMap, IndexSet};
use layerforge_core::{Value, ValueWrapper};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::LayerError;
use crate::kind::LayerKind;
use crate::kinds::Fields;

/// A placed layer: its kind plus current field values.
///
/// Serializes as `{ kind, fields }`. The read-only set and port bindings are
/// fixed by the kind and rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredLayer", into = "StoredLayer")]
pub struct Layer {
    kind: LayerKind,
    fields: IndexMap<String, ValueWrapper>,
    read_only: IndexSet<String>,
    /// Input port name -> field name.
    input_ports: IndexMap<String, String>,
    /// Output port name -> field name.
    output_ports: IndexMap<String, String>,
}

#[derive(Serialize, Deserialize)]
struct StoredLayer {
    kind: LayerKind,
    fields: IndexMap<String, ValueWrapper>,
}

impl From<Layer> for StoredLayer {
    fn from(layer: Layer) -> Self {
        StoredLayer {
            kind: layer.kind,
            fields: layer.fields,
        }
    }
}

impl TryFrom<StoredLayer> for Layer {
    type Error = LayerError;

    /// Rebuilds the kind's declared layout, then overlays the stored values.
    /// Each stored field must exist with the declared value kind; the
    /// overlaid layer must update cleanly.
    fn try_from(stored: StoredLayer) -> Result<Self, Self::Error> {
        let kind = stored.kind;
        let malformed = |reason: String| LayerError::Malformed {
            kind: kind.name().to_string(),
            reason,
        };

        let mut layer = Layer::new(kind)?;
        if stored.fields.len() != layer.fields.len() {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                layer.fields.len(),
                stored.fields.len()
            )));
        }
        for (name, wrapper) in stored.fields {
            let slot = layer
                .fields
                .get_mut(&name)
                .ok_or_else(|| malformed(format!("unexpected field {name}")))?;
            if slot.kind() != wrapper.kind() {
                return Err(malformed(format!("field {name} has the wrong value kind")));
            }
            *slot = wrapper;
        }
        layer.update()?;
        Ok(layer)
    }
}

impl Layer {
    /// Creates a layer of `kind` with default field values, already updated.
    pub fn new(kind: LayerKind) -> Result<Self, LayerError> {
        let schema = kind.schema().map_err(|source| LayerError::Malformed {
            kind: kind.name().to_string(),
            reason: source.to_string(),
        })?;

        let mut layer = Layer {
            kind,
            fields: schema
                .fields
                .into_iter()
                .map(|(name, wrapper)| (name.to_string(), wrapper))
                .collect(),
            read_only: schema.read_only.iter().map(|f| f.to_string()).collect(),
            input_ports: schema
                .inputs
                .iter()
                .map(|(port, field)| (port.to_string(), field.to_string()))
                .collect(),
            output_ports: schema
                .outputs
                .iter()
                .map(|(port, field)| (port.to_string(), field.to_string()))
                .collect(),
        };
        layer.update()?;

        #[cfg(debug_assertions)]
        layer.assert_consistency();

        Ok(layer)
    }

    /// Creates a layer from a kind's display name.
    pub fn from_name(name: &str) -> Result<Self, LayerError> {
        Self::new(LayerKind::from_name(name)?)
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    // -----------------------------------------------------------------------
    // Layout queries
    // -----------------------------------------------------------------------

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_read_only(&self, field: &str) -> bool {
        self.read_only.contains(field)
    }

    /// Input ports first, then output ports, each in declaration order.
    pub fn port_names(&self) -> impl Iterator<Item = &str> {
        self.input_ports
            .keys()
            .chain(self.output_ports.keys())
            .map(String::as_str)
    }

    /// `(port, field)` pairs of the input ports.
    pub fn input_ports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.input_ports
            .iter()
            .map(|(port, field)| (port.as_str(), field.as_str()))
    }

    /// `(port, field)` pairs of the output ports.
    pub fn output_ports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.output_ports
            .iter()
            .map(|(port, field)| (port.as_str(), field.as_str()))
    }

    pub fn is_input_port(&self, port: &str) -> bool {
        self.input_ports.contains_key(port)
    }

    pub fn is_output_port(&self, port: &str) -> bool {
        self.output_ports.contains_key(port)
    }

    /// The field bound to `port`.
    pub fn field_name_of_port(&self, port: &str) -> Result<&str, LayerError> {
        self.input_ports
            .get(port)
            .or_else(|| self.output_ports.get(port))
            .map(String::as_str)
            .ok_or_else(|| LayerError::UnknownPort {
                port: port.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Field access
    // -----------------------------------------------------------------------

    pub fn field(&self, field: &str) -> Result<&ValueWrapper, LayerError> {
        self.fields.get(field).ok_or_else(|| LayerError::UnknownField {
            field: field.to_string(),
        })
    }

    /// Text form of a field's current value.
    pub fn field_string(&self, field: &str) -> Result<String, LayerError> {
        Ok(self.field(field)?.value_string())
    }

    /// Checks whether `text` would be accepted by the field, without setting
    /// it. Read-only status is not considered here.
    pub fn validate_field_str(&self, field: &str, text: &str) -> Result<(), LayerError> {
        self.field(field)?
            .validate_str(text)
            .map_err(|source| LayerError::field(field, source))
    }

    /// Sets a user-editable field from its text form.
    pub fn set_field_from_str(&mut self, field: &str, text: &str) -> Result<(), LayerError> {
        if self.is_read_only(field) {
            return Err(LayerError::ReadOnlyField {
                field: field.to_string(),
            });
        }
        let wrapper = self
            .fields
            .get_mut(field)
            .ok_or_else(|| LayerError::UnknownField {
                field: field.to_string(),
            })?;
        wrapper
            .set_from_str(text)
            .map_err(|source| LayerError::field(field, source))
    }

    /// Writes any field, read-only or not. This is the path propagation uses
    /// to push upstream values in.
    pub fn assign_field(&mut self, field: &str, value: &Value) -> Result<(), LayerError> {
        let wrapper = self
            .fields
            .get_mut(field)
            .ok_or_else(|| LayerError::UnknownField {
                field: field.to_string(),
            })?;
        wrapper
            .set(value.clone())
            .map_err(|source| LayerError::field(field, source))
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Recomputes every read-only field from the current inputs.
    ///
    /// All-or-nothing: outputs are computed and validated before any is
    /// written, so on error the layer is unchanged. Idempotent.
    pub fn update(&mut self) -> Result<(), LayerError> {
        let outputs = self.kind.compute(&Fields(&self.fields))?;

        let mut staged = Vec::with_capacity(outputs.len());
        for (name, value) in outputs {
            let wrapper = self.field(name)?;
            if let Err(err) = wrapper.validate(&value) {
                let reason = format!(
                    "Could not set {name} to {}: {err}",
                    layerforge_core::stringify(&value)
                );
                trace!(kind = %self.kind, %reason, "layer update rejected");
                return Err(LayerError::update(reason));
            }
            staged.push((name, value));
        }

        for (name, value) in staged {
            if let Some(wrapper) = self.fields.get_mut(name) {
                wrapper.set(value).map_err(|source| LayerError::field(name, source))?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Debug consistency assertion
    // -----------------------------------------------------------------------

    /// Asserts that every read-only field and every port binding names a
    /// declared field.
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        for field in &self.read_only {
            assert!(self.fields.contains_key(field), "read-only field {field} is undeclared");
        }
        for (port, field) in self.input_ports.iter().chain(&self.output_ports) {
            assert!(
                self.fields.contains_key(field),
                "port {port} is bound to undeclared field {field}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn every_kind_builds_consistently() {
        for kind in LayerKind::ALL {
            let layer = Layer::new(kind).unwrap();
            for (_, field) in layer.input_ports().chain(layer.output_ports()) {
                assert!(layer.has_field(field));
            }
            let mut again = layer.clone();
            again.update().unwrap();
            assert_eq!(again, layer, "update is not idempotent for {kind}");
        }
    }

    #[test]
    fn port_lookup() {
        let layer = Layer::from_name("Add").unwrap();
        assert_eq!(
            layer.port_names().collect::<Vec<_>>(),
            vec!["first_input_shape_port", "second_input_shape_port", "output_shape_port"]
        );
        assert!(layer.is_input_port("second_input_shape_port"));
        assert!(layer.is_output_port("output_shape_port"));
        assert_eq!(layer.field_name_of_port("output_shape_port").unwrap(), "output_shape");
        assert!(matches!(
            layer.field_name_of_port("nope"),
            Err(LayerError::UnknownPort { .. })
        ));
    }

    #[test]
    fn read_only_fields_reject_text_sets_but_accept_assignment() {
        let mut layer = Layer::new(LayerKind::Reshape).unwrap();
        assert!(matches!(
            layer.set_field_from_str("output_shape", "(1)"),
            Err(LayerError::ReadOnlyField { .. })
        ));
        layer.assign_field("output_shape", &Value::shape([1])).unwrap();
        assert_eq!(layer.field_string("output_shape").unwrap(), "(1)");
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut layer = Layer::new(LayerKind::Dense).unwrap();
        assert!(matches!(layer.field("bias"), Err(LayerError::UnknownField { .. })));
        assert!(matches!(
            layer.set_field_from_str("bias", "1"),
            Err(LayerError::UnknownField { .. })
        ));
        assert!(matches!(
            layer.validate_field_str("bias", "1"),
            Err(LayerError::UnknownField { .. })
        ));
    }

    #[test]
    fn clones_are_independent() {
        let layer = Layer::new(LayerKind::RepeatInt).unwrap();
        let mut clone = layer.clone();
        clone.set_field_from_str("inputInt", "5").unwrap();
        assert_eq!(layer.field_string("inputInt").unwrap(), "0");
    }

    #[test]
    fn serde_roundtrip_restores_layout() {
        let mut layer = Layer::new(LayerKind::Conv2D).unwrap();
        layer.set_field_from_str("filters", "8").unwrap();
        layer.update().unwrap();

        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layer);
        assert!(back.is_read_only("output_shape"));
        assert_eq!(back.field_name_of_port("input_port").unwrap(), "input_shape");
    }

    #[test]
    fn stored_layers_with_foreign_fields_are_rejected() {
        let mut value = serde_json::to_value(Layer::new(LayerKind::Input).unwrap()).unwrap();
        let fields = value["fields"].as_object_mut().unwrap();
        let shape = fields["output_shape"].clone();
        fields.insert("extra".into(), shape);
        let err = serde_json::from_value::<Layer>(value).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn stored_layers_that_fail_to_update_are_rejected() {
        let mut layer = Layer::new(LayerKind::Add).unwrap();
        // bypass update to build an inconsistent stored form
        layer.assign_field("first_input_shape", &Value::shape([2])).unwrap();
        let json = serde_json::to_string(&layer).unwrap();
        assert!(serde_json::from_str::<Layer>(&json).is_err());
    }

    proptest! {
        #[test]
        fn reshape_update_is_all_or_nothing(
            input in prop::collection::vec(1i64..6, 1..4),
            target in prop::collection::vec(1i64..6, 1..4),
        ) {
            let mut layer = Layer::new(LayerKind::Reshape).unwrap();
            layer.assign_field("input_shape", &Value::from(input.clone())).unwrap();
            layer.assign_field("target_shape", &Value::from(target.clone())).unwrap();
            let before = layer.clone();
            let agrees = input.iter().product::<i64>() == target.iter().product::<i64>();
            match layer.update() {
                Ok(()) => {
                    prop_assert!(agrees);
                    prop_assert_eq!(layer.field("output_shape").unwrap().value(), &Value::from(target));
                }
                Err(_) => {
                    prop_assert!(!agrees);
                    prop_assert_eq!(layer, before);
                }
            }
        }
    }
}
