//! `Input` and `Output`: the graph's sources and sinks.
//!
//! Neither has a computed field. An `Input` exposes its shape on an output
//! port and an `Output` accepts one on an input port.

use layerforge_core::{CoreError, ValueWrapper};

use super::LayerSchema;

pub(crate) fn input_schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![("output_shape", ValueWrapper::shape([244, 244, 3])?)],
        read_only: &[],
        inputs: &[],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

pub(crate) fn output_schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![("input_shape", ValueWrapper::shape([244, 244, 3])?)],
        read_only: &[],
        inputs: &[("input_shape_port", "input_shape")],
        outputs: &[],
    })
}

#[cfg(test)]
mod tests {
    use crate::{Layer, LayerKind};

    #[test]
    fn input_shape_is_user_editable() {
        let mut input = Layer::new(LayerKind::Input).unwrap();
        assert!(!input.is_read_only("output_shape"));
        input.set_field_from_str("output_shape", "(28, 28, 1)").unwrap();
        assert_eq!(input.field_string("output_shape").unwrap(), "(28, 28, 1)");
        assert_eq!(input.port_names().collect::<Vec<_>>(), vec!["output_shape_port"]);
    }

    #[test]
    fn output_has_a_single_input_port() {
        let output = Layer::new(LayerKind::Output).unwrap();
        assert!(output.is_input_port("input_shape_port"));
        assert_eq!(output.field_name_of_port("input_shape_port").unwrap(), "input_shape");
        assert_eq!(output.output_ports().count(), 0);
    }
}
