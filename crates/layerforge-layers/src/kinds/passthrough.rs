//! Kinds whose output is a copy of their single input: `Activation` (shape)
//! and `Repeat Int` (integer).

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{activation, Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn activation_schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("input_shape", ValueWrapper::shape([244, 244, 3])?),
            ("activation", activation()?),
            ("output_shape", ValueWrapper::shape([244, 244, 3])?),
        ],
        read_only: &["output_shape"],
        inputs: &[("input_shape_port", "input_shape")],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

pub(crate) fn activation_compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let input = fields.shape("input_shape")?;
    Ok(vec![("output_shape", Value::from(input.to_vec()))])
}

pub(crate) fn repeat_int_schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("inputInt", ValueWrapper::int(0)?),
            ("outputInt", ValueWrapper::int(0)?),
        ],
        read_only: &["outputInt"],
        inputs: &[("input_port", "inputInt")],
        outputs: &[("output_port", "outputInt")],
    })
}

pub(crate) fn repeat_int_compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    Ok(vec![("outputInt", Value::Int(fields.int("inputInt")?))])
}

#[cfg(test)]
mod tests {
    use crate::{Layer, LayerError, LayerKind};

    #[test]
    fn repeat_int_copies_its_input() {
        let mut repeat = Layer::new(LayerKind::RepeatInt).unwrap();
        repeat.set_field_from_str("inputInt", "-7").unwrap();
        repeat.update().unwrap();
        assert_eq!(repeat.field_string("outputInt").unwrap(), "-7");
        assert!(matches!(
            repeat.set_field_from_str("outputInt", "3"),
            Err(LayerError::ReadOnlyField { .. })
        ));
    }

    #[test]
    fn activation_keeps_the_shape() {
        let mut act = Layer::new(LayerKind::Activation).unwrap();
        act.set_field_from_str("input_shape", "(10, 3)").unwrap();
        act.set_field_from_str("activation", "tanh").unwrap();
        act.update().unwrap();
        assert_eq!(act.field_string("output_shape").unwrap(), "(10, 3)");
    }
}
