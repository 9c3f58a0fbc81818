//! `Dense`: a fully connected layer acting on the last dimension.

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{activation, Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("input_shape", ValueWrapper::shape([100])?),
            ("units", ValueWrapper::int_at_least(1, 100)?),
            ("activation", activation()?),
            ("output_shape", ValueWrapper::shape([100])?),
        ],
        read_only: &["output_shape"],
        inputs: &[("input_shape_port", "input_shape")],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

/// The input shape with its last dimension replaced by `units`.
pub(crate) fn compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let input = fields.shape("input_shape")?;
    let units = fields.int("units")?;

    let mut output = input.to_vec();
    match output.last_mut() {
        Some(last) => *last = units,
        None => return Err(LayerError::update("Input shape must have at least one dimension")),
    }
    Ok(vec![("output_shape", Value::from(output))])
}

#[cfg(test)]
mod tests {
    use crate::{Layer, LayerError, LayerKind};

    #[test]
    fn replaces_the_last_dimension() {
        let mut dense = Layer::new(LayerKind::Dense).unwrap();
        dense.set_field_from_str("input_shape", "(32, 64)").unwrap();
        dense.set_field_from_str("units", "10").unwrap();
        dense.update().unwrap();
        assert_eq!(dense.field_string("output_shape").unwrap(), "(32, 10)");
    }

    #[test]
    fn units_must_be_positive() {
        let mut dense = Layer::new(LayerKind::Dense).unwrap();
        let err = dense.set_field_from_str("units", "0").unwrap_err();
        assert!(matches!(err, LayerError::Field { .. }));
        assert_eq!(dense.field_string("units").unwrap(), "100");
    }

    #[test]
    fn activation_is_restricted() {
        let mut dense = Layer::new(LayerKind::Dense).unwrap();
        dense.set_field_from_str("activation", "relu").unwrap();
        let err = dense.set_field_from_str("activation", "swish").unwrap_err();
        assert!(err.to_string().starts_with("Value must be one of these values: linear"));
    }
}
