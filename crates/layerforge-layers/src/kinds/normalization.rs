//! `BatchNormalization`: normalizes along one axis; the shape passes through.

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("input_shape", ValueWrapper::shape([244, 244, 3])?),
            ("axis", ValueWrapper::int(1)?),
            ("momentum", ValueWrapper::float(0.99)?),
            ("epsilon", ValueWrapper::float(0.001)?),
            ("center", ValueWrapper::boolean(true)?),
            ("scale", ValueWrapper::boolean(true)?),
            ("output_shape", ValueWrapper::shape([244, 244, 3])?),
        ],
        read_only: &["output_shape"],
        inputs: &[("input_shape_port", "input_shape")],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

/// Checks the hyperparameters against the input, then passes the shape
/// through. Negative axes count from the end.
pub(crate) fn compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let input = fields.shape("input_shape")?;
    let axis = fields.int("axis")?;
    let momentum = fields.float("momentum")?;
    let epsilon = fields.float("epsilon")?;

    let rank = input.len() as i64;
    if axis < -rank || axis >= rank {
        return Err(LayerError::update(format!(
            "Axis {axis} is out of range for an input with {rank} dimensions"
        )));
    }
    if !(0.0..=1.0).contains(&momentum) {
        return Err(LayerError::update("Momentum must be between 0 and 1"));
    }
    if epsilon <= 0.0 {
        return Err(LayerError::update("Epsilon must be greater than 0"));
    }
    Ok(vec![("output_shape", Value::from(input.to_vec()))])
}

#[cfg(test)]
mod tests {
    use layerforge_core::Value;

    use crate::{Layer, LayerKind};

    #[test]
    fn shape_passes_through() {
        let mut bn = Layer::new(LayerKind::BatchNormalization).unwrap();
        bn.assign_field("input_shape", &Value::shape([16, 16, 8])).unwrap();
        bn.set_field_from_str("axis", "-1").unwrap();
        bn.update().unwrap();
        assert_eq!(bn.field_string("output_shape").unwrap(), "(16, 16, 8)");
    }

    #[test]
    fn axis_must_fit_the_rank() {
        let mut bn = Layer::new(LayerKind::BatchNormalization).unwrap();
        bn.assign_field("input_shape", &Value::shape([10])).unwrap();
        let err = bn.update().unwrap_err();
        assert_eq!(err.to_string(), "Axis 1 is out of range for an input with 1 dimensions");
    }

    #[test]
    fn hyperparameter_bounds() {
        let mut bn = Layer::new(LayerKind::BatchNormalization).unwrap();
        bn.set_field_from_str("momentum", "1.5").unwrap();
        assert!(bn.update().is_err());
        bn.set_field_from_str("momentum", "0.5").unwrap();
        bn.set_field_from_str("epsilon", "0").unwrap();
        assert!(bn.update().is_err());
        bn.set_field_from_str("epsilon", "1e-5").unwrap();
        bn.update().unwrap();
        assert_eq!(bn.field_string("center").unwrap(), "true");
    }
}
