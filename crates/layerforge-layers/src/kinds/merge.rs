//! `Add`: element-wise sum of two tensors of the same shape.

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("first_input_shape", ValueWrapper::shape([244, 244, 3])?),
            ("second_input_shape", ValueWrapper::shape([244, 244, 3])?),
            ("output_shape", ValueWrapper::shape([244, 244, 3])?),
        ],
        read_only: &["output_shape"],
        inputs: &[
            ("first_input_shape_port", "first_input_shape"),
            ("second_input_shape_port", "second_input_shape"),
        ],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

pub(crate) fn compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let first = fields.shape("first_input_shape")?;
    let second = fields.shape("second_input_shape")?;
    if first != second {
        return Err(LayerError::update("The input shapes to add layer must agree"));
    }
    Ok(vec![("output_shape", Value::from(first.to_vec()))])
}
