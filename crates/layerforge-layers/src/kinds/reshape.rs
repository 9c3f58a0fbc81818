//! `Reshape`: reinterprets the input under a new shape with the same number
//! of elements.

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("input_shape", ValueWrapper::shape([244, 244, 3])?),
            ("target_shape", ValueWrapper::shape([244, 244, 3])?),
            ("output_shape", ValueWrapper::shape([244, 244, 3])?),
        ],
        read_only: &["output_shape"],
        inputs: &[("input_shape_port", "input_shape")],
        outputs: &[("output_shape_port", "output_shape")],
    })
}

pub(crate) fn compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let input = fields.shape("input_shape")?;
    let target = fields.shape("target_shape")?;

    let input_count = element_count(input)?;
    let target_count = element_count(target)?;
    if input_count != target_count {
        return Err(LayerError::update(format!(
            "The products of the input shape ({input_count}) and the target shape ({target_count}) must be the same."
        )));
    }
    Ok(vec![("output_shape", Value::from(target.to_vec()))])
}

fn element_count(dims: &[i64]) -> Result<u128, LayerError> {
    dims.iter()
        .try_fold(1u128, |acc, &dim| acc.checked_mul(u128::try_from(dim).ok()?))
        .ok_or_else(|| LayerError::update("Shape has too many elements"))
}

#[cfg(test)]
mod tests {
    use layerforge_core::Value;

    use crate::{Layer, LayerKind};

    #[test]
    fn flattens_when_counts_agree() {
        let mut reshape = Layer::new(LayerKind::Reshape).unwrap();
        reshape.assign_field("input_shape", &Value::shape([4, 4, 3])).unwrap();
        reshape.set_field_from_str("target_shape", "(48)").unwrap();
        reshape.update().unwrap();
        assert_eq!(reshape.field_string("output_shape").unwrap(), "(48)");
    }

    #[test]
    fn rejects_mismatched_counts() {
        let mut reshape = Layer::new(LayerKind::Reshape).unwrap();
        reshape.assign_field("input_shape", &Value::shape([4, 4, 4])).unwrap();
        reshape.set_field_from_str("target_shape", "(48)").unwrap();
        let err = reshape.update().unwrap_err();
        assert_eq!(
            err.to_string(),
            "The products of the input shape (64) and the target shape (48) must be the same."
        );
        assert_eq!(reshape.field_string("output_shape").unwrap(), "(244, 244, 3)");
    }
}
