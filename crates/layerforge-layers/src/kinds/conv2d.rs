//! `Conv2D`: 2D convolution over a channels-last `(height, width, channels)`
//! input.
//!
//! Output spatial size per axis, for input `n`, kernel `k` and stride `s`:
//!
//! - `valid`: `floor((n - k) / s) + 1`, defined only when `n >= k`
//! - `same`:  `ceil(n / s)`
//!
//! The output channel count is `filters`.

use layerforge_core::{CoreError, Value, ValueWrapper};

use super::{activation, Fields, LayerSchema, Outputs};
use crate::error::LayerError;

pub(crate) fn schema() -> Result<LayerSchema, CoreError> {
    Ok(LayerSchema {
        fields: vec![
            ("input_shape", ValueWrapper::shape_with_dims([100, 100, 3], 3, 3)?),
            ("kernel_size", ValueWrapper::shape_with_dims([3, 3], 2, 2)?),
            ("strides", ValueWrapper::shape_with_dims([1, 1], 2, 2)?),
            ("padding", ValueWrapper::enumeration(["same", "valid"], "same")?),
            ("filters", ValueWrapper::int_at_least(1, 3)?),
            ("activation", activation()?),
            ("output_shape", ValueWrapper::shape([100, 100, 3])?),
        ],
        read_only: &["output_shape"],
        inputs: &[("input_port", "input_shape")],
        outputs: &[("output_port", "output_shape")],
    })
}

pub(crate) fn compute(fields: &Fields<'_>) -> Result<Outputs, LayerError> {
    let input = fields.shape("input_shape")?;
    let kernel = fields.shape("kernel_size")?;
    let strides = fields.shape("strides")?;
    let padding = fields.text("padding")?;
    let filters = fields.int("filters")?;

    let (&[height, width, _], &[kh, kw], &[sh, sw]) = (input, kernel, strides) else {
        return Err(LayerError::update(
            "Conv2D expects a 3 dimensional input, a 2 dimensional kernel and 2 strides",
        ));
    };

    let out_height = output_size(height, kh, sh, padding)?;
    let out_width = output_size(width, kw, sw, padding)?;
    Ok(vec![(
        "output_shape",
        Value::from(vec![out_height, out_width, filters]),
    )])
}

fn output_size(size: i64, kernel: i64, stride: i64, padding: &str) -> Result<i64, LayerError> {
    match padding {
        "valid" => {
            if size < kernel {
                return Err(LayerError::update(format!(
                    "Kernel size {kernel} is larger than the input size {size} with valid padding"
                )));
            }
            Ok((size - kernel) / stride + 1)
        }
        // size >= 1, so this is ceil(size / stride) without overflow
        "same" => Ok((size - 1) / stride + 1),
        other => Err(LayerError::update(format!("Unknown padding {other}"))),
    }
}
