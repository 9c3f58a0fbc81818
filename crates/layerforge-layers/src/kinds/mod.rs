//! Per-kind field declarations and update rules.
//!
//! Each submodule contributes two functions for its kinds:
//!
//! - `schema()` declares the fields (with default values), the read-only
//!   subset and the input/output port bindings.
//! - `compute(&Fields)` derives the read-only fields from the current inputs
//!   without touching the layer. [`Layer::update`](crate::Layer::update)
//!   validates and commits the result.
//!
//! Dispatch from [`LayerKind`] to the submodules lives here.

mod conv2d;
mod dense;
mod io;
mod merge;
mod normalization;
mod passthrough;
mod reshape;

use indexmap::IndexMap;
use layerforge_core::{CoreError, Value, ValueWrapper};

use crate::error::LayerError;
use crate::kind::LayerKind;

/// Values accepted by every `activation` field.
pub const ACTIVATIONS: &[&str] = &["linear", "relu", "sigmoid", "tanh", "softmax", "elu"];

/// Default for `activation` fields.
pub const DEFAULT_ACTIVATION: &str = "linear";

pub(crate) fn activation() -> Result<ValueWrapper, CoreError> {
    ValueWrapper::enumeration(ACTIVATIONS.iter().copied(), DEFAULT_ACTIVATION)
}

/// Static description of a layer kind.
pub(crate) struct LayerSchema {
    pub fields: Vec<(&'static str, ValueWrapper)>,
    pub read_only: &'static [&'static str],
    /// `(port, field)` pairs.
    pub inputs: &'static [(&'static str, &'static str)],
    pub outputs: &'static [(&'static str, &'static str)],
}

/// New values for read-only fields, in declaration order.
pub(crate) type Outputs = Vec<(&'static str, Value)>;

/// Typed read access to a layer's fields while computing outputs.
pub(crate) struct Fields<'a>(pub &'a IndexMap<String, ValueWrapper>);

impl Fields<'_> {
    fn get(&self, name: &str) -> Result<&Value, LayerError> {
        self.0
            .get(name)
            .map(ValueWrapper::value)
            .ok_or_else(|| LayerError::UnknownField {
                field: name.to_string(),
            })
    }

    pub fn shape(&self, name: &str) -> Result<&[i64], LayerError> {
        self.get(name)?
            .as_shape()
            .ok_or_else(|| LayerError::update(format!("Field {name} does not hold a shape")))
    }

    pub fn int(&self, name: &str) -> Result<i64, LayerError> {
        self.get(name)?
            .as_int()
            .ok_or_else(|| LayerError::update(format!("Field {name} does not hold an integer")))
    }

    pub fn float(&self, name: &str) -> Result<f64, LayerError> {
        self.get(name)?
            .as_float()
            .ok_or_else(|| LayerError::update(format!("Field {name} does not hold a number")))
    }

    pub fn text(&self, name: &str) -> Result<&str, LayerError> {
        self.get(name)?
            .as_text()
            .ok_or_else(|| LayerError::update(format!("Field {name} does not hold text")))
    }
}

impl LayerKind {
    pub(crate) fn schema(self) -> Result<LayerSchema, CoreError> {
        match self {
            LayerKind::Input => io::input_schema(),
            LayerKind::Output => io::output_schema(),
            LayerKind::Dense => dense::schema(),
            LayerKind::Conv2D => conv2d::schema(),
            LayerKind::Add => merge::schema(),
            LayerKind::Reshape => reshape::schema(),
            LayerKind::Activation => passthrough::activation_schema(),
            LayerKind::BatchNormalization => normalization::schema(),
            LayerKind::RepeatInt => passthrough::repeat_int_schema(),
        }
    }

    pub(crate) fn compute(self, fields: &Fields<'_>) -> Result<Outputs, LayerError> {
        match self {
            LayerKind::Input | LayerKind::Output => Ok(Vec::new()),
            LayerKind::Dense => dense::compute(fields),
            LayerKind::Conv2D => conv2d::compute(fields),
            LayerKind::Add => merge::compute(fields),
            LayerKind::Reshape => reshape::compute(fields),
            LayerKind::Activation => passthrough::activation_compute(fields),
            LayerKind::BatchNormalization => normalization::compute(fields),
            LayerKind::RepeatInt => passthrough::repeat_int_compute(fields),
        }
    }
}
