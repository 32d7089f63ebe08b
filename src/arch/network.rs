use log::trace;
use ndarray::{Array1, ArrayView1, ArrayView2};

use super::activations::ActivationMode;
use crate::{
    classify::{self, Label, TruthTableReport},
    gradient::{self, Gradient},
    param_id::ParamId,
    params::{InputVector, NetworkParams},
};

/// Every intermediate value of one forward pass.
///
/// Always recomputed from the current parameters, never stored alongside them.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardPass {
    /// Hidden pre-activations `z1`.
    pub hidden_z: Array1<f64>,
    /// Hidden activations `a`.
    pub hidden: Array1<f64>,
    /// Output pre-activations `z2`.
    pub output_z: Array1<f64>,
    /// Outputs `y`.
    pub outputs: Array1<f64>,
}

impl ForwardPass {
    pub fn y1(&self) -> f64 {
        self.outputs[0]
    }

    pub fn y2(&self) -> f64 {
        self.outputs[1]
    }
}

/// Computes `x·W + b` for a single sample, `w` being `(dim_in, dim_out)`.
fn dense(x: ArrayView1<f64>, w: ArrayView2<f64>, b: Option<ArrayView1<f64>>) -> Array1<f64> {
    let z = x.dot(&w);

    match b {
        Some(b) => z + b,
        None => z,
    }
}

/// Runs the forward pass of the 2-3-2 network.
///
/// Any finite values are accepted, there is no range validation.
pub fn evaluate(inputs: &InputVector, params: &NetworkParams, mode: ActivationMode) -> ForwardPass {
    let x = inputs.to_array();

    let biases1 = params.biases1.as_ref().map(|b| b.view());
    let hidden_z = dense(x.view(), params.weights1.view(), biases1);
    let hidden = hidden_z.mapv(|z| mode.f(z));

    let biases2 = params.biases2.as_ref().map(|b| b.view());
    let output_z = dense(hidden.view(), params.weights2.view(), biases2);
    let outputs = output_z.mapv(|z| mode.f(z));

    trace!("forward pass {inputs:?} ({mode:?}): a = {hidden}, y = {outputs}");

    ForwardPass {
        hidden_z,
        hidden,
        output_z,
        outputs,
    }
}

/// A network configuration: the activation mode plus every weight and bias.
///
/// Editing returns a new `Network`; every query recomputes from scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    mode: ActivationMode,
    params: NetworkParams,
}

impl Network {
    pub fn new(mode: ActivationMode, params: NetworkParams) -> Self {
        Self { mode, params }
    }

    pub fn mode(&self) -> ActivationMode {
        self.mode
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn with_param(self, param: ParamId, value: f64) -> Self {
        Self {
            params: self.params.with(param, value),
            ..self
        }
    }

    pub fn with_param_text(self, param: ParamId, text: &str) -> Self {
        Self {
            params: self.params.with_text(param, text),
            ..self
        }
    }

    pub fn evaluate(&self, inputs: &InputVector) -> ForwardPass {
        evaluate(inputs, &self.params, self.mode)
    }

    /// Evaluates `inputs` and returns the partial derivatives of both outputs
    /// with respect to `param`.
    pub fn gradient(&self, param: ParamId, inputs: &InputVector) -> Gradient {
        let forward = self.evaluate(inputs);
        gradient::gradient(param, inputs, &self.params, &forward, self.mode)
    }

    pub fn classify(&self, inputs: &InputVector) -> Label {
        classify::classify(inputs, &self.params, self.mode)
    }

    pub fn truth_table(&self) -> TruthTableReport {
        classify::truth_table(&self.params, self.mode)
    }
}
