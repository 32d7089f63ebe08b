//! Closed-form partial derivatives of the outputs with respect to one parameter.
//!
//! The chain rule is expanded by hand for the fixed 2-3-2 topology. Changing
//! the number of layers or hidden units requires rederiving these formulas.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::{
    arch::{activations::ActivationMode, ForwardPass},
    param_id::ParamId,
    params::{InputVector, NetworkParams, N_OUTPUTS},
};

/// Which way an output moves when the parameter increases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Increase,
    Decrease,
}

impl Effect {
    /// `Increase` iff `derivative > 0`.
    pub fn of(derivative: f64) -> Self {
        if derivative > 0. {
            Effect::Increase
        } else {
            Effect::Decrease
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Increase => write!(f, "increase"),
            Effect::Decrease => write!(f, "decrease"),
        }
    }
}

/// The derivative of one output plus the factors it was built from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partial {
    pub derivative: f64,
    /// The chain rule product, e.g. `y1(1-y1) * W(2)_12 * a2(1-a2) * x1`.
    pub formula: String,
    /// Named factors of `formula`, in order.
    pub components: Vec<(&'static str, f64)>,
    pub effect: Effect,
}

/// Partial derivatives of `y1` and `y2`, `None` for an output the parameter
/// cannot reach.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Gradient {
    pub y1: Option<Partial>,
    pub y2: Option<Partial>,
}

impl Gradient {
    /// The partial of output `k` (0-based).
    pub fn output(&self, k: usize) -> Option<&Partial> {
        match k {
            0 => self.y1.as_ref(),
            1 => self.y2.as_ref(),
            _ => None,
        }
    }
}

struct Factor {
    name: &'static str,
    symbol: String,
    value: f64,
}

/// Accumulates the chain rule factors of one partial.
struct Chain {
    mode: ActivationMode,
    factors: Vec<Factor>,
}

impl Chain {
    fn new(mode: ActivationMode) -> Self {
        Self {
            mode,
            factors: Vec::with_capacity(4),
        }
    }

    fn factor(mut self, name: &'static str, symbol: String, value: f64) -> Self {
        self.factors.push(Factor {
            name,
            symbol,
            value,
        });
        self
    }

    /// A local activation derivative, identically `1` in identity mode and
    /// therefore left out of the formula.
    fn local(self, name: &'static str, unit: String, activated: f64) -> Self {
        match self.mode {
            ActivationMode::Identity => self,
            ActivationMode::Sigmoid => {
                let value = self.mode.df_from_output(activated);
                self.factor(name, format!("{unit}(1-{unit})"), value)
            }
        }
    }

    fn finish(self) -> Partial {
        let derivative = self.factors.iter().map(|f| f.value).product();
        let formula = if self.factors.is_empty() {
            "1".to_string()
        } else {
            self.factors
                .iter()
                .map(|f| f.symbol.as_str())
                .collect::<Vec<_>>()
                .join(" * ")
        };
        let components = self.factors.iter().map(|f| (f.name, f.value)).collect();

        Partial {
            derivative,
            formula,
            components,
            effect: Effect::of(derivative),
        }
    }
}

/// Computes `∂y_k/∂param` for both outputs.
///
/// `forward` must be the result of evaluating `inputs` with `params` and `mode`.
pub fn gradient(
    param: ParamId,
    inputs: &InputVector,
    params: &NetworkParams,
    forward: &ForwardPass,
    mode: ActivationMode,
) -> Gradient {
    let y = |k: usize| forward.outputs[k];
    let a = |j: usize| forward.hidden[j];

    let output_chain = |k: usize| Chain::new(mode).local("output_grad", format!("y{}", k + 1), y(k));

    let through_hidden = |j: usize, k: usize| {
        output_chain(k)
            .factor(
                "weight2",
                format!("W(2)_{}{}", k + 1, j + 1),
                params.weights2.get(j, k),
            )
            .local("hidden_grad", format!("a{}", j + 1), a(j))
    };

    let mut partials: [Option<Partial>; N_OUTPUTS] = [None, None];

    match param {
        ParamId::Weight2 { hidden: j, output: k } => {
            let chain = output_chain(k).factor("hidden", format!("a{}", j + 1), a(j));
            partials[k] = Some(chain.finish());
        }
        ParamId::Weight1 { input: i, hidden: j } => {
            for (k, partial) in partials.iter_mut().enumerate() {
                let chain = through_hidden(j, k).factor("input", format!("x{}", i + 1), inputs.get(i));
                *partial = Some(chain.finish());
            }
        }
        ParamId::Bias2 { output: k } => {
            partials[k] = Some(output_chain(k).finish());
        }
        ParamId::Bias1 { hidden: j } => {
            for (k, partial) in partials.iter_mut().enumerate() {
                *partial = Some(through_hidden(j, k).finish());
            }
        }
    }

    let [y1, y2] = partials;
    debug!(
        "d/d{param}: y1 = {:?}, y2 = {:?}",
        y1.as_ref().map(|p| p.derivative),
        y2.as_ref().map(|p| p.derivative)
    );

    Gradient { y1, y2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::evaluate,
        params::{Biases, Weights},
    };

    fn params() -> NetworkParams {
        NetworkParams::new(
            Weights::new([[0.5, -1., 2.], [1.5, 0.25, -0.5]]),
            Weights::new([[1., -2.], [3., 0.5], [-1., 4.]]),
        )
        .with_biases(Biases::new([0.1, -0.2, 0.3]), Biases::new([-0.4, 0.6]))
    }

    fn query(param: ParamId, mode: ActivationMode) -> (ForwardPass, Gradient) {
        let inputs = InputVector::new(0.8, -0.3);
        let params = params();
        let forward = evaluate(&inputs, &params, mode);
        let gradient = gradient(param, &inputs, &params, &forward, mode);
        (forward, gradient)
    }

    #[test]
    fn test_weight2_gradient_is_the_hidden_activation_in_identity_mode() {
        for j in 0..3 {
            for k in 0..2 {
                let param = ParamId::Weight2 { hidden: j, output: k };
                let (forward, gradient) = query(param, ActivationMode::Identity);

                let partial = gradient.output(k).unwrap();
                assert_eq!(partial.derivative, forward.hidden[j]);
                assert!(gradient.output(1 - k).is_none());
            }
        }
    }

    #[test]
    fn test_weight2_gradient_in_sigmoid_mode() {
        let param = ParamId::Weight2 { hidden: 2, output: 1 };
        let (forward, gradient) = query(param, ActivationMode::Sigmoid);

        let y2 = forward.y2();
        let partial = gradient.y2.unwrap();
        assert_eq!(partial.derivative, y2 * (1. - y2) * forward.hidden[2]);
        assert_eq!(partial.formula, "y2(1-y2) * a3");
        assert_eq!(
            partial.components,
            vec![("output_grad", y2 * (1. - y2)), ("hidden", forward.hidden[2])]
        );
        assert!(gradient.y1.is_none());
    }

    #[test]
    fn test_weight1_gradient_reaches_both_outputs() {
        let param = ParamId::Weight1 { input: 1, hidden: 0 };
        let (forward, gradient) = query(param, ActivationMode::Sigmoid);

        let a1 = forward.hidden[0];
        for k in 0..2 {
            let y = forward.outputs[k];
            let w2 = params().weights2.get(0, k);
            let expected = (y * (1. - y)) * w2 * (a1 * (1. - a1)) * -0.3;
            assert_eq!(gradient.output(k).unwrap().derivative, expected);
        }

        assert_eq!(
            gradient.y1.unwrap().formula,
            "y1(1-y1) * W(2)_11 * a1(1-a1) * x2"
        );
        assert_eq!(gradient.y2.unwrap().formula, "y2(1-y2) * W(2)_21 * a1(1-a1) * x2");
    }

    #[test]
    fn test_weight1_gradient_in_identity_mode() {
        let param = ParamId::Weight1 { input: 0, hidden: 2 };
        let (_, gradient) = query(param, ActivationMode::Identity);

        let y1 = gradient.y1.unwrap();
        assert_eq!(y1.derivative, -1. * 0.8);
        assert_eq!(y1.formula, "W(2)_13 * x1");
        assert_eq!(y1.effect, Effect::Decrease);

        let y2 = gradient.y2.unwrap();
        assert_eq!(y2.derivative, 4. * 0.8);
        assert_eq!(y2.effect, Effect::Increase);
    }

    #[test]
    fn test_output_bias_gradient() {
        let (_, gradient) = query(ParamId::Bias2 { output: 0 }, ActivationMode::Identity);
        let partial = gradient.y1.unwrap();
        assert_eq!(partial.derivative, 1.);
        assert_eq!(partial.formula, "1");
        assert!(partial.components.is_empty());
        assert!(gradient.y2.is_none());

        let (forward, gradient) = query(ParamId::Bias2 { output: 1 }, ActivationMode::Sigmoid);
        let y2 = forward.y2();
        assert_eq!(gradient.y2.unwrap().derivative, y2 * (1. - y2));
        assert!(gradient.y1.is_none());
    }

    #[test]
    fn test_hidden_bias_gradient() {
        let (forward, gradient) = query(ParamId::Bias1 { hidden: 1 }, ActivationMode::Sigmoid);

        let a2 = forward.hidden[1];
        for k in 0..2 {
            let y = forward.outputs[k];
            let w2 = params().weights2.get(1, k);
            let partial = gradient.output(k).unwrap();
            assert_eq!(partial.derivative, (y * (1. - y)) * w2 * (a2 * (1. - a2)));
            assert_eq!(partial.components.len(), 3);
        }
    }

    #[test]
    fn test_effect_follows_the_sign() {
        assert_eq!(Effect::of(0.001), Effect::Increase);
        assert_eq!(Effect::of(0.), Effect::Decrease);
        assert_eq!(Effect::of(-2.), Effect::Decrease);

        for param in ParamId::all() {
            for mode in [ActivationMode::Identity, ActivationMode::Sigmoid] {
                let (_, gradient) = query(param, mode);
                for partial in [gradient.y1, gradient.y2].into_iter().flatten() {
                    assert_eq!(
                        partial.effect == Effect::Increase,
                        partial.derivative > 0.,
                        "{param} ({mode:?})"
                    );
                }
            }
        }
    }
}
