use serde::{Deserialize, Serialize};

/// Selects whether the hidden and output layers apply a nonlinearity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Plain linear combination.
    Identity,
    #[default]
    Sigmoid,
}

impl ActivationMode {
    pub fn f(&self, z: f64) -> f64 {
        match self {
            Self::Identity => z,
            Self::Sigmoid => super::Sigmoid.f(z),
        }
    }

    pub fn df(&self, z: f64) -> f64 {
        match self {
            Self::Identity => 1.,
            Self::Sigmoid => super::Sigmoid.df(z),
        }
    }

    /// Local derivative of a unit given its activated value.
    ///
    /// The chain-rule formulas are written in terms of activations (`y(1-y)`,
    /// `a(1-a)`) so this avoids recomputing the pre-activation.
    pub fn df_from_output(&self, s: f64) -> f64 {
        match self {
            Self::Identity => 1.,
            Self::Sigmoid => super::Sigmoid.df_from_output(s),
        }
    }
}
